use crate::{Player, Position};

/// The error type for [`initialize()`](crate::initialize) and everything else that
/// checks a board size, a move history or a skill level supplied from outside.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationError {
    BoardTooSmall { board_size: u32 },
    BoardTooLarge { board_size: u32 },
    BoardTooLargeToDisplay { board_size: u32 },
    DuplicatePosition { player: Player, position: Position },
    OutOfRange { player: Option<Player>, position: Position, max: Position },
    SharedPosition { position: Position },
    InconsistentLengths { player_1: usize, player_2: usize },
    SkillOutOfRange { skill: f64 },
}

impl std::error::Error for ValidationError {}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::BoardTooSmall { board_size } => {
                write!(f, "Board size {} is too small, it must be at least 3", board_size)
            }
            ValidationError::BoardTooLarge { board_size } => write!(
                f,
                "Board size {} is too large, the number of cells does not fit a position",
                board_size
            ),
            ValidationError::BoardTooLargeToDisplay { board_size } => write!(
                f,
                "Board size {} is too large to display, cell numbers above 999 don't fit",
                board_size
            ),
            ValidationError::DuplicatePosition { player, position } => write!(
                f,
                "The history of {} contains position {} more than once",
                player, position
            ),
            ValidationError::OutOfRange {
                player: Some(player),
                position,
                max,
            } => write!(
                f,
                "The history of {} contains position {}, which is outside of [1, {}]",
                player, position, max
            ),
            ValidationError::OutOfRange {
                player: None,
                position,
                max,
            } => write!(f, "Position {} is outside of [1, {}]", position, max),
            ValidationError::SharedPosition { position } => write!(
                f,
                "Position {} was claimed by both players",
                position
            ),
            ValidationError::InconsistentLengths { player_1, player_2 } => write!(
                f,
                "Player 1 has {} moves and player 2 has {}, but player 1 must have the same number of moves or exactly one more",
                player_1, player_2
            ),
            ValidationError::SkillOutOfRange { skill } => {
                write!(f, "Skill level {} is not within [0, 1]", skill)
            }
        }
    }
}

/// An internal invariant of the turn engine is broken.
///
/// This can only happen through a bug, or by bypassing validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreconditionViolation {
    HistoryLengths { player_1: usize, player_2: usize },
}

impl std::error::Error for PreconditionViolation {}

impl std::fmt::Display for PreconditionViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreconditionViolation::HistoryLengths { player_1, player_2 } => write!(
                f,
                "Turn order is corrupted: player 1 has {} moves, player 2 has {}",
                player_1, player_2
            ),
        }
    }
}

/// The error type for [`Game::play()`](crate::Game::play).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IllegalMove {
    GameFinished,
    PositionUnavailable { position: Position },
}

impl std::error::Error for IllegalMove {}

impl std::fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMove::GameFinished => write!(f, "Tried to play after the game was over"),
            IllegalMove::PositionUnavailable { position } => write!(
                f,
                "Tried to play position {}, which is not available",
                position
            ),
        }
    }
}
