use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{PreconditionViolation, ValidationError};

/// A cell on the board, numbered row-major starting at 1.
pub type Position = u32;

/// A set of positions which, when all claimed by one player, wins the game.
pub type WinningLine = BTreeSet<Position>;

/// One of the two participants. Player 1 always moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// The mark drawn on the board for this player.
    pub fn mark(self) -> char {
        match self {
            Player::One => 'X',
            Player::Two => 'O',
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::One => write!(f, "Player1 ({})", self.mark()),
            Player::Two => write!(f, "Player2 ({})", self.mark()),
        }
    }
}

/// The ordered move histories of both players.
///
/// This is also the only thing that gets persisted to resume a game. It
/// serializes as a list of two integer lists, e.g. `[[1,5,9],[2,3]]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histories(pub [Vec<Position>; 2]);

impl Histories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(&self, player: Player) -> &[Position] {
        &self.0[player.index()]
    }

    /// Returns `(own, opponent)` from the point of view of `player`.
    pub fn split_for(&self, player: Player) -> (&[Position], &[Position]) {
        (self.of(player), self.of(player.other()))
    }

    pub(crate) fn push(&mut self, player: Player, position: Position) {
        self.0[player.index()].push(position);
    }

    /// Total number of moves played so far.
    pub fn len(&self) -> usize {
        self.0[0].len() + self.0[1].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All positions claimed by either player.
    pub fn claimed(&self) -> impl Iterator<Item = Position> + '_ {
        self.0[0].iter().chain(self.0[1].iter()).copied()
    }

    /// Whose turn it is, derived from the lengths of the histories.
    pub fn next_player(&self) -> Result<Player, PreconditionViolation> {
        let (player_1, player_2) = (self.0[0].len(), self.0[1].len());
        if player_1 == player_2 {
            Ok(Player::One)
        } else if player_1 == player_2 + 1 {
            Ok(Player::Two)
        } else {
            Err(PreconditionViolation::HistoryLengths { player_1, player_2 })
        }
    }

    /// Parses histories from their JSON form. This does not validate them
    /// against a board, that happens in [`initialize()`].
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(s.trim())?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
            .map_err(|err| anyhow::anyhow!("Could not parse '{}': {}", path.display(), err))
    }
}

impl std::fmt::Display for Histories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (idx, history) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for (pos_idx, position) in history.iter().enumerate() {
                if pos_idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", position)?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

/// The winning lines that can still be completed by at least one player.
///
/// Lines are only ever removed, see [`evaluate()`](crate::evaluate).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveLines {
    pub(crate) lines: Vec<WinningLine>,
}

impl ActiveLines {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WinningLine> {
        self.lines.iter()
    }

    pub fn contains(&self, line: &WinningLine) -> bool {
        self.lines.contains(line)
    }
}

impl From<Vec<WinningLine>> for ActiveLines {
    fn from(lines: Vec<WinningLine>) -> Self {
        Self { lines }
    }
}

impl<'a> IntoIterator for &'a ActiveLines {
    type Item = &'a WinningLine;
    type IntoIter = std::slice::Iter<'a, WinningLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// The number of cells on a board, or an error if the board is unusable.
pub fn num_cells(board_size: u32) -> Result<Position, ValidationError> {
    if board_size < 3 {
        return Err(ValidationError::BoardTooSmall { board_size });
    }
    board_size
        .checked_mul(board_size)
        .ok_or(ValidationError::BoardTooLarge { board_size })
}

/// All 2N+2 winning lines of an N×N board: the rows, then the columns, then
/// the main diagonal and the anti-diagonal.
pub fn winning_lines(board_size: u32) -> Vec<WinningLine> {
    let n = board_size;
    let mut lines = Vec::with_capacity(2 * n as usize + 2);
    for row in 0..n {
        lines.push((0..n).map(|col| 1 + row * n + col).collect());
    }
    for col in 0..n {
        lines.push((0..n).map(|row| 1 + row * n + col).collect());
    }
    lines.push((0..n).map(|i| 1 + i * n + i).collect());
    lines.push((0..n).map(|i| (i + 1) * n - i).collect());
    lines
}

/// Checks that prior histories can belong to a game on this board.
pub fn validate_histories(board_size: u32, histories: &Histories) -> Result<(), ValidationError> {
    let max = num_cells(board_size)?;
    let mut claimed = BTreeSet::new();
    for player in [Player::One, Player::Two] {
        let mut own = BTreeSet::new();
        for &position in histories.of(player) {
            if !own.insert(position) {
                return Err(ValidationError::DuplicatePosition { player, position });
            }
        }
    }
    for player in [Player::One, Player::Two] {
        for &position in histories.of(player) {
            if position < 1 || position > max {
                return Err(ValidationError::OutOfRange {
                    player: Some(player),
                    position,
                    max,
                });
            }
            if !claimed.insert(position) {
                return Err(ValidationError::SharedPosition { position });
            }
        }
    }
    histories
        .next_player()
        .map_err(|PreconditionViolation::HistoryLengths { player_1, player_2 }| {
            ValidationError::InconsistentLengths { player_1, player_2 }
        })?;
    Ok(())
}

/// Sets up a game: validates the prior histories if there are any, and
/// generates the winning lines.
pub fn initialize(
    board_size: u32,
    prior: Option<Histories>,
) -> Result<(Histories, ActiveLines), ValidationError> {
    num_cells(board_size)?;
    let histories = match prior {
        Some(histories) => {
            validate_histories(board_size, &histories)?;
            histories
        }
        None => Histories::new(),
    };
    Ok((histories, ActiveLines::from(winning_lines(board_size))))
}
