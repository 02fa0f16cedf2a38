use std::collections::BTreeSet;

use crate::{
    evaluate, initialize, ActiveLines, GameStatus, Histories, IllegalMove, Player, Position,
    ValidationError,
};

/// Where a game currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnState {
    AwaitingPlayer1,
    AwaitingPlayer2,
    Finished(GameStatus),
}

impl TurnState {
    fn awaiting(player: Player) -> Self {
        match player {
            Player::One => TurnState::AwaitingPlayer1,
            Player::Two => TurnState::AwaitingPlayer2,
        }
    }
}

/// A single game, exclusively owning its histories and active lines.
///
/// Moves go through [`Game::play()`], which keeps the histories, the
/// available positions and the active lines consistent with each other.
#[derive(Clone, Debug)]
pub struct Game {
    board_size: u32,
    histories: Histories,
    active_lines: ActiveLines,
    available: BTreeSet<Position>,
    state: TurnState,
}

impl Game {
    /// Starts a new game on an empty board.
    pub fn new(board_size: u32) -> Result<Self, ValidationError> {
        let (histories, active_lines) = initialize(board_size, None)?;
        Ok(Self::from_parts(board_size, histories, active_lines))
    }

    /// Continues a game from previously played moves.
    ///
    /// The histories are validated, and evaluated once so that the active
    /// lines are pruned. A resumed game may therefore already be finished.
    pub fn resume(board_size: u32, histories: Histories) -> Result<Self, ValidationError> {
        let (histories, mut active_lines) = initialize(board_size, Some(histories))?;
        let status = evaluate(&mut active_lines, &histories);
        let mut game = Self::from_parts(board_size, histories, active_lines);
        if status.is_over() {
            game.state = TurnState::Finished(status);
        }
        Ok(game)
    }

    fn from_parts(board_size: u32, histories: Histories, active_lines: ActiveLines) -> Self {
        let claimed: BTreeSet<Position> = histories.claimed().collect();
        let available = (1..=board_size * board_size)
            .filter(|p| !claimed.contains(p))
            .collect();
        let state = match histories.next_player() {
            Ok(player) => TurnState::awaiting(player),
            Err(err) => panic!("{}", err),
        };
        Self {
            board_size,
            histories,
            active_lines,
            available,
            state,
        }
    }

    pub fn board_size(&self) -> u32 {
        self.board_size
    }

    pub fn histories(&self) -> &Histories {
        &self.histories
    }

    pub fn active_lines(&self) -> &ActiveLines {
        &self.active_lines
    }

    pub fn available(&self) -> &BTreeSet<Position> {
        &self.available
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn status(&self) -> GameStatus {
        match self.state {
            TurnState::Finished(status) => status,
            TurnState::AwaitingPlayer1 | TurnState::AwaitingPlayer2 => GameStatus::Ongoing,
        }
    }

    /// The player who has to move next, or `None` if the game is over.
    pub fn current_player(&self) -> Option<Player> {
        match self.state {
            TurnState::AwaitingPlayer1 => Some(Player::One),
            TurnState::AwaitingPlayer2 => Some(Player::Two),
            TurnState::Finished(_) => None,
        }
    }

    /// Plays `position` for the current player and evaluates the result.
    pub fn play(&mut self, position: Position) -> Result<TurnState, IllegalMove> {
        let player = self.current_player().ok_or(IllegalMove::GameFinished)?;
        if !self.available.remove(&position) {
            return Err(IllegalMove::PositionUnavailable { position });
        }
        self.histories.push(player, position);

        let status = evaluate(&mut self.active_lines, &self.histories);
        self.state = if status.is_over() {
            TurnState::Finished(status)
        } else {
            TurnState::awaiting(player.other())
        };
        Ok(self.state)
    }

    pub fn into_histories(self) -> Histories {
        self.histories
    }
}
