use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{ActiveLines, Histories, Player, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Ongoing,
    Player1Win,
    Player2Win,
    /// No winning line is left that either player could still complete.
    DrawExhausted,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameStatus::Player1Win => Some(Player::One),
            GameStatus::Player2Win => Some(Player::Two),
            GameStatus::Ongoing | GameStatus::DrawExhausted => None,
        }
    }

    fn won_by(player: Player) -> Self {
        match player {
            Player::One => GameStatus::Player1Win,
            Player::Two => GameStatus::Player2Win,
        }
    }
}

/// Determines the game status, and removes every active line that contains
/// moves of both players, since neither player can complete it anymore.
///
/// Each active line is checked against player 1's history and then player 2's,
/// and every hit overwrites the status. Under the turn order both players can
/// never hold a complete line at the same time, but if they do (the histories
/// were corrupted), the last hit in line order wins. This is logged, not
/// resolved.
///
/// The caller has to keep `active_lines` for the next call.
pub fn evaluate(active_lines: &mut ActiveLines, histories: &Histories) -> GameStatus {
    let claimed: [BTreeSet<Position>; 2] = [
        histories.of(Player::One).iter().copied().collect(),
        histories.of(Player::Two).iter().copied().collect(),
    ];

    let mut status = GameStatus::Ongoing;
    let mut has_won = [false; 2];
    for line in active_lines.iter() {
        for player in [Player::One, Player::Two] {
            if line.is_subset(&claimed[player.index()]) {
                status = GameStatus::won_by(player);
                has_won[player.index()] = true;
            }
        }
    }
    if has_won == [true, true] {
        warn!(?status, %histories, "Both players completed a line, the last one found counts");
    }

    let num_lines_before = active_lines.len();
    active_lines.lines.retain(|line| {
        line.is_disjoint(&claimed[0]) || line.is_disjoint(&claimed[1])
    });
    if active_lines.len() < num_lines_before {
        debug!(
            pruned = num_lines_before - active_lines.len(),
            remaining = active_lines.len(),
            "Pruned winning lines"
        );
    }

    if status == GameStatus::Ongoing && active_lines.is_empty() {
        status = GameStatus::DrawExhausted;
    }
    status
}
