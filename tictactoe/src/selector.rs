use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use rand::seq::IteratorRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{ActiveLines, Position, ValidationError};

/// How often an automated player makes use of the threats it finds.
///
/// 0 plays (almost) randomly, 1 always takes the nearest win or block.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Skill(f64);

impl Skill {
    pub const MIN: Skill = Skill(0.0);
    pub const MAX: Skill = Skill(1.0);

    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::SkillOutOfRange { skill: value })
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// The chance of looking for a threat at any single depth.
    ///
    /// The floor keeps even skill 0 from being exactly random, and makes
    /// skill 1 strictly greater than any `gen::<f64>()` sample.
    pub fn lookahead_probability(self) -> f64 {
        self.0.powf(1.5) + 1e-6
    }
}

impl Default for Skill {
    fn default() -> Self {
        Skill(0.5)
    }
}

impl TryFrom<f64> for Skill {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Skill::new(value)
    }
}

impl From<Skill> for f64 {
    fn from(skill: Skill) -> f64 {
        skill.0
    }
}

impl FromStr for Skill {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("'{}' is not a number", s))?;
        Ok(Skill::new(value)?)
    }
}

impl std::fmt::Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Finds the positions that would help complete lines which are exactly
/// `missing_count` moves away from being owned by `history`.
///
/// A line only counts if all of its missing positions are still available.
/// Positions are counted once per such line, and only the most frequent
/// ones are returned. With `missing_count == 1` these are immediate wins
/// (or, for the opponent's history, positions that must be blocked).
///
/// An empty history never has threats.
pub fn best_positions_for_threat(
    history: &[Position],
    available: &BTreeSet<Position>,
    active_lines: &ActiveLines,
    missing_count: usize,
) -> BTreeSet<Position> {
    if history.is_empty() {
        return BTreeSet::new();
    }
    let owned: BTreeSet<Position> = history.iter().copied().collect();

    let mut counts: BTreeMap<Position, usize> = BTreeMap::new();
    for line in active_lines {
        let missing: Vec<Position> = line.difference(&owned).copied().collect();
        if missing.len() == missing_count && missing.iter().all(|p| available.contains(p)) {
            for position in missing {
                *counts.entry(position).or_insert(0) += 1;
            }
        }
    }

    let Some(&top_count) = counts.values().max() else {
        return BTreeSet::new();
    };
    counts
        .into_iter()
        .filter(|&(_, count)| count == top_count)
        .map(|(position, _)| position)
        .collect()
}

/// Picks a move for the player owning `own_history`.
///
/// For every lookahead depth from 1 to `board_size - 1`, the own threats are
/// examined first and then the opponent's, each only with the probability
/// given by [`Skill::lookahead_probability()`]. The first depth that yields
/// candidates decides the move, ties are broken uniformly at random. Without
/// any candidates, a uniformly random available position is played.
///
/// # Panics
///
/// If `available` is empty. Callers must only ask for a move while the game
/// is ongoing, and an ongoing game always has a free cell.
pub fn choose_move<R: Rng + ?Sized>(
    own_history: &[Position],
    opponent_history: &[Position],
    available: &BTreeSet<Position>,
    active_lines: &ActiveLines,
    board_size: u32,
    skill: Skill,
    rng: &mut R,
) -> Position {
    let probability = skill.lookahead_probability();
    for depth in 1..board_size as usize {
        for history in [own_history, opponent_history] {
            if rng.gen::<f64>() < probability {
                let candidates =
                    best_positions_for_threat(history, available, active_lines, depth);
                if let Some(&position) = candidates.iter().choose(rng) {
                    return position;
                }
            }
        }
    }
    *available
        .iter()
        .choose(rng)
        .expect("choose_move() needs at least one available position")
}
