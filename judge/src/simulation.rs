use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tictactoe::{Game, GameStatus, Skill};
use tracing::debug;

use crate::game::{play_game, GameResult};
use crate::player::BotPlayer;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchScore {
    pub wins: [usize; 2],
    pub draws: usize,
}

/// Fractions of games won by either bot or drawn, rounded to 3 decimals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rates {
    pub bot_1: f64,
    pub bot_2: f64,
    pub draw: f64,
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

impl MatchScore {
    pub fn num_games(&self) -> usize {
        self.wins[0] + self.wins[1] + self.draws
    }

    fn record(&mut self, status: GameStatus) {
        match status.winner() {
            Some(player) => self.wins[player.index()] += 1,
            None => self.draws += 1,
        }
    }

    pub fn rates(&self) -> Rates {
        let num_games = self.num_games().max(1) as f64;
        Rates {
            bot_1: round3(self.wins[0] as f64 / num_games),
            bot_2: round3(self.wins[1] as f64 / num_games),
            draw: round3(self.draws as f64 / num_games),
        }
    }
}

/// Plays `num_games` games between two bots, bot 1 always moving first.
pub fn bot_vs_bot_stats(
    board_size: u32,
    skill_1: Skill,
    skill_2: Skill,
    num_games: usize,
    rng: &mut StdRng,
) -> anyhow::Result<MatchScore> {
    if num_games == 0 {
        anyhow::bail!("At least one game has to be played");
    }
    // Fail early on a bad board size
    Game::new(board_size)?;

    let mut bot_1 = BotPlayer::new("bot-1", skill_1, StdRng::seed_from_u64(rng.gen()));
    let mut bot_2 = BotPlayer::new("bot-2", skill_2, StdRng::seed_from_u64(rng.gen()));
    let mut match_score = MatchScore::default();
    for game_idx in 0..num_games {
        let mut game = Game::new(board_size)?;
        match play_game(&mut game, [&mut bot_1, &mut bot_2], None, &mut None)? {
            GameResult::Finished(status) => {
                debug!(game_idx, ?status, "Game finished");
                match_score.record(status);
            }
            GameResult::Aborted { player } => {
                anyhow::bail!("Game {} was aborted by {}", game_idx, player)
            }
        }
    }
    Ok(match_score)
}

/// Results of every pairing of skill levels on a grid.
pub struct SkillTables {
    pub board_size: u32,
    pub levels: Vec<Skill>,
    /// `scores[i][j]` is bot 1 at `levels[i]` against bot 2 at `levels[j]`.
    pub scores: Vec<Vec<MatchScore>>,
}

/// Runs [`bot_vs_bot_stats()`] for all pairs of the levels 0, 1/steps, ..., 1.
pub fn skill_tables(
    board_size: u32,
    steps: u32,
    num_games: usize,
    rng: &mut StdRng,
) -> anyhow::Result<SkillTables> {
    if steps == 0 {
        anyhow::bail!("The skill grid needs at least one step");
    }
    let levels = (0..=steps)
        .map(|i| Skill::new(f64::from(i) / f64::from(steps)))
        .collect::<Result<Vec<Skill>, _>>()?;
    let mut scores = Vec::with_capacity(levels.len());
    for &skill_1 in &levels {
        let row = levels
            .iter()
            .map(|&skill_2| bot_vs_bot_stats(board_size, skill_1, skill_2, num_games, rng))
            .collect::<anyhow::Result<Vec<MatchScore>>>()?;
        scores.push(row);
    }
    Ok(SkillTables {
        board_size,
        levels,
        scores,
    })
}

impl std::fmt::Display for SkillTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let n = self.board_size;
        writeln!(f, "## win rates for games among bots of different smart levels")?;
        let header = format!(
            "# bot1_level, {}",
            self.levels
                .iter()
                .map(|level| format!("bot2_{}", level))
                .join(", ")
        );
        let tables: [(&str, fn(&Rates) -> f64); 3] = [
            ("bot-1 win rate", |rates: &Rates| rates.bot_1),
            ("bot-2 win rate", |rates: &Rates| rates.bot_2),
            ("draw rate", |rates: &Rates| rates.draw),
        ];
        for (title, pick) in tables {
            writeln!(f)?;
            writeln!(f, "## table of {} on {}x{} grid", title, n, n)?;
            writeln!(f, "{}", header)?;
            for (level, row) in self.levels.iter().zip(&self.scores) {
                let cells = row
                    .iter()
                    .map(|score| format!("{:.3}", pick(&score.rates())))
                    .join(", ");
                writeln!(f, "{}, {}", level, cells)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_sum_to_one() {
        let mut rng = StdRng::seed_from_u64(42);
        let skill = Skill::new(0.4).unwrap();
        let score = bot_vs_bot_stats(3, skill, skill, 500, &mut rng).unwrap();
        assert_eq!(score.num_games(), 500);
        let rates = score.rates();
        assert!((rates.bot_1 + rates.bot_2 + rates.draw - 1.0).abs() <= 0.002);
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let skill_1 = Skill::new(0.2).unwrap();
        let skill_2 = Skill::new(0.9).unwrap();
        let first = bot_vs_bot_stats(4, skill_1, skill_2, 50, &mut StdRng::seed_from_u64(5));
        let second = bot_vs_bot_stats(4, skill_1, skill_2, 50, &mut StdRng::seed_from_u64(5));
        assert_eq!(first.unwrap(), second.unwrap());
    }

    #[test]
    fn skilled_bot_beats_random_bot() {
        let mut rng = StdRng::seed_from_u64(9);
        let score = bot_vs_bot_stats(3, Skill::MIN, Skill::MAX, 200, &mut rng).unwrap();
        assert!(score.wins[1] > 4 * score.wins[0]);
        let score = bot_vs_bot_stats(3, Skill::MAX, Skill::MIN, 200, &mut rng).unwrap();
        assert!(score.wins[0] > 4 * score.wins[1]);
    }

    #[test]
    fn invalid_arguments() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(bot_vs_bot_stats(2, Skill::MAX, Skill::MAX, 10, &mut rng).is_err());
        assert!(bot_vs_bot_stats(3, Skill::MAX, Skill::MAX, 0, &mut rng).is_err());
        assert!(skill_tables(3, 0, 10, &mut rng).is_err());
    }

    #[test]
    fn tables_layout() {
        let mut rng = StdRng::seed_from_u64(3);
        let tables = skill_tables(3, 2, 20, &mut rng).unwrap();
        assert_eq!(tables.levels.len(), 3);
        let text = tables.to_string();
        assert!(text.contains("## table of draw rate on 3x3 grid"));
        assert!(text.contains("# bot1_level, bot2_0.0, bot2_0.5, bot2_1.0"));
        assert_eq!(text.lines().filter(|line| line.starts_with("0.5, ")).count(), 3);

        let tables = skill_tables(3, 4, 2, &mut rng).unwrap();
        let text = tables.to_string();
        assert!(text.contains("# bot1_level, bot2_0.0, bot2_0.25, bot2_0.5, bot2_0.75, bot2_1.0"));
        assert_eq!(text.lines().filter(|line| line.starts_with("0.75, ")).count(), 3);
    }
}
