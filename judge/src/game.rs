use std::io::Write;

use tictactoe::{visualize_histories, Game, GameStatus, Player, TurnState};
use tracing::trace;

use crate::player::{Decision, Participant};
use crate::recording::Recorder;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    Finished(GameStatus),
    /// A participant aborted. The game's histories can be used to resume it.
    Aborted { player: Player },
}

/// Where to draw the board, if anywhere.
pub struct Display<'a> {
    pub out: &'a mut dyn Write,
    pub colored: bool,
}

impl Display<'_> {
    fn board(&mut self, game: &Game) -> anyhow::Result<()> {
        let board = visualize_histories(game.board_size(), game.histories(), self.colored)?;
        writeln!(self.out, "{}", board)?;
        Ok(())
    }
}

pub fn announcement(status: GameStatus) -> Option<String> {
    match status {
        GameStatus::Ongoing => None,
        GameStatus::Player1Win | GameStatus::Player2Win => status
            .winner()
            .map(|player| format!("{} won the game, congratulations!", player)),
        GameStatus::DrawExhausted => {
            Some(String::from("No one can win the game any more!\nThe game is over."))
        }
    }
}

/// Lets the participants take turns until the game is decided or one of them
/// aborts. `participants[0]` plays as player 1.
///
/// Returns an error if a participant fails or makes an illegal move.
pub fn play_game(
    game: &mut Game,
    participants: [&mut dyn Participant; 2],
    mut display: Option<Display>,
    recorder: &mut Option<Recorder>,
) -> anyhow::Result<GameResult> {
    if let Some(display) = display.as_mut() {
        display.board(game)?;
        // A resumed game can be decided before anyone moves
        if let Some(text) = announcement(game.status()) {
            writeln!(display.out, "{}", text)?;
        }
    }

    while let Some(player) = game.current_player() {
        let participant = &mut *participants[player.index()];
        let is_human = participant.is_human();
        if let (Some(display), true) = (display.as_mut(), is_human) {
            writeln!(display.out, "{} - {}:", player, participant.name())?;
        }

        let position = match participant.decide(game)? {
            Decision::Play(position) => position,
            Decision::Abort => {
                if let Some(rec) = recorder {
                    rec.write_game_recording(game.histories())?;
                }
                return Ok(GameResult::Aborted { player });
            }
        };
        trace!(%player, position, "Move");
        let state = game
            .play(position)
            .map_err(|err| anyhow::anyhow!("{} ({}): {}", participant.name(), player, err))?;

        if let Some(display) = display.as_mut() {
            if !is_human {
                writeln!(display.out, "{} - {}: {}", player, participant.name(), position)?;
            }
            display.board(game)?;
            if let TurnState::Finished(status) = state {
                if let Some(text) = announcement(status) {
                    writeln!(display.out, "{}", text)?;
                }
            }
        }
    }

    if let Some(rec) = recorder {
        rec.write_game_recording(game.histories())?;
    }
    Ok(GameResult::Finished(game.status()))
}

#[cfg(test)]
mod tests {
    use tictactoe::{Histories, Position};

    use super::*;

    /// Plays a fixed list of moves.
    struct Scripted {
        moves: Vec<Position>,
    }

    impl Participant for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn decide(&mut self, _game: &Game) -> anyhow::Result<Decision> {
            if self.moves.is_empty() {
                Ok(Decision::Abort)
            } else {
                Ok(Decision::Play(self.moves.remove(0)))
            }
        }
    }

    #[test]
    fn diagonal_win() {
        let mut game = Game::new(3).unwrap();
        let mut player_1 = Scripted {
            moves: vec![1, 5, 9],
        };
        let mut player_2 = Scripted { moves: vec![2, 3] };
        let mut out = Vec::new();
        let display = Display {
            out: &mut out,
            colored: false,
        };
        let result =
            play_game(&mut game, [&mut player_1, &mut player_2], Some(display), &mut None)
                .unwrap();
        assert_eq!(result, GameResult::Finished(GameStatus::Player1Win));
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Player1 (X) won the game, congratulations!"));
        assert!(out.contains("Player2 (O) - scripted: 3"));
    }

    #[test]
    fn abort_keeps_histories() {
        let mut game = Game::new(3).unwrap();
        let mut player_1 = Scripted { moves: vec![5] };
        let mut player_2 = Scripted { moves: vec![] };
        let result = play_game(&mut game, [&mut player_1, &mut player_2], None, &mut None).unwrap();
        assert_eq!(result, GameResult::Aborted { player: Player::Two });
        assert_eq!(game.histories(), &Histories([vec![5], vec![]]));
    }

    #[test]
    fn illegal_move_is_an_error() {
        let mut game = Game::new(3).unwrap();
        let mut player_1 = Scripted { moves: vec![5] };
        let mut player_2 = Scripted { moves: vec![5] };
        assert!(play_game(&mut game, [&mut player_1, &mut player_2], None, &mut None).is_err());
    }

    #[test]
    fn resumed_finished_game_is_announced() {
        let mut game = Game::resume(3, Histories([vec![1, 2, 3], vec![4, 5]])).unwrap();
        let mut player_1 = Scripted { moves: vec![] };
        let mut player_2 = Scripted { moves: vec![] };
        let mut out = Vec::new();
        let display = Display {
            out: &mut out,
            colored: false,
        };
        let result =
            play_game(&mut game, [&mut player_1, &mut player_2], Some(display), &mut None)
                .unwrap();
        assert_eq!(result, GameResult::Finished(GameStatus::Player1Win));
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("Player1 (X) won the game, congratulations!").count(), 1);
    }

    #[test]
    fn aborted_game_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = Some(Recorder::new(dir.path().to_path_buf()).unwrap());
        let mut game = Game::new(3).unwrap();
        let mut player_1 = Scripted { moves: vec![5] };
        let mut player_2 = Scripted { moves: vec![] };
        let result =
            play_game(&mut game, [&mut player_1, &mut player_2], None, &mut recorder).unwrap();
        assert_eq!(result, GameResult::Aborted { player: Player::Two });
        let recorded = Histories::load(&dir.path().join("game_000001.json")).unwrap();
        assert_eq!(recorded, Histories([vec![5], vec![]]));
    }

    #[test]
    fn finished_games_are_recorded_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = Some(Recorder::new(dir.path().to_path_buf()).unwrap());
        for _ in 0..2 {
            let mut game = Game::new(3).unwrap();
            let mut player_1 = Scripted {
                moves: vec![1, 5, 9],
            };
            let mut player_2 = Scripted { moves: vec![2, 3] };
            let result =
                play_game(&mut game, [&mut player_1, &mut player_2], None, &mut recorder)
                    .unwrap();
            assert_eq!(result, GameResult::Finished(GameStatus::Player1Win));
        }
        let expected = Histories([vec![1, 5, 9], vec![2, 3]]);
        for name in ["game_000001.json", "game_000002.json"] {
            assert_eq!(Histories::load(&dir.path().join(name)).unwrap(), expected);
        }
        assert!(!dir.path().join("game_000003.json").exists());
    }

    #[test]
    fn announcements() {
        assert_eq!(announcement(GameStatus::Ongoing), None);
        assert_eq!(
            announcement(GameStatus::Player2Win).unwrap(),
            "Player2 (O) won the game, congratulations!"
        );
        assert!(announcement(GameStatus::DrawExhausted)
            .unwrap()
            .starts_with("No one can win"));
    }
}
