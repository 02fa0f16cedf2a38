use std::io::{BufRead, Write};
use std::time::Duration;

use rand::rngs::StdRng;
use tictactoe::{choose_move, visualize_histories, visualize_positions, Game, Position, Skill};
use tracing::trace;

/// What a participant wants to do on its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Play(Position),
    /// Stop the game. The histories so far can be used to resume it later.
    Abort,
}

/// Something that can provide moves for one side of a game.
pub trait Participant {
    fn name(&self) -> &str;

    fn is_human(&self) -> bool {
        false
    }

    /// Called only while the game is ongoing and it's this participant's turn.
    /// A returned position must be one of `game.available()`.
    fn decide(&mut self, game: &Game) -> anyhow::Result<Decision>;
}

/// Automated participant using the heuristic move selector.
pub struct BotPlayer {
    pub name: String,
    pub skill: Skill,
    rng: StdRng,
    /// Pause before each move, so that a human opponent can follow along.
    delay: Duration,
}

impl BotPlayer {
    pub fn new(name: &str, skill: Skill, rng: StdRng) -> Self {
        Self {
            name: String::from(name),
            skill,
            rng,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Participant for BotPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&mut self, game: &Game) -> anyhow::Result<Decision> {
        let Some(player) = game.current_player() else {
            anyhow::bail!("{} was asked for a move after the game ended", self.name);
        };
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        let (own, opponent) = game.histories().split_for(player);
        let position = choose_move(
            own,
            opponent,
            game.available(),
            game.active_lines(),
            game.board_size(),
            self.skill,
            &mut self.rng,
        );
        trace!(bot = %self.name, skill = %self.skill, position, "Bot chose a move");
        Ok(Decision::Play(position))
    }
}

/// One line of human input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Position(Position),
    ListAvailable,
    ShowBoard,
    ShowHistory,
    Quit,
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        match input {
            "a" => Some(Command::ListAvailable),
            "d" => Some(Command::ShowBoard),
            "u" => Some(Command::ShowHistory),
            "q" => Some(Command::Quit),
            _ if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) => {
                input.parse().ok().map(Command::Position)
            }
            _ => None,
        }
    }
}

/// A person typing moves and commands.
pub struct HumanPlayer<R, W> {
    pub name: String,
    input: R,
    output: W,
    colored: bool,
    // A re-usable buffer for reading lines.
    buf: String,
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(name: &str, input: R, output: W, colored: bool) -> Self {
        Self {
            name: String::from(name),
            input,
            output,
            colored,
            buf: String::new(),
        }
    }

    /// Returns `None` at the end of the input.
    fn read_command(&mut self) -> anyhow::Result<Option<Option<Command>>> {
        self.buf.clear();
        if self.input.read_line(&mut self.buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(Command::parse(&self.buf)))
    }
}

impl<R: BufRead, W: Write> Participant for HumanPlayer<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_human(&self) -> bool {
        true
    }

    fn decide(&mut self, game: &Game) -> anyhow::Result<Decision> {
        let max = game.board_size() * game.board_size();
        writeln!(self.output, "   %% 'a' - print available positions")?;
        writeln!(self.output, "   %% 'd' - draw game board")?;
        writeln!(self.output, "   %% 'u' - print users' history")?;
        writeln!(self.output, "   %% 'q' - quit")?;
        write!(self.output, "  > please input position [1-{}]: ", max)?;
        loop {
            self.output.flush()?;
            let Some(command) = self.read_command()? else {
                return Ok(Decision::Abort);
            };
            match command {
                Some(Command::Position(position)) if game.available().contains(&position) => {
                    return Ok(Decision::Play(position));
                }
                Some(Command::ListAvailable) => {
                    writeln!(self.output, "  available positions:")?;
                    let positions = game.available().iter().copied();
                    writeln!(
                        self.output,
                        "{}",
                        visualize_positions(game.board_size(), positions)?
                    )?;
                    write!(self.output, "  > input your position choice: ")?;
                }
                Some(Command::ShowBoard) => {
                    writeln!(
                        self.output,
                        "{}",
                        visualize_histories(game.board_size(), game.histories(), self.colored)?
                    )?;
                    write!(self.output, "  > input position [1-{}]: ", max)?;
                }
                Some(Command::ShowHistory) => {
                    writeln!(self.output, "  players' history:")?;
                    writeln!(self.output, "    {}", game.histories())?;
                    write!(self.output, "  > input your position choice: ")?;
                }
                Some(Command::Quit) => return Ok(Decision::Abort),
                Some(Command::Position(_)) | None => {
                    write!(self.output, "  > invalid, try again [1-{}]: ", max)?;
                }
            }
        }
    }
}
