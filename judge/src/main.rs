use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tictactoe::{Game, Histories, Skill};
use tictactoe_judge::{
    bot_vs_bot_stats, play_game, skill_tables, BotPlayer, Display, GameResult, HumanPlayer,
    Participant, ParticipantKind, PlayerConfig, Recorder,
};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "ttt", about = "Tic-tac-toe on an n×n board, against people or bots")]
struct Args {
    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info", global = true)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a game interactively
    Play(PlayArgs),
    /// Let two bots play many games against each other and report win rates
    Simulate(SimulateArgs),
    /// Report win rates for every pairing of bot skill levels on a grid
    Tables(TablesArgs),
}

#[derive(clap::Args)]
struct PlayArgs {
    /// Grid size n of the n×n board
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(3..32))]
    board_size: u32,

    /// Who plays X (and moves first): "human", "bot" or "bot:<skill>"
    #[arg(long, default_value = "human")]
    player_1: ParticipantKind,

    /// Who plays O: "human", "bot" or "bot:<skill>"
    #[arg(long, default_value = "bot:0.5")]
    player_2: ParticipantKind,

    /// Paths to the config JSON files of both players, overriding --player-1 and --player-2
    #[arg(long, num_args(2), value_delimiter = ' ')]
    player_configs: Vec<PathBuf>,

    /// Continue the unfinished game recorded in this file
    #[arg(long, conflicts_with = "history")]
    resume: Option<PathBuf>,

    /// Continue an unfinished game from both players' moves, e.g. "[[1, 5], [9]]"
    #[arg(long)]
    history: Option<String>,

    /// Record the histories of all games as JSON files into this directory
    #[arg(short, long)]
    record_games_to_directory: Option<PathBuf>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Draw the marks without terminal colors
    #[arg(long, default_value_t = false)]
    no_color: bool,

    /// How long bots wait before moving when a human is playing
    #[arg(long, default_value_t = 500)]
    bot_delay_ms: u64,
}

#[derive(clap::Args)]
struct SimulateArgs {
    /// Grid size n of the n×n board
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(3..))]
    board_size: u32,

    /// Skill of bot 1, which moves first, in [0, 1]
    #[arg(long, default_value = "0.4")]
    skill_1: Skill,

    /// Skill of bot 2 in [0, 1]
    #[arg(long, default_value = "0.4")]
    skill_2: Skill,

    /// How many games to play
    #[arg(short, long, default_value_t = 10000)]
    num_games: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(clap::Args)]
struct TablesArgs {
    /// Grid size n of the n×n board
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(3..))]
    board_size: u32,

    /// Number of intervals the skill range [0, 1] is divided into
    #[arg(long, default_value_t = 10)]
    steps: u32,

    /// How many games to play for each pairing
    #[arg(short, long, default_value_t = 10000)]
    num_games: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    match args.command {
        Command::Play(play_args) => play(play_args),
        Command::Simulate(simulate_args) => simulate(simulate_args),
        Command::Tables(tables_args) => tables(tables_args),
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    // Get a random seed
    let seed = seed.unwrap_or_else(rand::random);
    info!(seed);
    StdRng::seed_from_u64(seed)
}

fn default_nick(kind: ParticipantKind, other: ParticipantKind, idx: usize) -> String {
    let nick = match kind {
        ParticipantKind::Human => String::from("User"),
        ParticipantKind::Bot { skill } => format!("Bot {}", skill),
    };
    if kind == other {
        format!("{} {}", nick, idx + 1)
    } else {
        nick
    }
}

fn make_participant(
    config: &PlayerConfig,
    bot_delay: Duration,
    colored: bool,
    rng: &mut StdRng,
) -> Box<dyn Participant> {
    match config.kind {
        // Stdin is buffered already. A one byte buffer on top lets two human
        // players share it without one of them swallowing the other's input.
        ParticipantKind::Human => Box::new(HumanPlayer::new(
            &config.nick,
            BufReader::with_capacity(1, io::stdin()),
            io::stdout(),
            colored,
        )),
        ParticipantKind::Bot { skill } => Box::new(
            BotPlayer::new(&config.nick, skill, StdRng::seed_from_u64(rng.gen()))
                .with_delay(bot_delay),
        ),
    }
}

/// Asks `question` and returns the answer, defaulting to yes.
fn ask_yes_no(question: &str) -> anyhow::Result<bool> {
    print!("{} (y/n) [y]: ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    let answer = answer.trim().to_lowercase();
    Ok(answer != "n" && answer != "no")
}

fn play(args: PlayArgs) -> anyhow::Result<()> {
    let mut rng = seeded_rng(args.seed);

    let player_configs: Vec<PlayerConfig> = if args.player_configs.is_empty() {
        vec![
            PlayerConfig {
                nick: default_nick(args.player_1, args.player_2, 0),
                kind: args.player_1,
            },
            PlayerConfig {
                nick: default_nick(args.player_2, args.player_1, 1),
                kind: args.player_2,
            },
        ]
    } else {
        args.player_configs
            .iter()
            .map(|path| PlayerConfig::load(path))
            .collect::<Result<Vec<PlayerConfig>, anyhow::Error>>()?
    };
    let any_human = player_configs.iter().any(PlayerConfig::is_human);
    let bot_delay = if any_human {
        Duration::from_millis(args.bot_delay_ms)
    } else {
        Duration::ZERO
    };
    let colored = !args.no_color;
    let mut participants = [
        make_participant(&player_configs[0], bot_delay, colored, &mut rng),
        make_participant(&player_configs[1], bot_delay, colored, &mut rng),
    ];

    let mut recorder = if let Some(dir_path) = args.record_games_to_directory {
        Some(Recorder::new(dir_path)?)
    } else {
        None
    };

    let prior = match (args.resume, args.history) {
        (Some(path), _) => Some(Histories::load(&path)?),
        (None, Some(json)) => Some(Histories::from_json_str(&json)?),
        (None, None) => None,
    };
    let mut game = match prior {
        Some(histories) => Game::resume(args.board_size, histories)?,
        None => Game::new(args.board_size)?,
    };

    println!("****************************************");
    println!("****  Tic-Tac-Toe game ({0}x{0} board)  ****", args.board_size);
    println!("****************************************");
    let mut stdout = io::stdout();
    loop {
        let [player_1, player_2] = &mut participants;
        let display = Display {
            out: &mut stdout,
            colored,
        };
        let result = play_game(
            &mut game,
            [player_1.as_mut(), player_2.as_mut()],
            Some(display),
            &mut recorder,
        )?;
        match result {
            GameResult::Finished(status) => {
                info!(?status, histories = %game.histories(), "Game over");
            }
            GameResult::Aborted { .. } => {
                println!("Users' history (in case to continue later):");
                println!("    {}", game.histories());
                println!("Quit game now.");
                return Ok(());
            }
        }

        println!("-----------------------------------------");
        if !any_human || !ask_yes_no("Do you want to play again (a new game)?")? {
            break;
        }
        game = Game::new(args.board_size)?;
    }
    Ok(())
}

fn simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let mut rng = seeded_rng(args.seed);
    let score = bot_vs_bot_stats(
        args.board_size,
        args.skill_1,
        args.skill_2,
        args.num_games,
        &mut rng,
    )?;
    info!(?score, "Simulation finished");

    let rates = score.rates();
    println!(
        "win rates of bot1 vs bot2 on {0}x{0} grid:",
        args.board_size
    );
    println!("bot1 ({}): {:.3}", args.skill_1, rates.bot_1);
    println!("bot2 ({}): {:.3}", args.skill_2, rates.bot_2);
    println!("draw: {:.3}", rates.draw);
    Ok(())
}

fn tables(args: TablesArgs) -> anyhow::Result<()> {
    let mut rng = seeded_rng(args.seed);
    let tables = skill_tables(args.board_size, args.steps, args.num_games, &mut rng)?;
    print!("{}", tables);
    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    // Stdout belongs to the game
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
