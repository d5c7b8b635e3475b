use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use sweeper_core::{CellCount, Coord, Difficulty, GameConfig, PlacementStrategy};
use tracing::level_filters::LevelFilter;

mod app;
mod command;
mod render;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Level {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Easy => Difficulty::Easy,
            Level::Medium => Difficulty::Medium,
            Level::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Placement {
    #[default]
    Rejection,
    Shuffled,
}

impl From<Placement> for PlacementStrategy {
    fn from(placement: Placement) -> Self {
        match placement {
            Placement::Rejection => PlacementStrategy::Rejection,
            Placement::Shuffled => PlacementStrategy::Shuffled,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board preset
    #[arg(short, long, value_enum, default_value_t)]
    difficulty: Level,

    /// Custom board rows, requires --cols and --mines
    #[arg(long, requires_all = ["cols", "mines"])]
    rows: Option<Coord>,

    /// Custom board columns
    #[arg(long, requires_all = ["rows", "mines"])]
    cols: Option<Coord>,

    /// Custom mine count
    #[arg(long, requires_all = ["rows", "cols"])]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// How mines are drawn on the first reveal
    #[arg(long, value_enum, default_value_t)]
    placement: Placement,
}

impl Args {
    fn game_config(&self) -> Result<GameConfig> {
        match (self.rows, self.cols, self.mines) {
            (Some(rows), Some(cols), Some(mines)) => GameConfig::new(rows, cols, mines)
                .with_context(|| format!("Cannot play {rows}x{cols} with {mines} mines")),
            _ => Ok(Difficulty::from(self.difficulty).config()),
        }
    }
}

fn level_filter(filter: log::LevelFilter) -> LevelFilter {
    match filter {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(level_filter(args.verbose.log_level_filter()))
        .with_writer(std::io::stderr)
        .init();
    log::debug!("seed: {:?}", args.seed);

    let config = args.game_config()?;
    let mut app = app::App::new(config, args.placement.into(), args.seed);

    println!("{}", command::HELP);
    app.run(std::io::stdin().lock(), std::io::stdout().lock())?;

    log::debug!(
        "Left in phase {:?} after {}s",
        app.session().phase(),
        app.stopwatch().elapsed_secs()
    );
    Ok(())
}
