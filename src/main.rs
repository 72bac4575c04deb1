use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use thiserror::Error;

use riichi_ledger::ledger::{LedgerStore, StoreError};
use riichi_ledger::score::{RuleSet, ScoreError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("score error: {0}")]
    Score(#[from] ScoreError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("output encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<riichi_ledger::Error> for AppError {
    fn from(err: riichi_ledger::Error) -> Self {
        match err {
            riichi_ledger::Error::Score(e) => AppError::Score(e),
            riichi_ledger::Error::Store(e) => AppError::Store(e),
            riichi_ledger::Error::Io(e) => AppError::Io(e),
        }
    }
}

/// Leaderboard metric to rank players by.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Metric {
    /// Average placement, best first
    AvgRank,
    /// Total adjusted score
    AdjTotal,
    /// Total raw score
    RawTotal,
    /// Average adjusted score per game
    AdjAvg,
    /// Average raw score per game
    RawAvg,
    /// Games played
    GamesPlayed,
}

#[derive(Parser)]
#[command(name = "riichi-ledger")]
#[command(about = "Append-only riichi mahjong score ledger with leaderboards and reconciliation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new ledger store
    Init {
        /// Store path
        #[arg(long, default_value = ".riichi-ledger", env = "RIICHI_LEDGER_PATH")]
        path: PathBuf,
    },

    /// Normalize raw scores and append a game to the ledger
    Record {
        /// Unique game id
        game_id: String,

        /// Eight tokens: id1 score1 id2 score2 id3 score3 id4 score4
        tokens: Vec<String>,

        /// Store path
        #[arg(long, default_value = ".riichi-ledger", env = "RIICHI_LEDGER_PATH")]
        path: PathBuf,
    },

    /// Print a leaderboard
    Leaderboard {
        /// Metric to rank by
        #[arg(value_enum)]
        metric: Metric,

        /// Maximum number of rows
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Store path
        #[arg(long, default_value = ".riichi-ledger", env = "RIICHI_LEDGER_PATH")]
        path: PathBuf,
    },

    /// Print the most recent games, newest first
    Recent {
        /// Maximum number of games
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Store path
        #[arg(long, default_value = ".riichi-ledger", env = "RIICHI_LEDGER_PATH")]
        path: PathBuf,
    },

    /// Print one player's totals and averages
    Player {
        /// Player id
        player_id: String,

        /// Store path
        #[arg(long, default_value = ".riichi-ledger", env = "RIICHI_LEDGER_PATH")]
        path: PathBuf,
    },

    /// Print one game record
    Game {
        /// Game id
        game_id: String,

        /// Store path
        #[arg(long, default_value = ".riichi-ledger", env = "RIICHI_LEDGER_PATH")]
        path: PathBuf,
    },

    /// Print head-to-head deltas against every opponent of a player
    Opponents {
        /// Player id
        player_id: String,

        /// Store path
        #[arg(long, default_value = ".riichi-ledger", env = "RIICHI_LEDGER_PATH")]
        path: PathBuf,
    },

    /// Print a player's rank by total adjusted score
    Rank {
        /// Player id
        player_id: String,

        /// Store path
        #[arg(long, default_value = ".riichi-ledger", env = "RIICHI_LEDGER_PATH")]
        path: PathBuf,
    },

    /// Recompute player totals from the ledger and report mismatches
    Verify {
        /// Store path
        #[arg(long, default_value = ".riichi-ledger", env = "RIICHI_LEDGER_PATH")]
        path: PathBuf,
    },

    /// Dump both tables as JSON
    Export {
        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Store path
        #[arg(long, default_value = ".riichi-ledger", env = "RIICHI_LEDGER_PATH")]
        path: PathBuf,
    },
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<(), AppError> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path } => {
            LedgerStore::init(&path)?;
            println!("Initialized ledger store at {}", path.display());
        }

        Commands::Record {
            game_id,
            tokens,
            path,
        } => {
            let store = LedgerStore::open(&path)?;
            let record = store.record_game(&game_id, &tokens, &RuleSet::default())?;
            print_json(&record)?;
        }

        Commands::Leaderboard {
            metric,
            limit,
            path,
        } => {
            let store = LedgerStore::open(&path)?;
            let rows = match metric {
                Metric::AvgRank => store.lb_average_placement(limit)?,
                Metric::AdjTotal => store.lb_adjusted_total(limit)?,
                Metric::RawTotal => store.lb_raw_total(limit)?,
                Metric::AdjAvg => store.lb_adjusted_average(limit)?,
                Metric::RawAvg => store.lb_raw_average(limit)?,
                Metric::GamesPlayed => store.lb_games_played(limit)?,
            };
            print_json(&rows)?;
        }

        Commands::Recent { limit, path } => {
            let store = LedgerStore::open(&path)?;
            print_json(&store.list_recent(limit)?)?;
        }

        Commands::Player { player_id, path } => {
            let store = LedgerStore::open(&path)?;
            match store.player_profile(&player_id)? {
                Some(profile) => print_json(&profile)?,
                None => {
                    eprintln!("Player '{}' not found", player_id);
                    std::process::exit(1);
                }
            }
        }

        Commands::Game { game_id, path } => {
            let store = LedgerStore::open(&path)?;
            match store.get_game(&game_id)? {
                Some(record) => print_json(&record)?,
                None => {
                    eprintln!("Game '{}' not found", game_id);
                    std::process::exit(1);
                }
            }
        }

        Commands::Opponents { player_id, path } => {
            let store = LedgerStore::open(&path)?;
            print_json(&store.opponent_deltas(&player_id)?)?;
        }

        Commands::Rank { player_id, path } => {
            let store = LedgerStore::open(&path)?;
            match store.rank_by_adjusted_total(&player_id)? {
                Some(rank) => println!("{}", rank),
                None => {
                    eprintln!("Player '{}' not found", player_id);
                    std::process::exit(1);
                }
            }
        }

        Commands::Verify { path } => {
            let store = LedgerStore::open(&path)?;
            let report = store.verify()?;
            print_json(&report)?;
            if !report.is_clean() {
                std::process::exit(1);
            }
        }

        Commands::Export { output, path } => {
            let store = LedgerStore::open(&path)?;
            let export = store.export()?;
            match output {
                Some(file) => std::fs::write(&file, serde_json::to_vec_pretty(&export)?)?,
                None => print_json(&export)?,
            }
        }
    }

    Ok(())
}
