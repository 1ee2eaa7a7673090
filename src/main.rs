//! Headless board simulator (default binary).
//!
//! Plays a level by always blasting the largest available group and logs each
//! cascade. Useful for eyeballing level parameters and for reproducing a seed.
//!
//! ```text
//! blast-sim [--config <path>] [--seed <n>] [--moves <n>]
//! ```
//!
//! Without `--config` the level comes from `BLAST_*` environment variables on
//! top of the defaults. Log verbosity follows `RUST_LOG` (default `info`).

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tile_blast::core::groups::find_valid_groups;
use tile_blast::core::{BoardController, EventLog, LevelConfig, SimpleRng};
use tile_blast::types::{BoardEvent, ShuffleOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
struct SimArgs {
    config_path: Option<String>,
    seed: u32,
    moves: u32,
}

impl Default for SimArgs {
    fn default() -> Self {
        Self {
            config_path: None,
            seed: 1,
            moves: 50,
        }
    }
}

fn parse_args(args: &[String]) -> Result<SimArgs> {
    let mut out = SimArgs::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --config"))?;
                out.config_path = Some(v.clone());
            }
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --seed"))?;
                out.seed = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("invalid --seed value: {}", v))?;
            }
            "--moves" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --moves"))?;
                out.moves = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("invalid --moves value: {}", v))?;
            }
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(out)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&args)?;

    let config = match &args.config_path {
        Some(path) => LevelConfig::load(path)
            .with_context(|| format!("loading level config from {path}"))?,
        None => LevelConfig::from_env(),
    };
    if let Err(e) = config.validate() {
        warn!(error = %e, "level config still invalid after sanitizing");
    }

    run(config, &args)
}

fn run(config: LevelConfig, args: &SimArgs) -> Result<()> {
    let (rows, columns, colors) = (config.rows, config.columns, config.color_count);
    let mut board = BoardController::new(config, SimpleRng::new(args.seed), EventLog::new());
    board.initialize(rows, columns, colors);
    println!("{}", board.grid());

    let mut total_blasted = 0usize;
    let mut shuffles = 0u32;
    let mut played = 0u32;

    for turn in 1..=args.moves {
        let Some(group) = find_valid_groups(board.grid())
            .into_iter()
            .max_by_key(|g| g.len())
        else {
            info!(turn, "no moves left");
            break;
        };

        let removed = board.blast_group(&group.positions);
        total_blasted += removed;
        played += 1;

        let cascade = board.last_cascade();
        info!(
            turn,
            color = group.color.as_str(),
            removed,
            falls = cascade.falls.len(),
            spawned = cascade.spawned.len(),
            moves_left = board.available_moves(),
            "blast"
        );

        for event in board.sink_mut().drain() {
            if let BoardEvent::Shuffled { outcome } = event {
                shuffles += 1;
                if outcome == ShuffleOutcome::Unsolvable {
                    warn!(turn, "shuffle could not produce a move");
                }
            }
        }
    }

    board.stop();
    println!("{}", board.grid());

    let snapshot = board.snapshot();
    println!(
        "moves={} blasted={} shuffles={} board_hash={:016x}",
        played, total_blasted, shuffles, snapshot.board_hash
    );
    Ok(())
}
