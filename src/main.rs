//! Headless match-three runner (default binary).
//!
//! Without flags it autoplays a seeded board and prints the result. With
//! `--serve` it hands the board to the TCP adapter instead.
//!
//! ```text
//! match-three [--seed N] [--moves N] [--serve]
//! ```
//!
//! Board parameters come from `MATCH3_*` environment variables; `RUST_LOG`
//! controls log output.

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use match_three::adapter::{Adapter, BoardInfo};
use match_three::core::{Board, BoardConfig};
use match_three::engine::{apply_best_swap, AutoplayError};

const DEFAULT_MOVES: u32 = 20;

#[derive(Debug, Default)]
struct Args {
    seed: Option<u32>,
    moves: Option<u32>,
    serve: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" => {
                let v = iter.next().context("--seed needs a value")?;
                args.seed = Some(v.parse().with_context(|| format!("bad seed {v:?}"))?);
            }
            "--moves" => {
                let v = iter.next().context("--moves needs a value")?;
                args.moves = Some(v.parse().with_context(|| format!("bad move count {v:?}"))?);
            }
            "--serve" => args.serve = true,
            other => bail!("unknown argument {other:?}"),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let mut config = BoardConfig::from_env();
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut board = Board::new(config.clone()).context("invalid board configuration")?;
    info!(
        width = config.width,
        height = config.height,
        palette = config.palette.len(),
        seed = config.seed,
        "board ready"
    );

    if args.serve {
        let Some(mut adapter) = Adapter::start_from_env(BoardInfo::from(&config))? else {
            bail!("adapter disabled via MATCH3_AI_DISABLED");
        };
        return adapter.serve(&mut board);
    }

    autoplay(&mut board, args.moves.unwrap_or(DEFAULT_MOVES));
    println!("{}", board.snapshot());
    Ok(())
}

fn autoplay(board: &mut Board, moves: u32) {
    for turn in 1..=moves {
        match apply_best_swap(board) {
            Ok(outcome) => info!(
                turn,
                gained = outcome.score_gained,
                cascades = outcome.trace.cascade_depth(),
                shuffles = outcome.trace.shuffles(),
                "swap played"
            ),
            Err(AutoplayError::NoMoveAvailable) => {
                warn!(turn, "no move left");
                break;
            }
            Err(e) => {
                warn!(turn, code = e.code(), "{}", e.message());
                break;
            }
        }
    }
}
