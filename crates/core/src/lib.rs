//! Match-three simulation core - pure, deterministic, and testable
//!
//! Everything needed to run a match-three board lives here, with no
//! dependency on rendering, input or networking. Randomness comes from an
//! injected [`RandomSource`], so the same seed always produces the same game.
//!
//! # Module Structure
//!
//! - [`grid`]: rectangular token storage, bounds checks and swaps
//! - [`matcher`]: run detection, merging and shape classification
//! - [`swap`]: swap legality and the "would this match" probe
//! - [`spawn`]: refill with a no-instant-match bias
//! - [`gravity`]: per-column compaction and fall plans
//! - [`deadlock`]: legal-move search
//! - [`shuffle`]: kind-preserving permutation for deadlocked boards
//! - [`cascade`]: the [`Board`] handle and its resolver state machine
//! - [`scoring`]: points per match with a cascade multiplier
//! - [`trace`]: the ordered event log a resolution produces
//!
//! # Coordinates
//!
//! `(0, 0)` is the bottom-left cell. Gravity pulls toward `y = 0` and new
//! tokens enter from above the top row.
//!
//! # Example
//!
//! ```
//! use match_three_core::{Board, BoardConfig};
//!
//! let mut board = Board::new(BoardConfig::default().with_seed(12345)).unwrap();
//! let (a, b) = board.hint().expect("fresh boards always have a move");
//! let outcome = board.request_swap(a, b);
//!
//! assert!(outcome.accepted);
//! assert!(board.score() > 0);
//! ```

pub mod cascade;
pub mod config;
pub mod deadlock;
pub mod gravity;
pub mod grid;
pub mod matcher;
pub mod rng;
pub mod scoring;
pub mod shuffle;
pub mod snapshot;
pub mod spawn;
pub mod swap;
pub mod trace;

pub use match_three_types as types;

// Re-export commonly used types for convenience
pub use cascade::{Board, CascadeState, SwapOutcome};
pub use config::BoardConfig;
pub use gravity::{GravityPlan, MoveOrigin, MoveStep};
pub use grid::Grid;
pub use matcher::{find_all_matches, find_matches_at, Match};
pub use rng::{RandomSource, SimpleRng};
pub use scoring::{calculate_score, ScoreResult};
pub use snapshot::GridSnapshot;
pub use spawn::SpawnedToken;
pub use trace::{CascadeTrace, ShuffleSummary, TraceEvent};
