//! Move selection on top of the simulation core
//!
//! Used by the adapter's `auto` command and by the headless runner.

pub mod autoplay;

pub use match_three_core as core;
pub use match_three_types as types;

pub use autoplay::{apply_best_swap, best_swap, rank_swaps, AutoplayError, SwapCandidate};
