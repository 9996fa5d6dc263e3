//! Match-three (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so the runner, the
//! integration tests and the benches share a single import path.

pub use match_three_adapter as adapter;
pub use match_three_core as core;
pub use match_three_engine as engine;
pub use match_three_types as types;
