//! Scoring module - points for destroyed matches
//!
//! Each match is worth `POINTS_PER_TOKEN` per token plus a bonus for its
//! shape. Everything destroyed in one cascade step is multiplied by the
//! cascade level: 1 for the matches the swap itself made, 2 for the first
//! chain reaction, and so on. The multiplier resets when the board returns to
//! idle.

use crate::matcher::Match;
use crate::types::{MatchShape, POINTS_PER_TOKEN, SHAPE_BONUS};

/// Score calculation result for one destroy step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Points before the cascade multiplier
    pub base: u32,
    pub multiplier: u32,
    pub total: u32,
}

/// Bonus for a match shape
pub fn shape_bonus(shape: MatchShape) -> u32 {
    SHAPE_BONUS[shape.power()]
}

/// Points for a single match before the cascade multiplier
pub fn match_points(m: &Match) -> u32 {
    (m.len() as u32)
        .saturating_mul(POINTS_PER_TOKEN)
        .saturating_add(shape_bonus(m.shape()))
}

/// Points for every match destroyed at `cascade_level` (1-based)
pub fn calculate_score(matches: &[Match], cascade_level: u32) -> ScoreResult {
    let base = matches
        .iter()
        .map(match_points)
        .fold(0u32, |acc, p| acc.saturating_add(p));
    let multiplier = cascade_level.max(1);
    ScoreResult {
        base,
        multiplier,
        total: base.saturating_mul(multiplier),
    }
}
