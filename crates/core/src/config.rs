//! Board configuration
//!
//! Supplied by the embedding application at board creation. Environment
//! variables are read by [`BoardConfig::from_env`]:
//!
//! - `MATCH3_WIDTH` / `MATCH3_HEIGHT`: board size (default 8x8)
//! - `MATCH3_PALETTE`: comma-separated kind names, or a count 1..=6 (default 5)
//! - `MATCH3_SEED`: RNG seed (default 1)
//! - `MATCH3_MAX_CASCADES`: cascade safety valve (default 64)
//! - `MATCH3_MAX_SHUFFLES`: shuffle attempts per deadlock (default 16)
//!
//! Unparsable values fall back to the defaults.

use crate::types::{
    BoardError, Palette, DEFAULT_HEIGHT, DEFAULT_MAX_CASCADE_ITERATIONS,
    DEFAULT_MAX_SHUFFLE_ATTEMPTS, DEFAULT_WIDTH, MAX_DIMENSION,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub width: u8,
    pub height: u8,
    pub palette: Palette,
    pub seed: u32,
    /// Destroy iterations allowed per resolution
    pub max_cascade_iterations: u32,
    /// Shuffles attempted before a deadlock is left standing
    pub max_shuffle_attempts: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            palette: Palette::default(),
            seed: 1,
            max_cascade_iterations: DEFAULT_MAX_CASCADE_ITERATIONS,
            max_shuffle_attempts: DEFAULT_MAX_SHUFFLE_ATTEMPTS,
        }
    }
}

impl BoardConfig {
    /// Default configuration with explicit size, palette size and seed
    pub fn new(width: u8, height: u8, palette: Palette, seed: u32) -> Self {
        Self {
            width,
            height,
            palette,
            seed,
            ..Self::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let width = env::var("MATCH3_WIDTH")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.width);
        let height = env::var("MATCH3_HEIGHT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.height);
        let palette = env::var("MATCH3_PALETTE")
            .ok()
            .and_then(|s| Palette::parse(&s).ok())
            .unwrap_or(defaults.palette);
        let seed = env::var("MATCH3_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.seed);
        let max_cascade_iterations = env::var("MATCH3_MAX_CASCADES")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_cascade_iterations);
        let max_shuffle_attempts = env::var("MATCH3_MAX_SHUFFLES")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_shuffle_attempts);

        Self {
            width,
            height,
            palette,
            seed,
            max_cascade_iterations,
            max_shuffle_attempts,
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Reject configurations a board cannot be built from
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.width == 0
            || self.height == 0
            || self.width > MAX_DIMENSION
            || self.height > MAX_DIMENSION
        {
            return Err(BoardError::InvalidDimensions {
                width: self.width as i32,
                height: self.height as i32,
            });
        }
        if self.palette.is_empty() {
            return Err(BoardError::EmptyPalette);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = BoardConfig::default();
        assert_eq!(config.width, 8);
        assert_eq!(config.height, 8);
        assert_eq!(config.palette.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let mut config = BoardConfig::default();
        config.width = 0;
        assert_eq!(
            config.validate(),
            Err(BoardError::InvalidDimensions {
                width: 0,
                height: 8
            })
        );
    }

    #[test]
    fn with_seed_only_changes_seed() {
        let config = BoardConfig::default().with_seed(77);
        assert_eq!(config.seed, 77);
        assert_eq!(config.width, DEFAULT_WIDTH);
    }
}
