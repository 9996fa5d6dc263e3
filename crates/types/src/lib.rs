//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain values with no game logic attached, making them
//! usable in any context (simulation core, move planning, wire protocol).
//!
//! # Coordinates
//!
//! Positions are `(x, y)` pairs where `x` grows left to right and `y` grows
//! bottom to top. Row `0` is the floor: gravity pulls tokens toward `y = 0`
//! and new tokens enter from above the top row.
//!
//! # Board Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_WIDTH` | 8 | Columns on a default board |
//! | `DEFAULT_HEIGHT` | 8 | Rows on a default board |
//! | `DEFAULT_PALETTE_SIZE` | 5 | Token kinds in play on a default board |
//! | `MAX_DIMENSION` | 64 | Largest accepted width or height |
//! | `MIN_RUN` | 3 | Shortest run that counts as a match |
//!
//! # Examples
//!
//! ```
//! use match_three_types::{Palette, Position, TokenKind};
//!
//! let kind = TokenKind::from_str("red").unwrap();
//! assert_eq!(kind, TokenKind::Red);
//! assert_eq!(kind.letter(), 'R');
//!
//! let a = Position::new(2, 3);
//! assert!(a.is_adjacent(Position::new(2, 4)));
//! assert!(!a.is_adjacent(Position::new(3, 4)));
//!
//! let palette = Palette::first(5).unwrap();
//! assert_eq!(palette.len(), 5);
//! assert!(!palette.contains(TokenKind::Orange));
//! ```

use std::fmt;

use arrayvec::ArrayVec;

/// Default board width in cells
pub const DEFAULT_WIDTH: u8 = 8;

/// Default board height in cells
pub const DEFAULT_HEIGHT: u8 = 8;

/// Number of token kinds used by a default board
pub const DEFAULT_PALETTE_SIZE: usize = 5;

/// Largest accepted board width or height
pub const MAX_DIMENSION: u8 = 64;

/// Number of distinct token kinds that exist
pub const MAX_PALETTE: usize = 6;

/// Shortest run of identical tokens that forms a match
pub const MIN_RUN: usize = 3;

/// Cascade iterations allowed per resolution before the safety valve trips
pub const DEFAULT_MAX_CASCADE_ITERATIONS: u32 = 64;

/// Shuffles attempted per deadlock before giving up
pub const DEFAULT_MAX_SHUFFLE_ATTEMPTS: u32 = 16;

/// Base points for each destroyed token
pub const POINTS_PER_TOKEN: u32 = 10;

/// Bonus points per match shape, indexed by [`MatchShape::power`]
///
/// - Line3: 0
/// - Line4: 20
/// - L-shape: 40
/// - T-shape: 50
/// - Line5: 60
/// - Cross: 80
pub const SHAPE_BONUS: [u32; 6] = [0, 20, 40, 50, 60, 80];

/// The token kinds that can occupy a cell
///
/// Kinds carry no ordering semantics beyond equality; the declaration order is
/// only used to build default palettes and wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Orange,
}

impl TokenKind {
    /// All kinds in declaration order
    pub const ALL: [TokenKind; MAX_PALETTE] = [
        TokenKind::Red,
        TokenKind::Green,
        TokenKind::Blue,
        TokenKind::Yellow,
        TokenKind::Purple,
        TokenKind::Orange,
    ];

    /// Parse a kind from its name or single letter (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use match_three_types::TokenKind;
    ///
    /// assert_eq!(TokenKind::from_str("Blue"), Some(TokenKind::Blue));
    /// assert_eq!(TokenKind::from_str("y"), Some(TokenKind::Yellow));
    /// assert_eq!(TokenKind::from_str("pink"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "red" | "r" => Some(TokenKind::Red),
            "green" | "g" => Some(TokenKind::Green),
            "blue" | "b" => Some(TokenKind::Blue),
            "yellow" | "y" => Some(TokenKind::Yellow),
            "purple" | "p" => Some(TokenKind::Purple),
            "orange" | "o" => Some(TokenKind::Orange),
            _ => None,
        }
    }

    /// Lowercase name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Red => "red",
            TokenKind::Green => "green",
            TokenKind::Blue => "blue",
            TokenKind::Yellow => "yellow",
            TokenKind::Purple => "purple",
            TokenKind::Orange => "orange",
        }
    }

    /// Uppercase letter used by text renderings of a board
    pub fn letter(&self) -> char {
        match self {
            TokenKind::Red => 'R',
            TokenKind::Green => 'G',
            TokenKind::Blue => 'B',
            TokenKind::Yellow => 'Y',
            TokenKind::Purple => 'P',
            TokenKind::Orange => 'O',
        }
    }

    /// Parse a kind from the letter produced by [`TokenKind::letter`]
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'R' => Some(TokenKind::Red),
            'G' => Some(TokenKind::Green),
            'B' => Some(TokenKind::Blue),
            'Y' => Some(TokenKind::Yellow),
            'P' => Some(TokenKind::Purple),
            'O' => Some(TokenKind::Orange),
            _ => None,
        }
    }

    /// Snapshot code: 1..=6 (0 is reserved for an empty cell)
    pub fn code(&self) -> u8 {
        match self {
            TokenKind::Red => 1,
            TokenKind::Green => 2,
            TokenKind::Blue => 3,
            TokenKind::Yellow => 4,
            TokenKind::Purple => 5,
            TokenKind::Orange => 6,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cell on the board
///
/// - `None`: Empty cell
/// - `Some(TokenKind)`: Cell occupied by a token of that kind
pub type Cell = Option<TokenKind>;

/// A grid coordinate
///
/// Signed so that neighbor arithmetic at the edges produces an out-of-bounds
/// position instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Position shifted by `(dx, dy)`
    pub fn offset(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Orthogonal neighbors: left, right, below, above
    pub fn neighbors(&self) -> [Position; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
        ]
    }

    /// Manhattan distance between two positions
    pub fn manhattan(&self, other: Position) -> u32 {
        let dx = (self.x as i32 - other.x as i32).unsigned_abs();
        let dy = (self.y as i32 - other.y as i32).unsigned_abs();
        dx + dy
    }

    /// True when the positions share an edge (`|dx| + |dy| == 1`)
    pub fn is_adjacent(&self, other: Position) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Scan direction of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Unit step along the axis
    pub fn step(&self) -> (i8, i8) {
        match self {
            Axis::Horizontal => (1, 0),
            Axis::Vertical => (0, 1),
        }
    }

    pub fn perpendicular(&self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Shape classification of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchShape {
    Line3,
    Line4,
    Line5,
    LShape,
    TShape,
    Cross,
}

impl MatchShape {
    /// Lowercase name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchShape::Line3 => "line3",
            MatchShape::Line4 => "line4",
            MatchShape::Line5 => "line5",
            MatchShape::LShape => "l_shape",
            MatchShape::TShape => "t_shape",
            MatchShape::Cross => "cross",
        }
    }

    /// Relative strength of the shape, used for scoring and move ranking
    ///
    /// ```
    /// use match_three_types::MatchShape;
    ///
    /// assert!(MatchShape::Cross.power() > MatchShape::Line5.power());
    /// assert!(MatchShape::Line4.power() > MatchShape::Line3.power());
    /// ```
    pub fn power(&self) -> usize {
        match self {
            MatchShape::Line3 => 0,
            MatchShape::Line4 => 1,
            MatchShape::LShape => 2,
            MatchShape::TShape => 3,
            MatchShape::Line5 => 4,
            MatchShape::Cross => 5,
        }
    }
}

/// The set of token kinds in play on one board
///
/// Never empty and never contains a kind twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    kinds: ArrayVec<TokenKind, MAX_PALETTE>,
}

impl Palette {
    /// Build a palette from explicit kinds; duplicates are dropped
    pub fn new(kinds: &[TokenKind]) -> Result<Self, BoardError> {
        let mut out: ArrayVec<TokenKind, MAX_PALETTE> = ArrayVec::new();
        for &kind in kinds {
            if !out.contains(&kind) {
                out.push(kind);
            }
        }
        if out.is_empty() {
            return Err(BoardError::EmptyPalette);
        }
        Ok(Self { kinds: out })
    }

    /// The first `count` kinds of [`TokenKind::ALL`]
    pub fn first(count: usize) -> Result<Self, BoardError> {
        if count == 0 {
            return Err(BoardError::EmptyPalette);
        }
        if count > MAX_PALETTE {
            return Err(BoardError::PaletteTooLarge(count));
        }
        Self::new(&TokenKind::ALL[..count])
    }

    /// Parse a comma-separated list of kind names, or a bare count
    ///
    /// ```
    /// use match_three_types::{Palette, TokenKind};
    ///
    /// let p = Palette::parse("red, blue,green").unwrap();
    /// assert_eq!(p.kinds(), &[TokenKind::Red, TokenKind::Blue, TokenKind::Green]);
    /// assert_eq!(Palette::parse("4").unwrap().len(), 4);
    /// assert!(Palette::parse("red,pink").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, BoardError> {
        let s = s.trim();
        if let Ok(count) = s.parse::<usize>() {
            return Self::first(count);
        }
        let mut kinds = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let kind =
                TokenKind::from_str(part).ok_or_else(|| BoardError::UnknownToken(part.to_string()))?;
            kinds.push(kind);
        }
        Self::new(&kinds)
    }

    pub fn kinds(&self) -> &[TokenKind] {
        &self.kinds
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Always false for a constructed palette
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn contains(&self, kind: TokenKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn get(&self, index: usize) -> Option<TokenKind> {
        self.kinds.get(index).copied()
    }
}

impl Default for Palette {
    fn default() -> Self {
        let mut kinds = ArrayVec::new();
        for &kind in &TokenKind::ALL[..DEFAULT_PALETTE_SIZE] {
            kinds.push(kind);
        }
        Self { kinds }
    }
}

/// Why a swap request did not go through
///
/// All variants are routine outcomes of player input and are reported as data,
/// never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SwapRejection {
    #[error("position {0} is outside the board")]
    OutOfBounds(Position),
    #[error("positions {0} and {1} are not neighbors")]
    NotAdjacent(Position, Position),
    #[error("cell {0} has no token")]
    CellEmpty(Position),
    #[error("swap does not produce a match")]
    NoMatchProduced,
}

impl SwapRejection {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            SwapRejection::OutOfBounds(_) => "out_of_bounds",
            SwapRejection::NotAdjacent(..) => "not_adjacent",
            SwapRejection::CellEmpty(_) => "cell_empty",
            SwapRejection::NoMatchProduced => "no_match",
        }
    }
}

/// Board construction faults (caller wiring errors, not gameplay outcomes)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("invalid board dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("palette must contain at least one token kind")]
    EmptyPalette,
    #[error("palette of {0} kinds is larger than the set of token kinds")]
    PaletteTooLarge(usize),
    #[error("unknown token kind `{0}`")]
    UnknownToken(String),
}
