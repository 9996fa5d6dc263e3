//! Grid module - owns the board cells
//!
//! The grid is a `width x height` array of cells stored in a flat vector for
//! cache locality. Coordinates: `(x, y)` where `x` grows left to right and `y`
//! grows bottom to top, so row 0 is the floor tokens fall toward.
//!
//! Every accessor bounds-checks: reads outside the board return `None`, writes
//! return `false`, and `swap` reports [`SwapRejection::OutOfBounds`].

use std::fmt;

use crate::types::{BoardError, Cell, Palette, Position, SwapRejection, TokenKind, MAX_DIMENSION};

/// The board grid - flat row-major storage (`y * width + x`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new empty grid
    pub fn new(width: u8, height: u8) -> Result<Self, BoardError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(BoardError::InvalidDimensions {
                width: width as i32,
                height: height as i32,
            });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        })
    }

    /// Build a grid from text rows, top row first
    ///
    /// Each character is a token letter (see [`TokenKind::letter`]) or `.` for
    /// an empty cell. All rows must have the same length.
    ///
    /// ```
    /// use match_three_core::Grid;
    /// use match_three_core::types::{Position, TokenKind};
    ///
    /// let grid = Grid::from_rows(&["RG.", "BBR"]).unwrap();
    /// assert_eq!(grid.kind_at(Position::new(0, 0)), Some(TokenKind::Blue));
    /// assert_eq!(grid.kind_at(Position::new(1, 1)), Some(TokenKind::Green));
    /// assert!(grid.is_empty(Position::new(2, 1)));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if height > MAX_DIMENSION as usize
            || width > MAX_DIMENSION as usize
            || rows.iter().any(|r| r.chars().count() != width)
        {
            return Err(BoardError::InvalidDimensions {
                width: width as i32,
                height: height as i32,
            });
        }
        let mut grid = Self::new(width as u8, height as u8)?;
        for (row_index, row) in rows.iter().enumerate() {
            let y = (height - 1 - row_index) as i8;
            for (x, c) in row.chars().enumerate() {
                let cell = match c {
                    '.' => None,
                    other => Some(
                        TokenKind::from_letter(other)
                            .ok_or_else(|| BoardError::UnknownToken(other.to_string()))?,
                    ),
                };
                grid.set(Position::new(x as i8, y), cell);
            }
        }
        Ok(grid)
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if !self.is_valid(pos) {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Check if position lies inside the grid
    pub fn is_valid(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as i32) < self.width as i32 && (pos.y as i32) < self.height as i32
    }

    /// Get cell at position
    /// Returns None if out of bounds
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Token kind at position, `None` when empty or out of bounds
    pub fn kind_at(&self, pos: Position) -> Option<TokenKind> {
        self.get(pos).flatten()
    }

    /// Set cell at position
    /// Returns false if out of bounds
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is inside the grid and empty
    pub fn is_empty(&self, pos: Position) -> bool {
        matches!(self.get(pos), Some(None))
    }

    /// Check if position is inside the grid and occupied
    pub fn is_occupied(&self, pos: Position) -> bool {
        matches!(self.get(pos), Some(Some(_)))
    }

    /// Exchange the occupants of two cells
    ///
    /// No adjacency or occupancy rules apply here; callers decide whether a
    /// swap is provisional or committed.
    pub fn swap(&mut self, a: Position, b: Position) -> Result<(), SwapRejection> {
        let ia = self.index(a).ok_or(SwapRejection::OutOfBounds(a))?;
        let ib = self.index(b).ok_or(SwapRejection::OutOfBounds(b))?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// Empty positions of column `x`, ordered bottom to top
    pub fn empty_positions_in_column(&self, x: i8) -> Vec<Position> {
        if x < 0 || x as i32 >= self.width as i32 {
            return Vec::new();
        }
        (0..self.height as i8)
            .map(|y| Position::new(x, y))
            .filter(|&p| self.is_empty(p))
            .collect()
    }

    /// Every position, row by row from the bottom, left to right
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width as i8;
        (0..self.height as i8).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Every position of column `x`, bottom to top
    pub fn column_positions(&self, x: i8) -> impl Iterator<Item = Position> {
        (0..self.height as i8).map(move |y| Position::new(x, y))
    }

    /// Occupied cells in [`Grid::positions`] order
    pub fn occupied(&self) -> impl Iterator<Item = (Position, TokenKind)> + '_ {
        self.positions()
            .filter_map(move |p| self.kind_at(p).map(|kind| (p, kind)))
    }

    /// Token kinds of column `x`, bottom to top, skipping empty cells
    pub fn column_kinds(&self, x: i8) -> Vec<TokenKind> {
        self.column_positions(x).filter_map(|p| self.kind_at(p)).collect()
    }

    /// Number of tokens of `kind` on the grid
    pub fn count_kind(&self, kind: TokenKind) -> usize {
        self.cells.iter().filter(|c| **c == Some(kind)).count()
    }

    /// Number of empty cells on the grid
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// First occupant that is not part of `palette`, if any
    pub fn foreign_kind(&self, palette: &Palette) -> Option<TokenKind> {
        self.cells
            .iter()
            .flatten()
            .copied()
            .find(|kind| !palette.contains(*kind))
    }

    /// Get a reference to the internal cells (row-major, bottom row first)
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Text rows, top row first (inverse of [`Grid::from_rows`])
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height as i8)
            .rev()
            .map(|y| {
                (0..self.width as i8)
                    .map(|x| match self.kind_at(Position::new(x, y)) {
                        Some(kind) => kind.letter(),
                        None => '.',
                    })
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
