//! Read-only board snapshots for renderers, debugging and the wire adapter

use std::fmt;

use crate::grid::Grid;
use crate::types::Position;

/// FNV-1a 64-bit over a byte stream
///
/// Stable across Rust versions and platforms, unlike `DefaultHasher`.
pub fn fnv1a64(bytes: impl IntoIterator<Item = u8>) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    let mut h = OFFSET_BASIS;
    for b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(PRIME);
    }
    h
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridSnapshot {
    pub width: u8,
    pub height: u8,
    /// Row-major, bottom row first: 0 = empty, otherwise `TokenKind::code`
    pub cells: Vec<u8>,
    /// FNV-1a of `cells`
    pub board_hash: u64,
    pub score: u64,
    /// Accepted swaps since the board was filled
    pub swaps: u32,
    pub moves_available: usize,
}

impl GridSnapshot {
    /// Snapshot of the grid alone; board counters left at zero
    pub fn from_grid(grid: &Grid) -> Self {
        let cells: Vec<u8> = grid
            .cells()
            .iter()
            .map(|c| c.map(|k| k.code()).unwrap_or(0))
            .collect();
        Self {
            width: grid.width(),
            height: grid.height(),
            board_hash: fnv1a64(cells.iter().copied()),
            cells,
            score: 0,
            swaps: 0,
            moves_available: 0,
        }
    }

    /// Code at a position (0 for empty or out of bounds)
    pub fn code_at(&self, pos: Position) -> u8 {
        if pos.x < 0 || pos.y < 0 || pos.x as u8 >= self.width || pos.y as u8 >= self.height {
            return 0;
        }
        self.cells[pos.y as usize * self.width as usize + pos.x as usize]
    }

    /// Rows of codes, bottom row first
    pub fn rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.width.max(1) as usize)
            .map(|r| r.to_vec())
            .collect()
    }
}

impl fmt::Display for GridSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LETTERS: [char; 7] = ['.', 'R', 'G', 'B', 'Y', 'P', 'O'];
        for y in (0..self.height as i8).rev() {
            for x in 0..self.width as i8 {
                let code = self.code_at(Position::new(x, y)) as usize;
                write!(f, "{}", LETTERS.get(code).copied().unwrap_or('?'))?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "score {}  swaps {}  moves {}",
            self.score, self.swaps, self.moves_available
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_tracks_cells() {
        let a = Grid::from_rows(&["RG", "BY"]).unwrap();
        let b = Grid::from_rows(&["GR", "BY"]).unwrap();
        let sa = GridSnapshot::from_grid(&a);
        let sb = GridSnapshot::from_grid(&b);
        assert_eq!(sa.board_hash, fnv1a64(sa.cells.iter().copied()));
        assert_ne!(sa.board_hash, sb.board_hash);
    }

    #[test]
    fn codes_are_bottom_row_first() {
        let grid = Grid::from_rows(&["R.", "BY"]).unwrap();
        let snap = GridSnapshot::from_grid(&grid);
        assert_eq!(snap.cells, vec![3, 4, 1, 0]);
        assert_eq!(snap.rows(), vec![vec![3, 4], vec![1, 0]]);
        assert_eq!(snap.code_at(Position::new(0, 1)), 1);
        assert_eq!(snap.code_at(Position::new(5, 5)), 0);
    }

    #[test]
    fn display_matches_grid_rows() {
        let grid = Grid::from_rows(&["R.", "BY"]).unwrap();
        let text = GridSnapshot::from_grid(&grid).to_string();
        assert!(text.starts_with("R.\nBY\n"));
    }
}
