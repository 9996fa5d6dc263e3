//! Deadlock detection - exhaustive search for a matching swap
//!
//! Tests every horizontally adjacent pair (`width - 1` per row) and every
//! vertically adjacent pair (`height - 1` per column) with a speculative
//! swap. The grid is borrowed mutably for the look-ahead but always handed
//! back unchanged.

use crate::grid::Grid;
use crate::swap::{is_legal_swap, would_match};
use crate::types::Position;

/// Every adjacent pair in scan order: per cell, the right neighbor then the one above
fn adjacent_pairs(grid: &Grid) -> impl Iterator<Item = (Position, Position)> + '_ {
    grid.positions().flat_map(move |p| {
        [p.offset(1, 0), p.offset(0, 1)]
            .into_iter()
            .filter(move |&q| grid.is_valid(q))
            .map(move |q| (p, q))
    })
}

/// Legal pairs, collected up front so the scan can borrow the grid mutably.
/// Same-kind pairs stay in: on a board that still holds a match they agree
/// with `would_match`.
fn candidates(grid: &Grid) -> Vec<(Position, Position)> {
    adjacent_pairs(grid)
        .filter(|&(a, b)| is_legal_swap(grid, a, b))
        .collect()
}

/// First swap that would produce a match, in scan order
pub fn find_move(grid: &mut Grid) -> Option<(Position, Position)> {
    candidates(grid)
        .into_iter()
        .find(|&(a, b)| would_match(grid, a, b))
}

/// Does any legal swap produce a match?
pub fn has_any_move(grid: &mut Grid) -> bool {
    find_move(grid).is_some()
}

/// Number of distinct swaps that produce a match (hint/diagnostic use)
pub fn count_moves(grid: &mut Grid) -> usize {
    candidates(grid)
        .into_iter()
        .filter(|&(a, b)| would_match(grid, a, b))
        .count()
}

/// All swaps that produce a match, in scan order
pub fn all_moves(grid: &mut Grid) -> Vec<(Position, Position)> {
    candidates(grid)
        .into_iter()
        .filter(|&(a, b)| would_match(grid, a, b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_only_move() {
        // Swapping (2,0) and (2,1) completes the bottom row.
        let mut grid = Grid::from_rows(&["GBR", "RRB"]).unwrap();
        let before = grid.clone();
        assert!(has_any_move(&mut grid));
        assert_eq!(
            find_move(&mut grid),
            Some((Position::new(2, 0), Position::new(2, 1)))
        );
        assert_eq!(count_moves(&mut grid), 1);
        assert_eq!(grid, before);
    }

    #[test]
    fn checkerboard_is_deadlocked() {
        let mut grid = Grid::from_rows(&["RG", "GR"]).unwrap();
        assert!(!has_any_move(&mut grid));
        assert_eq!(count_moves(&mut grid), 0);
        assert!(all_moves(&mut grid).is_empty());
    }

    #[test]
    fn pair_count_matches_grid_shape() {
        let grid = Grid::new(4, 3).unwrap();
        // (w-1)*h horizontal + (h-1)*w vertical
        assert_eq!(adjacent_pairs(&grid).count(), 3 * 3 + 2 * 4);
    }

    #[test]
    fn same_kind_pair_on_an_unsettled_board_counts() {
        // The top row is already a match, so trading two of its reds
        // leaves it matched.
        let mut grid = Grid::from_rows(&["RRR", "GBG"]).unwrap();
        let a = Position::new(0, 1);
        let b = Position::new(1, 1);
        assert!(would_match(&mut grid, a, b));
        assert!(has_any_move(&mut grid));
        assert!(all_moves(&mut grid).contains(&(a, b)));
        assert_eq!(count_moves(&mut grid), all_moves(&mut grid).len());
    }

    #[test]
    fn empty_cells_are_not_candidates() {
        let mut grid = Grid::from_rows(&["R.RR"]).unwrap();
        assert!(!has_any_move(&mut grid));
    }
}
