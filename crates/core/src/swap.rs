//! Swap legality and speculative look-ahead

use crate::grid::Grid;
use crate::matcher::find_matches_at;
use crate::types::{Position, SwapRejection};

/// Check that a swap is allowed, reporting the first rule it breaks
///
/// Rules, in order: both positions inside the grid, the positions are
/// neighbors, both cells are occupied.
pub fn check_swap(grid: &Grid, a: Position, b: Position) -> Result<(), SwapRejection> {
    for p in [a, b] {
        if !grid.is_valid(p) {
            return Err(SwapRejection::OutOfBounds(p));
        }
    }
    if !a.is_adjacent(b) {
        return Err(SwapRejection::NotAdjacent(a, b));
    }
    for p in [a, b] {
        if grid.is_empty(p) {
            return Err(SwapRejection::CellEmpty(p));
        }
    }
    Ok(())
}

/// True iff both positions are valid, occupied and orthogonal neighbors
pub fn is_legal_swap(grid: &Grid, a: Position, b: Position) -> bool {
    check_swap(grid, a, b).is_ok()
}

/// Would swapping `a` and `b` create at least one match?
///
/// Swaps in place, runs incremental detection seeded at both cells, then
/// swaps back unconditionally. The grid is identical before and after.
pub fn would_match(grid: &mut Grid, a: Position, b: Position) -> bool {
    if grid.swap(a, b).is_err() {
        return false;
    }
    let found = !find_matches_at(grid, &[a, b]).is_empty();
    // Both positions were just validated by the first swap.
    let _ = grid.swap(a, b);
    found
}
