use tracing::debug;

use crate::core::deadlock;
use crate::core::matcher::find_matches_at;
use crate::core::{Board, Grid, SwapOutcome};
use crate::types::{MatchShape, Position, SwapRejection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayError {
    NoMoveAvailable,
    Rejected(SwapRejection),
}

impl AutoplayError {
    pub fn code(self) -> &'static str {
        match self {
            AutoplayError::NoMoveAvailable => "no_move",
            AutoplayError::Rejected(reason) => reason.code(),
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            AutoplayError::NoMoveAvailable => "board has no swap that produces a match",
            AutoplayError::Rejected(SwapRejection::OutOfBounds(_)) => "position outside the board",
            AutoplayError::Rejected(SwapRejection::NotAdjacent(_, _)) => {
                "positions are not neighbors"
            }
            AutoplayError::Rejected(SwapRejection::CellEmpty(_)) => "swap touches an empty cell",
            AutoplayError::Rejected(SwapRejection::NoMatchProduced) => "swap produced no match",
        }
    }
}

/// A matching swap and what its immediate matches would clear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapCandidate {
    pub a: Position,
    pub b: Position,
    pub cleared: usize,
    pub best_shape: MatchShape,
}

impl SwapCandidate {
    fn rank(&self) -> (usize, usize) {
        (self.best_shape.power(), self.cleared)
    }
}

/// Every matching swap, best first
///
/// Better means a stronger shape, then more tokens cleared. Equal candidates
/// keep scan order. Later cascades are not simulated.
pub fn rank_swaps(grid: &Grid) -> Vec<SwapCandidate> {
    let mut scratch = grid.clone();
    let mut candidates: Vec<SwapCandidate> = Vec::new();

    for (a, b) in deadlock::all_moves(&mut scratch) {
        if scratch.swap(a, b).is_err() {
            continue;
        }
        let matches = find_matches_at(&scratch, &[a, b]);
        let _ = scratch.swap(a, b);

        let Some(best_shape) = matches.iter().map(|m| m.shape()).max_by_key(|s| s.power()) else {
            continue;
        };
        let cleared = matches.iter().map(|m| m.len()).sum();
        candidates.push(SwapCandidate {
            a,
            b,
            cleared,
            best_shape,
        });
    }

    // Stable sort keeps scan order among equals.
    candidates.sort_by(|x, y| y.rank().cmp(&x.rank()));
    candidates
}

pub fn best_swap(grid: &Grid) -> Option<SwapCandidate> {
    rank_swaps(grid).into_iter().next()
}

/// Pick the best swap and play it
pub fn apply_best_swap(board: &mut Board) -> Result<SwapOutcome, AutoplayError> {
    let Some(candidate) = best_swap(board.grid()) else {
        return Err(AutoplayError::NoMoveAvailable);
    };
    debug!(
        a = %candidate.a,
        b = %candidate.b,
        shape = candidate.best_shape.as_str(),
        cleared = candidate.cleared,
        "autoplay swap"
    );

    let outcome = board.request_swap(candidate.a, candidate.b);
    if outcome.accepted {
        Ok(outcome)
    } else {
        Err(AutoplayError::Rejected(
            outcome.rejection.unwrap_or(SwapRejection::NoMatchProduced),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BoardConfig;

    fn p(x: i8, y: i8) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn ranks_longer_lines_first() {
        // Lifting B out of the bottom row lines up four reds; two other
        // swaps each make a plain three.
        let grid = Grid::from_rows(&["GBYPY", "PGRYB", "RRBRG"]).unwrap();
        let ranked = rank_swaps(&grid);
        assert_eq!(ranked.len(), 3);
        let best = ranked[0];
        assert_eq!(best.best_shape, MatchShape::Line4);
        assert_eq!(best.cleared, 4);
        assert_eq!((best.a, best.b), (p(2, 0), p(2, 1)));
        assert_eq!((ranked[1].a, ranked[1].b), (p(2, 0), p(3, 0)));
        assert_eq!((ranked[2].a, ranked[2].b), (p(3, 1), p(3, 2)));
        for pair in ranked.windows(2) {
            assert!(pair[0].rank() >= pair[1].rank());
        }
    }

    #[test]
    fn ranking_leaves_grid_untouched() {
        let board = Board::new(BoardConfig::default().with_seed(3)).unwrap();
        let before = board.grid().clone();
        let ranked = rank_swaps(board.grid());
        assert_eq!(board.grid(), &before);
        assert_eq!(ranked.len(), board.moves_available());
    }

    #[test]
    fn no_move_on_deadlocked_grid() {
        let grid = Grid::from_rows(&["RGB", "GBR", "BRG"]).unwrap();
        assert!(best_swap(&grid).is_none());
        let mut board = Board::from_grid(grid, BoardConfig::default()).unwrap();
        let err = apply_best_swap(&mut board).unwrap_err();
        assert_eq!(err, AutoplayError::NoMoveAvailable);
        assert_eq!(err.code(), "no_move");
    }

    #[test]
    fn autoplay_scores() {
        let mut board = Board::new(BoardConfig::default().with_seed(77)).unwrap();
        for _ in 0..5 {
            let outcome = apply_best_swap(&mut board).unwrap();
            assert!(outcome.accepted);
        }
        assert_eq!(board.swaps(), 5);
        assert!(board.score() > 0);
    }
}
