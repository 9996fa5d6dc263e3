//! Spawning - picks kinds for empty cells
//!
//! A kind is forbidden at a position when the two cells directly to its left,
//! or the two cells directly below it, already hold that kind: placing it
//! would complete a run of three on arrival. Cells are filled bottom to top
//! and left to right, so those are exactly the neighbors already decided.

use arrayvec::ArrayVec;

use crate::gravity::{MoveOrigin, MoveStep};
use crate::grid::Grid;
use crate::rng::RandomSource;
use crate::types::{Palette, Position, TokenKind, MAX_PALETTE};

/// A token created by a refill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnedToken {
    pub position: Position,
    pub kind: TokenKind,
    /// Rows the token falls from above the board to its resting cell
    pub drop_distance: u8,
}

impl SpawnedToken {
    /// The drop as a move from the spawn marker
    pub fn move_step(&self) -> MoveStep {
        MoveStep {
            from: MoveOrigin::Spawn,
            to: self.position,
            distance: self.drop_distance,
        }
    }
}

/// Kinds that would complete a run of three at `pos`
pub fn forbidden_kinds(grid: &Grid, pos: Position) -> ArrayVec<TokenKind, 2> {
    let mut out = ArrayVec::new();
    for (dx, dy) in [(-1, 0), (0, -1)] {
        let near = grid.kind_at(pos.offset(dx, dy));
        let far = grid.kind_at(pos.offset(dx * 2, dy * 2));
        if let (Some(a), Some(b)) = (near, far) {
            if a == b && !out.contains(&a) {
                out.push(a);
            }
        }
    }
    out
}

/// Choose a kind for `pos` that does not complete a run on arrival
///
/// Uniform over the palette minus forbidden kinds. When every kind is
/// forbidden (palettes of one or two kinds) the pick is unconstrained.
pub fn choose_kind<R: RandomSource>(
    grid: &Grid,
    pos: Position,
    palette: &Palette,
    rng: &mut R,
) -> TokenKind {
    let forbidden = forbidden_kinds(grid, pos);
    let allowed: ArrayVec<TokenKind, MAX_PALETTE> = palette
        .kinds()
        .iter()
        .copied()
        .filter(|k| !forbidden.contains(k))
        .collect();

    let pool: &[TokenKind] = if allowed.is_empty() {
        palette.kinds()
    } else {
        &allowed
    };
    pool[rng.next_range(pool.len() as u32) as usize]
}

/// Fill every empty cell, row by row from the bottom, left to right
pub fn fill_empty<R: RandomSource>(grid: &mut Grid, palette: &Palette, rng: &mut R) -> usize {
    let empties: Vec<Position> = grid.positions().filter(|&p| grid.is_empty(p)).collect();
    for &pos in &empties {
        let kind = choose_kind(grid, pos, palette, rng);
        grid.set(pos, Some(kind));
    }
    empties.len()
}

/// Refill the empty cells of the given columns, bottom to top per column
pub fn refill_columns<R: RandomSource>(
    grid: &mut Grid,
    columns: &[i8],
    palette: &Palette,
    rng: &mut R,
) -> Vec<SpawnedToken> {
    let mut spawned = Vec::new();
    for &x in columns {
        let empties = grid.empty_positions_in_column(x);
        let drop_distance = empties.len() as u8;
        for pos in empties {
            let kind = choose_kind(grid, pos, palette, rng);
            grid.set(pos, Some(kind));
            spawned.push(SpawnedToken {
                position: pos,
                kind,
                drop_distance,
            });
        }
    }
    spawned
}
