//! Gravity - per-column stable compaction toward row 0
//!
//! Each column is scanned bottom to top with a write cursor starting at row 0.
//! An occupied cell found at `read_y != write_y` produces one [`MoveStep`];
//! empty cells are skipped without advancing the cursor. Relative order of the
//! surviving tokens is preserved, and whatever is left above the cursor is the
//! column's refill demand.

use crate::grid::Grid;
use crate::types::Position;

/// Where a moving token comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOrigin {
    Cell(Position),
    /// Above the top row (a newly spawned token)
    Spawn,
}

/// One token movement produced by a fall or a refill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveStep {
    pub from: MoveOrigin,
    pub to: Position,
    pub distance: u8,
}

/// Moves and refill demand for a set of columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GravityPlan {
    /// Ordered per column, bottom to top; safe to apply in sequence
    pub steps: Vec<MoveStep>,
    /// `(column, empty cells left at the top after compaction)`
    pub refill_demand: Vec<(i8, u8)>,
}

impl GravityPlan {
    /// Total number of cells that need a new token
    pub fn total_demand(&self) -> usize {
        self.refill_demand.iter().map(|&(_, n)| n as usize).sum()
    }
}

/// Compaction moves for one column, plus its refill demand
pub fn plan_column(grid: &Grid, x: i8) -> (Vec<MoveStep>, u8) {
    let mut steps = Vec::new();
    let mut write_y: i8 = 0;
    for read_y in 0..grid.height() as i8 {
        let from = Position::new(x, read_y);
        if !grid.is_occupied(from) {
            continue;
        }
        if read_y != write_y {
            steps.push(MoveStep {
                from: MoveOrigin::Cell(from),
                to: Position::new(x, write_y),
                distance: (read_y - write_y) as u8,
            });
        }
        write_y += 1;
    }
    let demand = if grid.is_valid(Position::new(x, 0)) {
        (grid.height() as i8 - write_y) as u8
    } else {
        0
    };
    (steps, demand)
}

/// Plan compaction for the given columns without touching the grid
pub fn plan(grid: &Grid, columns: &[i8]) -> GravityPlan {
    let mut out = GravityPlan::default();
    for &x in columns {
        let (steps, demand) = plan_column(grid, x);
        out.steps.extend(steps);
        out.refill_demand.push((x, demand));
    }
    out
}

/// Apply a plan produced by [`plan`] on the same grid
pub fn apply(grid: &mut Grid, plan: &GravityPlan) {
    for step in &plan.steps {
        if let MoveOrigin::Cell(from) = step.from {
            let cell = grid.get(from).flatten();
            grid.set(from, None);
            grid.set(step.to, cell);
        }
    }
}

/// Plan and apply in one go
pub fn compact(grid: &mut Grid, columns: &[i8]) -> GravityPlan {
    let plan = plan(grid, columns);
    apply(grid, &plan);
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compacts_gaps_and_keeps_order() {
        let mut grid = Grid::from_rows(&["R", ".", "G", ".", "B"]).unwrap();
        let plan = compact(&mut grid, &[0]);
        assert_eq!(grid.to_rows(), vec![".", ".", "R", "G", "B"]);
        assert_eq!(plan.refill_demand, vec![(0, 2)]);
        assert_eq!(
            plan.steps,
            vec![
                MoveStep {
                    from: MoveOrigin::Cell(Position::new(0, 2)),
                    to: Position::new(0, 1),
                    distance: 1,
                },
                MoveStep {
                    from: MoveOrigin::Cell(Position::new(0, 4)),
                    to: Position::new(0, 2),
                    distance: 2,
                },
            ]
        );
    }

    #[test]
    fn settled_column_needs_no_moves() {
        let grid = Grid::from_rows(&[".", "Y", "P"]).unwrap();
        let (steps, demand) = plan_column(&grid, 0);
        assert!(steps.is_empty());
        assert_eq!(demand, 1);
    }

    #[test]
    fn empty_column_demands_full_height() {
        let grid = Grid::from_rows(&["..", "..", "R."]).unwrap();
        let plan = plan(&grid, &[0, 1]);
        assert_eq!(plan.refill_demand, vec![(0, 2), (1, 3)]);
        assert_eq!(plan.total_demand(), 5);
    }

    #[test]
    fn out_of_range_column_is_inert() {
        let grid = Grid::from_rows(&["R"]).unwrap();
        assert_eq!(plan_column(&grid, 3), (Vec::new(), 0));
    }

    #[test]
    fn untouched_columns_stay_put() {
        let mut grid = Grid::from_rows(&["R.", ".G", "B."]).unwrap();
        compact(&mut grid, &[0]);
        assert_eq!(grid.to_rows(), vec!["..", "RG", "B."]);
    }
}
