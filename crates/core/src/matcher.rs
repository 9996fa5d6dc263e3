//! Match detection
//!
//! Finds runs of three or more identical tokens and groups them into
//! classified [`Match`]es. Two entry points:
//!
//! - [`find_all_matches`]: full scan, rows left to right then columns top to
//!   bottom.
//! - [`find_matches_at`]: incremental scan seeded from a few positions (the
//!   two cells of a swap, or the columns touched by a cascade step).
//!
//! Both merge same-kind runs that share a cell into one match, repeating until
//! no more merges happen, so an intersecting horizontal and vertical run comes
//! out as a single L, T or cross.

use std::collections::{HashSet, VecDeque};

use crate::grid::Grid;
use crate::types::{Axis, MatchShape, Position, TokenKind, MIN_RUN};

/// A maximal straight run of one kind, cells in scan order
#[derive(Debug, Clone, PartialEq, Eq)]
struct Run {
    kind: TokenKind,
    cells: Vec<Position>,
}

impl Run {
    fn shares_cell_with(&self, other: &Run) -> bool {
        self.kind == other.kind && self.cells.iter().any(|c| other.cells.contains(c))
    }
}

/// A group of connected same-kind runs scheduled for removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    kind: TokenKind,
    positions: Vec<Position>,
    shape: MatchShape,
    anchor: Position,
}

impl Match {
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Unique positions in first-scanned order
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn shape(&self) -> MatchShape {
        self.shape
    }

    /// Position with the most in-match neighbors; used for effect placement
    pub fn anchor(&self) -> Position {
        self.anchor
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always false; a match holds at least three positions
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }
}

/// Scan the whole grid
pub fn find_all_matches(grid: &Grid) -> Vec<Match> {
    let mut runs = Vec::new();

    for y in 0..grid.height() as i8 {
        scan_line(grid, Position::new(0, y), Axis::Horizontal, &mut runs);
    }
    for x in 0..grid.width() as i8 {
        scan_line(grid, Position::new(x, grid.height() as i8 - 1), Axis::Vertical, &mut runs);
    }

    merge_runs(runs)
}

/// Collect maximal runs along one full row or column
///
/// Rows are walked left to right from `start`; columns top to bottom.
fn scan_line(grid: &Grid, start: Position, axis: Axis, out: &mut Vec<Run>) {
    let (dx, dy) = match axis {
        Axis::Horizontal => (1, 0),
        Axis::Vertical => (0, -1),
    };

    let mut current: Option<Run> = None;
    let mut pos = start;
    while grid.is_valid(pos) {
        let kind = grid.kind_at(pos);
        match current.as_mut() {
            Some(run) if Some(run.kind) == kind => run.cells.push(pos),
            _ => {
                if let Some(run) = current.take() {
                    if run.cells.len() >= MIN_RUN {
                        out.push(run);
                    }
                }
                current = kind.map(|k| Run {
                    kind: k,
                    cells: vec![pos],
                });
            }
        }
        pos = pos.offset(dx, dy);
    }
    if let Some(run) = current {
        if run.cells.len() >= MIN_RUN {
            out.push(run);
        }
    }
}

/// Scan outward from seed positions only
///
/// Every run of length three or more passing through a seed is recorded, and
/// each cell of a recorded run is probed along the other axis too, so shapes
/// extending away from the seeds are classified the same way a full scan
/// would classify them.
pub fn find_matches_at(grid: &Grid, seeds: &[Position]) -> Vec<Match> {
    let mut runs = Vec::new();
    let mut probed: HashSet<(Position, Axis)> = HashSet::new();
    let mut queue: VecDeque<Position> = seeds
        .iter()
        .copied()
        .filter(|&p| grid.is_occupied(p))
        .collect();

    while let Some(pos) = queue.pop_front() {
        for axis in [Axis::Horizontal, Axis::Vertical] {
            if !probed.insert((pos, axis)) {
                continue;
            }
            let Some(run) = run_through(grid, pos, axis) else {
                continue;
            };
            for &cell in &run.cells {
                probed.insert((cell, axis));
                queue.push_back(cell);
            }
            runs.push(run);
        }
    }

    merge_runs(runs)
}

/// True when any run of three or more passes through one of `seeds`
///
/// Cheaper than [`find_matches_at`] when only the yes/no answer matters.
pub fn has_match_at(grid: &Grid, seeds: &[Position]) -> bool {
    seeds.iter().any(|&p| {
        grid.is_occupied(p)
            && (line_extent(grid, p, Axis::Horizontal) >= MIN_RUN
                || line_extent(grid, p, Axis::Vertical) >= MIN_RUN)
    })
}

/// Maximal run through `pos` along `axis`, if it is long enough to match
fn run_through(grid: &Grid, pos: Position, axis: Axis) -> Option<Run> {
    let kind = grid.kind_at(pos)?;
    let (dx, dy) = axis.step();

    let mut start = pos;
    while grid.kind_at(start.offset(-dx, -dy)) == Some(kind) {
        start = start.offset(-dx, -dy);
    }

    let mut cells = Vec::new();
    let mut cur = start;
    while grid.kind_at(cur) == Some(kind) {
        cells.push(cur);
        cur = cur.offset(dx, dy);
    }

    (cells.len() >= MIN_RUN).then_some(Run { kind, cells })
}

/// Length of the same-kind line through `pos` along `axis`
fn line_extent(grid: &Grid, pos: Position, axis: Axis) -> usize {
    let Some(kind) = grid.kind_at(pos) else {
        return 0;
    };
    let (dx, dy) = axis.step();
    let mut len = 1;
    let mut cur = pos.offset(dx, dy);
    while grid.kind_at(cur) == Some(kind) {
        len += 1;
        cur = cur.offset(dx, dy);
    }
    let mut cur = pos.offset(-dx, -dy);
    while grid.kind_at(cur) == Some(kind) {
        len += 1;
        cur = cur.offset(-dx, -dy);
    }
    len
}

/// Union same-kind runs that share a cell, to a fixed point
fn merge_runs(runs: Vec<Run>) -> Vec<Match> {
    let mut parent: Vec<usize> = (0..runs.len()).collect();

    fn root(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for i in 0..runs.len() {
        for j in (i + 1)..runs.len() {
            if runs[i].shares_cell_with(&runs[j]) {
                let (ri, rj) = (root(&mut parent, i), root(&mut parent, j));
                if ri != rj {
                    // Keep the earliest run as the root so groups come out in scan order.
                    parent[ri.max(rj)] = ri.min(rj);
                }
            }
        }
    }

    let mut groups: Vec<(usize, TokenKind, Vec<Position>)> = Vec::new();
    for (i, run) in runs.iter().enumerate() {
        let r = root(&mut parent, i);
        let slot = match groups.iter().position(|(g, _, _)| *g == r) {
            Some(slot) => slot,
            None => {
                groups.push((r, run.kind, Vec::new()));
                groups.len() - 1
            }
        };
        let positions = &mut groups[slot].2;
        for &cell in &run.cells {
            if !positions.contains(&cell) {
                positions.push(cell);
            }
        }
    }

    groups
        .into_iter()
        .map(|(_, kind, positions)| build_match(kind, positions))
        .collect()
}

fn build_match(kind: TokenKind, positions: Vec<Position>) -> Match {
    let set: HashSet<Position> = positions.iter().copied().collect();
    let shape = classify(&positions, &set);
    let anchor = anchor_of(&positions, &set);
    Match {
        kind,
        positions,
        shape,
        anchor,
    }
}

/// Consecutive in-match cells from `pos` in one direction, excluding `pos`
fn arm(set: &HashSet<Position>, pos: Position, dx: i8, dy: i8) -> usize {
    let mut len = 0;
    let mut cur = pos.offset(dx, dy);
    while set.contains(&cur) {
        len += 1;
        cur = cur.offset(dx, dy);
    }
    len
}

/// Arm lengths around a position: left, right, down, up
fn arms(set: &HashSet<Position>, pos: Position) -> [usize; 4] {
    [
        arm(set, pos, -1, 0),
        arm(set, pos, 1, 0),
        arm(set, pos, 0, -1),
        arm(set, pos, 0, 1),
    ]
}

/// Shape priority: cross, T, L, then straight lines by length
fn classify(positions: &[Position], set: &HashSet<Position>) -> MatchShape {
    let arms: Vec<[usize; 4]> = positions.iter().map(|&p| arms(set, p)).collect();

    if arms.iter().any(|&[l, r, d, u]| l > 0 && r > 0 && d > 0 && u > 0) {
        return MatchShape::Cross;
    }

    if positions.len() >= 5 {
        // Interior of one axis, with an arm of two or more leaving along the other.
        let is_t = arms.iter().any(|&[l, r, d, u]| {
            (l > 0 && r > 0 && (d >= 2 || u >= 2)) || (d > 0 && u > 0 && (l >= 2 || r >= 2))
        });
        if is_t {
            return MatchShape::TShape;
        }

        // Corner: a run of three or more on both axes meeting at an end of each.
        let is_l = arms
            .iter()
            .any(|&[l, r, d, u]| l + r + 1 >= 3 && d + u + 1 >= 3);
        if is_l {
            return MatchShape::LShape;
        }
    }

    match positions.len() {
        n if n >= 5 => MatchShape::Line5,
        4 => MatchShape::Line4,
        _ => MatchShape::Line3,
    }
}

/// Position with the most in-match orthogonal neighbors, first one wins ties
fn anchor_of(positions: &[Position], set: &HashSet<Position>) -> Position {
    let mut best = positions[0];
    let mut best_count = 0;
    for &p in positions {
        let count = p.neighbors().iter().filter(|n| set.contains(n)).count();
        if count > best_count {
            best = p;
            best_count = count;
        }
    }
    best
}
