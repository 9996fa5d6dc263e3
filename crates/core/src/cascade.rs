//! Cascade resolver - the board handle and its state machine
//!
//! ```text
//! Idle -> Swapping -> Matching -> (Destroying -> Falling -> Refilling -> Matching)*
//!      -> Idle | Deadlocked -> Shuffling -> Matching
//! ```
//!
//! One call to [`Board::request_swap`] runs the machine to quiescence and
//! returns the whole [`CascadeTrace`]; nothing inside the core waits on
//! presentation. The board is the only owner of the grid; every other
//! component works on a borrow.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::config::BoardConfig;
use crate::deadlock;
use crate::gravity;
use crate::grid::Grid;
use crate::matcher::{find_all_matches, find_matches_at, Match};
use crate::rng::SimpleRng;
use crate::scoring::calculate_score;
use crate::shuffle::shuffle;
use crate::snapshot::GridSnapshot;
use crate::spawn;
use crate::swap::{check_swap, would_match};
use crate::trace::{CascadeTrace, ShuffleSummary, TraceEvent};
use crate::types::{BoardError, Cell, Position, SwapRejection};

/// Resolver state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CascadeState {
    Idle,
    Swapping,
    Matching,
    Destroying,
    Falling,
    Refilling,
    Deadlocked,
    Shuffling,
}

impl CascadeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CascadeState::Idle => "idle",
            CascadeState::Swapping => "swapping",
            CascadeState::Matching => "matching",
            CascadeState::Destroying => "destroying",
            CascadeState::Falling => "falling",
            CascadeState::Refilling => "refilling",
            CascadeState::Deadlocked => "deadlocked",
            CascadeState::Shuffling => "shuffling",
        }
    }
}

/// Result of a swap request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
    pub accepted: bool,
    /// Set whenever `accepted` is false
    pub rejection: Option<SwapRejection>,
    pub trace: CascadeTrace,
    pub score_gained: u64,
}

impl SwapOutcome {
    fn rejected(reason: SwapRejection, trace: CascadeTrace) -> Self {
        Self {
            accepted: false,
            rejection: Some(reason),
            trace,
            score_gained: 0,
        }
    }
}

/// Which cells the next Matching step examines
#[derive(Debug, Clone)]
enum Scan {
    Full,
    Columns(Vec<i8>),
}

/// Working data carried between states of one resolution
#[derive(Debug, Default)]
struct Resolution {
    matches: Vec<Match>,
    touched: Vec<i8>,
    iterations: u32,
    shuffles: u32,
    score: u64,
}

/// A game board: grid, palette, RNG and resolver state
#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    config: BoardConfig,
    rng: SimpleRng,
    state: CascadeState,
    cascade_level: u32,
    score: u64,
    swaps: u32,
}

impl Board {
    /// Create a board and fill it with a match-free, playable layout
    pub fn new(config: BoardConfig) -> Result<Self, BoardError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height)?;
        let mut board = Self {
            grid,
            rng: SimpleRng::new(config.seed),
            config,
            state: CascadeState::Idle,
            cascade_level: 0,
            score: 0,
            swaps: 0,
        };
        board.fill_initial();
        Ok(board)
    }

    /// Wrap a hand-built grid (editors, fixtures); the grid is used as-is
    ///
    /// The config's dimensions are replaced by the grid's.
    pub fn from_grid(grid: Grid, mut config: BoardConfig) -> Result<Self, BoardError> {
        config.width = grid.width();
        config.height = grid.height();
        config.validate()?;
        if let Some(kind) = grid.foreign_kind(&config.palette) {
            return Err(BoardError::UnknownToken(kind.as_str().to_string()));
        }
        Ok(Self {
            grid,
            rng: SimpleRng::new(config.seed),
            config,
            state: CascadeState::Idle,
            cascade_level: 0,
            score: 0,
            swaps: 0,
        })
    }

    /// Populate every cell with no pre-existing match
    ///
    /// Layouts without a single legal move are redrawn, up to
    /// `max_shuffle_attempts` times.
    pub fn fill_initial(&mut self) {
        for attempt in 0..=self.config.max_shuffle_attempts {
            self.grid.clear();
            spawn::fill_empty(&mut self.grid, &self.config.palette, &mut self.rng);
            if deadlock::has_any_move(&mut self.grid) {
                debug!(attempt, "initial fill");
                break;
            }
            debug!(attempt, "initial fill has no moves, redrawing");
        }
        self.state = CascadeState::Idle;
        self.cascade_level = 0;
    }

    /// Start over with a new seed
    pub fn restart(&mut self, seed: u32) {
        self.config.seed = seed;
        self.rng = SimpleRng::new(seed);
        self.score = 0;
        self.swaps = 0;
        self.fill_initial();
        info!(seed, "board restarted");
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn state(&self) -> CascadeState {
        self.state
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Accepted swaps since the last fill
    pub fn swaps(&self) -> u32 {
        self.swaps
    }

    pub fn seed(&self) -> u32 {
        self.config.seed
    }

    /// Read-only copy of the board for rendering or debugging
    pub fn snapshot(&self) -> GridSnapshot {
        let mut snap = GridSnapshot::from_grid(&self.grid);
        snap.score = self.score;
        snap.swaps = self.swaps;
        snap.moves_available = self.moves_available();
        snap
    }

    /// A swap that would produce a match, if any
    pub fn hint(&self) -> Option<(Position, Position)> {
        let mut scratch = self.grid.clone();
        deadlock::find_move(&mut scratch)
    }

    /// Number of swaps that would produce a match
    pub fn moves_available(&self) -> usize {
        let mut scratch = self.grid.clone();
        deadlock::count_moves(&mut scratch)
    }

    /// Overwrite one cell without resolving anything
    ///
    /// Returns false when the position is outside the board or the kind is
    /// not in the palette. Call [`Board::settle`] to resolve the result.
    pub fn edit_cell(&mut self, pos: Position, cell: Cell) -> bool {
        if let Some(kind) = cell {
            if !self.config.palette.contains(kind) {
                return false;
            }
        }
        self.grid.set(pos, cell)
    }

    /// Validate a swap and, if it matches, run the cascade to quiescence
    ///
    /// Illegal swaps are rejected before any mutation. Legal swaps that make
    /// no match are traded back (`SwapRejected { reverted: true }`); if the
    /// board turns out to be deadlocked at that point it is shuffled before
    /// returning.
    pub fn request_swap(&mut self, a: Position, b: Position) -> SwapOutcome {
        let mut trace = CascadeTrace::new();
        self.state = CascadeState::Swapping;

        if let Err(reason) = check_swap(&self.grid, a, b) {
            debug!(%a, %b, code = reason.code(), "swap rejected");
            trace.push(TraceEvent::SwapRejected {
                reason,
                reverted: false,
            });
            self.state = CascadeState::Idle;
            return SwapOutcome::rejected(reason, trace);
        }

        if !would_match(&mut self.grid, a, b) {
            debug!(%a, %b, "swap makes no match, reverted");
            trace.push(TraceEvent::SwapRejected {
                reason: SwapRejection::NoMatchProduced,
                reverted: true,
            });
            if deadlock::has_any_move(&mut self.grid) {
                self.state = CascadeState::Idle;
            } else {
                self.run(&mut trace, CascadeState::Deadlocked, Scan::Full);
            }
            return SwapOutcome::rejected(SwapRejection::NoMatchProduced, trace);
        }

        if let Err(reason) = self.grid.swap(a, b) {
            self.state = CascadeState::Idle;
            return SwapOutcome::rejected(reason, trace);
        }
        self.swaps += 1;
        trace.push(TraceEvent::SwapCommitted { a, b });
        debug!(%a, %b, "swap committed");

        let score_gained = self.run(&mut trace, CascadeState::Matching, Scan::Full);
        SwapOutcome {
            accepted: true,
            rejection: None,
            trace,
            score_gained,
        }
    }

    /// Resolve whatever the grid currently holds: matches, holes, deadlock
    ///
    /// Used after hand edits; a board produced by the resolver is already
    /// settled and yields just `Settled`.
    pub fn settle(&mut self) -> CascadeTrace {
        let mut trace = CascadeTrace::new();
        let columns: Vec<i8> = (0..self.grid.width() as i8)
            .filter(|&x| !self.grid.empty_positions_in_column(x).is_empty())
            .collect();
        let start = if columns.is_empty() {
            CascadeState::Matching
        } else {
            // Holes first: compact and refill, then look for matches.
            CascadeState::Falling
        };
        let resolution = Resolution {
            touched: columns,
            ..Resolution::default()
        };
        self.score += self.drive(&mut trace, start, Scan::Full, resolution);
        trace
    }

    fn run(&mut self, trace: &mut CascadeTrace, start: CascadeState, scan: Scan) -> u64 {
        let gained = self.drive(trace, start, scan, Resolution::default());
        self.score += gained;
        gained
    }

    /// The state machine proper. Returns the points scored.
    fn drive(
        &mut self,
        trace: &mut CascadeTrace,
        start: CascadeState,
        mut scan: Scan,
        mut res: Resolution,
    ) -> u64 {
        self.cascade_level = 0;
        self.state = start;

        loop {
            match self.state {
                CascadeState::Matching => {
                    let matches = match &scan {
                        Scan::Full => find_all_matches(&self.grid),
                        Scan::Columns(cols) => {
                            let seeds: Vec<Position> = cols
                                .iter()
                                .flat_map(|&x| self.grid.column_positions(x))
                                .collect();
                            find_matches_at(&self.grid, &seeds)
                        }
                    };

                    if matches.is_empty() {
                        self.state = if deadlock::has_any_move(&mut self.grid) {
                            trace.push(TraceEvent::Settled);
                            CascadeState::Idle
                        } else {
                            CascadeState::Deadlocked
                        };
                        continue;
                    }

                    if res.iterations >= self.config.max_cascade_iterations {
                        warn!(
                            iterations = res.iterations,
                            "cascade safety valve tripped, leaving matches in place"
                        );
                        trace.push(TraceEvent::CascadeCapped {
                            iterations: res.iterations,
                        });
                        self.state = CascadeState::Idle;
                        continue;
                    }

                    res.iterations += 1;
                    trace.push(TraceEvent::MatchesFound(matches.clone()));
                    res.matches = matches;
                    self.state = CascadeState::Destroying;
                }

                CascadeState::Destroying => {
                    let mut cleared: BTreeSet<Position> = BTreeSet::new();
                    for m in &res.matches {
                        cleared.extend(m.positions().iter().copied());
                    }
                    for &p in &cleared {
                        self.grid.set(p, None);
                    }

                    self.cascade_level += 1;
                    let score = calculate_score(&res.matches, self.cascade_level);
                    res.score += score.total as u64;
                    debug!(
                        level = self.cascade_level,
                        cleared = cleared.len(),
                        points = score.total,
                        "destroyed"
                    );

                    let columns: BTreeSet<i8> = cleared.iter().map(|p| p.x).collect();
                    res.touched = columns.into_iter().collect();
                    trace.push(TraceEvent::Destroyed {
                        positions: cleared.into_iter().collect(),
                        cascade_level: self.cascade_level,
                    });
                    self.state = CascadeState::Falling;
                }

                CascadeState::Falling => {
                    let plan = gravity::compact(&mut self.grid, &res.touched);
                    trace.push(TraceEvent::Fell(plan.steps));
                    self.state = CascadeState::Refilling;
                }

                CascadeState::Refilling => {
                    let spawned = spawn::refill_columns(
                        &mut self.grid,
                        &res.touched,
                        &self.config.palette,
                        &mut self.rng,
                    );
                    trace.push(TraceEvent::Refilled(spawned));
                    scan = match scan {
                        // A settle that started from holes still needs one full look.
                        Scan::Full if res.iterations == 0 => Scan::Full,
                        _ => Scan::Columns(std::mem::take(&mut res.touched)),
                    };
                    self.state = CascadeState::Matching;
                }

                CascadeState::Deadlocked => {
                    trace.push(TraceEvent::Deadlocked);
                    if res.shuffles >= self.config.max_shuffle_attempts {
                        warn!(
                            attempts = res.shuffles,
                            "board still deadlocked after shuffling"
                        );
                        break;
                    }
                    self.state = CascadeState::Shuffling;
                }

                CascadeState::Shuffling => {
                    res.shuffles += 1;
                    let relocations = shuffle(&mut self.grid, &mut self.rng);
                    info!(attempt = res.shuffles, "deadlock, board shuffled");
                    trace.push(TraceEvent::Shuffled(ShuffleSummary {
                        attempt: res.shuffles,
                        relocations,
                    }));
                    scan = Scan::Full;
                    self.state = CascadeState::Matching;
                }

                CascadeState::Idle | CascadeState::Swapping => break,
            }
        }

        // Multiplier resets on the way back to idle.
        self.cascade_level = 0;
        debug!(
            state = self.state.as_str(),
            iterations = res.iterations,
            shuffles = res.shuffles,
            points = res.score,
            "resolution finished"
        );
        res.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Palette, TokenKind};

    fn p(x: i8, y: i8) -> Position {
        Position::new(x, y)
    }

    fn board(rows: &[&str]) -> Board {
        let grid = Grid::from_rows(rows).unwrap();
        Board::from_grid(grid, BoardConfig::default()).unwrap()
    }

    #[test]
    fn new_board_is_match_free_and_playable() {
        let b = Board::new(BoardConfig::default()).unwrap();
        assert!(find_all_matches(b.grid()).is_empty());
        assert!(b.hint().is_some());
        assert_eq!(b.grid().count_empty(), 0);
        assert_eq!(b.state(), CascadeState::Idle);
    }

    #[test]
    fn rejects_bad_config() {
        let mut config = BoardConfig::default();
        config.height = 0;
        assert!(Board::new(config).is_err());
    }

    #[test]
    fn from_grid_rejects_foreign_kinds() {
        let grid = Grid::from_rows(&["RO"]).unwrap();
        let config = BoardConfig {
            palette: Palette::first(3).unwrap(),
            ..BoardConfig::default()
        };
        assert_eq!(
            Board::from_grid(grid, config).unwrap_err(),
            BoardError::UnknownToken("orange".to_string())
        );
    }

    #[test]
    fn illegal_swap_leaves_board_untouched() {
        let mut b = Board::new(BoardConfig::default()).unwrap();
        let before = b.snapshot();
        let out = b.request_swap(p(0, 0), p(2, 0));
        assert!(!out.accepted);
        assert_eq!(out.rejection, Some(SwapRejection::NotAdjacent(p(0, 0), p(2, 0))));
        assert_eq!(out.trace.len(), 1);
        assert_eq!(b.snapshot(), before);
        assert_eq!(b.state(), CascadeState::Idle);
    }

    #[test]
    fn matching_swap_runs_a_cascade() {
        let mut b = Board::new(BoardConfig::default().with_seed(9)).unwrap();
        let (a, c) = b.hint().unwrap();
        let out = b.request_swap(a, c);
        assert!(out.accepted);
        assert!(out.score_gained > 0);
        assert_eq!(b.score(), out.score_gained);
        assert_eq!(b.swaps(), 1);
        assert!(out.trace.cascade_depth() >= 1);
        assert!(find_all_matches(b.grid()).is_empty());
        assert_eq!(b.grid().count_empty(), 0);
        assert_eq!(b.state(), CascadeState::Idle);
        assert_eq!(out.trace.events()[0], TraceEvent::SwapCommitted { a, b: c });
    }

    #[test]
    fn edit_cell_respects_palette_and_bounds() {
        let mut b = Board::new(BoardConfig::default()).unwrap();
        assert!(!b.edit_cell(p(0, 0), Some(TokenKind::Orange)));
        assert!(!b.edit_cell(p(20, 0), Some(TokenKind::Red)));
        assert!(b.edit_cell(p(0, 0), None));
        assert!(b.grid().is_empty(p(0, 0)));
    }

    #[test]
    fn settle_fills_holes_and_clears_matches() {
        let mut b = board(&["RGBY", "GB.R", "RRRG", "YPGB"]);
        let trace = b.settle();
        assert!(trace.is_settled() || trace.shuffles() > 0);
        assert_eq!(b.grid().count_empty(), 0);
        assert!(find_all_matches(b.grid()).is_empty());
    }

    #[test]
    fn restart_resets_counters() {
        let mut b = Board::new(BoardConfig::default()).unwrap();
        let (x, y) = b.hint().unwrap();
        b.request_swap(x, y);
        b.restart(5);
        assert_eq!(b.score(), 0);
        assert_eq!(b.swaps(), 0);
        assert_eq!(b.seed(), 5);
        assert!(find_all_matches(b.grid()).is_empty());
    }

    #[test]
    fn same_seed_same_game() {
        let mut a = Board::new(BoardConfig::default().with_seed(21)).unwrap();
        let mut b = Board::new(BoardConfig::default().with_seed(21)).unwrap();
        for _ in 0..10 {
            let (x, y) = a.hint().unwrap();
            let oa = a.request_swap(x, y);
            let ob = b.request_swap(x, y);
            assert_eq!(oa, ob);
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
