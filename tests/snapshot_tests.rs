use match_three::core::snapshot::fnv1a64;
use match_three::core::{Board, BoardConfig, Grid, GridSnapshot};
use match_three::types::Position;

#[test]
fn fnv1a64_known_vectors() {
    assert_eq!(fnv1a64(std::iter::empty()), 0xcbf29ce484222325);
    assert_eq!(fnv1a64(*b"a"), 0xaf63dc4c8601ec8c);
}

#[test]
fn snapshot_hash_tracks_cells_only() {
    let grid = Grid::from_rows(&["RG", "B."]).unwrap();
    let snap = GridSnapshot::from_grid(&grid);
    assert_eq!(snap.cells, vec![3, 0, 1, 2]);
    assert_eq!(snap.board_hash, fnv1a64([3u8, 0, 1, 2]));
    assert_eq!(snap.rows(), vec![vec![3, 0], vec![1, 2]]);
    assert_eq!(snap.code_at(Position::new(1, 1)), 2);
    assert_eq!(snap.code_at(Position::new(5, 1)), 0);

    let mut other = grid.clone();
    other.set(Position::new(1, 0), Some(match_three::types::TokenKind::Red));
    assert_ne!(GridSnapshot::from_grid(&other).board_hash, snap.board_hash);
}

#[test]
fn snapshot_renders_top_row_first() {
    let grid = Grid::from_rows(&["RG", "B."]).unwrap();
    let text = GridSnapshot::from_grid(&grid).to_string();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("RG"));
    assert_eq!(lines.next(), Some("B."));
}

#[test]
fn board_snapshot_carries_counters() {
    let mut board = Board::new(BoardConfig::default().with_seed(8)).unwrap();
    let (a, b) = board.hint().unwrap();
    board.request_swap(a, b);

    let snap = board.snapshot();
    assert_eq!(snap.score, board.score());
    assert_eq!(snap.swaps, 1);
    assert_eq!(snap.moves_available, board.moves_available());
    assert_eq!(snap.board_hash, GridSnapshot::from_grid(board.grid()).board_hash);
}
