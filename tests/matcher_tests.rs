//! Match detection scenarios through the public API

use match_three::core::matcher::{find_all_matches, find_matches_at, has_match_at};
use match_three::core::Grid;
use match_three::types::{MatchShape, Position, TokenKind};

fn p(x: i8, y: i8) -> Position {
    Position::new(x, y)
}

fn sorted(positions: &[Position]) -> Vec<Position> {
    let mut v = positions.to_vec();
    v.sort();
    v
}

#[test]
fn test_l_shape_detection() {
    // (0,0),(1,0),(2,0) and (0,1),(0,2) are blue.
    let grid = Grid::from_rows(&[
        "BRGY",
        "BGRY",
        "BBBR",
    ])
    .unwrap();

    let matches = find_all_matches(&grid);
    assert_eq!(matches.len(), 1);
    let m = &matches[0];
    assert_eq!(m.shape(), MatchShape::LShape);
    assert_eq!(m.kind(), TokenKind::Blue);
    assert_eq!(
        sorted(m.positions()),
        vec![p(0, 0), p(0, 1), p(0, 2), p(1, 0), p(2, 0)]
    );
    assert_eq!(m.anchor(), p(0, 0));
}

#[test]
fn test_t_shape_beats_l() {
    // Horizontal three on top with a stem of two below its middle.
    let grid = Grid::from_rows(&[
        "RRRG",
        "GRBY",
        "BRYG",
    ])
    .unwrap();
    let matches = find_all_matches(&grid);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].shape(), MatchShape::TShape);
    assert_eq!(matches[0].len(), 5);
    assert_eq!(matches[0].anchor(), p(1, 2));
}

#[test]
fn test_cross_shape() {
    let grid = Grid::from_rows(&[
        "GYGB",
        "YYYB",
        "GYGP",
    ])
    .unwrap();
    let matches = find_all_matches(&grid);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].shape(), MatchShape::Cross);
    assert_eq!(matches[0].anchor(), p(1, 1));
}

#[test]
fn test_lines_by_length() {
    let grid = Grid::from_rows(&[
        "RRRRRG",
        "GBGBYB",
        "YYYYBG",
        "BGBPPP",
    ])
    .unwrap();
    let mut shapes: Vec<(MatchShape, usize)> = find_all_matches(&grid)
        .iter()
        .map(|m| (m.shape(), m.len()))
        .collect();
    shapes.sort_by_key(|&(_, len)| len);
    assert_eq!(
        shapes,
        vec![
            (MatchShape::Line3, 3),
            (MatchShape::Line4, 4),
            (MatchShape::Line5, 5),
        ]
    );
}

#[test]
fn test_separate_kinds_never_merge() {
    let grid = Grid::from_rows(&[
        "GRY",
        "GRY",
        "GRY",
    ])
    .unwrap();
    let matches = find_all_matches(&grid);
    assert_eq!(matches.len(), 3);
    assert!(matches.iter().all(|m| m.shape() == MatchShape::Line3));
}

#[test]
fn test_incremental_agrees_with_full_scan() {
    let grid = Grid::from_rows(&[
        "BRGY",
        "BGRY",
        "BBBR",
    ])
    .unwrap();
    let full = find_all_matches(&grid);
    let seeded = find_matches_at(&grid, &[p(2, 0)]);
    assert_eq!(seeded.len(), 1);
    assert_eq!(seeded[0].shape(), full[0].shape());
    assert_eq!(sorted(seeded[0].positions()), sorted(full[0].positions()));

    assert!(has_match_at(&grid, &[p(2, 0)]));
    assert!(!has_match_at(&grid, &[p(3, 2)]));
    assert!(find_matches_at(&grid, &[p(3, 2), p(1, 1)]).is_empty());
}

#[test]
fn test_empty_cells_break_runs() {
    let grid = Grid::from_rows(&["RR.RR", "GBGBG"]).unwrap();
    assert!(find_all_matches(&grid).is_empty());
}
