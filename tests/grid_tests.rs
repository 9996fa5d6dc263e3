//! Grid storage tests

use match_three::core::Grid;
use match_three::types::{BoardError, Position, SwapRejection, TokenKind, MAX_DIMENSION};

fn p(x: i8, y: i8) -> Position {
    Position::new(x, y)
}

#[test]
fn test_grid_new_empty() {
    let grid = Grid::new(8, 6).unwrap();
    assert_eq!(grid.width(), 8);
    assert_eq!(grid.height(), 6);
    for y in 0..6 {
        for x in 0..8 {
            assert!(grid.is_valid(p(x, y)), "cell ({x}, {y}) should be valid");
            assert_eq!(grid.get(p(x, y)), Some(None));
        }
    }
    assert_eq!(grid.count_empty(), 48);
}

#[test]
fn test_grid_rejects_bad_dimensions() {
    assert_eq!(
        Grid::new(0, 5).unwrap_err(),
        BoardError::InvalidDimensions { width: 0, height: 5 }
    );
    assert!(Grid::new(MAX_DIMENSION + 1, 4).is_err());
    assert!(Grid::from_rows(&["RG", "R"]).is_err());
    assert_eq!(
        Grid::from_rows(&["RX"]).unwrap_err(),
        BoardError::UnknownToken("X".to_string())
    );
}

#[test]
fn test_grid_out_of_bounds() {
    let mut grid = Grid::new(4, 4).unwrap();
    assert_eq!(grid.get(p(-1, 0)), None);
    assert_eq!(grid.get(p(0, 4)), None);
    assert!(!grid.set(p(4, 0), Some(TokenKind::Red)));
    assert!(!grid.is_occupied(p(9, 9)));
}

#[test]
fn test_grid_swap() {
    let mut grid = Grid::from_rows(&["RG", "BY"]).unwrap();
    grid.swap(p(0, 0), p(1, 1)).unwrap();
    assert_eq!(grid.kind_at(p(0, 0)), Some(TokenKind::Green));
    assert_eq!(grid.kind_at(p(1, 1)), Some(TokenKind::Blue));
    assert_eq!(
        grid.swap(p(0, 0), p(2, 0)),
        Err(SwapRejection::OutOfBounds(p(2, 0)))
    );
}

#[test]
fn test_empty_positions_bottom_to_top() {
    let grid = Grid::from_rows(&[".", "R", ".", "."]).unwrap();
    assert_eq!(grid.empty_positions_in_column(0), vec![p(0, 0), p(0, 1), p(0, 3)]);
    assert!(grid.empty_positions_in_column(5).is_empty());
}

#[test]
fn test_rows_round_trip_text() {
    let rows = ["RGB.", "YPOR"];
    let grid = Grid::from_rows(&rows).unwrap();
    assert_eq!(grid.to_rows(), rows.iter().map(|r| r.to_string()).collect::<Vec<_>>());
    assert_eq!(grid.to_string().lines().next(), Some("RGB."));
}
