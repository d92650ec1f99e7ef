//! Grid tests - occupancy, collision rule and cascading clears

use blockfall::core::Grid;
use blockfall::types::{Pos, Rgb, DEFAULT_COLUMNS, DEFAULT_ROWS};

const C: Rgb = Rgb::new(3, 3, 3);

#[test]
fn test_grid_new_empty() {
    let grid = Grid::new(DEFAULT_ROWS, DEFAULT_COLUMNS);
    assert_eq!(grid.rows(), 20);
    assert_eq!(grid.columns(), 10);
    assert_eq!(grid.cells().len(), 200);

    for row in 0..20 {
        for col in 0..10 {
            assert!(!grid.is_occupied(row, col), "({}, {}) should be empty", row, col);
        }
        assert!(!grid.is_row_full(row as usize));
    }
}

#[test]
fn test_off_field_is_never_occupied() {
    let mut grid = Grid::new(20, 10);
    for row in 0..20 {
        for col in 0..10 {
            grid.place(row, col, C);
        }
    }
    assert!(!grid.is_occupied(-1, 0));
    assert!(!grid.is_occupied(0, -1));
    assert!(!grid.is_occupied(20, 0));
    assert!(!grid.is_occupied(0, 10));
    assert_eq!(grid.cell(-1, 0), None);
}

#[test]
fn test_collision_rule() {
    let mut grid = Grid::new(20, 10);
    grid.place(10, 4, C);

    // Above the field is free as long as the column is valid.
    assert!(grid.is_free(Pos::new(-5, 4)));
    assert!(!grid.is_free(Pos::new(-5, -1)));
    // Walls, floor, locked blocks.
    assert!(!grid.is_free(Pos::new(5, 10)));
    assert!(!grid.is_free(Pos::new(20, 0)));
    assert!(!grid.is_free(Pos::new(10, 4)));
    assert!(grid.is_free(Pos::new(9, 4)));

    assert!(grid.fits(&[Pos::new(9, 4), Pos::new(-1, 4)]));
    assert!(!grid.fits(&[Pos::new(9, 4), Pos::new(10, 4)]));
}

#[test]
fn test_clear_four_rows_drops_rubble() {
    let mut grid = Grid::from_picture(
        &[
            "..........",
            "#.#.......",
            "##########",
            "##########",
            "##########",
            "##########",
        ],
        C,
    );
    assert_eq!(grid.clear_full_rows_and_shift(), 4);
    let expected = Grid::from_picture(
        &[
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "#.#.......",
        ],
        C,
    );
    assert_eq!(grid, expected);
}

#[test]
fn test_block_above_two_split_rows_moves_two() {
    let mut grid = Grid::from_picture(&["..#.", "####", "#...", "####"], C);
    assert_eq!(grid.clear_full_rows_and_shift(), 2);
    assert_eq!(grid, Grid::from_picture(&["....", "....", "..#.", "#..."], C));
}

#[test]
fn test_clear_is_idempotent() {
    let mut grid = Grid::from_picture(&["#...", "####", ".##."], C);
    grid.clear_full_rows_and_shift();
    let once = grid.clone();
    assert_eq!(grid.clear_full_rows_and_shift(), 0);
    assert_eq!(grid, once);
}

#[test]
fn test_blocks_and_rows_views() {
    let grid = Grid::from_picture(&["#..", "..#"], C);
    let positions: Vec<Pos> = grid.blocks().map(|b| b.pos).collect();
    assert_eq!(positions, vec![Pos::new(0, 0), Pos::new(1, 2)]);

    let rows: Vec<usize> = grid
        .iter_rows()
        .map(|r| r.iter().filter(|c| c.is_some()).count())
        .collect();
    assert_eq!(rows, vec![1, 1]);
}
