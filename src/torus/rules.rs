//! Neighbor counting and the B3/S23 transition rule.

use super::grid::{Cell, Grid};

/// Moore neighborhood offsets as `(d_row, d_column)`, center excluded.
pub const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Live cells among the 8 wrapped neighbors of `(row, column)`.
///
/// Coordinates are reduced onto the grid before the offsets are applied, so
/// any `i64` is accepted.
#[inline]
pub fn count_live_neighbors(grid: &Grid, row: i64, column: i64) -> u8 {
    let row = row.rem_euclid(grid.rows() as i64);
    let column = column.rem_euclid(grid.columns() as i64);
    NEIGHBOR_OFFSETS
        .iter()
        .map(|&(dr, dc)| grid.cell_at(row + dr, column + dc) as u8)
        .sum()
}

/// Survival on 2 or 3 neighbors, birth on exactly 3.
#[inline(always)]
pub const fn next_state(current: Cell, neighbors: u8) -> Cell {
    match (current, neighbors) {
        (Cell::Alive, 2 | 3) | (Cell::Dead, 3) => Cell::Alive,
        _ => Cell::Dead,
    }
}

/// Next state of one cell of `grid`.
#[inline]
pub fn advance_cell(grid: &Grid, row: usize, column: usize) -> Cell {
    let (row, column) = (row as i64, column as i64);
    next_state(
        grid.cell_at(row, column),
        count_live_neighbors(grid, row, column),
    )
}

/// Fill `out` with the next states of the rows starting at `first_row`.
///
/// `out.len()` must be a whole number of rows.
pub fn advance_rows(grid: &Grid, first_row: usize, out: &mut [Cell]) {
    let columns = grid.columns();
    debug_assert_eq!(out.len() % columns, 0);
    for (offset, out_row) in out.chunks_exact_mut(columns).enumerate() {
        let row = first_row + offset;
        for (column, slot) in out_row.iter_mut().enumerate() {
            *slot = advance_cell(grid, row, column);
        }
    }
}
