//! Cell storage for the toroidal grid.
//!
//! Cells live in one row-major buffer (`index = row * columns + column`).
//! Every coordinate lookup wraps with a positive modulus on both axes, so
//! the top edge meets the bottom edge and the left edge meets the right.

use std::fmt;

use rand::{Rng, RngCore};

use crate::error::{LifeError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Dead = 0,
    Alive = 1,
}

impl Cell {
    #[inline(always)]
    pub const fn from_alive(alive: bool) -> Self {
        if alive { Cell::Alive } else { Cell::Dead }
    }

    #[inline(always)]
    pub const fn is_alive(self) -> bool {
        matches!(self, Cell::Alive)
    }
}

/// Lazy row view over a grid, as produced by [`Grid::render`].
pub type Rows<'a> = std::slice::ChunksExact<'a, Cell>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

fn checked_len(rows: usize, columns: usize) -> Result<usize> {
    if rows == 0 || columns == 0 {
        return Err(LifeError::InvalidDimensions { rows, columns });
    }
    rows.checked_mul(columns)
        .filter(|&len| len <= i64::MAX as usize)
        .ok_or(LifeError::InvalidDimensions { rows, columns })
}

impl Grid {
    /// All-dead grid.
    pub fn empty(rows: usize, columns: usize) -> Result<Self> {
        let len = checked_len(rows, columns)?;
        Ok(Self {
            rows,
            columns,
            cells: vec![Cell::Dead; len],
        })
    }

    /// Each cell is independently alive with probability 0.5.
    ///
    /// The grid depends only on the state of `rng`, so a seeded generator
    /// reproduces the same grid on every run.
    pub fn random<R: Rng + ?Sized>(rows: usize, columns: usize, rng: &mut R) -> Result<Self> {
        let len = checked_len(rows, columns)?;
        let cells = (0..len)
            .map(|_| Cell::from_alive(rng.random::<bool>()))
            .collect();
        Ok(Self {
            rows,
            columns,
            cells,
        })
    }

    /// Random grid where each cell is alive with probability `density`.
    pub fn random_with_density<R: RngCore + ?Sized>(
        rows: usize,
        columns: usize,
        density: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&density) {
            return Err(LifeError::InvalidDensity(density));
        }
        let len = checked_len(rows, columns)?;
        let threshold = (u64::MAX as f64 * density) as u64;
        let cells = (0..len)
            .map(|_| Cell::from_alive(density > 0.0 && rng.next_u64() <= threshold))
            .collect();
        Ok(Self {
            rows,
            columns,
            cells,
        })
    }

    /// Adopt an existing row-major buffer.
    pub fn from_cells(rows: usize, columns: usize, cells: Vec<Cell>) -> Result<Self> {
        let expected = checked_len(rows, columns)?;
        if cells.len() != expected {
            return Err(LifeError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            rows,
            columns,
            cells,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a grid has at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    /// Buffer index of `(row, column)` after toroidal wrapping.
    ///
    /// Both axes use `rem_euclid`, so row -1 is the last row and column
    /// `columns` is column 0.
    #[inline(always)]
    pub fn wrapped_index(&self, row: i64, column: i64) -> usize {
        let r = row.rem_euclid(self.rows as i64) as usize;
        let c = column.rem_euclid(self.columns as i64) as usize;
        r * self.columns + c
    }

    #[inline(always)]
    pub fn cell_at(&self, row: i64, column: i64) -> Cell {
        self.cells[self.wrapped_index(row, column)]
    }

    pub fn set_cell(&mut self, row: i64, column: i64, cell: Cell) {
        let idx = self.wrapped_index(row, column);
        self.cells[idx] = cell;
    }

    pub fn set_alive<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        for (row, column) in cells {
            self.set_cell(row, column, Cell::Alive);
        }
    }

    pub fn population(&self) -> u64 {
        self.cells.iter().filter(|cell| cell.is_alive()).count() as u64
    }

    /// Rows of the grid, top to bottom. Cloning the iterator restarts it.
    pub fn render(&self) -> Rows<'_> {
        self.cells.chunks_exact(self.columns)
    }

    /// Publish `next` as the current generation, handing the retired buffer
    /// back through the same slot.
    #[inline]
    pub(crate) fn swap_cells(&mut self, next: &mut Vec<Cell>) {
        debug_assert_eq!(next.len(), self.cells.len());
        std::mem::swap(&mut self.cells, next);
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.render() {
            for &cell in row {
                write!(f, "{} ", cell as u8)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::{Cell, Grid};
    use crate::error::LifeError;

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            Grid::empty(0, 4),
            Err(LifeError::InvalidDimensions { rows: 0, .. })
        ));
        assert!(matches!(
            Grid::empty(4, 0),
            Err(LifeError::InvalidDimensions { columns: 0, .. })
        ));
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        assert!(Grid::random(0, 0, &mut rng).is_err());
        assert!(Grid::empty(usize::MAX, 2).is_err());
    }

    #[test]
    fn empty_grid_is_all_dead() {
        let grid = Grid::empty(3, 5).unwrap();
        assert_eq!(grid.len(), 15);
        assert!(grid.cells().iter().all(|&c| c == Cell::Dead));
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn wraparound_maps_to_opposite_edge() {
        for n in 1..=8usize {
            let mut rng = rand::rngs::StdRng::seed_from_u64(n as u64);
            let grid = Grid::random(n, n, &mut rng).unwrap();
            let n = n as i64;
            for c in 0..n {
                assert_eq!(grid.cell_at(-1, c), grid.cell_at(n - 1, c));
                assert_eq!(grid.cell_at(n, c), grid.cell_at(0, c));
                assert_eq!(grid.cell_at(c, -1), grid.cell_at(c, n - 1));
                assert_eq!(grid.cell_at(c, n), grid.cell_at(c, 0));
            }
        }
    }

    #[test]
    fn wrapped_index_handles_rectangular_grids() {
        let grid = Grid::empty(3, 5).unwrap();
        assert_eq!(grid.wrapped_index(0, 0), 0);
        assert_eq!(grid.wrapped_index(-1, -1), 14);
        assert_eq!(grid.wrapped_index(3, 5), 0);
        assert_eq!(grid.wrapped_index(1, 7), 7);
        assert_eq!(grid.wrapped_index(-4, 2), 12);
    }

    #[test]
    fn set_cell_wraps() {
        let mut grid = Grid::empty(4, 4).unwrap();
        grid.set_cell(-1, 4, Cell::Alive);
        assert_eq!(grid.cell_at(3, 0), Cell::Alive);
        assert_eq!(grid.population(), 1);
    }

    #[test]
    fn same_seed_reproduces_grid() {
        let mut a = rand::rngs::StdRng::seed_from_u64(0x5EED);
        let mut b = rand::rngs::StdRng::seed_from_u64(0x5EED);
        let first = Grid::random(32, 17, &mut a).unwrap();
        let second = Grid::random(32, 17, &mut b).unwrap();
        assert_eq!(first, second);
        // Half-density seeding should land well away from both extremes.
        let pop = first.population();
        assert!(pop > 32 * 17 / 4 && pop < 32 * 17 * 3 / 4, "pop {pop}");
    }

    #[test]
    fn density_bounds() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        assert!(matches!(
            Grid::random_with_density(4, 4, 1.5, &mut rng),
            Err(LifeError::InvalidDensity(_))
        ));
        let full = Grid::random_with_density(4, 4, 1.0, &mut rng).unwrap();
        assert_eq!(full.population(), 16);
        let none = Grid::random_with_density(4, 4, 0.0, &mut rng).unwrap();
        assert_eq!(none.population(), 0);
    }

    #[test]
    fn from_cells_checks_length() {
        assert!(matches!(
            Grid::from_cells(2, 2, vec![Cell::Dead; 3]),
            Err(LifeError::CellCountMismatch {
                expected: 4,
                actual: 3
            })
        ));
        let grid = Grid::from_cells(1, 2, vec![Cell::Alive, Cell::Dead]).unwrap();
        assert_eq!(grid.cell_at(0, 0), Cell::Alive);
        assert_eq!(grid.into_cells(), vec![Cell::Alive, Cell::Dead]);
    }

    #[test]
    fn render_is_restartable_and_display_matches() {
        let mut grid = Grid::empty(2, 3).unwrap();
        grid.set_cell(0, 1, Cell::Alive);
        grid.set_cell(1, 2, Cell::Alive);

        let rows = grid.render();
        assert_eq!(rows.clone().count(), 2);
        let collected: Vec<&[Cell]> = rows.collect();
        assert_eq!(collected[0], &[Cell::Dead, Cell::Alive, Cell::Dead]);
        assert_eq!(collected[1], &[Cell::Dead, Cell::Dead, Cell::Alive]);

        assert_eq!(grid.to_string(), "0 1 0 \n0 0 1 \n");
    }
}
