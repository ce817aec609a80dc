//! Board topology for the 11x11 grid
//!
//! Only the edge cells of the grid are board spaces. Space 0 sits in the
//! bottom-right corner and indices run around the ring from there:
//! - bottom row (row 10): 10..=0, right to left
//! - left column (col 0): 11..=19, bottom to top
//! - top row (row 0): 20..=30, left to right
//! - right column (col 10): 31..=39, top to bottom

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BOARD_SPACES, DEFAULT_CELL_SIZE, GRID_SIZE};
use crate::error::{SimError, SimResult};

const LAST: usize = GRID_SIZE - 1;

/// A cell of the 11x11 grid (row 0 is the top row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

impl GridCell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// True if (row, col) is an edge cell of the grid
#[inline]
pub fn is_perimeter(row: usize, col: usize) -> bool {
    row < GRID_SIZE && col < GRID_SIZE && (row == 0 || row == LAST || col == 0 || col == LAST)
}

/// Space index for an edge cell of the grid
pub fn index_for_grid_cell(row: usize, col: usize) -> SimResult<usize> {
    if !is_perimeter(row, col) {
        return Err(SimError::NotOnPerimeter { row, col });
    }
    let index = if row == LAST {
        LAST - col
    } else if col == 0 {
        LAST + (LAST - row)
    } else if row == 0 {
        2 * LAST + col
    } else {
        3 * LAST + row
    };
    Ok(index)
}

/// Grid cell for a space index (inverse of [`index_for_grid_cell`])
pub fn grid_cell_for_index(index: usize) -> SimResult<GridCell> {
    let cell = match index {
        0..=10 => GridCell::new(LAST, LAST - index),
        11..=19 => GridCell::new(2 * LAST - index, 0),
        20..=30 => GridCell::new(0, index - 2 * LAST),
        31..=39 => GridCell::new(index - 3 * LAST, LAST),
        _ => return Err(SimError::SpaceOutOfRange { index }),
    };
    Ok(cell)
}

/// All edge cells with their space index, in row-major order
pub fn perimeter_cells() -> impl Iterator<Item = (GridCell, usize)> {
    (0..GRID_SIZE).flat_map(|row| {
        (0..GRID_SIZE).filter_map(move |col| {
            index_for_grid_cell(row, col)
                .ok()
                .map(|index| (GridCell::new(row, col), index))
        })
    })
}

/// Pixel geometry of the rendered board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    /// Side length of one grid cell in pixels
    pub cell_size: f32,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl BoardLayout {
    pub fn new(cell_size: f32) -> Self {
        Self { cell_size }
    }

    /// Total board width/height in pixels
    pub fn board_size(&self) -> f32 {
        self.cell_size * GRID_SIZE as f32
    }

    /// Center of a space relative to the board's top-left corner
    pub fn cell_center(&self, index: usize) -> SimResult<Vec2> {
        let cell = grid_cell_for_index(index)?;
        Ok(Vec2::new(
            (cell.col as f32 + 0.5) * self.cell_size,
            (cell.row as f32 + 0.5) * self.cell_size,
        ))
    }

    /// Top-left offset that centers a token of `token_size` on a space
    pub fn token_offset(&self, index: usize, token_size: f32) -> SimResult<Vec2> {
        let center = self.cell_center(index)?;
        Ok(center - Vec2::splat(token_size / 2.0))
    }
}

/// Number of edge cells (one per space)
pub const PERIMETER_CELLS: usize = BOARD_SPACES;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_corner_indices() {
        assert_eq!(index_for_grid_cell(10, 10).unwrap(), 0);
        assert_eq!(index_for_grid_cell(10, 0).unwrap(), 10);
        assert_eq!(index_for_grid_cell(0, 0).unwrap(), 20);
        assert_eq!(index_for_grid_cell(0, 10).unwrap(), 30);
    }

    #[test]
    fn test_edge_indices() {
        assert_eq!(index_for_grid_cell(10, 7).unwrap(), 3);
        assert_eq!(index_for_grid_cell(9, 0).unwrap(), 11);
        assert_eq!(index_for_grid_cell(1, 0).unwrap(), 19);
        assert_eq!(index_for_grid_cell(0, 5).unwrap(), 25);
        assert_eq!(index_for_grid_cell(1, 10).unwrap(), 31);
        assert_eq!(index_for_grid_cell(9, 10).unwrap(), 39);
    }

    #[test]
    fn test_interior_and_outside_rejected() {
        assert!(matches!(
            index_for_grid_cell(5, 5),
            Err(SimError::NotOnPerimeter { row: 5, col: 5 })
        ));
        assert!(index_for_grid_cell(1, 1).is_err());
        assert!(index_for_grid_cell(11, 0).is_err());
        assert!(index_for_grid_cell(0, 11).is_err());
    }

    #[test]
    fn test_perimeter_is_bijection() {
        let mut seen = [false; BOARD_SPACES];
        let mut count = 0;
        for (_, index) in perimeter_cells() {
            assert!(index < BOARD_SPACES);
            assert!(!seen[index], "index {} mapped twice", index);
            seen[index] = true;
            count += 1;
        }
        assert_eq!(count, PERIMETER_CELLS);
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_out_of_range_index() {
        assert!(matches!(
            grid_cell_for_index(40),
            Err(SimError::SpaceOutOfRange { index: 40 })
        ));
    }

    #[test]
    fn test_token_offset_centers_token() {
        let layout = BoardLayout::new(50.0);
        // Space 0 is the bottom-right cell (10, 10)
        let center = layout.cell_center(0).unwrap();
        assert_eq!(center, Vec2::new(525.0, 525.0));
        let offset = layout.token_offset(0, 20.0).unwrap();
        assert_eq!(offset, Vec2::new(515.0, 515.0));
        assert_eq!(layout.board_size(), 550.0);
    }

    proptest! {
        #[test]
        fn prop_index_round_trips(index in 0usize..BOARD_SPACES) {
            let cell = grid_cell_for_index(index).unwrap();
            prop_assert!(is_perimeter(cell.row, cell.col));
            prop_assert_eq!(index_for_grid_cell(cell.row, cell.col).unwrap(), index);
        }

        #[test]
        fn prop_only_edges_are_spaces(row in 0usize..GRID_SIZE, col in 0usize..GRID_SIZE) {
            let edge = row == 0 || row == 10 || col == 0 || col == 10;
            prop_assert_eq!(index_for_grid_cell(row, col).is_ok(), edge);
        }
    }
}
