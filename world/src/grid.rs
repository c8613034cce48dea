//! Dense row-major addressing shared by every per-cell layer.

use fire_rescue_core::{CellCoord, Direction, GridError};

/// Dimensions of the board and the row-major indexing scheme over them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct GridShape {
    width: u32,
    height: u32,
}

impl GridShape {
    pub(crate) const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub(crate) const fn width(&self) -> u32 {
        self.width
    }

    pub(crate) const fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn cell_count(&self) -> usize {
        let capacity = u64::from(self.width) * u64::from(self.height);
        usize::try_from(capacity).unwrap_or(0)
    }

    pub(crate) fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.width && cell.row() < self.height {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    /// Index of the cell, or the out-of-bounds error callers surface.
    pub(crate) fn checked_index(&self, cell: CellCoord) -> Result<usize, GridError> {
        self.index(cell).ok_or(GridError::OutOfBounds {
            cell,
            width: self.width,
            height: self.height,
        })
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    pub(crate) fn neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        cell.neighbor(direction, self.width, self.height)
    }

    /// Every cell in row-major order.
    pub(crate) fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let width = self.width;
        (0..self.height)
            .flat_map(move |row| (0..width).map(move |column| CellCoord::new(column, row)))
    }

    /// Reports whether the cell lies inside the outer ring.
    pub(crate) fn is_interior(&self, cell: CellCoord) -> bool {
        cell.column() >= 1
            && cell.row() >= 1
            && cell.column() + 1 < self.width
            && cell.row() + 1 < self.height
    }
}
