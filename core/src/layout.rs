//! Decoded scenario structures consumed by the world.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellCoord, Direction, DoorKey, PoiKind, WallMask};

/// Point of interest placed by a scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiPlacement {
    /// Cell holding the marker.
    pub cell: CellCoord,
    /// What the marker hides.
    pub kind: PoiKind,
}

/// Fully decoded board description.
///
/// `walls` is stored in row-major order and covers the whole grid, including
/// the outer ring of cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Number of grid columns.
    pub width: u32,
    /// Number of grid rows.
    pub height: u32,
    /// Wall mask of every cell in row-major order.
    pub walls: Vec<WallMask>,
    /// Points of interest on the board at the start.
    pub pois: Vec<PoiPlacement>,
    /// Cells burning at the start.
    pub fires: Vec<CellCoord>,
    /// Doors, all closed at the start.
    pub doors: Vec<DoorKey>,
    /// Cells where agents enter and victims leave.
    pub entry_points: Vec<CellCoord>,
}

impl Layout {
    /// Index of the provided cell inside `walls`.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Checks that every placement fits the grid and that doors join neighbors.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.width < 3 || self.height < 3 {
            return Err(LayoutError::TooSmall {
                width: self.width,
                height: self.height,
            });
        }

        let expected = u64::from(self.width) * u64::from(self.height);
        if self.walls.len() as u64 != expected {
            return Err(LayoutError::WallCount {
                expected,
                found: self.walls.len(),
            });
        }

        let in_bounds = |cell: CellCoord| self.index(cell).is_some();

        for placement in &self.pois {
            if !in_bounds(placement.cell) {
                return Err(LayoutError::OutOfBounds(placement.cell));
            }
        }

        let mut poi_cells = BTreeSet::new();
        for placement in &self.pois {
            if !poi_cells.insert(placement.cell) {
                return Err(LayoutError::DuplicatePoi(placement.cell));
            }
        }

        for &cell in self.fires.iter().chain(self.entry_points.iter()) {
            if !in_bounds(cell) {
                return Err(LayoutError::OutOfBounds(cell));
            }
        }
        if let Some(&cell) = self.fires.iter().find(|cell| poi_cells.contains(*cell)) {
            return Err(LayoutError::FireOnPoi(cell));
        }

        for door in &self.doors {
            for cell in [door.first(), door.second()] {
                if !in_bounds(cell) {
                    return Err(LayoutError::OutOfBounds(cell));
                }
            }
            if Direction::between(door.first(), door.second()).is_none() {
                return Err(LayoutError::DoorNotAdjacent(*door));
            }
        }

        if self.entry_points.is_empty() {
            return Err(LayoutError::NoEntryPoints);
        }

        Ok(())
    }
}

/// Reasons a decoded layout cannot seed a world.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The grid cannot hold an interior and its outer ring.
    #[error("grid of {width}x{height} is too small")]
    TooSmall {
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },
    /// The wall list does not cover the grid exactly.
    #[error("expected {expected} wall masks but found {found}")]
    WallCount {
        /// Cells in the grid.
        expected: u64,
        /// Masks supplied.
        found: usize,
    },
    /// A placement lies outside the grid.
    #[error("cell {0} lies outside the grid")]
    OutOfBounds(CellCoord),
    /// Two points of interest share a cell.
    #[error("cell {0} holds more than one point of interest")]
    DuplicatePoi(CellCoord),
    /// An initial fire would start on a point of interest.
    #[error("cell {0} starts burning while holding a point of interest")]
    FireOnPoi(CellCoord),
    /// A door joins cells that are not orthogonal neighbors.
    #[error("door between {} and {} joins non-adjacent cells", .0.first(), .0.second())]
    DoorNotAdjacent(DoorKey),
    /// Agents would have nowhere to enter.
    #[error("layout declares no entry points")]
    NoEntryPoints,
}
