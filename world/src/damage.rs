//! Per-side wall damage and the aggregate structural score.

use fire_rescue_core::{CellCoord, DamageCounter, Direction};

use crate::grid::GridShape;

/// Outcome of striking one side of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Strike {
    pub(crate) counter: DamageCounter,
    pub(crate) incremented: bool,
}

/// Dense damage counters plus the building-wide damage score.
#[derive(Clone, Debug)]
pub(crate) struct DamageTracker {
    shape: GridShape,
    counters: Vec<DamageCounter>,
    damage_points: u32,
}

impl DamageTracker {
    pub(crate) fn new(shape: GridShape) -> Self {
        Self {
            shape,
            counters: vec![DamageCounter::default(); shape.cell_count()],
            damage_points: 0,
        }
    }

    pub(crate) fn counter(&self, cell: CellCoord) -> Option<DamageCounter> {
        self.shape
            .index(cell)
            .and_then(|index| self.counters.get(index).copied())
    }

    pub(crate) fn counters(&self) -> &[DamageCounter] {
        &self.counters
    }

    pub(crate) fn damage_points(&self) -> u32 {
        self.damage_points
    }

    /// Adds one increment to a side, saturating at the destruction threshold.
    /// Only scored strikes raise the damage score.
    pub(crate) fn strike(
        &mut self,
        cell: CellCoord,
        direction: Direction,
        scored: bool,
    ) -> Option<Strike> {
        let index = self.shape.index(cell)?;
        let before = self.counters[index];
        let after = before.incremented(direction);
        let incremented = after != before;
        self.counters[index] = after;
        if incremented && scored {
            self.damage_points = self.damage_points.saturating_add(1);
        }
        Some(Strike {
            counter: after,
            incremented,
        })
    }
}
