//! Per-cell smoke and fire state.

use fire_rescue_core::{CellCoord, Direction, HazardLevel};

use crate::{grid::GridShape, topology::Topology};

#[derive(Clone, Debug)]
pub(crate) struct HazardField {
    shape: GridShape,
    levels: Vec<HazardLevel>,
}

impl HazardField {
    pub(crate) fn new(shape: GridShape) -> Self {
        Self {
            shape,
            levels: vec![HazardLevel::Clear; shape.cell_count()],
        }
    }

    pub(crate) fn level(&self, cell: CellCoord) -> Option<HazardLevel> {
        self.shape
            .index(cell)
            .and_then(|index| self.levels.get(index).copied())
    }

    pub(crate) fn levels(&self) -> &[HazardLevel] {
        &self.levels
    }

    /// Stores a new level and reports whether the cell changed.
    pub(crate) fn set(&mut self, cell: CellCoord, level: HazardLevel) -> bool {
        let Some(slot) = self
            .shape
            .index(cell)
            .and_then(|index| self.levels.get_mut(index))
        else {
            return false;
        };
        if *slot == level {
            return false;
        }
        *slot = level;
        true
    }

    /// Cells holding the provided level in row-major order.
    pub(crate) fn cells_at(&self, level: HazardLevel) -> impl Iterator<Item = CellCoord> + '_ {
        self.shape
            .cells()
            .zip(self.levels.iter())
            .filter(move |(_, current)| **current == level)
            .map(|(cell, _)| cell)
    }

    /// Smoke cells that touch fire through a transmitting edge.
    ///
    /// The scan reads the field as it stands, so a conversion never feeds
    /// another conversion within the same pass.
    pub(crate) fn smoke_touching_fire(&self, topology: &Topology) -> Vec<CellCoord> {
        self.cells_at(HazardLevel::Smoke)
            .filter(|&cell| {
                Direction::ALL.into_iter().any(|direction| {
                    let transmits = topology
                        .edge(cell, direction)
                        .is_ok_and(|edge| edge.transmits());
                    transmits
                        && self
                            .shape
                            .neighbor(cell, direction)
                            .and_then(|neighbor| self.level(neighbor))
                            == Some(HazardLevel::Fire)
                })
            })
            .collect()
    }
}
