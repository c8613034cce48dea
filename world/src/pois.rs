//! Points of interest on the board and the pools feeding replenishment.

use fire_rescue_core::{CellCoord, Poi, PoiKind};

use crate::grid::GridShape;

#[derive(Clone, Debug)]
pub(crate) struct PoiLayer {
    shape: GridShape,
    markers: Vec<Option<Poi>>,
    victim_pool: u32,
    false_alarm_pool: u32,
}

impl PoiLayer {
    pub(crate) fn new(shape: GridShape, victim_pool: u32, false_alarm_pool: u32) -> Self {
        Self {
            shape,
            markers: vec![None; shape.cell_count()],
            victim_pool,
            false_alarm_pool,
        }
    }

    pub(crate) fn get(&self, cell: CellCoord) -> Option<Poi> {
        self.shape
            .index(cell)
            .and_then(|index| self.markers.get(index).copied().flatten())
    }

    pub(crate) fn put(&mut self, cell: CellCoord, poi: Option<Poi>) {
        if let Some(slot) = self
            .shape
            .index(cell)
            .and_then(|index| self.markers.get_mut(index))
        {
            *slot = poi;
        }
    }

    /// Cells holding a marker, in row-major order.
    pub(crate) fn occupied(&self) -> impl Iterator<Item = (CellCoord, Poi)> + '_ {
        self.shape
            .cells()
            .zip(self.markers.iter())
            .filter_map(|(cell, marker)| marker.map(|poi| (cell, poi)))
    }

    pub(crate) fn count(&self) -> usize {
        self.markers.iter().filter(|marker| marker.is_some()).count()
    }

    pub(crate) fn pool(&self, kind: PoiKind) -> u32 {
        match kind {
            PoiKind::Victim => self.victim_pool,
            PoiKind::FalseAlarm => self.false_alarm_pool,
        }
    }

    /// Takes one marker out of a pool, failing when the pool is empty.
    pub(crate) fn draw(&mut self, kind: PoiKind) -> bool {
        let pool = match kind {
            PoiKind::Victim => &mut self.victim_pool,
            PoiKind::FalseAlarm => &mut self.false_alarm_pool,
        };
        if *pool == 0 {
            return false;
        }
        *pool -= 1;
        true
    }
}
