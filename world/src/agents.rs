//! Agent records owned by the world.

use fire_rescue_core::{AgentId, AgentSnapshot, CellCoord, Role};

#[derive(Clone, Debug)]
pub(crate) struct Agent {
    pub(crate) id: AgentId,
    pub(crate) role: Role,
    pub(crate) cell: CellCoord,
    pub(crate) stored_ap: u8,
    pub(crate) carrying_victim: bool,
    pub(crate) target: Option<CellCoord>,
}

impl Agent {
    pub(crate) fn new(id: AgentId, role: Role, cell: CellCoord, stored_ap: u8) -> Self {
        Self {
            id,
            role,
            cell,
            stored_ap,
            carrying_victim: false,
            target: None,
        }
    }

    pub(crate) fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            role: self.role,
            cell: self.cell,
            stored_ap: self.stored_ap,
            carrying_victim: self.carrying_victim,
            target: self.target,
        }
    }

    /// Grants the per-turn allowance; anything above the ceiling is dropped.
    pub(crate) fn grant(&mut self, amount: u8, ceiling: u8) {
        self.stored_ap = self.stored_ap.saturating_add(amount).min(ceiling);
    }

    /// Deducts a price the caller has already checked is affordable.
    pub(crate) fn spend(&mut self, cost: u8) {
        debug_assert!(cost <= self.stored_ap, "spending more AP than stored");
        self.stored_ap = self.stored_ap.saturating_sub(cost);
    }
}
