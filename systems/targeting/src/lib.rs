#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Target selection for agents.
//!
//! Suppressors share a [`TargetRegistry`] so that no two of them chase the
//! same hazard. Rescuers pick their own targets through
//! [`select_rescuer_target`] and never touch the registry.

use std::collections::BTreeMap;

use fire_rescue_core::{AgentId, AgentSnapshot, CellCoord, GridError};
use fire_rescue_system_navigation::{PathCost, PathPlanner};
use fire_rescue_world::{query, World};
use log::debug;

/// Exclusive hazard claims held by suppressor agents.
///
/// Every agent holds at most one claim and every cell is claimed by at most
/// one agent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetRegistry {
    claims: BTreeMap<AgentId, CellCoord>,
}

impl TargetRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell claimed by the agent, if any.
    #[must_use]
    pub fn claim_of(&self, agent: AgentId) -> Option<CellCoord> {
        self.claims.get(&agent).copied()
    }

    /// Agent holding a claim on the cell, if any.
    #[must_use]
    pub fn claimant(&self, cell: CellCoord) -> Option<AgentId> {
        self.claims
            .iter()
            .find(|(_, claimed)| **claimed == cell)
            .map(|(agent, _)| *agent)
    }

    /// Records a claim, replacing the agent's previous one.
    ///
    /// Fails without changes when another agent already claims the cell.
    pub fn claim(&mut self, agent: AgentId, cell: CellCoord) -> bool {
        match self.claimant(cell) {
            Some(holder) if holder != agent => false,
            _ => {
                let _ = self.claims.insert(agent, cell);
                true
            }
        }
    }

    /// Drops the agent's claim and returns the released cell.
    pub fn release(&mut self, agent: AgentId) -> Option<CellCoord> {
        self.claims.remove(&agent)
    }

    /// Releases every claim on a cell that no longer holds smoke or fire.
    pub fn prune_stale(&mut self, world: &World) -> usize {
        let before = self.claims.len();
        self.claims.retain(|agent, cell| {
            let live = query::hazard(world, *cell).is_ok_and(|level| level.is_hazard());
            if !live {
                debug!("agent {} released stale claim on {cell}", agent.get());
            }
            live
        });
        before - self.claims.len()
    }

    /// Claims the cheapest reachable hazard nobody else holds.
    ///
    /// An agent whose current claim is still live keeps it. Candidates are
    /// ranked by path cost from the agent's cell; ties go to the earlier cell
    /// in [`query::hazard_targets`] order (fire before smoke, row-major).
    pub fn assign_nearest(
        &mut self,
        world: &World,
        planner: &PathPlanner,
        agent: &AgentSnapshot,
    ) -> Result<Option<CellCoord>, GridError> {
        if let Some(current) = self.claim_of(agent.id) {
            if query::hazard(world, current)?.is_hazard() {
                return Ok(Some(current));
            }
            let _ = self.release(agent.id);
        }

        let candidates: Vec<CellCoord> = query::hazard_targets(world)
            .into_iter()
            .filter(|cell| self.claimant(*cell).is_none())
            .collect();
        let best = cheapest(world, planner, agent, &candidates)?;

        if let Some(cell) = best {
            let _ = self.claim(agent.id, cell);
            debug!("agent {} claimed hazard at {cell}", agent.id.get());
        }
        Ok(best)
    }

    /// Number of live claims.
    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Reports whether no claims are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Claims in ascending agent order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, CellCoord)> + '_ {
        self.claims.iter().map(|(agent, cell)| (*agent, *cell))
    }
}

/// Destination of a rescuer.
///
/// A rescuer carrying a victim heads for the cheapest exit. Otherwise it
/// heads for the cheapest point of interest, revealed victims included.
/// Ties go to the earlier cell in row-major order for points of interest and
/// to the earlier entry in the layout for exits.
pub fn select_rescuer_target(
    world: &World,
    planner: &PathPlanner,
    agent: &AgentSnapshot,
) -> Result<Option<CellCoord>, GridError> {
    let candidates: Vec<CellCoord> = if agent.carrying_victim {
        query::entry_points(world).to_vec()
    } else {
        query::poi_cells(world)
            .into_iter()
            .map(|(cell, _)| cell)
            .collect()
    };
    cheapest(world, planner, agent, &candidates)
}

fn cheapest(
    world: &World,
    planner: &PathPlanner,
    agent: &AgentSnapshot,
    candidates: &[CellCoord],
) -> Result<Option<CellCoord>, GridError> {
    let topology = query::topology(world);
    let mut best: Option<(PathCost, CellCoord)> = None;

    for &cell in candidates {
        let cost = planner.path_cost(topology, agent.cell, cell, agent.carrying_victim)?;
        if !cost.is_reachable() {
            continue;
        }
        if best.map_or(true, |(best_cost, _)| cost < best_cost) {
            best = Some((cost, cell));
        }
    }

    Ok(best.map(|(_, cell)| cell))
}
