#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Fire Rescue.
//!
//! The world owns the building topology, the hazard field, wall damage, the
//! points of interest and the agents. It holds no random number generator:
//! every random choice arrives as an explicit [`Command`], which keeps the
//! state a pure function of the command stream.

mod actions;
mod agents;
mod damage;
mod grid;
mod hazard;
mod ignition;
mod pois;
mod topology;

pub use topology::{DoorPolicy, Edge, Neighbors, Topology};

use fire_rescue_core::{
    ActionError, AgentId, CellCoord, Command, Event, HazardLevel, Layout, LayoutError, Poi,
    PoiKind, Rules, VictimLedger,
};
use log::debug;

use crate::{agents::Agent, damage::DamageTracker, hazard::HazardField, pois::PoiLayer};

/// Represents the authoritative Fire Rescue world state.
#[derive(Clone, Debug)]
pub struct World {
    rules: Rules,
    topology: Topology,
    hazards: HazardField,
    damage: DamageTracker,
    pois: PoiLayer,
    entry_points: Vec<CellCoord>,
    agents: Vec<Agent>,
    next_agent_id: u32,
    victims: VictimLedger,
}

impl World {
    /// Creates a world seeded from a validated layout.
    ///
    /// Scenario points of interest count as placed victims but do not draw
    /// from the replenishment pools.
    pub fn new(layout: &Layout, rules: Rules) -> Result<Self, LayoutError> {
        let topology = Topology::from_layout(layout)?;
        let shape = topology.shape();
        let mut world = Self {
            hazards: HazardField::new(shape),
            damage: DamageTracker::new(shape),
            pois: PoiLayer::new(shape, rules.victim_pool, rules.false_alarm_pool),
            entry_points: layout.entry_points.clone(),
            agents: Vec::new(),
            next_agent_id: 0,
            victims: VictimLedger::default(),
            topology,
            rules,
        };

        for &cell in &layout.fires {
            let _ = world.hazards.set(cell, HazardLevel::Fire);
        }

        for placement in &layout.pois {
            world.pois.put(placement.cell, Some(Poi::hidden(placement.kind)));
            if placement.kind == PoiKind::Victim {
                world.victims.placed += 1;
                world.victims.on_board += 1;
            }
        }

        Ok(world)
    }

    fn agent_index(&self, agent: AgentId) -> Option<usize> {
        self.agents.iter().position(|candidate| candidate.id == agent)
    }

    fn is_exit(&self, cell: CellCoord) -> bool {
        self.entry_points.contains(&cell)
    }

    fn place_poi(&mut self, cell: CellCoord, kind: PoiKind) -> Result<(), ActionError> {
        if !self.topology.contains(cell) {
            return Err(ActionError::OutOfBounds);
        }
        if self.pois.get(cell).is_some() {
            return Err(ActionError::CellOccupied);
        }
        if !self.pois.draw(kind) {
            return Err(ActionError::PoolExhausted);
        }

        self.pois.put(cell, Some(Poi::hidden(kind)));
        if kind == PoiKind::Victim {
            self.victims.placed += 1;
            self.victims.on_board += 1;
        }
        Ok(())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Refused commands leave the world untouched and report
/// [`Event::CommandRejected`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SpawnAgent { role, cell } => {
            if !world.topology.contains(cell) {
                reject(out_events, None, ActionError::OutOfBounds);
                return;
            }
            let agent = AgentId::new(world.next_agent_id);
            world.next_agent_id += 1;
            world
                .agents
                .push(Agent::new(agent, role, cell, world.rules.starting_ap));
            debug!("agent {} ({role:?}) entered at {cell}", agent.get());
            out_events.push(Event::AgentSpawned { agent, role, cell });
        }
        Command::BeginTurn { agent } => {
            let Some(index) = world.agent_index(agent) else {
                reject(out_events, Some(agent), ActionError::UnknownAgent);
                return;
            };
            let record = &mut world.agents[index];
            record.grant(world.rules.ap_per_turn, world.rules.max_ap);
            out_events.push(Event::TurnStarted {
                agent,
                stored_ap: record.stored_ap,
            });
        }
        Command::AssignTarget { agent, target } => {
            let Some(index) = world.agent_index(agent) else {
                reject(out_events, Some(agent), ActionError::UnknownAgent);
                return;
            };
            if target.is_some_and(|cell| !world.topology.contains(cell)) {
                reject(out_events, Some(agent), ActionError::OutOfBounds);
                return;
            }
            world.agents[index].target = target;
            out_events.push(Event::TargetAssigned { agent, target });
        }
        Command::Extinguish { agent, cell } => {
            world.act(agent, out_events, |world, index, events| {
                world.extinguish(index, cell, events)
            });
        }
        Command::OpenDoor { agent, toward } => {
            world.act(agent, out_events, |world, index, events| {
                world.set_door_by_agent(index, toward, true, events)
            });
        }
        Command::CloseDoor { agent, toward } => {
            world.act(agent, out_events, |world, index, events| {
                world.set_door_by_agent(index, toward, false, events)
            });
        }
        Command::BreachWall { agent, toward } => {
            world.act(agent, out_events, |world, index, events| {
                world.breach_wall(index, toward, events)
            });
        }
        Command::Move { agent, to } => {
            world.act(agent, out_events, |world, index, _| {
                world.move_agent(index, to)
            });
        }
        Command::RevealPoi { agent } => {
            world.act(agent, out_events, |world, index, events| {
                world.reveal_poi(index, events)
            });
        }
        Command::PickUpVictim { agent } => {
            world.act(agent, out_events, |world, index, events| {
                world.pick_up_victim(index, events)
            });
        }
        Command::DeliverVictim { agent } => {
            world.act(agent, out_events, |world, index, events| {
                world.deliver_victim(index, events)
            });
        }
        Command::Escape { agent, to } => {
            world.act(agent, out_events, |world, index, events| {
                world.escape(index, to, events)
            });
        }
        Command::Ignite { cell } => world.ignite(cell, out_events),
        Command::ResolveSmoke => world.resolve_smoke(out_events),
        Command::PlacePoi { cell, kind } => match world.place_poi(cell, kind) {
            Ok(()) => {
                debug!("{kind:?} marker placed at {cell}");
                out_events.push(Event::PoiChanged {
                    cell,
                    poi: Some(Poi::hidden(kind)),
                });
            }
            Err(reason) => reject(out_events, None, reason),
        },
    }
}

fn reject(out_events: &mut Vec<Event>, agent: Option<AgentId>, reason: ActionError) {
    out_events.push(Event::CommandRejected { agent, reason });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use fire_rescue_core::{
        AgentId, AgentSnapshot, CellChange, CellCoord, Counters, DamageCounter, DoorChange,
        GridError, HazardLevel, Outcome, Poi, PoiKind, Rules, VictimLedger, WallMask,
    };
    use serde::{Deserialize, Serialize};

    use super::{Topology, World};

    /// Number of columns and rows of the grid.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.topology.width(), world.topology.height())
    }

    /// Rule set the world was created with.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Provides read-only access to the wall and door graph.
    #[must_use]
    pub fn topology(world: &World) -> &Topology {
        &world.topology
    }

    /// Hazard level of a cell.
    pub fn hazard(world: &World, cell: CellCoord) -> Result<HazardLevel, GridError> {
        let _ = world.topology.shape().checked_index(cell)?;
        Ok(world.hazards.level(cell).unwrap_or_default())
    }

    /// Every hazard cell: burning cells first, then smoky ones, each in
    /// row-major order. Target ties are broken in this order.
    #[must_use]
    pub fn hazard_targets(world: &World) -> Vec<CellCoord> {
        world
            .hazards
            .cells_at(HazardLevel::Fire)
            .chain(world.hazards.cells_at(HazardLevel::Smoke))
            .collect()
    }

    /// Point of interest lying on a cell.
    pub fn poi(world: &World, cell: CellCoord) -> Result<Option<Poi>, GridError> {
        let _ = world.topology.shape().checked_index(cell)?;
        Ok(world.pois.get(cell))
    }

    /// Every point of interest on the board in row-major order.
    #[must_use]
    pub fn poi_cells(world: &World) -> Vec<(CellCoord, Poi)> {
        world.pois.occupied().collect()
    }

    /// Markers left in the replenishment pool of the provided kind.
    #[must_use]
    pub fn pool(world: &World, kind: PoiKind) -> u32 {
        world.pois.pool(kind)
    }

    /// Points of interest still in play: markers on the board plus carried
    /// victims.
    #[must_use]
    pub fn outstanding_pois(world: &World) -> u32 {
        let on_board = u32::try_from(world.pois.count()).unwrap_or(u32::MAX);
        on_board.saturating_add(world.victims.carried)
    }

    /// Damage counter of a cell.
    pub fn damage(world: &World, cell: CellCoord) -> Result<DamageCounter, GridError> {
        let _ = world.topology.shape().checked_index(cell)?;
        Ok(world.damage.counter(cell).unwrap_or_default())
    }

    /// Global counters that decide the end of the game.
    #[must_use]
    pub fn counters(world: &World) -> Counters {
        Counters {
            damage_points: world.damage.damage_points(),
            people_rescued: world.victims.rescued,
            people_lost: world.victims.lost,
        }
    }

    /// Accounting of every victim placed so far.
    #[must_use]
    pub fn victim_ledger(world: &World) -> VictimLedger {
        world.victims
    }

    /// Snapshot of a single agent.
    #[must_use]
    pub fn agent(world: &World, agent: AgentId) -> Option<AgentSnapshot> {
        world
            .agents
            .iter()
            .find(|candidate| candidate.id == agent)
            .map(|candidate| candidate.snapshot())
    }

    /// Snapshots of every agent in ascending identifier order.
    #[must_use]
    pub fn agents(world: &World) -> Vec<AgentSnapshot> {
        let mut snapshots: Vec<AgentSnapshot> =
            world.agents.iter().map(|agent| agent.snapshot()).collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Cells where agents enter and victims leave.
    #[must_use]
    pub fn entry_points(world: &World) -> &[CellCoord] {
        &world.entry_points
    }

    /// Reports whether the cell is an entry point.
    #[must_use]
    pub fn is_exit(world: &World, cell: CellCoord) -> bool {
        world.is_exit(cell)
    }

    /// Cells inside the outer ring in row-major order.
    #[must_use]
    pub fn interior_cells(world: &World) -> Vec<CellCoord> {
        let shape = world.topology.shape();
        shape.cells().filter(|cell| shape.is_interior(*cell)).collect()
    }

    /// Terminal result, if the game is over.
    ///
    /// Collapse is checked first, then lost victims, then victory, so a round
    /// meeting several conditions ends in the first one.
    #[must_use]
    pub fn outcome(world: &World) -> Option<Outcome> {
        let counters = counters(world);
        let rules = &world.rules;
        if counters.damage_points >= rules.damage_limit {
            Some(Outcome::StructuralCollapse)
        } else if counters.people_lost >= rules.lost_limit {
            Some(Outcome::VictimsLost)
        } else if counters.people_rescued >= rules.rescue_target {
            Some(Outcome::Victory)
        } else {
            None
        }
    }

    /// Captures the complete observable state of the world.
    #[must_use]
    pub fn snapshot(world: &World) -> WorldSnapshot {
        let (width, height) = dimensions(world);
        WorldSnapshot {
            width,
            height,
            walls: world.topology.masks().to_vec(),
            damage: world.damage.counters().to_vec(),
            hazards: world.hazards.levels().to_vec(),
            points_of_interest: world
                .pois
                .occupied()
                .map(|(position, poi)| CellChange {
                    position,
                    new_value: poi,
                })
                .collect(),
            doors: world
                .topology
                .doors()
                .map(|(position, new_value)| DoorChange {
                    position,
                    new_value,
                })
                .collect(),
            entry_points: world.entry_points.clone(),
            counters: counters(world),
            agents: agents(world),
            outcome: outcome(world),
        }
    }

    /// Full observable state, the first message of the state feed.
    ///
    /// Per-cell vectors are stored in row-major order.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct WorldSnapshot {
        /// Number of grid columns.
        pub width: u32,
        /// Number of grid rows.
        pub height: u32,
        /// Wall mask of every cell.
        pub walls: Vec<WallMask>,
        /// Damage counter of every cell.
        pub damage: Vec<DamageCounter>,
        /// Hazard level of every cell.
        pub hazards: Vec<HazardLevel>,
        /// Points of interest on the board.
        pub points_of_interest: Vec<CellChange<Poi>>,
        /// Every door with its state.
        pub doors: Vec<DoorChange>,
        /// Cells where agents enter and victims leave.
        pub entry_points: Vec<CellCoord>,
        /// Global counters.
        pub counters: Counters,
        /// Every agent.
        pub agents: Vec<AgentSnapshot>,
        /// Terminal result, if any.
        pub outcome: Option<Outcome>,
    }
}
