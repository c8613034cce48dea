//! Validation and execution of agent actions.
//!
//! Every handler checks the whole action, including its price, before it
//! mutates anything, so a rejected command leaves the world untouched.

use fire_rescue_core::{
    ActionError, AgentAction, AgentId, CellCoord, Direction, DoorKey, DoorState, Event,
    HazardLevel, Poi, PoiKind, Role,
};
use log::{debug, info};

use crate::{topology::Edge, World};

/// Accepted action together with the action points it consumed.
pub(crate) type Performed = (AgentAction, u8);

impl World {
    /// Runs an agent action and reports either its effect or its rejection.
    pub(crate) fn act<F>(&mut self, agent: AgentId, out_events: &mut Vec<Event>, action: F)
    where
        F: FnOnce(&mut World, usize, &mut Vec<Event>) -> Result<Performed, ActionError>,
    {
        let Some(index) = self.agent_index(agent) else {
            out_events.push(Event::CommandRejected {
                agent: Some(agent),
                reason: ActionError::UnknownAgent,
            });
            return;
        };

        match action(self, index, out_events) {
            Ok((action, ap_spent)) => {
                let ap_remaining = self.agents[index].stored_ap;
                debug!(
                    "agent {} {action:?} for {ap_spent} AP ({ap_remaining} left)",
                    agent.get()
                );
                out_events.push(Event::AgentActed {
                    agent,
                    action,
                    ap_spent,
                    ap_remaining,
                });
            }
            Err(reason) => {
                debug!("agent {} rejected: {reason}", agent.get());
                out_events.push(Event::CommandRejected {
                    agent: Some(agent),
                    reason,
                });
            }
        }
    }

    fn afford(&self, index: usize, cost: u8) -> Result<(), ActionError> {
        let available = self.agents[index].stored_ap;
        if cost > available {
            return Err(ActionError::InsufficientAp {
                required: cost,
                available,
            });
        }
        Ok(())
    }

    /// Direction and edge between the agent's cell and an adjacent cell.
    fn adjacent_edge(
        &self,
        index: usize,
        toward: CellCoord,
    ) -> Result<(Direction, Edge), ActionError> {
        if !self.topology.contains(toward) {
            return Err(ActionError::OutOfBounds);
        }
        let from = self.agents[index].cell;
        let direction = Direction::between(from, toward).ok_or(ActionError::NotAdjacent)?;
        let edge = self
            .topology
            .edge(from, direction)
            .map_err(|_| ActionError::OutOfBounds)?;
        Ok((direction, edge))
    }

    pub(crate) fn extinguish(
        &mut self,
        index: usize,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<Performed, ActionError> {
        if cell != self.agents[index].cell {
            let (_, edge) = self.adjacent_edge(index, cell)?;
            if !edge.transmits() {
                return Err(ActionError::Blocked);
            }
        }

        let level = self.hazards.level(cell).ok_or(ActionError::OutOfBounds)?;
        let cost = match level {
            HazardLevel::Clear => return Err(ActionError::NothingToExtinguish),
            HazardLevel::Smoke => self.rules.extinguish_smoke_cost,
            HazardLevel::Fire => self.rules.extinguish_fire_cost,
        };
        self.afford(index, cost)?;

        self.agents[index].spend(cost);
        self.set_hazard(cell, HazardLevel::Clear, out_events);
        Ok((AgentAction::Extinguish { cell, cleared: level }, cost))
    }

    pub(crate) fn set_door_by_agent(
        &mut self,
        index: usize,
        toward: CellCoord,
        open: bool,
        out_events: &mut Vec<Event>,
    ) -> Result<Performed, ActionError> {
        let (_, edge) = self.adjacent_edge(index, toward)?;
        let (from_state, to_state, cost) = if open {
            (DoorState::Closed, DoorState::Open, self.rules.open_door_cost)
        } else {
            (DoorState::Open, DoorState::Closed, self.rules.close_door_cost)
        };

        match edge {
            Edge::Door(DoorState::Destroyed) => return Err(ActionError::DoorDestroyed),
            Edge::Door(state) if state == from_state => {}
            Edge::Door(_) => return Err(ActionError::DoorUnchanged),
            Edge::Open | Edge::Wall | Edge::Boundary => return Err(ActionError::NoDoor),
        }
        self.afford(index, cost)?;

        self.agents[index].spend(cost);
        let door = DoorKey::new(self.agents[index].cell, toward);
        self.topology.set_door(door, to_state);
        out_events.push(Event::DoorChanged {
            door,
            state: to_state,
        });

        let action = if open {
            AgentAction::OpenDoor { door }
        } else {
            AgentAction::CloseDoor { door }
        };
        Ok((action, cost))
    }

    pub(crate) fn breach_wall(
        &mut self,
        index: usize,
        toward: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<Performed, ActionError> {
        let (direction, edge) = self.adjacent_edge(index, toward)?;
        if edge != Edge::Wall {
            return Err(ActionError::NoWall);
        }
        let cost = self.rules.breach_cost;
        self.afford(index, cost)?;

        self.agents[index].spend(cost);
        let cell = self.agents[index].cell;
        self.strike_wall(cell, direction, out_events);
        Ok((AgentAction::BreachWall { cell, direction }, cost))
    }

    pub(crate) fn move_agent(
        &mut self,
        index: usize,
        to: CellCoord,
    ) -> Result<Performed, ActionError> {
        let (_, edge) = self.adjacent_edge(index, to)?;
        if !edge.transmits() {
            return Err(ActionError::Blocked);
        }
        let cost = self.rules.step_cost(self.agents[index].carrying_victim);
        self.afford(index, cost)?;

        let agent = &mut self.agents[index];
        agent.spend(cost);
        let from = agent.cell;
        agent.cell = to;
        Ok((AgentAction::Move { from, to }, cost))
    }

    pub(crate) fn reveal_poi(
        &mut self,
        index: usize,
        out_events: &mut Vec<Event>,
    ) -> Result<Performed, ActionError> {
        let agent = &self.agents[index];
        if agent.role != Role::Rescuer {
            return Err(ActionError::WrongRole);
        }
        let cell = agent.cell;
        let poi = self
            .pois
            .get(cell)
            .filter(|poi| !poi.revealed)
            .ok_or(ActionError::NoPoi)?;
        let cost = self.rules.reveal_cost;
        self.afford(index, cost)?;

        self.agents[index].spend(cost);
        let revealed = match poi.kind {
            PoiKind::FalseAlarm => None,
            PoiKind::Victim => Some(Poi {
                kind: PoiKind::Victim,
                revealed: true,
            }),
        };
        self.pois.put(cell, revealed);
        out_events.push(Event::PoiChanged {
            cell,
            poi: revealed,
        });
        let action = AgentAction::RevealPoi {
            cell,
            kind: poi.kind,
        };
        Ok((action, cost))
    }

    pub(crate) fn pick_up_victim(
        &mut self,
        index: usize,
        out_events: &mut Vec<Event>,
    ) -> Result<Performed, ActionError> {
        let agent = &self.agents[index];
        if agent.role != Role::Rescuer {
            return Err(ActionError::WrongRole);
        }
        if agent.carrying_victim {
            return Err(ActionError::AlreadyCarrying);
        }
        let cell = agent.cell;
        let lying = self
            .pois
            .get(cell)
            .is_some_and(|poi| poi.revealed && poi.kind == PoiKind::Victim);
        if !lying {
            return Err(ActionError::NoVictim);
        }

        self.pois.put(cell, None);
        self.agents[index].carrying_victim = true;
        self.victims.on_board = self.victims.on_board.saturating_sub(1);
        self.victims.carried += 1;
        out_events.push(Event::PoiChanged { cell, poi: None });
        Ok((AgentAction::PickUpVictim { cell }, 0))
    }

    pub(crate) fn deliver_victim(
        &mut self,
        index: usize,
        out_events: &mut Vec<Event>,
    ) -> Result<Performed, ActionError> {
        let agent = &self.agents[index];
        if !agent.carrying_victim {
            return Err(ActionError::NotCarrying);
        }
        let cell = agent.cell;
        if !self.is_exit(cell) {
            return Err(ActionError::NotAtExit);
        }

        self.agents[index].carrying_victim = false;
        self.victims.carried = self.victims.carried.saturating_sub(1);
        self.victims.rescued += 1;
        info!("victim rescued at {cell}");
        out_events.push(Event::VictimRescued { cell });
        Ok((AgentAction::DeliverVictim { cell }, 0))
    }

    /// Relocates an agent to an exit for free. A carried victim does not
    /// survive the knockdown.
    pub(crate) fn escape(
        &mut self,
        index: usize,
        to: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<Performed, ActionError> {
        if !self.topology.contains(to) {
            return Err(ActionError::OutOfBounds);
        }
        if !self.is_exit(to) {
            return Err(ActionError::NotAtExit);
        }

        let agent = &mut self.agents[index];
        let from = agent.cell;
        agent.cell = to;
        agent.target = None;
        if agent.carrying_victim {
            agent.carrying_victim = false;
            self.victims.carried = self.victims.carried.saturating_sub(1);
            self.victims.lost += 1;
            info!(
                "carried victim lost when agent {} was knocked down",
                agent.id.get()
            );
            out_events.push(Event::VictimLost { cell: from });
        }
        Ok((AgentAction::Escape { from, to }, 0))
    }
}
