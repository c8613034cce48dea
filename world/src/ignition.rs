//! Ignition, explosion shockwaves, smoke conversion and wall damage.

use std::collections::BTreeSet;

use fire_rescue_core::{
    ActionError, CellCoord, Direction, DoorKey, DoorState, Event, HazardLevel, PoiKind,
};
use log::{debug, info};

use crate::{topology::Edge, World};

impl World {
    /// Advances the hazard on a cell by one stage, exploding it when it
    /// already burns.
    pub(crate) fn ignite(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let Some(level) = self.hazards.level(cell) else {
            out_events.push(Event::CommandRejected {
                agent: None,
                reason: ActionError::OutOfBounds,
            });
            return;
        };

        info!("ignition at {cell} ({level:?})");
        match level {
            HazardLevel::Clear => self.set_hazard(cell, HazardLevel::Smoke, out_events),
            HazardLevel::Smoke => self.set_hazard(cell, HazardLevel::Fire, out_events),
            HazardLevel::Fire => self.explode(cell, out_events),
        }
    }

    /// Resolves an explosion centred on `origin`.
    ///
    /// Each direction runs to completion before the next one starts, in
    /// north, west, south, east order. A shockwave keeps travelling through
    /// burning cells and stops at the first cell it ignites, at a wall or
    /// closed door it damages, or at the grid boundary.
    pub(crate) fn explode(&mut self, origin: CellCoord, out_events: &mut Vec<Event>) {
        info!("explosion at {origin}");
        out_events.push(Event::Explosion { cell: origin });

        let mut pending: Vec<(CellCoord, Direction)> = Direction::ALL
            .iter()
            .rev()
            .map(|direction| (origin, *direction))
            .collect();
        let mut visited = BTreeSet::new();

        while let Some((cell, direction)) = pending.pop() {
            if !visited.insert((cell, direction)) {
                continue;
            }

            let Ok(edge) = self.topology.edge(cell, direction) else {
                continue;
            };
            let neighbor = self.topology.shape().neighbor(cell, direction);

            match (edge, neighbor) {
                (Edge::Boundary, _) | (_, None) => {}
                (Edge::Wall, Some(_)) => self.strike_wall(cell, direction, out_events),
                (Edge::Door(DoorState::Closed), Some(next)) => {
                    let door = DoorKey::new(cell, next);
                    debug!("shockwave destroyed door {} - {}", door.first(), door.second());
                    self.topology.set_door(door, DoorState::Destroyed);
                    out_events.push(Event::DoorChanged {
                        door,
                        state: DoorState::Destroyed,
                    });
                }
                (Edge::Open | Edge::Door(_), Some(next)) => match self.hazards.level(next) {
                    Some(HazardLevel::Fire) => {
                        out_events.push(Event::Explosion { cell: next });
                        pending.push((next, direction));
                    }
                    Some(_) => self.set_hazard(next, HazardLevel::Fire, out_events),
                    None => {}
                },
            }
        }
    }

    /// Turns every smoke cell touching fire into fire, one hop only.
    pub(crate) fn resolve_smoke(&mut self, out_events: &mut Vec<Event>) {
        let conversions = self.hazards.smoke_touching_fire(&self.topology);
        if !conversions.is_empty() {
            debug!("{} smoke cells turned to fire", conversions.len());
        }
        for cell in conversions {
            self.set_hazard(cell, HazardLevel::Fire, out_events);
        }
    }

    /// Applies one damage increment to the wall on the provided side of a
    /// cell and to its facing side. Only the struck side is scored. The wall
    /// falls once the struck side reaches the destruction threshold.
    pub(crate) fn strike_wall(
        &mut self,
        cell: CellCoord,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) {
        let Some(strike) = self.damage.strike(cell, direction, true) else {
            return;
        };
        if strike.incremented {
            out_events.push(Event::DamageChanged {
                cell,
                counter: strike.counter,
            });
        }

        if let Some(neighbor) = self.topology.shape().neighbor(cell, direction) {
            if let Some(facing) = self.damage.strike(neighbor, direction.opposite(), false) {
                if facing.incremented {
                    out_events.push(Event::DamageChanged {
                        cell: neighbor,
                        counter: facing.counter,
                    });
                }
            }
        }

        if strike.counter.is_broken(direction) {
            debug!("wall {direction:?} of {cell} collapsed");
            for (changed, mask) in self.topology.remove_wall(cell, direction) {
                out_events.push(Event::WallChanged {
                    cell: changed,
                    mask,
                });
            }
        }
    }

    /// Stores a hazard level. A cell that catches fire destroys its point of
    /// interest and reports every agent standing on it.
    pub(crate) fn set_hazard(
        &mut self,
        cell: CellCoord,
        level: HazardLevel,
        out_events: &mut Vec<Event>,
    ) {
        if !self.hazards.set(cell, level) {
            return;
        }
        out_events.push(Event::HazardChanged { cell, level });

        if level != HazardLevel::Fire {
            return;
        }

        if let Some(poi) = self.pois.get(cell) {
            self.pois.put(cell, None);
            out_events.push(Event::PoiChanged { cell, poi: None });
            if poi.kind == PoiKind::Victim {
                info!("victim lost to fire at {cell}");
                self.victims.on_board = self.victims.on_board.saturating_sub(1);
                self.victims.lost += 1;
                out_events.push(Event::VictimLost { cell });
            }
        }

        for agent in self.agents.iter().filter(|agent| agent.cell == cell) {
            out_events.push(Event::AgentCaughtInFire {
                agent: agent.id,
                cell,
            });
        }
    }
}
