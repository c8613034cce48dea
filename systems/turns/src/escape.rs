//! Relocation of agents whose cell caught fire.

use fire_rescue_core::{AgentSnapshot, CellCoord, Command, Event, GridError, HazardLevel};
use fire_rescue_system_navigation::PathCost;
use fire_rescue_world::{query, World};
use log::{info, warn};

use crate::{apply_all, ActionEconomy};

impl ActionEconomy {
    /// Emits the commands that carry a knocked-down agent to an exit.
    ///
    /// Exits are tried in ascending path cost for the agent's carry state,
    /// layout order breaking ties. Unreachable exits are considered only when
    /// no exit can be reached. The first one not on fire is taken; a burning
    /// one is taken only when the agent can afford to put it out on arrival.
    /// With no safe exit the agent lands on the cheapest exit anyway.
    pub fn plan_escape(
        &self,
        world: &World,
        agent: &AgentSnapshot,
        out: &mut Vec<Command>,
    ) -> Result<Option<CellCoord>, GridError> {
        let topology = query::topology(world);
        let mut exits: Vec<(PathCost, CellCoord)> = Vec::new();
        for &exit in query::entry_points(world) {
            let cost =
                self.planner()
                    .path_cost(topology, agent.cell, exit, agent.carrying_victim)?;
            exits.push((cost, exit));
        }
        if exits.iter().any(|(cost, _)| cost.is_reachable()) {
            exits.retain(|(cost, _)| cost.is_reachable());
        }
        exits.sort_by_key(|(cost, _)| *cost);

        let fire_cost = query::rules(world).extinguish_fire_cost;
        let mut chosen = None;
        for &(_, exit) in &exits {
            match query::hazard(world, exit)? {
                HazardLevel::Fire if agent.stored_ap >= fire_cost => {
                    chosen = Some((exit, true));
                    break;
                }
                HazardLevel::Fire => {}
                HazardLevel::Clear | HazardLevel::Smoke => {
                    chosen = Some((exit, false));
                    break;
                }
            }
        }

        let (exit, extinguish) = match (chosen, exits.first()) {
            (Some(choice), _) => choice,
            (None, Some(&(_, cheapest))) => {
                warn!(
                    "agent {} found no safe exit, falling back to {cheapest}",
                    agent.id.get()
                );
                (cheapest, false)
            }
            (None, None) => {
                warn!("agent {} has no exit to escape to", agent.id.get());
                return Ok(None);
            }
        };

        out.push(Command::Escape {
            agent: agent.id,
            to: exit,
        });
        if extinguish {
            out.push(Command::Extinguish {
                agent: agent.id,
                cell: exit,
            });
        }
        Ok(Some(exit))
    }

    /// Relocates every agent reported by [`Event::AgentCaughtInFire`] that
    /// still stands on a burning cell. Returns the number of agents moved.
    pub fn relocate_caught(
        &self,
        world: &mut World,
        events: &[Event],
        out_events: &mut Vec<Event>,
    ) -> Result<usize, GridError> {
        let mut caught = Vec::new();
        for event in events {
            if let Event::AgentCaughtInFire { agent, .. } = event {
                if !caught.contains(agent) {
                    caught.push(*agent);
                }
            }
        }

        let mut relocated = 0;
        for agent in caught {
            let Some(snapshot) = query::agent(world, agent) else {
                continue;
            };
            if query::hazard(world, snapshot.cell)? != HazardLevel::Fire {
                continue;
            }

            let mut commands = Vec::new();
            if let Some(exit) = self.plan_escape(world, &snapshot, &mut commands)? {
                info!("agent {} escaped from {} to {exit}", agent.get(), snapshot.cell);
                if !apply_all(world, commands, out_events) {
                    warn!("agent {} could not finish its escape", agent.get());
                }
                relocated += 1;
            }
        }
        Ok(relocated)
    }
}
