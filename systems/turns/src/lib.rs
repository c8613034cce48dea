#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-agent turn execution.
//!
//! [`decide_action`] is a pure function of a [`TurnState`]. [`ActionEconomy`]
//! observes the world, refreshes the agent's target and translates decisions
//! into commands; [`ActionEconomy::take_turn`] feeds those commands to the
//! world until the agent drops below the turn threshold.

mod decide;
mod escape;

pub use decide::{decide_action, Action, TurnState};

use fire_rescue_core::{AgentId, AgentSnapshot, CellCoord, Command, Event, GridError, Role};
use fire_rescue_system_navigation::PathPlanner;
use fire_rescue_system_targeting::{select_rescuer_target, TargetRegistry};
use fire_rescue_world::{self as world, query, DoorPolicy, World};
use log::{debug, warn};

/// Upper bound on actions in a single turn, reached only by rule sets with
/// free actions.
const MAX_ACTIONS_PER_TURN: usize = 64;

/// Summary of a finished turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnReport {
    /// Actions the world accepted.
    pub actions: usize,
    /// Action points banked for the next turn.
    pub ap_remaining: u8,
}

/// Drives agents through their turns.
#[derive(Clone, Copy, Debug)]
pub struct ActionEconomy {
    planner: PathPlanner,
}

impl ActionEconomy {
    /// Creates the system with a planner for the provided rules.
    #[must_use]
    pub fn new(planner: PathPlanner) -> Self {
        Self { planner }
    }

    /// Planner used for routing and target selection.
    #[must_use]
    pub const fn planner(&self) -> &PathPlanner {
        &self.planner
    }

    /// Chooses the agent's next action and emits the commands realising it.
    ///
    /// A target change is emitted as [`Command::AssignTarget`] ahead of the
    /// action itself. Nothing but the target is emitted for
    /// [`Action::EndTurn`].
    pub fn handle(
        &self,
        world: &World,
        registry: &mut TargetRegistry,
        agent: &AgentSnapshot,
        out: &mut Vec<Command>,
    ) -> Result<Action, GridError> {
        let target = self.refresh_target(world, registry, agent)?;
        if target != agent.target {
            out.push(Command::AssignTarget {
                agent: agent.id,
                target,
            });
        }

        let state = self.observe(world, agent, target)?;
        let action = decide_action(&state, query::rules(world));
        if let Some(command) = action.command(agent.id) {
            out.push(command);
        }
        Ok(action)
    }

    /// Plays a complete turn: the per-turn grant, then actions while the
    /// agent holds at least the turn threshold.
    pub fn take_turn(
        &self,
        world: &mut World,
        registry: &mut TargetRegistry,
        agent: AgentId,
        out_events: &mut Vec<Event>,
    ) -> Result<TurnReport, GridError> {
        world::apply(world, Command::BeginTurn { agent }, out_events);
        let threshold = query::rules(world).turn_threshold;
        let mut report = TurnReport::default();

        while let Some(snapshot) = query::agent(world, agent) {
            report.ap_remaining = snapshot.stored_ap;
            if snapshot.stored_ap < threshold {
                break;
            }
            if report.actions >= MAX_ACTIONS_PER_TURN {
                warn!("agent {} hit the per-turn action limit", agent.get());
                break;
            }

            let mut commands = Vec::new();
            let action = self.handle(world, registry, &snapshot, &mut commands)?;
            if !apply_all(world, commands, out_events) {
                warn!("agent {} had {action:?} refused", agent.get());
                break;
            }
            if action == Action::EndTurn {
                debug!(
                    "agent {} ends its turn with {} AP",
                    agent.get(),
                    snapshot.stored_ap
                );
                break;
            }
            report.actions += 1;
        }

        if let Some(snapshot) = query::agent(world, agent) {
            report.ap_remaining = snapshot.stored_ap;
        }
        Ok(report)
    }

    fn refresh_target(
        &self,
        world: &World,
        registry: &mut TargetRegistry,
        agent: &AgentSnapshot,
    ) -> Result<Option<CellCoord>, GridError> {
        match agent.role {
            Role::Suppressor => {
                let _ = registry.prune_stale(world);
                registry.assign_nearest(world, &self.planner, agent)
            }
            Role::Rescuer => select_rescuer_target(world, &self.planner, agent),
        }
    }

    fn observe(
        &self,
        world: &World,
        agent: &AgentSnapshot,
        target: Option<CellCoord>,
    ) -> Result<TurnState, GridError> {
        let topology = query::topology(world);
        let cell = agent.cell;

        let mut reachable_hazards = Vec::new();
        for neighbor in topology.neighbors(cell)? {
            if !topology.passable(cell, neighbor, DoorPolicy::ClosedDoorBlocks)? {
                continue;
            }
            let level = query::hazard(world, neighbor)?;
            if level.is_hazard() {
                reachable_hazards.push((neighbor, level));
            }
        }

        let next_step = match target {
            Some(goal) if goal != cell => {
                let plan = self
                    .planner
                    .find_path(topology, cell, goal, agent.carrying_victim)?;
                match plan.next_step() {
                    Some(next) => topology.edge_between(cell, next)?.map(|edge| (next, edge)),
                    None => {
                        warn!(
                            "agent {} has no route from {cell} to {goal}",
                            agent.id.get()
                        );
                        None
                    }
                }
            }
            _ => None,
        };

        Ok(TurnState {
            role: agent.role,
            cell,
            stored_ap: agent.stored_ap,
            carrying_victim: agent.carrying_victim,
            hazard_here: query::hazard(world, cell)?,
            reachable_hazards,
            poi_here: query::poi(world, cell)?,
            at_exit: query::is_exit(world, cell),
            next_step,
        })
    }
}

/// Applies commands in order, stopping at the first refusal.
fn apply_all(world: &mut World, commands: Vec<Command>, out_events: &mut Vec<Event>) -> bool {
    for command in commands {
        let start = out_events.len();
        world::apply(world, command, out_events);
        let refused = out_events[start..]
            .iter()
            .any(|event| matches!(event, Event::CommandRejected { .. }));
        if refused {
            return false;
        }
    }
    true
}
