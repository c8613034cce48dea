//! Pure per-agent action selection.

use fire_rescue_core::{
    AgentId, CellCoord, Command, DoorState, HazardLevel, Poi, PoiKind, Role, Rules,
};
use fire_rescue_world::Edge;

/// Everything an agent looks at when it picks its next action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnState {
    /// Specialisation of the agent.
    pub role: Role,
    /// Cell the agent stands on.
    pub cell: CellCoord,
    /// Action points available.
    pub stored_ap: u8,
    /// Whether the agent carries a victim.
    pub carrying_victim: bool,
    /// Hazard on the agent's cell.
    pub hazard_here: HazardLevel,
    /// Hazards on neighbors reachable without opening a door, in north,
    /// west, south, east order.
    pub reachable_hazards: Vec<(CellCoord, HazardLevel)>,
    /// Point of interest on the agent's cell.
    pub poi_here: Option<Poi>,
    /// Whether the agent stands on an exit.
    pub at_exit: bool,
    /// First step toward the current target and the edge it crosses.
    pub next_step: Option<(CellCoord, Edge)>,
}

/// Next thing an agent does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Clears the hazard on the agent's cell or a reachable neighbor.
    Extinguish {
        /// Cell to clear.
        cell: CellCoord,
    },
    /// Hands a carried victim over at the current exit.
    Deliver,
    /// Lifts the revealed victim lying here.
    PickUp,
    /// Turns over the marker lying here.
    Reveal,
    /// Opens the closed door on the route.
    OpenDoor {
        /// Cell behind the door.
        toward: CellCoord,
    },
    /// Chops at the wall on the route.
    BreachWall {
        /// Cell behind the wall.
        toward: CellCoord,
    },
    /// Steps along the route.
    Move {
        /// Cell entered.
        to: CellCoord,
    },
    /// Nothing affordable is left to do.
    EndTurn,
}

impl Action {
    /// World command carrying out the action, or `None` for [`Action::EndTurn`].
    #[must_use]
    pub const fn command(self, agent: AgentId) -> Option<Command> {
        let command = match self {
            Self::Extinguish { cell } => Command::Extinguish { agent, cell },
            Self::Deliver => Command::DeliverVictim { agent },
            Self::PickUp => Command::PickUpVictim { agent },
            Self::Reveal => Command::RevealPoi { agent },
            Self::OpenDoor { toward } => Command::OpenDoor { agent, toward },
            Self::BreachWall { toward } => Command::BreachWall { agent, toward },
            Self::Move { to } => Command::Move { agent, to },
            Self::EndTurn => return None,
        };
        Some(command)
    }
}

/// Picks the highest priority affordable action.
///
/// Priorities: the hazard on the agent's cell, then a hazard on a reachable
/// neighbor, then the role action, then the next step toward the target. A
/// step that needs a door opened or a wall breached is only started when the
/// agent can also pay for the step itself.
#[must_use]
pub fn decide_action(state: &TurnState, rules: &Rules) -> Action {
    let affordable = |cost: u8| cost <= state.stored_ap;

    if extinguish_cost(state.hazard_here, rules).is_some_and(affordable) {
        return Action::Extinguish { cell: state.cell };
    }

    let neighbor = state
        .reachable_hazards
        .iter()
        .find(|(_, level)| extinguish_cost(*level, rules).is_some_and(affordable));
    if let Some((cell, _)) = neighbor {
        return Action::Extinguish { cell: *cell };
    }

    let role_action = match state.role {
        Role::Rescuer => rescuer_action(state, rules),
        Role::Suppressor => None,
    };
    if let Some(action) = role_action {
        return action;
    }

    let Some((next, edge)) = state.next_step else {
        return Action::EndTurn;
    };
    let step = u16::from(rules.step_cost(state.carrying_victim));
    let available = u16::from(state.stored_ap);
    match edge {
        Edge::Open | Edge::Door(DoorState::Open | DoorState::Destroyed) if step <= available => {
            Action::Move { to: next }
        }
        Edge::Door(DoorState::Closed)
            if u16::from(rules.open_door_cost) + step <= available =>
        {
            Action::OpenDoor { toward: next }
        }
        Edge::Wall if u16::from(rules.breach_cost) + step <= available => {
            Action::BreachWall { toward: next }
        }
        _ => Action::EndTurn,
    }
}

fn extinguish_cost(level: HazardLevel, rules: &Rules) -> Option<u8> {
    match level {
        HazardLevel::Clear => None,
        HazardLevel::Smoke => Some(rules.extinguish_smoke_cost),
        HazardLevel::Fire => Some(rules.extinguish_fire_cost),
    }
}

fn rescuer_action(state: &TurnState, rules: &Rules) -> Option<Action> {
    if state.carrying_victim && state.at_exit {
        return Some(Action::Deliver);
    }
    match state.poi_here {
        Some(Poi {
            kind: PoiKind::Victim,
            revealed: true,
        }) if !state.carrying_victim => Some(Action::PickUp),
        Some(Poi {
            revealed: false, ..
        }) if rules.reveal_cost <= state.stored_ap => Some(Action::Reveal),
        _ => None,
    }
}
