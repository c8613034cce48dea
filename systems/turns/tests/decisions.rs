use fire_rescue_core::{CellCoord, DoorState, HazardLevel, Poi, PoiKind, Role, Rules};
use fire_rescue_system_turns::{decide_action, Action, TurnState};
use fire_rescue_world::Edge;
use proptest::prelude::*;

fn hazard() -> impl Strategy<Value = HazardLevel> {
    prop_oneof![
        Just(HazardLevel::Clear),
        Just(HazardLevel::Smoke),
        Just(HazardLevel::Fire),
    ]
}

fn edge() -> impl Strategy<Value = Edge> {
    prop_oneof![
        Just(Edge::Open),
        Just(Edge::Wall),
        Just(Edge::Boundary),
        Just(Edge::Door(DoorState::Closed)),
        Just(Edge::Door(DoorState::Open)),
        Just(Edge::Door(DoorState::Destroyed)),
    ]
}

fn poi() -> impl Strategy<Value = Option<Poi>> {
    prop_oneof![
        Just(None),
        Just(Some(Poi::hidden(PoiKind::Victim))),
        Just(Some(Poi::hidden(PoiKind::FalseAlarm))),
        Just(Some(Poi {
            kind: PoiKind::Victim,
            revealed: true,
        })),
    ]
}

prop_compose! {
    fn turn_state()(
        rescuer in any::<bool>(),
        stored_ap in 0..=8_u8,
        carrying_victim in any::<bool>(),
        hazard_here in hazard(),
        neighbors in prop::collection::vec(hazard(), 0..4),
        poi_here in poi(),
        at_exit in any::<bool>(),
        next_edge in prop::option::of(edge()),
    ) -> TurnState {
        let cell = CellCoord::new(4, 4);
        let around = [
            CellCoord::new(4, 3),
            CellCoord::new(3, 4),
            CellCoord::new(4, 5),
            CellCoord::new(5, 4),
        ];
        TurnState {
            role: if rescuer { Role::Rescuer } else { Role::Suppressor },
            cell,
            stored_ap,
            carrying_victim,
            hazard_here,
            reachable_hazards: around
                .into_iter()
                .zip(neighbors)
                .filter(|(_, level)| level.is_hazard())
                .collect(),
            poi_here,
            at_exit,
            next_step: next_edge.map(|edge| (CellCoord::new(5, 4), edge)),
        }
    }
}

fn price(action: Action, state: &TurnState, rules: &Rules) -> u8 {
    let step = rules.step_cost(state.carrying_victim);
    match action {
        Action::Extinguish { cell } => {
            let level = if cell == state.cell {
                state.hazard_here
            } else {
                state
                    .reachable_hazards
                    .iter()
                    .find(|(neighbor, _)| *neighbor == cell)
                    .map(|(_, level)| *level)
                    .unwrap_or_default()
            };
            match level {
                HazardLevel::Fire => rules.extinguish_fire_cost,
                _ => rules.extinguish_smoke_cost,
            }
        }
        Action::Reveal => rules.reveal_cost,
        Action::OpenDoor { .. } => rules.open_door_cost + step,
        Action::BreachWall { .. } => rules.breach_cost + step,
        Action::Move { .. } => step,
        Action::Deliver | Action::PickUp | Action::EndTurn => 0,
    }
}

proptest! {
    #[test]
    fn decisions_never_exceed_stored_points(state in turn_state()) {
        let rules = Rules::default();
        let action = decide_action(&state, &rules);

        prop_assert!(price(action, &state, &rules) <= state.stored_ap);
        if state.role == Role::Suppressor {
            prop_assert!(!matches!(action, Action::Reveal | Action::PickUp | Action::Deliver));
        }
        if let Action::Extinguish { cell } = action {
            let reachable = state.reachable_hazards.iter().any(|(neighbor, _)| *neighbor == cell);
            prop_assert!(cell == state.cell || reachable);
        }
    }
}
