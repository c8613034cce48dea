use fire_rescue_core::{
    AgentId, AgentSnapshot, BreachPolicy, CellCoord, Command, Direction, DoorKey, DoorState,
    Event, HazardLevel, Layout, PoiKind, PoiPlacement, Role, Rules, WallMask,
};
use fire_rescue_system_navigation::PathPlanner;
use fire_rescue_system_targeting::TargetRegistry;
use fire_rescue_system_turns::{Action, ActionEconomy, TurnReport};
use fire_rescue_world::{self as world, query, World};

fn open_floor() -> Layout {
    Layout {
        width: 10,
        height: 8,
        walls: vec![WallMask::EMPTY; 80],
        pois: Vec::new(),
        fires: Vec::new(),
        doors: Vec::new(),
        entry_points: vec![CellCoord::new(0, 3), CellCoord::new(9, 5)],
    }
}

fn setup(layout: &Layout, rules: Rules) -> (World, ActionEconomy) {
    let planner = PathPlanner::new(&rules);
    let world = World::new(layout, rules).expect("valid layout");
    (world, ActionEconomy::new(planner))
}

fn spawn(world: &mut World, role: Role, cell: CellCoord) -> AgentId {
    let mut events = Vec::new();
    world::apply(world, Command::SpawnAgent { role, cell }, &mut events);
    query::agents(world).last().expect("agent spawned").id
}

fn agent_cell(world: &World, agent: AgentId) -> CellCoord {
    query::agent(world, agent).expect("agent exists").cell
}

#[test]
fn extinguishing_an_adjacent_fire_leaves_enough_for_a_move() {
    let mut layout = open_floor();
    layout.fires = vec![CellCoord::new(3, 3), CellCoord::new(6, 3)];
    let rules = Rules {
        starting_ap: 0,
        ..Rules::default()
    };
    let (mut world, economy) = setup(&layout, rules);
    let agent = spawn(&mut world, Role::Suppressor, CellCoord::new(2, 3));
    let mut registry = TargetRegistry::new();
    let mut events = Vec::new();

    let report = economy
        .take_turn(&mut world, &mut registry, agent, &mut events)
        .expect("cells on grid");

    assert_eq!(
        report,
        TurnReport {
            actions: 1,
            ap_remaining: 2
        }
    );
    assert_eq!(
        query::hazard(&world, CellCoord::new(3, 3)),
        Ok(HazardLevel::Clear)
    );

    let snapshot = query::agent(&world, agent).expect("agent exists");
    let mut commands = Vec::new();
    let next = economy
        .handle(&world, &mut registry, &snapshot, &mut commands)
        .expect("cells on grid");
    assert_eq!(
        next,
        Action::Move {
            to: CellCoord::new(3, 3)
        }
    );
    assert_eq!(registry.claim_of(agent), Some(CellCoord::new(6, 3)));
}

#[test]
fn suppressor_opens_a_door_on_its_route() {
    let mut layout = open_floor();
    layout.fires = vec![CellCoord::new(5, 3)];
    layout
        .doors
        .push(DoorKey::new(CellCoord::new(3, 3), CellCoord::new(4, 3)));
    let (mut world, economy) = setup(&layout, Rules::default());
    let agent = spawn(&mut world, Role::Suppressor, CellCoord::new(2, 3));
    let mut registry = TargetRegistry::new();
    let mut events = Vec::new();

    let report = economy
        .take_turn(&mut world, &mut registry, agent, &mut events)
        .expect("cells on grid");

    assert_eq!(report.actions, 4);
    assert_eq!(report.ap_remaining, 3);
    assert_eq!(agent_cell(&world, agent), CellCoord::new(4, 3));
    assert_eq!(
        query::topology(&world).door(CellCoord::new(3, 3), CellCoord::new(4, 3)),
        Some(DoorState::Open)
    );
    assert_eq!(
        query::hazard(&world, CellCoord::new(5, 3)),
        Ok(HazardLevel::Clear)
    );
    assert_eq!(registry.prune_stale(&world), 1);
    assert!(registry.is_empty());
}

#[test]
fn sealed_fire_is_reached_by_breaching_until_the_wall_falls() {
    let mut layout = open_floor();
    let inside = CellCoord::new(4, 4);
    let index = layout.index(inside).expect("cell on grid");
    for direction in Direction::ALL {
        layout.walls[index] = layout.walls[index].with(direction);
    }
    layout.fires = vec![inside];
    let (mut world, economy) = setup(&layout, Rules::default());
    let agent = spawn(&mut world, Role::Suppressor, CellCoord::new(4, 2));
    let mut registry = TargetRegistry::new();
    let mut events = Vec::new();

    let first = economy
        .take_turn(&mut world, &mut registry, agent, &mut events)
        .expect("cells on grid");
    assert_eq!(first.actions, 3);
    assert_eq!(first.ap_remaining, 3);
    assert_eq!(query::counters(&world).damage_points, 2);
    assert!(!query::topology(&world)
        .walls_between(CellCoord::new(4, 3), inside)
        .expect("cells on grid"));

    let second = economy
        .take_turn(&mut world, &mut registry, agent, &mut events)
        .expect("cells on grid");
    assert_eq!(second.ap_remaining, 5);
    assert_eq!(query::hazard(&world, inside), Ok(HazardLevel::Clear));
}

#[test]
fn rescuer_reveals_carries_and_delivers_a_victim() {
    let mut layout = open_floor();
    layout.pois = vec![PoiPlacement {
        cell: CellCoord::new(2, 3),
        kind: PoiKind::Victim,
    }];
    let (mut world, economy) = setup(&layout, Rules::default());
    let agent = spawn(&mut world, Role::Rescuer, CellCoord::new(0, 3));
    let mut registry = TargetRegistry::new();
    let mut events = Vec::new();

    let first = economy
        .take_turn(&mut world, &mut registry, agent, &mut events)
        .expect("cells on grid");
    assert_eq!(first.actions, 5);
    assert_eq!(first.ap_remaining, 3);
    let snapshot = query::agent(&world, agent).expect("agent exists");
    assert!(snapshot.carrying_victim);
    assert_eq!(snapshot.cell, CellCoord::new(1, 3));

    let second = economy
        .take_turn(&mut world, &mut registry, agent, &mut events)
        .expect("cells on grid");
    assert_eq!(second.actions, 2);
    assert_eq!(second.ap_remaining, 5);
    assert_eq!(query::counters(&world).people_rescued, 1);
    assert!(registry.is_empty());
    assert!(query::victim_ledger(&world).is_balanced());
}

#[test]
fn agents_without_targets_bank_their_points() {
    let (mut world, economy) = setup(&open_floor(), Rules::default());
    let agent = spawn(&mut world, Role::Suppressor, CellCoord::new(4, 4));
    let mut registry = TargetRegistry::new();
    let mut events = Vec::new();

    for expected in [8, 8] {
        let report = economy
            .take_turn(&mut world, &mut registry, agent, &mut events)
            .expect("cells on grid");
        assert_eq!(report.actions, 0);
        assert_eq!(report.ap_remaining, expected);
    }
}

fn catch_in_fire(world: &mut World, cell: CellCoord) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Ignite { cell }, &mut events);
    world::apply(world, Command::Ignite { cell }, &mut events);
    events
}

#[test]
fn caught_agents_escape_to_the_nearest_exit() {
    let (mut world, economy) = setup(&open_floor(), Rules::default());
    let agent = spawn(&mut world, Role::Suppressor, CellCoord::new(3, 3));
    let caught = catch_in_fire(&mut world, CellCoord::new(3, 3));
    let mut events = Vec::new();

    let moved = economy
        .relocate_caught(&mut world, &caught, &mut events)
        .expect("cells on grid");

    assert_eq!(moved, 1);
    let snapshot = query::agent(&world, agent).expect("agent exists");
    assert_eq!(snapshot.cell, CellCoord::new(0, 3));
    assert_eq!(snapshot.stored_ap, 4);
    assert_eq!(snapshot.target, None);
}

#[test]
fn burning_exits_are_used_only_when_the_agent_can_put_them_out() {
    let mut layout = open_floor();
    layout.fires = vec![CellCoord::new(0, 3)];

    let (mut world, economy) = setup(&layout, Rules::default());
    let agent = spawn(&mut world, Role::Suppressor, CellCoord::new(3, 3));
    let caught = catch_in_fire(&mut world, CellCoord::new(3, 3));
    let mut events = Vec::new();
    let _ = economy
        .relocate_caught(&mut world, &caught, &mut events)
        .expect("cells on grid");
    let snapshot = query::agent(&world, agent).expect("agent exists");
    assert_eq!(snapshot.cell, CellCoord::new(0, 3));
    assert_eq!(snapshot.stored_ap, 2);
    assert_eq!(
        query::hazard(&world, CellCoord::new(0, 3)),
        Ok(HazardLevel::Clear)
    );

    let (mut world, economy) = setup(
        &layout,
        Rules {
            starting_ap: 1,
            ..Rules::default()
        },
    );
    let agent = spawn(&mut world, Role::Suppressor, CellCoord::new(3, 3));
    let caught = catch_in_fire(&mut world, CellCoord::new(3, 3));
    let mut events = Vec::new();
    let _ = economy
        .relocate_caught(&mut world, &caught, &mut events)
        .expect("cells on grid");
    assert_eq!(agent_cell(&world, agent), CellCoord::new(9, 5));
}

#[test]
fn carried_victims_are_lost_in_an_escape() {
    let mut layout = open_floor();
    layout.pois = vec![PoiPlacement {
        cell: CellCoord::new(3, 3),
        kind: PoiKind::Victim,
    }];
    let (mut world, economy) = setup(&layout, Rules::default());
    let agent = spawn(&mut world, Role::Rescuer, CellCoord::new(3, 3));
    let mut events = Vec::new();
    world::apply(&mut world, Command::RevealPoi { agent }, &mut events);
    world::apply(&mut world, Command::PickUpVictim { agent }, &mut events);
    assert!(query::agent(&world, agent).expect("agent exists").carrying_victim);

    let caught = catch_in_fire(&mut world, CellCoord::new(3, 3));
    let _ = economy
        .relocate_caught(&mut world, &caught, &mut events)
        .expect("cells on grid");

    let ledger = query::victim_ledger(&world);
    assert_eq!(ledger.lost, 1);
    assert_eq!(ledger.carried, 0);
    assert!(ledger.is_balanced());
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::VictimLost { .. })));
}

fn stranded(cell: CellCoord, stored_ap: u8, carrying_victim: bool) -> AgentSnapshot {
    AgentSnapshot {
        id: AgentId::new(0),
        role: Role::Rescuer,
        cell,
        stored_ap,
        carrying_victim,
        target: None,
    }
}

#[test]
fn sealed_exits_never_beat_a_reachable_one() {
    let mut layout = open_floor();
    layout.fires = vec![CellCoord::new(0, 3)];
    layout.walls[5 * 10 + 9] = WallMask::EMPTY
        .with(Direction::North)
        .with(Direction::West)
        .with(Direction::South);
    let rules = Rules {
        breach_policy: BreachPolicy::Never,
        ..Rules::default()
    };
    let (world, economy) = setup(&layout, rules);

    let mut commands = Vec::new();
    let exit = economy
        .plan_escape(&world, &stranded(CellCoord::new(3, 3), 1, false), &mut commands)
        .expect("cells on grid");

    assert_eq!(exit, Some(CellCoord::new(0, 3)));
    assert_eq!(
        commands,
        vec![Command::Escape {
            agent: AgentId::new(0),
            to: CellCoord::new(0, 3),
        }]
    );
}

#[test]
fn escape_routes_are_priced_for_the_carried_load() {
    let mut layout = open_floor();
    layout.walls[3 * 10] = WallMask::EMPTY
        .with(Direction::North)
        .with(Direction::South);
    layout.doors = vec![DoorKey::new(CellCoord::new(0, 3), CellCoord::new(1, 3))];
    layout.entry_points = vec![CellCoord::new(0, 3), CellCoord::new(6, 3)];
    let rules = Rules {
        open_door_cost: 3,
        ..Rules::default()
    };
    let (world, economy) = setup(&layout, rules);
    let start = CellCoord::new(2, 3);

    let mut commands = Vec::new();
    let empty_handed = economy
        .plan_escape(&world, &stranded(start, 4, false), &mut commands)
        .expect("cells on grid");
    assert_eq!(empty_handed, Some(CellCoord::new(6, 3)));

    let loaded = economy
        .plan_escape(&world, &stranded(start, 4, true), &mut commands)
        .expect("cells on grid");
    assert_eq!(loaded, Some(CellCoord::new(0, 3)));
}
