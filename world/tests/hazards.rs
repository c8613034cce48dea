use fire_rescue_core::{
    CellCoord, Changelog, Command, Direction, DoorKey, DoorState, Event, HazardLevel, Layout,
    PoiKind, PoiPlacement, Role, Rules, WallMask,
};
use fire_rescue_world::{self as world, query, Edge, World};

fn layout() -> Layout {
    Layout {
        width: 10,
        height: 8,
        walls: vec![WallMask::EMPTY; 80],
        pois: Vec::new(),
        fires: Vec::new(),
        doors: Vec::new(),
        entry_points: vec![CellCoord::new(0, 3)],
    }
}

fn add_wall(layout: &mut Layout, cell: CellCoord, direction: Direction) {
    let index = layout.index(cell).expect("cell on grid");
    layout.walls[index] = layout.walls[index].with(direction);
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn hazard(world: &World, column: u32, row: u32) -> HazardLevel {
    query::hazard(world, CellCoord::new(column, row)).expect("cell on grid")
}

#[test]
fn igniting_a_burning_cell_spreads_fire_or_damages_walls() {
    let origin = CellCoord::new(4, 3);
    let mut layout = layout();
    layout.fires.push(origin);
    add_wall(&mut layout, origin, Direction::West);
    let mut world = World::new(&layout, Rules::default()).expect("valid layout");

    let events = run(&mut world, Command::Ignite { cell: origin });

    assert_eq!(hazard(&world, 4, 2), HazardLevel::Fire);
    assert_eq!(hazard(&world, 4, 4), HazardLevel::Fire);
    assert_eq!(hazard(&world, 5, 3), HazardLevel::Fire);
    assert_eq!(hazard(&world, 3, 3), HazardLevel::Clear);

    let origin_damage = query::damage(&world, origin).expect("on grid");
    let facing_damage = query::damage(&world, CellCoord::new(3, 3)).expect("on grid");
    assert_eq!(origin_damage.get(Direction::West), 1);
    assert_eq!(facing_damage.get(Direction::East), 1);
    assert_eq!(query::counters(&world).damage_points, 1);
    assert!(events.contains(&Event::Explosion { cell: origin }));
}

#[test]
fn damaged_wall_falls_on_the_next_strike() {
    let origin = CellCoord::new(4, 3);
    let mut layout = layout();
    layout.fires.push(origin);
    add_wall(&mut layout, origin, Direction::East);
    let mut world = World::new(&layout, Rules::default()).expect("valid layout");

    let _ = run(&mut world, Command::Ignite { cell: origin });
    let counter = query::damage(&world, origin).expect("on grid");
    assert_eq!(counter.get(Direction::East), 1);

    let events = run(&mut world, Command::Ignite { cell: origin });
    let mut changelog = Changelog::new(2);
    changelog.record(&events);

    let counter = query::damage(&world, origin).expect("on grid");
    assert_eq!(counter.get(Direction::East), 2);
    let topology = query::topology(&world);
    assert_eq!(topology.edge(origin, Direction::East), Ok(Edge::Open));
    assert!(changelog
        .walls
        .iter()
        .any(|change| change.position == origin && !change.new_value.has(Direction::East)));
    assert_eq!(query::counters(&world).damage_points, 2);
    assert_eq!(hazard(&world, 5, 3), HazardLevel::Clear);

    let _ = run(&mut world, Command::Ignite { cell: origin });
    let counter = query::damage(&world, origin).expect("on grid");
    assert_eq!(counter.get(Direction::East), 2);
    assert_eq!(hazard(&world, 5, 3), HazardLevel::Fire);
    assert_eq!(query::counters(&world).damage_points, 2);
}

#[test]
fn closed_door_is_blown_out_and_then_transmits() {
    let origin = CellCoord::new(4, 3);
    let beyond = CellCoord::new(4, 4);
    let mut layout = layout();
    layout.fires.push(origin);
    layout.doors.push(DoorKey::new(origin, beyond));
    let mut world = World::new(&layout, Rules::default()).expect("valid layout");

    let events = run(&mut world, Command::Ignite { cell: origin });

    assert!(events.contains(&Event::DoorChanged {
        door: DoorKey::new(origin, beyond),
        state: DoorState::Destroyed,
    }));
    assert_eq!(hazard(&world, 4, 4), HazardLevel::Clear);
    assert_eq!(query::counters(&world).damage_points, 0);

    let _ = run(&mut world, Command::Ignite { cell: origin });
    assert_eq!(hazard(&world, 4, 4), HazardLevel::Fire);
}

#[test]
fn shockwave_travels_through_burning_cells() {
    let mut layout = layout();
    layout.fires.extend([
        CellCoord::new(4, 3),
        CellCoord::new(5, 3),
        CellCoord::new(6, 3),
    ]);
    let mut world = World::new(&layout, Rules::default()).expect("valid layout");

    let events = run(
        &mut world,
        Command::Ignite {
            cell: CellCoord::new(4, 3),
        },
    );

    let explosions: Vec<CellCoord> = events
        .iter()
        .filter_map(|event| match event {
            Event::Explosion { cell } => Some(*cell),
            _ => None,
        })
        .collect();
    assert_eq!(
        explosions,
        vec![
            CellCoord::new(4, 3),
            CellCoord::new(5, 3),
            CellCoord::new(6, 3)
        ]
    );
    assert_eq!(hazard(&world, 7, 3), HazardLevel::Fire);
    assert_eq!(hazard(&world, 8, 3), HazardLevel::Clear);
}

#[test]
fn shockwave_stops_at_the_grid_boundary() {
    let mut layout = layout();
    layout.fires.extend([CellCoord::new(1, 1), CellCoord::new(1, 0)]);
    let mut world = World::new(&layout, Rules::default()).expect("valid layout");

    let events = run(
        &mut world,
        Command::Ignite {
            cell: CellCoord::new(1, 1),
        },
    );

    assert!(events.contains(&Event::Explosion {
        cell: CellCoord::new(1, 0)
    }));
    assert_eq!(query::counters(&world).damage_points, 0);
}

#[test]
fn fire_claims_points_of_interest() {
    let origin = CellCoord::new(4, 3);
    let mut layout = layout();
    layout.fires.push(origin);
    layout.pois.push(PoiPlacement {
        cell: CellCoord::new(4, 2),
        kind: PoiKind::Victim,
    });
    layout.pois.push(PoiPlacement {
        cell: CellCoord::new(4, 4),
        kind: PoiKind::FalseAlarm,
    });
    let mut world = World::new(&layout, Rules::default()).expect("valid layout");

    let events = run(&mut world, Command::Ignite { cell: origin });

    assert!(events.contains(&Event::VictimLost {
        cell: CellCoord::new(4, 2)
    }));
    assert!(query::poi_cells(&world).is_empty());
    assert_eq!(query::counters(&world).people_lost, 1);
    let ledger = query::victim_ledger(&world);
    assert_eq!(ledger.placed, 1);
    assert!(ledger.is_balanced());
}

#[test]
fn ignition_steps_clear_to_smoke_to_fire() {
    let cell = CellCoord::new(5, 5);
    let mut world = World::new(&layout(), Rules::default()).expect("valid layout");

    let _ = run(&mut world, Command::Ignite { cell });
    assert_eq!(hazard(&world, 5, 5), HazardLevel::Smoke);
    let _ = run(&mut world, Command::Ignite { cell });
    assert_eq!(hazard(&world, 5, 5), HazardLevel::Fire);
}

#[test]
fn smoke_conversion_is_one_hop_per_pass() {
    let mut layout = layout();
    layout.fires.push(CellCoord::new(2, 2));
    let mut world = World::new(&layout, Rules::default()).expect("valid layout");
    for cell in [CellCoord::new(3, 2), CellCoord::new(4, 2)] {
        let _ = run(&mut world, Command::Ignite { cell });
    }

    let _ = run(&mut world, Command::ResolveSmoke);
    assert_eq!(hazard(&world, 3, 2), HazardLevel::Fire);
    assert_eq!(hazard(&world, 4, 2), HazardLevel::Smoke);

    let _ = run(&mut world, Command::ResolveSmoke);
    assert_eq!(hazard(&world, 4, 2), HazardLevel::Fire);
}

#[test]
fn smoke_behind_a_wall_does_not_convert() {
    let mut layout = layout();
    layout.fires.push(CellCoord::new(2, 2));
    add_wall(&mut layout, CellCoord::new(3, 2), Direction::West);
    let mut world = World::new(&layout, Rules::default()).expect("valid layout");
    let _ = run(
        &mut world,
        Command::Ignite {
            cell: CellCoord::new(3, 2),
        },
    );

    let events = run(&mut world, Command::ResolveSmoke);

    assert!(events.is_empty());
    assert_eq!(hazard(&world, 3, 2), HazardLevel::Smoke);
}

#[test]
fn agents_in_a_cell_that_catches_fire_are_reported() {
    let origin = CellCoord::new(4, 3);
    let mut layout = layout();
    layout.fires.push(origin);
    let mut world = World::new(&layout, Rules::default()).expect("valid layout");
    let spawned = run(
        &mut world,
        Command::SpawnAgent {
            role: Role::Suppressor,
            cell: CellCoord::new(4, 2),
        },
    );
    let Some(Event::AgentSpawned { agent, .. }) = spawned.first().copied() else {
        panic!("agent was not spawned: {spawned:?}");
    };

    let events = run(&mut world, Command::Ignite { cell: origin });

    assert!(events.contains(&Event::AgentCaughtInFire {
        agent,
        cell: CellCoord::new(4, 2),
    }));
}

#[test]
fn ignition_outside_the_grid_is_rejected() {
    let mut world = World::new(&layout(), Rules::default()).expect("valid layout");

    let events = run(
        &mut world,
        Command::Ignite {
            cell: CellCoord::new(10, 0),
        },
    );

    assert!(matches!(
        events.as_slice(),
        [Event::CommandRejected { agent: None, .. }]
    ));
    assert!(query::hazard(&world, CellCoord::new(10, 0)).is_err());
}

#[test]
fn hazard_targets_list_fire_before_smoke() {
    let mut layout = layout();
    layout.fires.extend([CellCoord::new(6, 5), CellCoord::new(2, 4)]);
    let mut world = World::new(&layout, Rules::default()).expect("valid layout");
    let _ = run(
        &mut world,
        Command::Ignite {
            cell: CellCoord::new(1, 1),
        },
    );

    assert_eq!(
        query::hazard_targets(&world),
        vec![
            CellCoord::new(2, 4),
            CellCoord::new(6, 5),
            CellCoord::new(1, 1)
        ]
    );
}
