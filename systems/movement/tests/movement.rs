use std::time::Duration;

use ice_slide_core::{CellCoord, Command, Direction, Event, MapData, StopReason};
use ice_slide_system_builder::Builder;
use ice_slide_system_movement::{Movement, MovementConfig};
use ice_slide_system_validator::fallback_map;
use ice_slide_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(20);
const TICK_LIMIT: usize = 10_000;

struct Harness {
    world: World,
    movement: Movement,
    log: Vec<Event>,
}

impl Harness {
    fn new(map: &MapData, config: MovementConfig) -> Self {
        let mut harness = Self {
            world: World::new(),
            movement: Movement::new(config),
            log: Vec::new(),
        };
        let mut commands = Vec::new();
        Builder::default()
            .handle(Some(map), &mut commands)
            .expect("map builds");
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut harness.world, command, &mut events);
        }
        harness.pump(events, None);
        harness
    }

    fn press(&mut self, direction: Direction) {
        self.pump(Vec::new(), Some(direction));
    }

    fn tick(&mut self) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt: FRAME }, &mut events);
        self.pump(events, None);
    }

    fn run_until_idle(&mut self) -> usize {
        let mut ticks = 0;
        while self.movement.is_sliding() {
            assert!(ticks < TICK_LIMIT, "slide never came to rest");
            self.tick();
            ticks += 1;
        }
        ticks
    }

    fn slide(&mut self, direction: Direction) -> CellCoord {
        self.press(direction);
        let _ = self.run_until_idle();
        self.cell()
    }

    fn cell(&self) -> CellCoord {
        query::actor(&self.world).expect("actor present").cell
    }

    fn pump(&mut self, events: Vec<Event>, input: Option<Direction>) {
        self.log.extend(events.iter().cloned());
        let mut commands = Vec::new();
        let grid = query::grid_view(&self.world);
        let actor = query::actor(&self.world);
        self.movement
            .handle(&events, input, &grid, actor, &mut commands);
        for command in commands {
            world::apply(&mut self.world, command, &mut self.log);
        }
    }

    fn stops(&self) -> Vec<(CellCoord, StopReason)> {
        self.log
            .iter()
            .filter_map(|event| match event {
                Event::SlideStopped { cell, reason } => Some((*cell, *reason)),
                _ => None,
            })
            .collect()
    }
}

fn enclosed_spawn() -> MapData {
    MapData::from_rows(
        "enclosed",
        3,
        3,
        vec![vec![1, 1, 1], vec![1, 3, 1], vec![1, 1, 1]],
    )
}

#[test]
fn walled_spawn_never_moves() {
    let mut harness = Harness::new(&enclosed_spawn(), MovementConfig::default());

    for direction in Direction::ALL {
        assert_eq!(harness.slide(direction), CellCoord::new(1, 1));
    }
    assert!(!harness
        .log
        .iter()
        .any(|event| matches!(event, Event::ActorAdvanced { .. })));
    assert_eq!(harness.stops().len(), 4);
}

#[test]
fn sliding_into_border_wall_keeps_start_cell() {
    let mut harness = Harness::new(&fallback_map(), MovementConfig::default());

    assert_eq!(harness.slide(Direction::Left), CellCoord::new(1, 1));
    assert_eq!(harness.slide(Direction::Up), CellCoord::new(1, 1));
    assert_eq!(
        harness.stops(),
        vec![
            (CellCoord::new(1, 1), StopReason::Obstacle),
            (CellCoord::new(1, 1), StopReason::Obstacle),
        ]
    );
}

#[test]
fn slide_stops_in_front_of_goal() {
    let mut harness = Harness::new(&fallback_map(), MovementConfig::default());

    assert_eq!(harness.slide(Direction::Right), CellCoord::new(3, 1));
    assert_eq!(harness.slide(Direction::Down), CellCoord::new(3, 2));

    assert_eq!(
        harness.stops(),
        vec![
            (CellCoord::new(3, 1), StopReason::Obstacle),
            (CellCoord::new(3, 2), StopReason::Goal),
        ]
    );
    assert!(harness.log.contains(&Event::GoalReached {
        cell: CellCoord::new(3, 2),
        goal: CellCoord::new(3, 3),
    }));
    assert!(!harness.log.iter().any(|event| matches!(
        event,
        Event::ActorAdvanced { to, .. } if *to == CellCoord::new(3, 3)
    )));
}

#[test]
fn resting_position_is_exact_cell_centre() {
    let mut harness = Harness::new(&fallback_map(), MovementConfig::default());

    let cell = harness.slide(Direction::Right);

    let actor = query::actor(&harness.world).expect("actor present");
    assert_eq!(actor.position, query::transform(&harness.world).position_of(cell));
}

#[test]
fn actor_passes_through_intermediate_positions() {
    let mut harness = Harness::new(&fallback_map(), MovementConfig::default());
    let transform = *query::transform(&harness.world);
    let start = transform.position_of(CellCoord::new(1, 1));
    let next = transform.position_of(CellCoord::new(2, 1));

    harness.press(Direction::Right);
    harness.tick();

    let actor = query::actor(&harness.world).expect("actor present");
    assert_eq!(actor.cell, CellCoord::new(1, 1), "cell changes only on settle");
    assert!(actor.position.x > start.x && actor.position.x < next.x);
    assert_eq!(actor.position.y, start.y);
}

#[test]
fn input_during_slide_is_ignored() {
    let mut reference = Harness::new(&fallback_map(), MovementConfig::default());
    let expected = reference.slide(Direction::Right);

    let mut harness = Harness::new(&fallback_map(), MovementConfig::default());
    harness.press(Direction::Right);
    harness.tick();
    harness.press(Direction::Down);
    harness.tick();
    harness.press(Direction::Left);
    let _ = harness.run_until_idle();

    assert_eq!(harness.cell(), expected);
    let starts = harness
        .log
        .iter()
        .filter(|event| matches!(event, Event::SlideStarted { .. }))
        .count();
    assert_eq!(starts, 1, "only the first input starts a slide");
}

#[test]
fn open_map_stops_at_grid_edge_when_confined() {
    let open = MapData::from_rows("open", 3, 2, vec![vec![3, 0, 0], vec![0, 0, 0]]);
    let mut harness = Harness::new(&open, MovementConfig::default());

    assert_eq!(harness.slide(Direction::Right), CellCoord::new(2, 0));
    assert_eq!(harness.slide(Direction::Down), CellCoord::new(2, 1));
    assert_eq!(
        harness.stops(),
        vec![
            (CellCoord::new(2, 0), StopReason::Boundary),
            (CellCoord::new(2, 1), StopReason::Boundary),
        ]
    );
}

#[test]
fn unconfined_slide_leaves_the_grid() {
    let open = MapData::from_rows("open", 2, 1, vec![vec![3, 0]]);
    let mut harness = Harness::new(
        &open,
        MovementConfig {
            move_speed: 5.0,
            confine_to_grid: false,
        },
    );

    harness.press(Direction::Right);
    for _ in 0..100 {
        harness.tick();
    }

    assert!(harness.movement.is_sliding());
    assert!(harness.cell().column() > 2);
}

#[test]
fn step_duration_follows_move_speed() {
    let corridor = MapData::from_rows("corridor", 4, 1, vec![vec![3, 0, 0, 1]]);
    let mut slow = Harness::new(
        &corridor,
        MovementConfig {
            move_speed: 2.5,
            confine_to_grid: true,
        },
    );

    slow.press(Direction::Right);
    let ticks = slow.run_until_idle();

    assert_eq!(slow.cell(), CellCoord::new(2, 0));
    assert!(
        (40..=42).contains(&ticks),
        "two cells at 0.4s each should take about forty 20ms frames, took {ticks}"
    );
}
