#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative scene state for Ice Slide.

use std::collections::BTreeSet;

use glam::Vec2;
use ice_slide_core::{
    CellCoord, CellTransform, Command, EntityKind, Event, MapLayout, StopReason,
};
use log::{debug, info, warn};

/// Identifier assigned to a placed entity by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Entity currently present in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedEntity {
    id: EntityId,
    kind: EntityKind,
    name: String,
    cell: CellCoord,
    position: Vec2,
}

impl PlacedEntity {
    /// Identifier allocated by the world.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Kind of entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Deterministic display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Grid cell the entity occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// World-space position of the entity.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }
}

#[derive(Clone, Copy, Debug)]
struct Actor {
    cell: CellCoord,
    position: Vec2,
}

/// Represents the authoritative Ice Slide scene.
#[derive(Debug)]
pub struct World {
    map_id: Option<String>,
    transform: CellTransform,
    obstacles: BTreeSet<CellCoord>,
    goal: Option<CellCoord>,
    spawn: Option<CellCoord>,
    entities: Vec<PlacedEntity>,
    next_entity_id: u32,
    actor: Option<Actor>,
    tick_index: u64,
}

impl World {
    /// Creates an empty world with no map loaded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            map_id: None,
            transform: CellTransform::new(0, 0, 1.0, Vec2::ZERO),
            obstacles: BTreeSet::new(),
            goal: None,
            spawn: None,
            entities: Vec::new(),
            next_entity_id: 0,
            actor: None,
            tick_index: 0,
        }
    }

    fn clear(&mut self) -> usize {
        let removed = self.entities.len() + usize::from(self.actor.is_some());
        self.entities.clear();
        self.actor = None;
        self.goal = None;
        self.spawn = None;
        self.map_id = None;
        self.obstacles.clear();
        removed
    }

    fn install(&mut self, layout: MapLayout) {
        let transform = *layout.transform();
        let obstacles: BTreeSet<CellCoord> = layout
            .walls()
            .filter(|cell| transform.contains(*cell))
            .collect();

        for placement in layout.placements() {
            let id = EntityId(self.next_entity_id);
            self.next_entity_id = self.next_entity_id.wrapping_add(1);
            self.entities.push(PlacedEntity {
                id,
                kind: placement.kind,
                name: placement.name.clone(),
                cell: placement.cell,
                position: placement.position,
            });
        }

        self.goal = layout.goal();
        self.spawn = layout.spawn();
        self.actor = self.spawn.map(|cell| Actor {
            cell,
            position: transform.position_of(cell),
        });
        self.transform = transform;
        self.obstacles = obstacles;
        self.map_id = Some(layout.map_id().to_owned());
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLayout { layout } => {
            let removed = world.clear();
            out_events.push(Event::MapCleared { removed });

            let map_id = layout.map_id().to_owned();
            let walls = layout.walls().count();
            world.install(layout);

            if world.spawn.is_none() {
                warn!("map '{map_id}' declares no spawn cell; no actor was placed");
            }
            info!(
                "map built: {map_id} ({}x{}), {walls} walls",
                world.transform.columns(),
                world.transform.rows()
            );
            out_events.push(Event::MapBuilt {
                map_id,
                walls,
                goal: world.goal,
                spawn: world.spawn,
            });
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::BeginSlide { direction } => {
            let Some(actor) = world.actor else {
                debug!("slide requested without an actor");
                return;
            };
            out_events.push(Event::SlideStarted {
                direction,
                from: actor.cell,
            });
        }
        Command::MoveActor { position } => {
            if let Some(actor) = world.actor.as_mut() {
                actor.position = position;
            }
        }
        Command::SettleActor { cell } => {
            let position = world.transform.position_of(cell);
            if let Some(actor) = world.actor.as_mut() {
                let from = actor.cell;
                actor.cell = cell;
                actor.position = position;
                out_events.push(Event::ActorAdvanced { from, to: cell });
            }
        }
        Command::EndSlide { reason } => {
            let Some(actor) = world.actor else {
                return;
            };
            out_events.push(Event::SlideStopped {
                cell: actor.cell,
                reason,
            });
            if reason == StopReason::Goal {
                if let Some(goal) = world.goal {
                    info!("actor stopped in front of the goal at {goal:?}");
                    out_events.push(Event::GoalReached {
                        cell: actor.cell,
                        goal,
                    });
                }
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use ice_slide_core::{ActorSnapshot, CellCoord, CellTransform, EntityKind, GridView};

    use super::{PlacedEntity, World};

    /// Identifier of the map currently built, if any.
    #[must_use]
    pub fn map_id(world: &World) -> Option<&str> {
        world.map_id.as_deref()
    }

    /// Transform used to position the current map.
    #[must_use]
    pub fn transform(world: &World) -> &CellTransform {
        &world.transform
    }

    /// Captures a read-only view of the built grid.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        GridView::new(&world.obstacles, world.transform, world.goal)
    }

    /// Entities placed by the most recent build, in placement order.
    #[must_use]
    pub fn entities(world: &World) -> &[PlacedEntity] {
        &world.entities
    }

    /// Finds a placed entity by its display name.
    #[must_use]
    pub fn entity_named<'world>(world: &'world World, name: &str) -> Option<&'world PlacedEntity> {
        world.entities.iter().find(|entity| entity.name() == name)
    }

    /// Counts the placed entities of the provided kind.
    #[must_use]
    pub fn count_of(world: &World, kind: EntityKind) -> usize {
        world
            .entities
            .iter()
            .filter(|entity| entity.kind() == kind)
            .count()
    }

    /// Cell holding the goal, if any.
    #[must_use]
    pub fn goal(world: &World) -> Option<CellCoord> {
        world.goal
    }

    /// Cell holding the spawn marker, if any.
    #[must_use]
    pub fn spawn(world: &World) -> Option<CellCoord> {
        world.spawn
    }

    /// Captures the actor's current state.
    #[must_use]
    pub fn actor(world: &World) -> Option<ActorSnapshot> {
        world.actor.map(|actor| ActorSnapshot {
            cell: actor.cell,
            position: actor.position,
        })
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
