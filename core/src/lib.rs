#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ice Slide engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems consume event streams, query immutable views such as
//! [`GridView`], and respond exclusively with new command batches.

use std::{collections::BTreeSet, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::{ConfigurationError, DataIntegrityWarning, InvalidMapError, LookupError};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces every placed entity with the contents of a freshly built layout.
    LoadLayout {
        /// Layout produced by the map builder.
        layout: MapLayout,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Announces that the actor started sliding in the provided direction.
    BeginSlide {
        /// Direction of travel for the slide.
        direction: Direction,
    },
    /// Places the actor at an intermediate position between two cells.
    MoveActor {
        /// Interpolated world-space position.
        position: Vec2,
    },
    /// Snaps the actor onto the exact centre of the provided cell.
    SettleActor {
        /// Cell the actor finished entering.
        cell: CellCoord,
    },
    /// Announces that the active slide came to rest.
    EndSlide {
        /// Reason the slide stopped.
        reason: StopReason,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that all previously placed entities were removed.
    MapCleared {
        /// Number of entities removed from the scene.
        removed: usize,
    },
    /// Confirms that a new map was materialised into the scene.
    MapBuilt {
        /// Identifier of the map that was built.
        map_id: String,
        /// Number of wall entities placed.
        walls: usize,
        /// Cell occupied by the goal, if the map declares one.
        goal: Option<CellCoord>,
        /// Cell where the actor was spawned, if the map declares one.
        spawn: Option<CellCoord>,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the actor began a slide.
    SlideStarted {
        /// Direction of the slide.
        direction: Direction,
        /// Cell the actor occupied when the slide began.
        from: CellCoord,
    },
    /// Confirms that the actor moved between two neighbouring cells.
    ActorAdvanced {
        /// Cell the actor occupied before moving.
        from: CellCoord,
        /// Cell the actor occupies after completing the move.
        to: CellCoord,
    },
    /// Confirms that the actor's slide came to rest.
    SlideStopped {
        /// Cell the actor rests on.
        cell: CellCoord,
        /// Reason the slide stopped.
        reason: StopReason,
    },
    /// Reports that a slide ended directly in front of the goal.
    GoalReached {
        /// Cell the actor rests on, adjacent to the goal.
        cell: CellCoord,
        /// Cell occupied by the goal.
        goal: CellCoord,
    },
    /// Announces that the level sequencer selected another level.
    LevelChanged {
        /// Zero-based index of the selected level.
        index: usize,
    },
}

/// Reasons an active slide can come to rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The next cell holds the goal; the actor stops in front of it.
    Goal,
    /// The next cell holds a wall.
    Obstacle,
    /// The next cell lies outside the declared grid.
    Boundary,
}

/// Cardinal slide directions available to the actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// All directions in input order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit offset expressed as `(column, row)` deltas in grid space.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed so a slide that is not confined to the declared grid
/// can still be described once it walks past the edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the neighbouring cell one unit step away in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            column: self.column.saturating_add(dx),
            row: self.row.saturating_add(dy),
        }
    }
}

/// Integer tag stored in each map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileCode {
    /// Code `0`: open floor.
    Empty,
    /// Code `1`: impassable wall.
    Wall,
    /// Code `2`: level goal.
    Goal,
    /// Code `3`: actor spawn point.
    Spawn,
    /// Any other code; treated as open floor.
    Other(i32),
}

impl TileCode {
    /// Decodes a raw integer cell value.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Empty,
            1 => Self::Wall,
            2 => Self::Goal,
            3 => Self::Spawn,
            other => Self::Other(other),
        }
    }

    /// Raw integer representation of the tile.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Empty => 0,
            Self::Wall => 1,
            Self::Goal => 2,
            Self::Spawn => 3,
            Self::Other(code) => code,
        }
    }
}

/// Map record as stored in the persisted JSON document.
///
/// Every field falls back to its default when absent so that incomplete
/// records can be reported by the validator rather than failing the whole
/// document. A `null` row deserialises to `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapData {
    /// Unique map identifier.
    pub id: String,
    /// Declared number of columns.
    pub width: i32,
    /// Declared number of rows.
    pub height: i32,
    /// Rows of raw tile codes, top row first.
    pub tiles: Vec<Option<Vec<i32>>>,
}

impl MapData {
    /// Creates a map from fully populated rows.
    #[must_use]
    pub fn from_rows(id: impl Into<String>, width: i32, height: i32, rows: Vec<Vec<i32>>) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            tiles: rows.into_iter().map(Some).collect(),
        }
    }

    /// Decodes the tile stored at `cell`.
    ///
    /// Cells beyond the stored rows, including cells of `null` rows, read as
    /// [`TileCode::Empty`].
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> TileCode {
        let (Ok(row), Ok(column)) = (
            usize::try_from(cell.row()),
            usize::try_from(cell.column()),
        ) else {
            return TileCode::Empty;
        };

        self.tiles
            .get(row)
            .and_then(Option::as_ref)
            .and_then(|cells| cells.get(column))
            .map_or(TileCode::Empty, |code| TileCode::from_code(*code))
    }
}

/// Document wrapper holding every persisted map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapCollection {
    /// Maps in document order.
    pub maps: Vec<MapData>,
}

/// Deterministic mapping from grid cells to world-space positions.
///
/// The grid is centred around the origin; row indices grow downward, so the
/// vertical axis is negated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellTransform {
    columns: u32,
    rows: u32,
    tile_size: f32,
    offset: Vec2,
}

impl CellTransform {
    /// Creates a transform for a grid of the provided dimensions.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, tile_size: f32, offset: Vec2) -> Self {
        Self {
            columns,
            rows,
            tile_size,
            offset,
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of one tile in world units.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Offset added to every computed position.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// World-space centre of the provided cell.
    #[must_use]
    pub fn position_of(&self, cell: CellCoord) -> Vec2 {
        let center_x = (self.columns as f32 - 1.0) / 2.0;
        let center_y = (self.rows as f32 - 1.0) / 2.0;
        let local = Vec2::new(
            cell.column() as f32 - center_x,
            -(cell.row() as f32 - center_y),
        );
        local * self.tile_size + self.offset
    }

    /// Reports whether `cell` lies inside the declared grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        let column_inside = u32::try_from(cell.column()).map_or(false, |c| c < self.columns);
        let row_inside = u32::try_from(cell.row()).map_or(false, |r| r < self.rows);
        column_inside && row_inside
    }
}

/// Kinds of entity the map builder can place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Impassable wall tile.
    Wall,
    /// Level goal.
    Goal,
    /// Actor spawn marker.
    Spawn,
}

/// Single entity placement produced by the map builder.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// Kind of entity to place.
    pub kind: EntityKind,
    /// Grid cell the entity occupies.
    pub cell: CellCoord,
    /// Deterministic display name.
    pub name: String,
    /// World-space position of the entity.
    pub position: Vec2,
}

/// Complete set of placements describing one built map.
#[derive(Clone, Debug, PartialEq)]
pub struct MapLayout {
    map_id: String,
    transform: CellTransform,
    placements: Vec<Placement>,
}

impl MapLayout {
    /// Creates a layout from its transform and placements.
    #[must_use]
    pub fn new(map_id: impl Into<String>, transform: CellTransform, placements: Vec<Placement>) -> Self {
        Self {
            map_id: map_id.into(),
            transform,
            placements,
        }
    }

    /// Identifier of the map the layout was built from.
    #[must_use]
    pub fn map_id(&self) -> &str {
        &self.map_id
    }

    /// Transform used to position every placement.
    #[must_use]
    pub const fn transform(&self) -> &CellTransform {
        &self.transform
    }

    /// Placements in build order.
    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Iterator over the cells holding walls.
    pub fn walls(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells_of(EntityKind::Wall)
    }

    /// Cell of the goal placement, if any.
    #[must_use]
    pub fn goal(&self) -> Option<CellCoord> {
        self.cells_of(EntityKind::Goal).last()
    }

    /// Cell of the spawn placement, if any.
    #[must_use]
    pub fn spawn(&self) -> Option<CellCoord> {
        self.cells_of(EntityKind::Spawn).last()
    }

    fn cells_of(&self, kind: EntityKind) -> impl Iterator<Item = CellCoord> + '_ {
        self.placements
            .iter()
            .filter(move |placement| placement.kind == kind)
            .map(|placement| placement.cell)
    }
}

/// Read-only view into the built grid used for passability queries.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    obstacles: &'a BTreeSet<CellCoord>,
    transform: CellTransform,
    goal: Option<CellCoord>,
}

impl<'a> GridView<'a> {
    /// Captures a new grid view backed by the set of wall cells.
    #[must_use]
    pub fn new(obstacles: &'a BTreeSet<CellCoord>, transform: CellTransform, goal: Option<CellCoord>) -> Self {
        Self {
            obstacles,
            transform,
            goal,
        }
    }

    /// Transform used to convert cells into world positions.
    #[must_use]
    pub const fn transform(&self) -> &CellTransform {
        &self.transform
    }

    /// Goal cell of the built map, if any.
    #[must_use]
    pub const fn goal(&self) -> Option<CellCoord> {
        self.goal
    }

    /// Reports whether the provided cell holds the goal.
    #[must_use]
    pub fn is_goal(&self, cell: CellCoord) -> bool {
        self.goal == Some(cell)
    }

    /// Reports whether the provided cell holds a wall.
    ///
    /// Cells outside the grid never hold walls.
    #[must_use]
    pub fn is_obstacle(&self, cell: CellCoord) -> bool {
        self.obstacles.contains(&cell)
    }

    /// Reports whether the provided cell lies inside the declared grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.transform.contains(cell)
    }

    /// World-space centre of the provided cell.
    #[must_use]
    pub fn position_of(&self, cell: CellCoord) -> Vec2 {
        self.transform.position_of(cell)
    }
}

/// Immutable representation of the actor used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorSnapshot {
    /// Cell the actor currently rests on or last settled on.
    pub cell: CellCoord,
    /// World-space position of the actor.
    pub position: Vec2,
}
