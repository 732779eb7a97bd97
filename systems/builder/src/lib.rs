#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns validated map data into a layout of placements.

use glam::Vec2;
use ice_slide_core::{
    CellCoord, CellTransform, Command, EntityKind, InvalidMapError, MapData, MapLayout, Placement,
    TileCode,
};
use log::{debug, error, warn};

/// Name given to the goal placement.
pub const GOAL_NAME: &str = "Goal";
/// Name given to the spawn placement.
pub const SPAWN_NAME: &str = "Player";

/// Placement parameters shared by every map the builder produces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildConfig {
    /// Side length of a single tile in world units.
    pub tile_size: f32,
    /// Offset added to every placement position.
    pub map_offset: Vec2,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            tile_size: 1.0,
            map_offset: Vec2::ZERO,
        }
    }
}

/// Map builder that translates map data into layout commands.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    config: BuildConfig,
}

impl Builder {
    /// Creates a new builder using the provided placement parameters.
    #[must_use]
    pub const fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Placement parameters used by this builder.
    #[must_use]
    pub const fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Builds `map` and emits the resulting [`Command::LoadLayout`].
    ///
    /// Input is checked before anything is emitted, so a rejected map leaves
    /// the world exactly as it was.
    pub fn handle(
        &self,
        map: Option<&MapData>,
        out: &mut Vec<Command>,
    ) -> Result<(), InvalidMapError> {
        let result = map
            .ok_or(InvalidMapError::MissingMap)
            .and_then(|map| self.build(map));

        match result {
            Ok(layout) => {
                out.push(Command::LoadLayout { layout });
                Ok(())
            }
            Err(rejection) => {
                error!("{rejection}");
                Err(rejection)
            }
        }
    }

    /// Computes the placements for `map` without emitting any command.
    ///
    /// Walls are emitted in row-major order and named after their cell. When a
    /// map holds several goal or spawn cells the last one scanned wins. Only
    /// stored cells inside the declared dimensions are visited, so a record
    /// that overstates its width costs no more than its actual rows.
    pub fn build(&self, map: &MapData) -> Result<MapLayout, InvalidMapError> {
        if map.tiles.is_empty() {
            return Err(InvalidMapError::NoTiles { id: map.id.clone() });
        }

        debug!("building map: {} ({}x{})", map.id, map.width, map.height);

        let columns = u32::try_from(map.width).unwrap_or(0);
        let rows = u32::try_from(map.height).unwrap_or(0);
        let transform = CellTransform::new(
            columns,
            rows,
            self.config.tile_size,
            self.config.map_offset,
        );

        let mut placements = Vec::new();
        let mut goals = Vec::new();
        let mut spawns = Vec::new();

        let stored_rows = map.tiles.iter().take(usize::try_from(rows).unwrap_or(usize::MAX));
        for (y, cells) in (0..).zip(stored_rows) {
            let Some(cells) = cells else {
                continue;
            };
            let stored_cells = cells.iter().take(usize::try_from(columns).unwrap_or(usize::MAX));
            for (x, code) in (0..).zip(stored_cells) {
                let cell = CellCoord::new(x, y);
                match TileCode::from_code(*code) {
                    TileCode::Wall => placements.push(Placement {
                        kind: EntityKind::Wall,
                        cell,
                        name: wall_name(cell),
                        position: transform.position_of(cell),
                    }),
                    TileCode::Goal => goals.push(cell),
                    TileCode::Spawn => spawns.push(cell),
                    TileCode::Empty | TileCode::Other(_) => {}
                }
            }
        }

        if goals.len() > 1 {
            warn!("map '{}' holds {} goal cells; the last one is used", map.id, goals.len());
        }
        if spawns.len() > 1 {
            warn!("map '{}' holds {} spawn cells; the last one is used", map.id, spawns.len());
        }

        if let Some(cell) = goals.last().copied() {
            placements.push(Placement {
                kind: EntityKind::Goal,
                cell,
                name: GOAL_NAME.to_owned(),
                position: transform.position_of(cell),
            });
        }
        if let Some(cell) = spawns.last().copied() {
            placements.push(Placement {
                kind: EntityKind::Spawn,
                cell,
                name: SPAWN_NAME.to_owned(),
                position: transform.position_of(cell),
            });
        }

        Ok(MapLayout::new(map.id.clone(), transform, placements))
    }
}

/// Deterministic name of the wall placed at `cell`.
#[must_use]
pub fn wall_name(cell: CellCoord) -> String {
    format!("Wall_{}_{}", cell.column(), cell.row())
}
