use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use ice_slide_system_builder::BuildConfig;
use ice_slide_system_movement::MovementConfig;
use serde::Deserialize;

/// Tunables for a play session, read from a TOML file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    /// Edge length of one grid cell in world units.
    pub(crate) tile_size: f32,
    /// World-space translation applied to the centred grid.
    pub(crate) map_offset: [f32; 2],
    /// Cells travelled per second while sliding.
    pub(crate) move_speed: f32,
    /// Stop slides at the grid edge instead of leaving the map.
    pub(crate) confine_to_grid: bool,
    /// Simulation ticks per second.
    pub(crate) tick_hz: u32,
    /// Level identifiers in play order.
    pub(crate) level_ids: Vec<String>,
    /// Level that is unlocked from the start.
    pub(crate) first_level_id: String,
    /// Treat every level as unlocked.
    pub(crate) unlock_all_levels: bool,
    /// Build the first level as soon as the session starts.
    pub(crate) auto_load_first_level: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_size: 1.0,
            map_offset: [0.0, 0.0],
            move_speed: 5.0,
            confine_to_grid: true,
            tick_hz: 60,
            level_ids: vec!["level1".to_owned(), "level2".to_owned(), "level3".to_owned()],
            first_level_id: "level1".to_owned(),
            unlock_all_levels: false,
            auto_load_first_level: true,
        }
    }
}

impl GameConfig {
    /// Reads the configuration at `path`, or the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read game config at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid game config {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse game config toml contents")?;
        if config.tick_hz == 0 {
            bail!("tick_hz must be greater than zero");
        }
        if config.tile_size.is_nan() || config.tile_size <= 0.0 {
            bail!("tile_size must be positive, got {}", config.tile_size);
        }
        if config.level_ids.is_empty() {
            bail!("level_ids must name at least one level");
        }
        Ok(config)
    }

    /// Duration of a single simulation tick.
    pub(crate) fn frame(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_hz))
    }

    pub(crate) fn build_config(&self) -> BuildConfig {
        BuildConfig {
            tile_size: self.tile_size,
            map_offset: Vec2::from(self.map_offset),
        }
    }

    pub(crate) fn movement_config(&self) -> MovementConfig {
        MovementConfig {
            move_speed: self.move_speed,
            confine_to_grid: self.confine_to_grid,
        }
    }
}
