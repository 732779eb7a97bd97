#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays slide inputs against a map catalog.

mod config;
mod session;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use ice_slide_core::Direction;
use ice_slide_system_builder::Builder;
use ice_slide_system_catalog::MapCatalog;
use ice_slide_system_levels::{LevelSequencer, ProgressRecord, ProgressTracker};
use log::{info, warn};
use serde::Serialize;

use crate::{config::GameConfig, session::SessionBuilder};

/// Headless runner for ice-sliding grid puzzles.
#[derive(Debug, Parser)]
#[command(name = "ice-slide", version)]
struct Args {
    /// JSON map collection; the built-in fallback map is used when omitted.
    #[arg(long, value_name = "PATH")]
    maps: Option<PathBuf>,
    /// TOML game configuration.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Level to start on instead of the configured first level.
    #[arg(long, value_name = "ID")]
    level: Option<String>,
    /// Slide inputs to replay, e.g. `RDLU`.
    #[arg(long, default_value = "")]
    moves: String,
    /// JSON file the player progress is read from and written back to.
    #[arg(long, value_name = "PATH")]
    progress: Option<PathBuf>,
    /// Tick budget for a single slide before the replay is abandoned.
    #[arg(long, default_value_t = 10_000)]
    max_ticks: usize,
}

#[derive(Debug, Serialize)]
struct Summary<'a> {
    level: Option<&'a str>,
    cell: Option<[i32; 2]>,
    goals_reached: usize,
    completed: Vec<&'a str>,
    unlocked: Vec<&'a str>,
}

/// Entry point for the ice-slide command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = GameConfig::load(args.config.as_deref())?;
    let moves = parse_moves(&args.moves)?;

    let catalog = match &args.maps {
        Some(path) => MapCatalog::from_path(path),
        None => MapCatalog::fallback(),
    };
    let record = match &args.progress {
        Some(path) if path.exists() => load_progress(path)?,
        _ => ProgressRecord::default(),
    };
    let progress = ProgressTracker::from_record(
        record,
        config.first_level_id.clone(),
        config.unlock_all_levels,
    );

    let mut session = SessionBuilder::new(LevelSequencer::new(config.level_ids.clone()), progress)
        .with_catalog(catalog)
        .with_builder(Builder::new(config.build_config()))
        .with_movement(config.movement_config())
        .auto_load(config.auto_load_first_level && args.level.is_none())
        .build()?;

    if let Some(level) = &args.level {
        if !session.select_level(level) {
            warn!("could not start on level {level}");
        }
    }

    let frame = config.frame();
    'moves: for direction in moves {
        session.press(direction);
        let mut ticks = 0;
        while session.is_sliding() {
            if ticks == args.max_ticks {
                warn!("{direction:?} slide still moving after {ticks} ticks; abandoning replay");
                break 'moves;
            }
            session.tick(frame);
            ticks += 1;
        }
    }

    if let Some(path) = &args.progress {
        save_progress(path, &session.progress().record())?;
        info!("progress saved to {}", path.display());
    }

    let summary = Summary {
        level: session.current_level(),
        cell: session
            .actor_cell()
            .map(|cell| [cell.column(), cell.row()]),
        goals_reached: session.goals_reached(),
        completed: session.progress().completed_levels(),
        unlocked: session.progress().unlocked_levels(),
    };
    let json = serde_json::to_string_pretty(&summary).context("failed to serialise run summary")?;
    println!("{json}");
    Ok(())
}

fn parse_moves(script: &str) -> Result<Vec<Direction>> {
    script
        .chars()
        .filter(|symbol| !symbol.is_whitespace() && *symbol != ',')
        .map(|symbol| match symbol.to_ascii_uppercase() {
            'U' => Ok(Direction::Up),
            'D' => Ok(Direction::Down),
            'L' => Ok(Direction::Left),
            'R' => Ok(Direction::Right),
            _ => bail!("unknown move `{symbol}`; expected one of U, D, L, R"),
        })
        .collect()
}

fn load_progress(path: &Path) -> Result<ProgressRecord> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read progress at {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse progress json at {}", path.display()))
}

fn save_progress(path: &Path, record: &ProgressRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(record).context("failed to serialise progress")?;
    fs::write(path, json).with_context(|| format!("failed to write progress to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_move_script() {
        let moves = parse_moves("r, D l\nu").expect("valid script");

        assert_eq!(
            moves,
            [Direction::Right, Direction::Down, Direction::Left, Direction::Up]
        );
    }

    #[test]
    fn rejects_unknown_move() {
        let error = parse_moves("RX").expect_err("X is not a move");

        assert!(error.to_string().contains('X'));
    }

    #[test]
    fn args_accept_every_flag() {
        let args = Args::try_parse_from([
            "ice-slide",
            "--maps",
            "maps.json",
            "--config",
            "game.toml",
            "--level",
            "level2",
            "--moves",
            "RD",
            "--progress",
            "progress.json",
            "--max-ticks",
            "50",
        ])
        .expect("flags parse");

        assert_eq!(args.level.as_deref(), Some("level2"));
        assert_eq!(args.max_ticks, 50);
        assert_eq!(args.maps, Some(PathBuf::from("maps.json")));
    }
}
