#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Loaded map collection with id lookup.
//!
//! Loading never fails: unreadable files, malformed JSON and collections that
//! validate down to nothing all degrade to the built-in fallback map.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use ice_slide_core::{LookupError, MapCollection, MapData};
use ice_slide_system_validator::{validate_or_fallback, ValidationReport};
use log::{debug, error, info};

const PREVIEW_LENGTH: usize = 200;

/// Validated maps available to the level sequencer.
#[derive(Clone, Debug)]
pub struct MapCatalog {
    maps: Vec<MapData>,
    report: ValidationReport,
}

impl MapCatalog {
    /// Validates the provided maps, falling back when none survive.
    #[must_use]
    pub fn from_maps(maps: Vec<MapData>) -> Self {
        let (maps, report) = validate_or_fallback(maps);
        info!("map catalog holds {} maps", maps.len());
        Self { maps, report }
    }

    /// Catalog holding only the built-in fallback map.
    #[must_use]
    pub fn fallback() -> Self {
        Self::from_maps(Vec::new())
    }

    /// Parses a JSON map collection document.
    #[must_use]
    pub fn from_json(json: &str) -> Self {
        match parse_collection(json) {
            Ok(collection) => Self::from_maps(collection.maps),
            Err(error) => {
                error!("{error:#}");
                Self::fallback()
            }
        }
    }

    /// Reads and parses a JSON map collection from disk.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match fs::read_to_string(path)
            .with_context(|| format!("failed to read map file {}", path.display()))
        {
            Ok(contents) => {
                debug!("read map file {}", path.display());
                Self::from_json(&contents)
            }
            Err(error) => {
                error!("{error:#}");
                Self::fallback()
            }
        }
    }

    /// Replaces the catalog contents with a freshly parsed document.
    pub fn reload_from_json(&mut self, json: &str) {
        *self = Self::from_json(json);
    }

    /// Looks up a map by exact identifier.
    pub fn get(&self, id: &str) -> Result<&MapData, LookupError> {
        self.maps
            .iter()
            .find(|map| map.id == id)
            .ok_or_else(|| LookupError {
                id: id.to_owned(),
                available: self.available_ids().into_iter().map(str::to_owned).collect(),
            })
    }

    /// Looks up a map, substituting the first loaded map on a miss.
    #[must_use]
    pub fn get_or_first(&self, id: &str) -> Option<&MapData> {
        match self.get(id) {
            Ok(map) => Some(map),
            Err(lookup) => {
                error!("{lookup}");
                let first = self.maps.first();
                if let Some(map) = first {
                    info!("using fallback map: {}", map.id);
                }
                first
            }
        }
    }

    /// Identifiers of every loaded map in document order.
    #[must_use]
    pub fn available_ids(&self) -> Vec<&str> {
        self.maps.iter().map(|map| map.id.as_str()).collect()
    }

    /// Every loaded map in document order.
    #[must_use]
    pub fn maps(&self) -> &[MapData] {
        &self.maps
    }

    /// Number of loaded maps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Reports whether the catalog is empty. Always `false` after loading.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Findings from the validation pass that produced the catalog.
    #[must_use]
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }
}

fn parse_collection(json: &str) -> Result<MapCollection> {
    let trimmed = json.trim();
    if trimmed.is_empty() {
        bail!("map document is empty");
    }
    debug!("map document preview: {}", preview(trimmed));

    let collection: MapCollection = serde_json::from_str(trimmed)
        .with_context(|| format!("failed to parse map document: {}", preview(trimmed)))?;
    if collection.maps.is_empty() {
        bail!("no maps found in map document");
    }
    Ok(collection)
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(PREVIEW_LENGTH) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
