#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Repairs or rejects map records loaded from untrusted storage.
//!
//! Structural defects (empty id, no tiles, non-positive dimensions) drop the
//! map. A declared height that disagrees with the row count is corrected in
//! place. Null rows and ragged rows are reported but left untouched; the
//! builder reads missing cells as open floor.

use ice_slide_core::{DataIntegrityWarning, MapData, TileCode};
use log::{debug, warn};

/// Identifier of the built-in map used when nothing valid was loaded.
pub const FALLBACK_MAP_ID: &str = "fallback";

const FALLBACK_SIZE: i32 = 5;

/// Findings collected during a validation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    findings: Vec<DataIntegrityWarning>,
    used_fallback: bool,
}

impl ValidationReport {
    /// Every finding in input order.
    #[must_use]
    pub fn findings(&self) -> &[DataIntegrityWarning] {
        &self.findings
    }

    /// Number of maps dropped from the collection.
    #[must_use]
    pub fn removed(&self) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.drops_map())
            .count()
    }

    /// Reports whether the pass found nothing to repair or report.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Reports whether the fallback map replaced an empty collection.
    #[must_use]
    pub const fn used_fallback(&self) -> bool {
        self.used_fallback
    }
}

/// Validates `maps` in place, dropping and correcting records as required.
///
/// Maps are visited from last to first so removals never disturb indices that
/// are still pending. Survivors keep their relative order.
pub fn validate_maps(maps: &mut Vec<MapData>) -> ValidationReport {
    let mut per_map: Vec<Vec<DataIntegrityWarning>> = Vec::with_capacity(maps.len());

    for index in (0..maps.len()).rev() {
        if let Some(rejection) = rejection_for(index, &maps[index]) {
            warn!("{rejection}");
            per_map.push(vec![rejection]);
            let _ = maps.remove(index);
            continue;
        }

        let map = &mut maps[index];
        let findings = repair(map);
        for finding in &findings {
            warn!("{finding}");
        }
        debug!("map '{}' validated: {}x{}", map.id, map.width, map.height);
        per_map.push(findings);
    }

    ValidationReport {
        findings: per_map.into_iter().rev().flatten().collect(),
        used_fallback: false,
    }
}

/// Validates `maps`, substituting [`fallback_map`] when nothing survives.
#[must_use]
pub fn validate_or_fallback(mut maps: Vec<MapData>) -> (Vec<MapData>, ValidationReport) {
    let mut report = validate_maps(&mut maps);
    if maps.is_empty() {
        warn!("no valid maps remain; substituting the fallback map");
        maps.push(fallback_map());
        report.used_fallback = true;
    }
    (maps, report)
}

/// Deterministic 5×5 map: border walls, spawn at (1,1), goal at (3,3).
#[must_use]
pub fn fallback_map() -> MapData {
    let last = FALLBACK_SIZE - 1;
    let rows = (0..FALLBACK_SIZE)
        .map(|y| {
            (0..FALLBACK_SIZE)
                .map(|x| {
                    let tile = if x == 0 || x == last || y == 0 || y == last {
                        TileCode::Wall
                    } else if (x, y) == (1, 1) {
                        TileCode::Spawn
                    } else if (x, y) == (3, 3) {
                        TileCode::Goal
                    } else {
                        TileCode::Empty
                    };
                    tile.code()
                })
                .collect()
        })
        .collect();

    MapData::from_rows(FALLBACK_MAP_ID, FALLBACK_SIZE, FALLBACK_SIZE, rows)
}

fn rejection_for(index: usize, map: &MapData) -> Option<DataIntegrityWarning> {
    if map.id.is_empty() {
        return Some(DataIntegrityWarning::MissingId { index });
    }
    if map.tiles.is_empty() {
        return Some(DataIntegrityWarning::MissingTiles { id: map.id.clone() });
    }
    if map.width <= 0 || map.height <= 0 {
        return Some(DataIntegrityWarning::InvalidDimensions {
            id: map.id.clone(),
            width: map.width,
            height: map.height,
        });
    }
    None
}

fn repair(map: &mut MapData) -> Vec<DataIntegrityWarning> {
    let mut findings = Vec::new();

    let row_count = i32::try_from(map.tiles.len()).unwrap_or(i32::MAX);
    if row_count != map.height {
        findings.push(DataIntegrityWarning::HeightCorrected {
            id: map.id.clone(),
            from: map.height,
            to: row_count,
        });
        map.height = row_count;
    }

    for (row, cells) in map.tiles.iter().enumerate() {
        let Some(cells) = cells else {
            findings.push(DataIntegrityWarning::NullRow {
                id: map.id.clone(),
                row,
            });
            continue;
        };

        let matches_width = usize::try_from(map.width).map_or(false, |width| width == cells.len());
        if !matches_width {
            findings.push(DataIntegrityWarning::WidthMismatch {
                id: map.id.clone(),
                row,
                expected: map.width,
                actual: cells.len(),
            });
        }
    }

    findings
}
