//! Error taxonomy shared by the map pipeline and session wiring.

use thiserror::Error;

/// A required collaborator was not supplied when wiring a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No map catalog was provided.
    #[error("map catalog is not assigned")]
    MissingCatalog,
    /// No map builder was provided.
    #[error("map builder is not assigned")]
    MissingBuilder,
}

/// Map data that cannot be materialised into a scene.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidMapError {
    /// No map was available to build.
    #[error("map data is missing")]
    MissingMap,
    /// The map carries no tile rows.
    #[error("map '{id}' has no tiles data")]
    NoTiles {
        /// Identifier of the rejected map.
        id: String,
    },
}

/// Non-fatal finding reported while validating persisted maps.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DataIntegrityWarning {
    /// The map has an empty identifier and was removed.
    #[error("map at index {index} has no id - removing")]
    MissingId {
        /// Position of the map in the input collection.
        index: usize,
    },
    /// The map has no tile rows and was removed.
    #[error("map '{id}' has no tiles - removing")]
    MissingTiles {
        /// Identifier of the removed map.
        id: String,
    },
    /// The map declares a non-positive dimension and was removed.
    #[error("map '{id}' has invalid dimensions {width}x{height} - removing")]
    InvalidDimensions {
        /// Identifier of the removed map.
        id: String,
        /// Declared width.
        width: i32,
        /// Declared height.
        height: i32,
    },
    /// The declared height disagreed with the row count and was corrected.
    #[error("map '{id}' height corrected: {from} -> {to}")]
    HeightCorrected {
        /// Identifier of the corrected map.
        id: String,
        /// Height declared by the record.
        from: i32,
        /// Height after correction.
        to: i32,
    },
    /// A row was `null`; its width was not checked.
    #[error("map '{id}' has null row at {row}")]
    NullRow {
        /// Identifier of the affected map.
        id: String,
        /// Index of the null row.
        row: usize,
    },
    /// A row length disagreed with the declared width. The map is kept as-is.
    #[error("map '{id}' width mismatch at row {row}: expected {expected}, got {actual}")]
    WidthMismatch {
        /// Identifier of the affected map.
        id: String,
        /// Index of the mismatching row.
        row: usize,
        /// Declared width.
        expected: i32,
        /// Actual row length.
        actual: usize,
    },
}

impl DataIntegrityWarning {
    /// Reports whether the finding caused the map to be dropped.
    #[must_use]
    pub const fn drops_map(&self) -> bool {
        matches!(
            self,
            Self::MissingId { .. } | Self::MissingTiles { .. } | Self::InvalidDimensions { .. }
        )
    }
}

/// A requested map id is absent from the loaded collection.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("map '{}' not found; available maps: {}", .id, .available.join(", "))]
pub struct LookupError {
    /// Identifier that was requested.
    pub id: String,
    /// Identifiers that are loaded.
    pub available: Vec<String>,
}
