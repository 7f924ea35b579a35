// crates/geotile-core/src/error.rs
use thiserror::Error;

/// Errors produced by the tile store, builder, loader and query driver.
///
/// A missing tile or a tile without usable records is *not* an error; those
/// come back as [`crate::TileLoad::NotFound`] and
/// [`crate::QueryOutcome::EmptyTile`]. Only [`GeoError::Io`] aborts a query.
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A malformed input line. Recovered locally by the builder and loader.
    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("invalid coordinate ({lat}, {lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("invalid record schema: {0}")]
    Schema(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("no populated tile found after {attempts} sampled points")]
    SamplingExhausted { attempts: u64 },

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GeoError>;

impl GeoError {
    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        GeoError::Parse {
            line,
            reason: reason.into(),
        }
    }
}
