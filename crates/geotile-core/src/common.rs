// crates/geotile-core/src/common.rs
//! Shared constants and the counters reported by loads, builds and scans.
use serde::{Deserialize, Serialize};

/// Directory used when no tile-store root is configured.
pub const DEFAULT_TILE_ROOT: &str = "quad";

/// Extension of every tile file (`{x}_{y}.txt`).
pub const TILE_EXTENSION: &str = "txt";

/// Field separator of tile lines and gazetteer dumps.
pub const FIELD_SEPARATOR: char = '\t';

/// Counters for a single tile load.
///
/// `records` is the number of distinct names returned; `lines - skipped`
/// can be larger when duplicate names overwrote each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    pub lines: usize,
    pub records: usize,
    pub skipped: usize,
    pub overwritten: usize,
}

/// Counters for one builder run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    pub lines: usize,
    pub written: usize,
    pub skipped: usize,
    pub tiles_touched: usize,
}

/// Aggregate statistics for a whole tile store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub tiles: usize,
    pub lines: usize,
}
