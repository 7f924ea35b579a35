// crates/geotile-core/src/lib.rs

//! # geotile-core
//!
//! Answers "which known city is closest to this (lat, lng)?" without holding
//! the whole gazetteer in memory. Cities are filed into 1°×1° tiles on disk
//! (`{ceil(lat)}_{ceil(lng)}.txt`); a query loads only its own tile and scans
//! it linearly.
//!
//! ```no_run
//! use geotile_core::prelude::*;
//!
//! # fn main() -> geotile_core::Result<()> {
//! let config = TileStoreConfig::new("quad");
//! let mut driver = QueryDriver::from_config(&config);
//! match driver.query_coordinates(37.7, -122.4)? {
//!     QueryOutcome::Nearest(hit) => println!("{} ({}, {})", hit.name(), hit.region(), hit.country()),
//!     _ => println!("No nearby city known"),
//! }
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cache; // Optional LRU in front of the loader
pub mod common;
pub mod config;
pub mod error;
pub mod loader; // Tile Loader (+ Tile Builder behind "builder")
pub mod model;
pub mod query; // Query Driver: direct + sampling modes
pub mod schema;
pub mod search; // Nearest-neighbor scan
pub mod store;
pub mod traits;

// Re-exports
pub use crate::cache::{CacheStats, CachedTileLoader};
pub use crate::common::{BuildStats, LoadStats, StoreStats, DEFAULT_TILE_ROOT};
pub use crate::config::TileStoreConfig;
pub use crate::error::{GeoError, Result};
#[cfg(feature = "builder")]
pub use crate::loader::builder::{build_tiles, TileBuilder};
pub use crate::loader::TileLoader;
pub use crate::model::{
    cell_key, CityRecord, CityTile, DefaultCityRecord, DefaultCityTile, QueryPoint, RawRecord,
    TileKey, TileLoad,
};
pub use crate::query::{random_point, QueryDriver, QueryOutcome, SampledQuery};
pub use crate::schema::RecordSchema;
pub use crate::search::{nearest, squared_distance, NearestResult};
pub use crate::store::TileStore;
pub use crate::traits::{
    DefaultBackend, GeoBackend, LoadObserver, NearestSearch, TileSource,
};

/// Common types and traits in one import.
pub mod prelude {
    #[cfg(feature = "builder")]
    pub use crate::loader::builder::TileBuilder;
    pub use crate::{
        CachedTileLoader, CityRecord, CityTile, DefaultBackend, GeoBackend, GeoError,
        LoadObserver, NearestResult, NearestSearch, QueryDriver, QueryOutcome, QueryPoint,
        RecordSchema, Result, TileKey, TileLoad, TileLoader, TileSource,
        TileStore, TileStoreConfig,
    };
}
