// crates/geotile-core/src/model/mod.rs
pub mod city;
pub mod key;
pub mod tile;

pub use city::{CityRecord, RawRecord};
pub use key::{cell_key, QueryPoint, TileKey};
pub use tile::{CityTile, TileLoad};

use crate::traits::DefaultBackend;

/// Convenient aliases for the default backend.
pub type DefaultCityRecord = CityRecord<DefaultBackend>;
pub type DefaultCityTile = CityTile<DefaultBackend>;
