// crates/geotile-core/src/model/key.rs
use crate::common::TILE_EXTENSION;
use crate::error::{GeoError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 1°×1° cell, identified by the ceiling of latitude (`x`) and longitude (`y`).
///
/// Because the key uses `ceil`, cell `(x, y)` covers the half-open range
/// `(x-1, x] × (y-1, y]`. A point sitting exactly on an integer line belongs
/// to the cell *below/left of* it: `(1.0, 1.0)` is in `(1, 1)`, not `(2, 2)`.
/// Builder and loader both go through [`cell_key`], which is what keeps them
/// in agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileKey {
    pub x: i32,
    pub y: i32,
}

/// Computes the owning cell of a coordinate.
///
/// Total and deterministic for finite input.
///
/// ```rust
/// use geotile_core::{cell_key, TileKey};
///
/// assert_eq!(cell_key(1.0, 1.0), TileKey::new(1, 1));
/// assert_eq!(cell_key(1.5, -0.5), TileKey::new(2, 0));
/// ```
#[inline]
pub fn cell_key(latitude: f64, longitude: f64) -> TileKey {
    // `as` saturates; -0.0 becomes 0, which is what the file name needs.
    TileKey {
        x: latitude.ceil() as i32,
        y: longitude.ceil() as i32,
    }
}

impl TileKey {
    pub const fn new(x: i32, y: i32) -> Self {
        TileKey { x, y }
    }

    /// The cell that owns `point`.
    pub fn for_point(point: QueryPoint) -> Self {
        cell_key(point.latitude, point.longitude)
    }

    /// File name under the store root: `"{x}_{y}.txt"`.
    pub fn file_name(&self) -> String {
        format!("{}_{}.{}", self.x, self.y, TILE_EXTENSION)
    }

    /// Parses a name produced by [`TileKey::file_name`].
    ///
    /// Returns `None` for anything else (wrong extension, leading zeros,
    /// stray whitespace), so foreign files in a store directory are ignored.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(TILE_EXTENSION)?.strip_suffix('.')?;
        let (x, y) = stem.split_once('_')?;
        let key = TileKey {
            x: x.parse().ok()?,
            y: y.parse().ok()?,
        };
        // Reject "01_2.txt", "+1_2.txt" and friends.
        (key.file_name() == name).then_some(key)
    }

    /// Covered range as `((lat_min, lat_max), (lng_min, lng_max))`.
    /// Minimums are exclusive, maximums inclusive.
    pub fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        let (x, y) = (f64::from(self.x), f64::from(self.y));
        ((x - 1.0, x), (y - 1.0, y))
    }

    /// True if `(latitude, longitude)` falls inside this cell.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        cell_key(latitude, longitude) == *self
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.x, self.y)
    }
}

/// A query coordinate. Ephemeral, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl QueryPoint {
    pub const LAT_RANGE: (f64, f64) = (-90.0, 90.0);
    pub const LNG_RANGE: (f64, f64) = (-180.0, 180.0);

    /// Validated constructor: latitude in [-90, 90], longitude in [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let lat_ok = (Self::LAT_RANGE.0..=Self::LAT_RANGE.1).contains(&latitude);
        let lng_ok = (Self::LNG_RANGE.0..=Self::LNG_RANGE.1).contains(&longitude);
        if lat_ok && lng_ok {
            Ok(QueryPoint {
                latitude,
                longitude,
            })
        } else {
            Err(GeoError::InvalidCoordinate {
                lat: latitude,
                lng: longitude,
            })
        }
    }

    pub fn key(&self) -> TileKey {
        TileKey::for_point(*self)
    }
}

impl fmt::Display for QueryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceiling_semantics() {
        assert_eq!(cell_key(1.0, 1.0), TileKey::new(1, 1));
        assert_eq!(cell_key(1.5, -0.5), TileKey::new(2, 0));
        assert_eq!(cell_key(37.7, -122.4), TileKey::new(38, -122));
        assert_eq!(cell_key(-90.0, -180.0), TileKey::new(-90, -180));
        assert_eq!(cell_key(90.0, 180.0), TileKey::new(90, 180));
        assert_eq!(cell_key(-0.0001, 0.0001), TileKey::new(0, 1));
    }

    #[test]
    fn deterministic() {
        for &(lat, lng) in &[(12.34, 56.78), (-33.9, 151.2), (0.0, 0.0)] {
            assert_eq!(cell_key(lat, lng), cell_key(lat, lng));
        }
    }

    #[test]
    fn negative_zero_names_without_sign() {
        assert_eq!(cell_key(-0.5, -0.5).file_name(), "0_0.txt");
    }

    #[test]
    fn file_names() {
        let key = TileKey::new(-21, 56);
        assert_eq!(key.file_name(), "-21_56.txt");
        assert_eq!(TileKey::from_file_name("-21_56.txt"), Some(key));
        assert_eq!(TileKey::from_file_name("01_2.txt"), None);
        assert_eq!(TileKey::from_file_name("1_2.csv"), None);
        assert_eq!(TileKey::from_file_name("1-2.txt"), None);
        assert_eq!(TileKey::from_file_name("notes.txt"), None);
    }

    #[test]
    fn bounds_are_half_open() {
        let key = TileKey::new(1, 1);
        assert_eq!(key.bounds(), ((0.0, 1.0), (0.0, 1.0)));
        assert!(key.contains(1.0, 1.0));
        assert!(key.contains(0.5, 0.5));
        assert!(!key.contains(0.0, 0.5));
    }

    #[test]
    fn query_point_validation() {
        assert!(QueryPoint::new(90.0, -180.0).is_ok());
        assert!(QueryPoint::new(90.1, 0.0).is_err());
        assert!(QueryPoint::new(0.0, 180.5).is_err());
        assert!(QueryPoint::new(f64::NAN, 0.0).is_err());
    }
}
