// crates/geotile-core/src/traits.rs
use crate::error::Result;
use crate::model::{QueryPoint, TileKey, TileLoad};
use crate::search::NearestResult;
use serde::{Deserialize, Serialize};

/// Storage backend for strings and floats used by loaded records.
///
/// This abstraction allows the crate to swap how textual and floating-point
/// data are stored internally (for example to use more compact types) without
/// changing the accessors, which always hand out `&str`/`f64` views.
///
/// Implementors must be `Clone + Send + Sync + 'static` and the associated
/// types must be serde-serializable so results can be emitted as JSON.
pub trait GeoBackend: Clone + Send + Sync + 'static {
    type Str: Clone
        + Send
        + Sync
        + PartialEq
        + std::fmt::Debug
        + Serialize
        + for<'de> Deserialize<'de>
        + AsRef<str>;
    type Float: Copy
        + Send
        + Sync
        + PartialEq
        + std::fmt::Debug
        + Serialize
        + for<'de> Deserialize<'de>;

    fn str_from(s: &str) -> Self::Str;
    fn float_from(f: f64) -> Self::Float;
    fn float_to_f64(v: Self::Float) -> f64;
}

/// Default backend: plain `String` + `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DefaultBackend;

impl GeoBackend for DefaultBackend {
    type Str = String;
    type Float = f64;

    #[inline]
    fn str_from(s: &str) -> Self::Str {
        s.to_owned()
    }

    #[inline]
    fn float_from(f: f64) -> Self::Float {
        f
    }

    #[inline]
    fn float_to_f64(v: Self::Float) -> f64 {
        v
    }
}

/// Receives the quirks a tile load normally hides.
///
/// The loader keeps its default behavior (skip malformed lines, last name
/// wins) whether or not an observer is attached; the observer only gets to
/// see it happen.
pub trait LoadObserver {
    /// A line was dropped. `line` is 1-based.
    fn on_skipped_line(&mut self, _key: TileKey, _line: usize, _reason: &str) {}

    /// A later line replaced an earlier record with the same name.
    fn on_overwrite(&mut self, _key: TileKey, _name: &str) {}
}

/// The no-op observer.
impl LoadObserver for () {}

/// Anything that can resolve a [`TileKey`] to its records.
///
/// Implemented by [`crate::TileLoader`] (always reads disk) and
/// [`crate::CachedTileLoader`] (bounded LRU in front of it). The query
/// driver only talks to this trait.
pub trait TileSource {
    type Backend: GeoBackend;

    fn load_tile(&mut self, key: TileKey) -> Result<TileLoad<Self::Backend>>;
}

impl<S: TileSource + ?Sized> TileSource for &mut S {
    type Backend = S::Backend;

    fn load_tile(&mut self, key: TileKey) -> Result<TileLoad<Self::Backend>> {
        (**self).load_tile(key)
    }
}

/// Nearest-record lookup over an in-memory collection.
///
/// Implemented in [`crate::search`] for [`crate::CityTile`] (name order)
/// and for record slices (slice order).
pub trait NearestSearch<B: GeoBackend> {
    /// The closest record to `query` by squared planar distance, or `None`
    /// when there are no records.
    fn nearest(&self, query: QueryPoint) -> Option<NearestResult<B>>;
}
