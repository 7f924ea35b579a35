// crates/geotile-core/src/query.rs

//! # Query Driver
//!
//! Runs one query end to end: point → [`TileKey`] → tile load → nearest
//! record. Two modes:
//!
//! - **direct** ([`QueryDriver::query`]): answers a caller-supplied point once.
//!   A missing or empty tile is reported as such.
//! - **sampling** ([`QueryDriver::sample`]): draws uniform random points
//!   until one lands in a tile with a usable record. Missing and empty tiles
//!   are silently resampled, up to `max_attempts`.

use crate::cache::CachedTileLoader;
use crate::config::TileStoreConfig;
use crate::error::{GeoError, Result};
use crate::model::{QueryPoint, TileKey, TileLoad};
use crate::search::{nearest, NearestResult};
use crate::traits::{GeoBackend, TileSource};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, trace};

/// Draws a point with latitude uniform in [-90, 90] and longitude uniform
/// in [-180, 180].
pub fn random_point<R: Rng>(rng: &mut R) -> QueryPoint {
    let (lat_min, lat_max) = QueryPoint::LAT_RANGE;
    let (lng_min, lng_max) = QueryPoint::LNG_RANGE;
    QueryPoint {
        latitude: rng.random_range(lat_min..=lat_max),
        longitude: rng.random_range(lng_min..=lng_max),
    }
}

/// Answer to a direct query.
///
/// Serializes with an `outcome` tag (`nearest`, `not_found`, `empty_tile`)
/// next to the result fields or the tile's `x`/`y`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum QueryOutcome<B: GeoBackend> {
    Nearest(NearestResult<B>),
    /// No tile file for this cell.
    NotFound(TileKey),
    /// The tile exists but every line in it was malformed.
    EmptyTile(TileKey),
}

impl<B: GeoBackend> QueryOutcome<B> {
    pub fn key(&self) -> TileKey {
        match self {
            QueryOutcome::Nearest(result) => result.tile,
            QueryOutcome::NotFound(key) | QueryOutcome::EmptyTile(key) => *key,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, QueryOutcome::Nearest(_))
    }

    pub fn result(&self) -> Option<&NearestResult<B>> {
        match self {
            QueryOutcome::Nearest(result) => Some(result),
            _ => None,
        }
    }

    pub fn into_result(self) -> Option<NearestResult<B>> {
        match self {
            QueryOutcome::Nearest(result) => Some(result),
            _ => None,
        }
    }
}

/// A successful sampling-mode query.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SampledQuery<B: GeoBackend> {
    pub point: QueryPoint,
    pub result: NearestResult<B>,
    /// Points drawn, including the successful one.
    pub attempts: u64,
}

#[derive(Debug)]
pub struct QueryDriver<S> {
    source: S,
    max_attempts: u64,
}

impl QueryDriver<CachedTileLoader> {
    /// Driver over the configured store, with the configured cache size and
    /// sampling bound.
    pub fn from_config(config: &TileStoreConfig) -> Self {
        QueryDriver::new(CachedTileLoader::from_config(config))
            .with_max_attempts(config.max_sample_attempts)
    }
}

impl<S: TileSource> QueryDriver<S> {
    pub fn new(source: S) -> Self {
        QueryDriver {
            source,
            max_attempts: TileStoreConfig::default().max_sample_attempts,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn max_attempts(&self) -> u64 {
        self.max_attempts
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Direct mode: one lookup for `point`, no retries.
    pub fn query(&mut self, point: QueryPoint) -> Result<QueryOutcome<S::Backend>> {
        let key = point.key();
        let outcome = match self.source.load_tile(key)? {
            TileLoad::NotFound(key) => QueryOutcome::NotFound(key),
            TileLoad::Loaded(tile) => match nearest(point, &tile) {
                Some(result) => QueryOutcome::Nearest(result),
                None => QueryOutcome::EmptyTile(key),
            },
        };
        debug!(point = %point, tile = %key, found = outcome.is_found(), "query");
        Ok(outcome)
    }

    /// Direct mode from raw coordinates; rejects out-of-range input.
    pub fn query_coordinates(
        &mut self,
        latitude: f64,
        longitude: f64,
    ) -> Result<QueryOutcome<S::Backend>> {
        self.query(QueryPoint::new(latitude, longitude)?)
    }

    /// Sampling mode: draw points from `rng` until one yields a result.
    ///
    /// Fails with [`GeoError::SamplingExhausted`] after `max_attempts`
    /// misses, and with any I/O error straight away.
    pub fn sample<R: Rng>(&mut self, rng: &mut R) -> Result<SampledQuery<S::Backend>> {
        for attempt in 1..=self.max_attempts {
            let point = random_point(rng);
            match self.query(point)? {
                QueryOutcome::Nearest(result) => {
                    debug!(point = %point, attempts = attempt, city = result.name(), "sampled");
                    return Ok(SampledQuery {
                        point,
                        result,
                        attempts: attempt,
                    });
                }
                miss => trace!(point = %point, tile = %miss.key(), "resampling"),
            }
        }
        Err(GeoError::SamplingExhausted {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CityRecord, CityTile};
    use crate::traits::DefaultBackend;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Serves `NotFound` for the first `misses` calls, then one fixed city
    /// in whatever cell was asked for.
    struct FlakySource {
        misses: usize,
        calls: usize,
    }

    impl TileSource for FlakySource {
        type Backend = DefaultBackend;

        fn load_tile(&mut self, key: TileKey) -> Result<TileLoad<DefaultBackend>> {
            self.calls += 1;
            if self.calls <= self.misses {
                return Ok(TileLoad::NotFound(key));
            }
            let ((_, lat), (_, lng)) = key.bounds();
            let city = CityRecord::new("Cornerton", lat, lng, "XX", "");
            Ok(TileLoad::Loaded(CityTile::from_records(key, [city])))
        }
    }

    struct EmptySource;

    impl TileSource for EmptySource {
        type Backend = DefaultBackend;

        fn load_tile(&mut self, key: TileKey) -> Result<TileLoad<DefaultBackend>> {
            Ok(TileLoad::Loaded(CityTile::new(key)))
        }
    }

    #[test]
    fn random_points_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let p = random_point(&mut rng);
            assert!(QueryPoint::new(p.latitude, p.longitude).is_ok(), "{p}");
        }
    }

    #[test]
    fn sampling_resamples_until_found() {
        let mut driver = QueryDriver::new(FlakySource { misses: 5, calls: 0 });
        let mut rng = StdRng::seed_from_u64(7);
        let sampled = driver.sample(&mut rng).unwrap();
        assert_eq!(sampled.attempts, 6);
        assert_eq!(sampled.result.name(), "Cornerton");
        assert_eq!(sampled.result.tile, sampled.point.key());
        assert_eq!(driver.source().calls, 6);
    }

    #[test]
    fn sampling_gives_up() {
        let mut driver = QueryDriver::new(EmptySource).with_max_attempts(25);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            driver.sample(&mut rng),
            Err(GeoError::SamplingExhausted { attempts: 25 })
        ));
    }

    #[test]
    fn direct_mode_does_not_retry() {
        let mut driver = QueryDriver::new(FlakySource { misses: 1, calls: 0 });
        let outcome = driver.query_coordinates(10.5, 20.5).unwrap();
        assert_eq!(outcome, QueryOutcome::NotFound(TileKey::new(11, 21)));
        assert_eq!(driver.source().calls, 1);
    }

    #[test]
    fn direct_mode_reports_empty_tile() {
        let mut driver = QueryDriver::new(EmptySource);
        let outcome = driver.query_coordinates(-33.9, 151.2).unwrap();
        assert_eq!(outcome, QueryOutcome::EmptyTile(TileKey::new(-33, 152)));
        assert!(outcome.result().is_none());
    }

    #[cfg(feature = "json")]
    #[test]
    fn outcome_json_names_the_miss() {
        let mut driver = QueryDriver::new(FlakySource { misses: 1, calls: 0 });
        let miss = driver.query_coordinates(10.5, 20.5).unwrap();
        assert_eq!(
            serde_json::to_value(&miss).unwrap(),
            serde_json::json!({ "outcome": "not_found", "x": 11, "y": 21 })
        );

        let empty: QueryOutcome<DefaultBackend> = QueryOutcome::EmptyTile(TileKey::new(-33, 152));
        assert_eq!(
            serde_json::to_value(&empty).unwrap(),
            serde_json::json!({ "outcome": "empty_tile", "x": -33, "y": 152 })
        );

        let hit = driver.query_coordinates(10.5, 20.5).unwrap();
        let value = serde_json::to_value(&hit).unwrap();
        assert_eq!(value["outcome"], "nearest");
        assert_eq!(value["name"], "Cornerton");
        assert_eq!(value["tile"], serde_json::json!({ "x": 11, "y": 21 }));
    }

    #[test]
    fn direct_mode_rejects_bad_coordinates() {
        let mut driver = QueryDriver::new(EmptySource);
        assert!(matches!(
            driver.query_coordinates(91.0, 0.0),
            Err(GeoError::InvalidCoordinate { .. })
        ));
    }
}
