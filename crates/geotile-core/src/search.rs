// crates/geotile-core/src/search.rs

//! # Nearest-Neighbor Search
//!
//! A single linear pass over one tile's records using squared planar
//! distance, `Δlat² + Δlng²`. No cos(latitude) correction: this is a coarse
//! same-cell comparison, not a geodesic one.

use crate::model::{CityRecord, CityTile, QueryPoint, TileKey};
use crate::traits::{GeoBackend, NearestSearch};
use serde::Serialize;

/// Squared planar distance between two `(lat, lng)` pairs, in degrees².
#[inline]
pub fn squared_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let d_lat = a.0 - b.0;
    let d_lng = a.1 - b.1;
    d_lat * d_lat + d_lng * d_lng
}

/// The closest record to a query, as reported to callers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NearestResult<B: GeoBackend> {
    pub name: B::Str,
    pub region: B::Str,
    pub country: B::Str,
    pub latitude: f64,
    pub longitude: f64,
    /// Squared planar distance from the query point.
    pub distance: f64,
    /// Tile that was searched.
    pub tile: TileKey,
}

impl<B: GeoBackend> NearestResult<B> {
    fn from_record(record: &CityRecord<B>, distance: f64, tile: TileKey) -> Self {
        NearestResult {
            name: record.name.clone(),
            region: record.region.clone(),
            country: record.country.clone(),
            latitude: record.latitude(),
            longitude: record.longitude(),
            distance,
            tile,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    pub fn region(&self) -> &str {
        self.region.as_ref()
    }

    pub fn country(&self) -> &str {
        self.country.as_ref()
    }

    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Linear scan for the record closest to `query`.
///
/// Comparison is strict `<`, so on an exact tie the first record in
/// iteration order is kept. Returns `None` for an empty input.
pub fn nearest_in<'a, B, I>(query: QueryPoint, records: I) -> Option<(&'a CityRecord<B>, f64)>
where
    B: GeoBackend,
    I: IntoIterator<Item = &'a CityRecord<B>>,
{
    let origin = (query.latitude, query.longitude);
    let mut best: Option<(&'a CityRecord<B>, f64)> = None;
    for record in records {
        let dist = squared_distance(origin, record.coordinates());
        let closer = match best {
            Some((_, min_dist)) => dist < min_dist,
            None => true,
        };
        if closer {
            best = Some((record, dist));
        }
    }
    best
}

/// Nearest record in `tile`. Records are visited in ascending name order,
/// so ties go to the alphabetically first name.
pub fn nearest<B: GeoBackend>(query: QueryPoint, tile: &CityTile<B>) -> Option<NearestResult<B>> {
    nearest_in(query, tile.records())
        .map(|(record, dist)| NearestResult::from_record(record, dist, tile.key()))
}

impl<B: GeoBackend> NearestSearch<B> for CityTile<B> {
    fn nearest(&self, query: QueryPoint) -> Option<NearestResult<B>> {
        nearest(query, self)
    }
}

/// Slices are scanned in their own order; the reported tile is the query's.
impl<B: GeoBackend> NearestSearch<B> for [CityRecord<B>] {
    fn nearest(&self, query: QueryPoint) -> Option<NearestResult<B>> {
        nearest_in(query, self)
            .map(|(record, dist)| NearestResult::from_record(record, dist, query.key()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::DefaultBackend;

    type Rec = CityRecord<DefaultBackend>;

    fn point(lat: f64, lng: f64) -> QueryPoint {
        QueryPoint::new(lat, lng).unwrap()
    }

    #[test]
    fn metric_has_no_latitude_correction() {
        assert_eq!(squared_distance((60.0, 10.0), (60.0, 11.0)), 1.0);
        assert_eq!(squared_distance((0.0, 10.0), (0.0, 11.0)), 1.0);
    }

    #[test]
    fn picks_closest() {
        let tile = CityTile::from_records(
            TileKey::new(1, 1),
            [Rec::new("A", 0.0, 0.0, "US", ""), Rec::new("B", 1.0, 1.0, "US", "")],
        );
        let hit = tile.nearest(point(0.4, 0.4)).unwrap();
        assert_eq!(hit.name(), "A");
        assert!((hit.distance - 0.32).abs() < 1e-12);

        let (_, d_b) = nearest_in(point(0.4, 0.4), tile.records().filter(|r| r.name() == "B"))
            .unwrap();
        assert!((d_b - 0.72).abs() < 1e-12);
    }

    #[test]
    fn empty_is_none() {
        let tile: CityTile<DefaultBackend> = CityTile::new(TileKey::new(1, 1));
        assert!(tile.nearest(point(0.5, 0.5)).is_none());
        let none: &[Rec] = &[];
        assert!(none.nearest(point(0.5, 0.5)).is_none());
    }

    #[test]
    fn tie_goes_to_first_name() {
        let tile = CityTile::from_records(
            TileKey::new(1, 1),
            [
                Rec::new("Zeta", 0.6, 0.5, "US", ""),
                Rec::new("Alpha", 0.4, 0.5, "US", ""),
            ],
        );
        assert_eq!(tile.nearest(point(0.5, 0.5)).unwrap().name(), "Alpha");
    }

    #[test]
    fn slice_tie_goes_to_first_element() {
        let records = [
            Rec::new("Zeta", 0.6, 0.5, "US", ""),
            Rec::new("Alpha", 0.4, 0.5, "US", ""),
        ];
        let hit = records[..].nearest(point(0.5, 0.5)).unwrap();
        assert_eq!(hit.name(), "Zeta");
        assert_eq!(hit.tile, TileKey::new(1, 1));
    }

    #[test]
    fn reports_record_fields() {
        let tile = CityTile::from_records(
            TileKey::new(38, -122),
            [Rec::new("San Francisco", 37.77493, -122.41942, "US", "CA")],
        );
        let hit = tile.nearest(point(37.7, -122.4)).unwrap();
        assert_eq!(hit.region(), "CA");
        assert_eq!(hit.country(), "US");
        assert_eq!(hit.coordinates(), (37.77493, -122.41942));
        assert_eq!(hit.tile, TileKey::new(38, -122));
    }
}
