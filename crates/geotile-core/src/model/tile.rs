// crates/geotile-core/src/model/tile.rs
use super::city::CityRecord;
use super::key::TileKey;
use crate::common::LoadStats;
use crate::traits::GeoBackend;
use std::collections::btree_map::{self, BTreeMap};

/// The records of one tile, keyed by city name.
///
/// Names are unique inside a tile: inserting a second record under an
/// existing name replaces the first (last write wins). Iteration is in
/// ascending name order, which is also the order the nearest-neighbor scan
/// visits records in.
#[derive(Clone, Debug)]
pub struct CityTile<B: GeoBackend> {
    key: TileKey,
    records: BTreeMap<String, CityRecord<B>>,
    stats: LoadStats,
}

impl<B: GeoBackend> CityTile<B> {
    pub fn new(key: TileKey) -> Self {
        CityTile {
            key,
            records: BTreeMap::new(),
            stats: LoadStats::default(),
        }
    }

    /// Builds a tile from in-memory records, applying the same
    /// last-write-wins rule as a load.
    pub fn from_records(key: TileKey, records: impl IntoIterator<Item = CityRecord<B>>) -> Self {
        let mut tile = CityTile::new(key);
        for record in records {
            tile.insert(record);
        }
        tile
    }

    /// Inserts `record`, returning the record it replaced, if any.
    pub fn insert(&mut self, record: CityRecord<B>) -> Option<CityRecord<B>> {
        let replaced = self.records.insert(record.name().to_owned(), record);
        if replaced.is_some() {
            self.stats.overwritten += 1;
        }
        self.stats.records = self.records.len();
        replaced
    }

    pub fn key(&self) -> TileKey {
        self.key
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CityRecord<B>> {
        self.records.get(name)
    }

    /// Records in ascending name order.
    pub fn records(&self) -> btree_map::Values<'_, String, CityRecord<B>> {
        self.records.values()
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut LoadStats {
        &mut self.stats
    }
}

impl<'a, B: GeoBackend> IntoIterator for &'a CityTile<B> {
    type Item = &'a CityRecord<B>;
    type IntoIter = btree_map::Values<'a, String, CityRecord<B>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records()
    }
}

/// Result of asking for one tile.
///
/// `NotFound` means the cell has no file: no known cities there. It is an
/// expected outcome, not an error.
#[derive(Clone, Debug)]
pub enum TileLoad<B: GeoBackend> {
    Loaded(CityTile<B>),
    NotFound(TileKey),
}

impl<B: GeoBackend> TileLoad<B> {
    pub fn key(&self) -> TileKey {
        match self {
            TileLoad::Loaded(tile) => tile.key(),
            TileLoad::NotFound(key) => *key,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, TileLoad::Loaded(_))
    }

    pub fn tile(&self) -> Option<&CityTile<B>> {
        match self {
            TileLoad::Loaded(tile) => Some(tile),
            TileLoad::NotFound(_) => None,
        }
    }

    pub fn into_tile(self) -> Option<CityTile<B>> {
        match self {
            TileLoad::Loaded(tile) => Some(tile),
            TileLoad::NotFound(_) => None,
        }
    }
}
