// crates/geotile-core/src/loader/mod.rs

//! # Tile Loader
//!
//! Resolves a [`TileKey`] to its file and parses that one file into a
//! [`CityTile`]. Parsing is tolerant: a line that doesn't split into the
//! five canonical fields, or whose coordinates aren't numbers, is skipped
//! and the load carries on. Only real I/O failures abort.

use crate::config::TileStoreConfig;
use crate::error::{GeoError, Result};
use crate::model::{CityTile, TileKey, TileLoad};
use crate::schema::{strip_terminator, RecordSchema};
use crate::store::TileStore;
use crate::traits::{DefaultBackend, GeoBackend, LoadObserver, TileSource};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::marker::PhantomData;
use tracing::debug;

pub mod common_io;

#[cfg(feature = "builder")]
pub mod builder;

/// Reads tiles straight from disk, one file per call, no caching.
///
/// The file handle lives only for the duration of one [`TileLoader::load`]
/// call and is closed on every exit path.
#[derive(Debug, Clone)]
pub struct TileLoader<B: GeoBackend = DefaultBackend> {
    store: TileStore,
    _backend: PhantomData<B>,
}

impl<B: GeoBackend> TileLoader<B> {
    pub fn new(store: TileStore) -> Self {
        TileLoader {
            store,
            _backend: PhantomData,
        }
    }

    pub fn from_config(config: &TileStoreConfig) -> Self {
        TileLoader::new(TileStore::from_config(config))
    }

    pub fn store(&self) -> &TileStore {
        &self.store
    }

    /// Loads the tile for `key`.
    ///
    /// Returns [`TileLoad::NotFound`] when the cell has no file. A file that
    /// exists but holds no usable line comes back as an empty `Loaded` tile.
    pub fn load(&self, key: TileKey) -> Result<TileLoad<B>> {
        self.load_observed(key, &mut ())
    }

    /// Same as [`TileLoader::load`], reporting skipped lines and overwritten
    /// names to `observer`.
    pub fn load_observed(
        &self,
        key: TileKey,
        observer: &mut dyn LoadObserver,
    ) -> Result<TileLoad<B>> {
        let path = self.store.path_for(key);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(tile = %key, path = %path.display(), "no tile file");
                return Ok(TileLoad::NotFound(key));
            }
            Err(e) => return Err(GeoError::Io(e)),
        };

        let tile = parse_tile(key, BufReader::new(file), observer)?;
        let stats = tile.stats();
        debug!(
            tile = %key,
            records = stats.records,
            skipped = stats.skipped,
            overwritten = stats.overwritten,
            "loaded tile"
        );
        Ok(TileLoad::Loaded(tile))
    }
}

impl<B: GeoBackend> TileSource for TileLoader<B> {
    type Backend = B;

    fn load_tile(&mut self, key: TileKey) -> Result<TileLoad<B>> {
        self.load(key)
    }
}

/// Parses canonical tile lines from `reader`.
///
/// Blank lines are ignored outright; every other line either becomes a
/// record or counts as skipped.
pub fn parse_tile<B: GeoBackend, R: BufRead>(
    key: TileKey,
    mut reader: R,
    observer: &mut dyn LoadObserver,
) -> Result<CityTile<B>> {
    let mut tile = CityTile::new(key);
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let Ok(text) = std::str::from_utf8(&buf) else {
            tile.stats_mut().lines += 1;
            skip(&mut tile, observer, line_no, "line is not valid UTF-8");
            continue;
        };
        let line = strip_terminator(text);
        if line.is_empty() {
            continue;
        }
        tile.stats_mut().lines += 1;

        let record = RecordSchema::CANONICAL
            .project(line, line_no)
            .and_then(|raw| raw.parse::<B>(line_no));
        match record {
            Ok(record) => {
                if let Some(old) = tile.insert(record) {
                    observer.on_overwrite(key, old.name());
                }
            }
            Err(GeoError::Parse { reason, .. }) => {
                skip(&mut tile, observer, line_no, &reason);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(tile)
}

fn skip<B: GeoBackend>(
    tile: &mut CityTile<B>,
    observer: &mut dyn LoadObserver,
    line_no: usize,
    reason: &str,
) {
    let key = tile.key();
    tile.stats_mut().skipped += 1;
    debug!(tile = %key, line = line_no, reason, "skipped malformed line");
    observer.on_skipped_line(key, line_no, reason);
}
