// crates/geotile-core/src/cache.rs

//! # Tile Cache
//!
//! A bounded LRU in front of [`TileLoader`], keyed by [`TileKey`].
//!
//! Every entry remembers the length and mtime of its file at load time.
//! A lookup whose file no longer matches (the builder appended to it, say)
//! bypasses the entry and reloads from disk. Missing tiles are never cached.

use crate::config::TileStoreConfig;
use crate::error::Result;
use crate::loader::TileLoader;
use crate::model::{CityTile, TileKey, TileLoad};
use crate::traits::{DefaultBackend, GeoBackend, TileSource};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    len: u64,
    modified: Option<SystemTime>,
}

impl FileStamp {
    /// `None` when the file doesn't exist.
    fn read(path: &Path) -> Result<Option<Self>> {
        match fs::metadata(path) {
            Ok(meta) => Ok(Some(FileStamp {
                len: meta.len(),
                modified: meta.modified().ok(),
            })),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry<B: GeoBackend> {
    stamp: FileStamp,
    tile: CityTile<B>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stale: u64,
    pub evictions: u64,
}

#[derive(Debug)]
pub struct CachedTileLoader<B: GeoBackend = DefaultBackend> {
    loader: TileLoader<B>,
    capacity: usize,
    entries: HashMap<TileKey, Entry<B>>,
    /// Least recently used at the front.
    order: VecDeque<TileKey>,
    stats: CacheStats,
}

impl<B: GeoBackend> CachedTileLoader<B> {
    /// `capacity == 0` turns the cache into a pass-through.
    pub fn new(loader: TileLoader<B>, capacity: usize) -> Self {
        CachedTileLoader {
            loader,
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            stats: CacheStats::default(),
        }
    }

    pub fn from_config(config: &TileStoreConfig) -> Self {
        CachedTileLoader::new(TileLoader::from_config(config), config.cache_capacity)
    }

    pub fn loader(&self) -> &TileLoader<B> {
        &self.loader
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drops the cached copy of `key`, if any.
    pub fn invalidate(&mut self, key: TileKey) {
        if self.entries.remove(&key).is_some() {
            self.order.retain(|k| *k != key);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn load(&mut self, key: TileKey) -> Result<TileLoad<B>> {
        if self.capacity == 0 {
            return self.loader.load(key);
        }

        let path = self.loader.store().path_for(key);
        let Some(stamp) = FileStamp::read(&path)? else {
            self.invalidate(key);
            return Ok(TileLoad::NotFound(key));
        };

        if let Some(entry) = self.entries.get(&key) {
            if entry.stamp == stamp {
                let tile = entry.tile.clone();
                self.stats.hits += 1;
                self.touch(key);
                trace!(tile = %key, "tile cache hit");
                return Ok(TileLoad::Loaded(tile));
            }
            self.stats.stale += 1;
            trace!(tile = %key, "tile cache entry is stale");
        }
        self.stats.misses += 1;

        let load = self.loader.load(key)?;
        match &load {
            TileLoad::Loaded(tile) => self.insert(key, stamp, tile.clone()),
            TileLoad::NotFound(_) => self.invalidate(key),
        }
        Ok(load)
    }

    fn insert(&mut self, key: TileKey, stamp: FileStamp, tile: CityTile<B>) {
        if self.entries.insert(key, Entry { stamp, tile }).is_some() {
            self.touch(key);
            return;
        }
        self.order.push_back(key);
        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            self.stats.evictions += 1;
        }
    }

    fn touch(&mut self, key: TileKey) {
        if let Some(pos) = self.order.iter().position(|k| *k == key) {
            self.order.remove(pos);
        }
        self.order.push_back(key);
    }
}

impl<B: GeoBackend> TileSource for CachedTileLoader<B> {
    type Backend = B;

    fn load_tile(&mut self, key: TileKey) -> Result<TileLoad<B>> {
        self.load(key)
    }
}
