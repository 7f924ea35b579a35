// crates/geotile-core/src/store.rs

//! # Tile Store
//!
//! A directory of `{x}_{y}.txt` files, one per populated [`TileKey`]. The
//! store is sparse: cells without cities have no file. Files are only ever
//! appended to by the builder; nothing here deletes or compacts them.

use crate::common::StoreStats;
use crate::config::TileStoreConfig;
use crate::error::Result;
use crate::model::TileKey;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileStore {
    root: PathBuf,
}

impl TileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        TileStore { root: root.into() }
    }

    pub fn from_config(config: &TileStoreConfig) -> Self {
        TileStore::new(config.root())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the tile file for `key`, whether or not it exists.
    pub fn path_for(&self, key: TileKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    pub fn contains(&self, key: TileKey) -> bool {
        self.path_for(key).is_file()
    }

    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Every populated key, sorted. A missing root is an empty store.
    ///
    /// Files whose names don't follow the tile naming rule are ignored.
    pub fn keys(&self) -> Result<Vec<TileKey>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(key) = entry.file_name().to_str().and_then(TileKey::from_file_name) {
                keys.push(key);
            }
        }
        keys.sort_unstable();
        Ok(keys)
    }

    /// Counts tiles and non-blank lines. Lines are not parsed, so
    /// malformed ones (invalid UTF-8 included) are counted too.
    pub fn stats(&self) -> Result<StoreStats> {
        let keys = self.keys()?;
        let mut stats = StoreStats {
            tiles: keys.len(),
            lines: 0,
        };
        let mut buf = Vec::new();
        for key in keys {
            let mut reader = BufReader::new(File::open(self.path_for(key))?);
            loop {
                buf.clear();
                if reader.read_until(b'\n', &mut buf)? == 0 {
                    break;
                }
                if !matches!(buf.as_slice(), b"\n" | b"\r\n") {
                    stats.lines += 1;
                }
            }
        }
        Ok(stats)
    }
}
