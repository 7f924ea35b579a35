// crates/geotile-core/src/config.rs
use crate::common::DEFAULT_TILE_ROOT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configured tile-store root.
pub const ROOT_ENV_VAR: &str = "GEOTILE_ROOT";

/// Where the tiles live and how queries against them behave.
///
/// Passed explicitly to the store, loader and driver; nothing in the crate
/// reads process-wide state except [`TileStoreConfig::with_env_override`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileStoreConfig {
    /// Directory holding the `{x}_{y}.txt` files.
    pub root: PathBuf,
    /// Tiles kept in memory between queries. 0 disables the cache.
    pub cache_capacity: usize,
    /// Upper bound on points drawn by sampling mode before giving up.
    pub max_sample_attempts: u64,
}

impl Default for TileStoreConfig {
    fn default() -> Self {
        TileStoreConfig {
            root: PathBuf::from(DEFAULT_TILE_ROOT),
            cache_capacity: 0,
            max_sample_attempts: 1_000_000,
        }
    }
}

impl TileStoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        TileStoreConfig {
            root: root.into(),
            ..Default::default()
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_max_sample_attempts(mut self, attempts: u64) -> Self {
        self.max_sample_attempts = attempts;
        self
    }

    /// Replaces `root` with `$GEOTILE_ROOT` when it is set and non-empty.
    pub fn with_env_override(mut self) -> Self {
        if let Some(root) = std::env::var_os(ROOT_ENV_VAR).filter(|v| !v.is_empty()) {
            self.root = PathBuf::from(root);
        }
        self
    }

    /// Reads a JSON config file. Missing keys take their defaults.
    #[cfg(feature = "json")]
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TileStoreConfig::default();
        assert_eq!(config.root(), Path::new("quad"));
        assert_eq!(config.cache_capacity, 0);
    }

    #[cfg(feature = "json")]
    #[test]
    fn partial_json_uses_defaults() {
        let config: TileStoreConfig =
            serde_json::from_str(r#"{ "root": "/srv/tiles", "cache_capacity": 64 }"#).unwrap();
        assert_eq!(config.root(), Path::new("/srv/tiles"));
        assert_eq!(config.cache_capacity, 64);
        assert_eq!(config.max_sample_attempts, 1_000_000);
    }

    #[cfg(feature = "json")]
    #[test]
    fn reads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geotile.json");
        std::fs::write(&path, r#"{ "max_sample_attempts": 10 }"#).unwrap();
        let config = TileStoreConfig::from_json_file(&path).unwrap();
        assert_eq!(config.max_sample_attempts, 10);
        assert_eq!(config.root(), Path::new("quad"));
    }
}
