// crates/geotile-core/src/loader/builder.rs
#![cfg(feature = "builder")]

//! # Tile Builder
//!
//! Splits a flat gazetteer into per-cell tile files. Each record is appended
//! to `{ceil(lat)}_{ceil(lng)}.txt`, opening and closing the file for every
//! line, so an interrupted run leaves only whole lines behind.
//!
//! There is no locking. Run one builder per store at a time, and don't load
//! a tile while it is being appended to.

use super::common_io;
use crate::common::BuildStats;
use crate::error::{GeoError, Result};
use crate::model::{cell_key, CityRecord, RawRecord, TileKey};
use crate::schema::{strip_terminator, RecordSchema};
use crate::store::TileStore;
use crate::traits::{DefaultBackend, GeoBackend};
use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct TileBuilder {
    store: TileStore,
    schema: RecordSchema,
}

impl TileBuilder {
    /// A builder reading canonical 5-column input.
    pub fn new(store: TileStore) -> Self {
        TileBuilder {
            store,
            schema: RecordSchema::CANONICAL,
        }
    }

    /// Switches the input layout. The schema is validated first.
    pub fn with_schema(mut self, schema: RecordSchema) -> Result<Self> {
        schema.validate()?;
        self.schema = schema;
        Ok(self)
    }

    pub fn store(&self) -> &TileStore {
        &self.store
    }

    pub fn schema(&self) -> RecordSchema {
        self.schema
    }

    /// The tile `record` belongs to. Pure; touches nothing on disk.
    pub fn assign<B: GeoBackend>(&self, record: &CityRecord<B>) -> TileKey {
        record.key()
    }

    /// Appends one record to its tile file.
    pub fn append<B: GeoBackend>(&self, record: &CityRecord<B>) -> Result<TileKey> {
        let key = self.assign(record);
        self.write_line(key, &record.to_line()?)?;
        Ok(key)
    }

    /// Appends one projected input line, keeping its original text.
    ///
    /// Fails with [`GeoError::Parse`] if the coordinates aren't numbers;
    /// nothing is written in that case.
    pub fn append_raw(&self, raw: &RawRecord<'_>, line_no: usize) -> Result<TileKey> {
        let record = raw.parse::<DefaultBackend>(line_no)?;
        let key = cell_key(record.latitude(), record.longitude());
        self.write_line(key, &raw.to_line())?;
        Ok(key)
    }

    /// Ingests a whole gazetteer file (plain, or `.gz` with `compact`).
    pub fn build_from_path(&self, source: &Path) -> Result<BuildStats> {
        info!(
            source = %source.display(),
            root = %self.store.root().display(),
            schema = %self.schema,
            "building tiles"
        );
        let reader = common_io::open_stream(source)?;
        self.build_from_reader(reader)
    }

    /// Ingests gazetteer lines from `reader`.
    ///
    /// Unparseable lines are logged and counted, never retried. I/O errors
    /// stop the build; tiles written so far stay on disk.
    pub fn build_from_reader<R: BufRead>(&self, mut reader: R) -> Result<BuildStats> {
        self.store.ensure_root()?;

        let mut stats = BuildStats::default();
        let mut touched = HashSet::new();
        let mut buf = Vec::new();
        let mut line_no = 0usize;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            let appended = match std::str::from_utf8(&buf).map(strip_terminator) {
                Ok("") => continue,
                Ok(line) => self
                    .schema
                    .project(line, line_no)
                    .and_then(|raw| self.append_raw(&raw, line_no)),
                Err(_) => Err(GeoError::Parse {
                    line: line_no,
                    reason: "line is not valid UTF-8".into(),
                }),
            };
            stats.lines += 1;
            match appended {
                Ok(key) => {
                    stats.written += 1;
                    touched.insert(key);
                }
                Err(GeoError::Parse { line: at, reason }) => {
                    stats.skipped += 1;
                    warn!(line = at, %reason, "skipping gazetteer line");
                }
                Err(e) => return Err(e),
            }
        }

        stats.tiles_touched = touched.len();
        info!(
            lines = stats.lines,
            written = stats.written,
            skipped = stats.skipped,
            tiles = stats.tiles_touched,
            "tile build finished"
        );
        Ok(stats)
    }

    fn write_line(&self, key: TileKey, line: &str) -> Result<()> {
        let path = self.store.path_for(key);
        let mut file = common_io::open_append(&path)?;
        // One write per line so an appended line is never split.
        let mut bytes = Vec::with_capacity(line.len() + 1);
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');
        file.write_all(&bytes)?;
        Ok(())
    }
}

/// Builds (or extends) the tile store at `root` from `source`.
pub fn build_tiles(source: &Path, root: &Path, schema: RecordSchema) -> Result<BuildStats> {
    TileBuilder::new(TileStore::new(root))
        .with_schema(schema)?
        .build_from_path(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn assign_uses_ceiling() {
        let builder = TileBuilder::new(TileStore::new("unused"));
        let rec = CityRecord::<DefaultBackend>::new("San Francisco", 37.7, -122.4, "US", "CA");
        assert_eq!(builder.assign(&rec), TileKey::new(38, -122));
    }

    #[test]
    fn appends_without_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let builder = TileBuilder::new(TileStore::new(dir.path()));
        let a = CityRecord::<DefaultBackend>::new("A", 0.5, 0.5, "US", "CA");
        let b = CityRecord::<DefaultBackend>::new("B", 0.25, 0.75, "US", "");
        builder.append(&a).unwrap();
        builder.append(&b).unwrap();

        let text = fs::read_to_string(dir.path().join("1_1.txt")).unwrap();
        assert_eq!(text, "A\t0.5\t0.5\tUS\tCA\nB\t0.25\t0.75\tUS\t\n");
    }

    #[test]
    fn raw_text_is_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let builder = TileBuilder::new(TileStore::new(dir.path()));
        let raw = RawRecord {
            name: "Saint-Denis",
            latitude: "-20.88231",
            longitude: "55.44810",
            country: "RE",
            region: "RE",
        };
        let key = builder.append_raw(&raw, 1).unwrap();
        assert_eq!(key, TileKey::new(-20, 56));
        let text = fs::read_to_string(dir.path().join("-20_56.txt")).unwrap();
        assert_eq!(text, "Saint-Denis\t-20.88231\t55.44810\tRE\tRE\n");
    }

    #[test]
    fn bad_coordinates_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let builder = TileBuilder::new(TileStore::new(dir.path()));
        let raw = RawRecord {
            name: "Nowhere",
            latitude: "n/a",
            longitude: "1.0",
            country: "XX",
            region: "",
        };
        assert!(matches!(
            builder.append_raw(&raw, 4),
            Err(GeoError::Parse { line: 4, .. })
        ));
        assert!(TileStore::new(dir.path()).keys().unwrap().is_empty());
    }

    #[test]
    fn rejects_invalid_schema() {
        let schema = RecordSchema {
            country: 0,
            ..RecordSchema::CANONICAL
        };
        assert!(TileBuilder::new(TileStore::new("unused"))
            .with_schema(schema)
            .is_err());
    }
}
