// crates/geotile-core/src/schema.rs

//! # Record Schema
//!
//! Where each canonical field lives in a tab-separated input line.
//!
//! Tile files always use [`RecordSchema::CANONICAL`]. Raw gazetteer dumps
//! (GeoNames `cities*.txt`) carry the same data spread over 19 columns;
//! [`RecordSchema::GEONAMES_DUMP`] names the columns the data-preparation
//! step keeps. Custom layouts must pass [`RecordSchema::validate`].

use crate::common::FIELD_SEPARATOR;
use crate::error::{GeoError, Result};
use crate::model::RawRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    pub name: usize,
    pub latitude: usize,
    pub longitude: usize,
    pub country: usize,
    pub region: usize,
    /// Lines with fewer columns are malformed.
    pub min_columns: usize,
}

impl RecordSchema {
    /// The tile file layout: `name, latitude, longitude, country, region`.
    pub const CANONICAL: RecordSchema = RecordSchema {
        name: 0,
        latitude: 1,
        longitude: 2,
        country: 3,
        region: 4,
        min_columns: 5,
    };

    /// GeoNames dump: name=1, latitude=4, longitude=5, country code=8,
    /// admin1 code=10.
    pub const GEONAMES_DUMP: RecordSchema = RecordSchema {
        name: 1,
        latitude: 4,
        longitude: 5,
        country: 8,
        region: 10,
        min_columns: 11,
    };

    fn columns(&self) -> [(&'static str, usize); 5] {
        [
            ("name", self.name),
            ("latitude", self.latitude),
            ("longitude", self.longitude),
            ("country", self.country),
            ("region", self.region),
        ]
    }

    /// Checks that every field has its own column and that `min_columns`
    /// covers all of them.
    pub fn validate(&self) -> Result<()> {
        let columns = self.columns();
        for (i, (field, col)) in columns.iter().enumerate() {
            if let Some((other, _)) = columns[i + 1..].iter().find(|(_, c)| c == col) {
                return Err(GeoError::Schema(format!(
                    "{field} and {other} both map to column {col}"
                )));
            }
            if *col >= self.min_columns {
                return Err(GeoError::Schema(format!(
                    "{field} column {col} is beyond min_columns {}",
                    self.min_columns
                )));
            }
        }
        Ok(())
    }

    /// Picks the five canonical fields out of `line`.
    ///
    /// `line` must already be stripped of its terminator. Extra trailing
    /// columns are ignored; too few is a parse error. `line_no` is 1-based
    /// and only used in the error.
    pub fn project<'a>(&self, line: &'a str, line_no: usize) -> Result<RawRecord<'a>> {
        let fields: Vec<&'a str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() < self.min_columns {
            return Err(GeoError::parse(
                line_no,
                format!(
                    "expected at least {} fields, found {}",
                    self.min_columns,
                    fields.len()
                ),
            ));
        }
        let field = |col: usize| {
            fields.get(col).copied().ok_or_else(|| {
                GeoError::Schema(format!("column {col} is beyond min_columns {}", self.min_columns))
            })
        };
        Ok(RawRecord {
            name: field(self.name)?,
            latitude: field(self.latitude)?,
            longitude: field(self.longitude)?,
            country: field(self.country)?,
            region: field(self.region)?,
        })
    }
}

impl Default for RecordSchema {
    fn default() -> Self {
        RecordSchema::CANONICAL
    }
}

impl FromStr for RecordSchema {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "canonical" | "tile" => Ok(RecordSchema::CANONICAL),
            "geonames" | "geonames-dump" => Ok(RecordSchema::GEONAMES_DUMP),
            other => Err(GeoError::Schema(format!("unknown schema {other:?}"))),
        }
    }
}

impl fmt::Display for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RecordSchema::CANONICAL => f.write_str("canonical"),
            RecordSchema::GEONAMES_DUMP => f.write_str("geonames"),
            s => write!(
                f,
                "custom(name={}, lat={}, lng={}, country={}, region={})",
                s.name, s.latitude, s.longitude, s.country, s.region
            ),
        }
    }
}

/// Strips a trailing `\n` or `\r\n`, nothing else.
///
/// Inner whitespace and empty trailing fields are data: an empty region
/// arrives as a line ending in a tab and must stay five fields long.
pub(crate) fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP_LINE: &str = "5391959\tSan Francisco\tSan Francisco\tSF,Frisco\t37.77493\t-122.41942\tP\tPPLA2\tUS\t\tCA\t075\t\t\t864816\t16\t28\tAmerica/Los_Angeles\t2022-05-17";

    #[test]
    fn builtin_schemas_are_valid() {
        RecordSchema::CANONICAL.validate().unwrap();
        RecordSchema::GEONAMES_DUMP.validate().unwrap();
    }

    #[test]
    fn rejects_shared_column() {
        let schema = RecordSchema {
            longitude: 1,
            ..RecordSchema::CANONICAL
        };
        assert!(matches!(schema.validate(), Err(GeoError::Schema(_))));
    }

    #[test]
    fn rejects_column_past_minimum() {
        let schema = RecordSchema {
            min_columns: 4,
            ..RecordSchema::CANONICAL
        };
        assert!(schema.validate().is_err());
    }

    #[test]
    fn projects_geonames_dump() {
        let raw = RecordSchema::GEONAMES_DUMP.project(DUMP_LINE, 1).unwrap();
        assert_eq!(raw.name, "San Francisco");
        assert_eq!(raw.latitude, "37.77493");
        assert_eq!(raw.longitude, "-122.41942");
        assert_eq!(raw.country, "US");
        assert_eq!(raw.region, "CA");
        assert_eq!(
            raw.to_line(),
            "San Francisco\t37.77493\t-122.41942\tUS\tCA"
        );
    }

    #[test]
    fn short_line_is_parse_error() {
        let err = RecordSchema::CANONICAL.project("a\t1\t2", 3).unwrap_err();
        assert!(matches!(err, GeoError::Parse { line: 3, .. }));
    }

    #[test]
    fn empty_region_is_still_five_fields() {
        let line = strip_terminator("Testville\t0.5\t0.5\tUS\t\r\n");
        let raw = RecordSchema::CANONICAL.project(line, 1).unwrap();
        assert_eq!(raw.region, "");
    }

    #[test]
    fn parses_names() {
        assert_eq!(
            "GeoNames".parse::<RecordSchema>().unwrap(),
            RecordSchema::GEONAMES_DUMP
        );
        assert_eq!(RecordSchema::CANONICAL.to_string(), "canonical");
        assert!("csv".parse::<RecordSchema>().is_err());
    }
}
