// crates/geotile-core/src/model/city.rs
use super::key::{cell_key, TileKey};
use crate::common::FIELD_SEPARATOR;
use crate::error::{GeoError, Result};
use crate::traits::GeoBackend;
use serde::{Deserialize, Serialize};

/// One gazetteer entry.
///
/// Canonical field order on disk is `name, latitude, longitude, country, region`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityRecord<B: GeoBackend> {
    pub name: B::Str,
    pub latitude: B::Float,
    pub longitude: B::Float,
    /// Country code, e.g. "US".
    pub country: B::Str,
    /// Admin-1 region code; may be empty.
    pub region: B::Str,
}

/// The five canonical fields of a line, still as text.
///
/// Produced by [`crate::RecordSchema::project`]. The builder writes these
/// slices back out verbatim, so a record round-trips through a tile with
/// exactly the text it came in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    pub name: &'a str,
    pub latitude: &'a str,
    pub longitude: &'a str,
    pub country: &'a str,
    pub region: &'a str,
}

impl<'a> RawRecord<'a> {
    /// Parses the coordinate fields. `line` is only used for error reporting.
    ///
    /// Non-numeric and non-finite coordinates are rejected, as is an empty
    /// name. Range is not checked: the builder accepts whatever the
    /// gazetteer says.
    pub fn parse<B: GeoBackend>(&self, line: usize) -> Result<CityRecord<B>> {
        if self.name.is_empty() {
            return Err(GeoError::parse(line, "empty name"));
        }
        let latitude = parse_coordinate(self.latitude, "latitude", line)?;
        let longitude = parse_coordinate(self.longitude, "longitude", line)?;
        Ok(CityRecord {
            name: B::str_from(self.name),
            latitude: B::float_from(latitude),
            longitude: B::float_from(longitude),
            country: B::str_from(self.country),
            region: B::str_from(self.region),
        })
    }

    /// The canonical tab-separated line, without terminator.
    pub fn to_line(&self) -> String {
        [
            self.name,
            self.latitude,
            self.longitude,
            self.country,
            self.region,
        ]
        .join("\t")
    }
}

fn parse_coordinate(text: &str, field: &str, line: usize) -> Result<f64> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| GeoError::parse(line, format!("{field} {text:?} is not a number")))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeoError::parse(line, format!("{field} {text:?} is not finite")))
    }
}

impl<B: GeoBackend> CityRecord<B> {
    pub fn new(name: &str, latitude: f64, longitude: f64, country: &str, region: &str) -> Self {
        CityRecord {
            name: B::str_from(name),
            latitude: B::float_from(latitude),
            longitude: B::float_from(longitude),
            country: B::str_from(country),
            region: B::str_from(region),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    pub fn country(&self) -> &str {
        self.country.as_ref()
    }

    pub fn region(&self) -> &str {
        self.region.as_ref()
    }

    pub fn latitude(&self) -> f64 {
        B::float_to_f64(self.latitude)
    }

    pub fn longitude(&self) -> f64 {
        B::float_to_f64(self.longitude)
    }

    /// `(latitude, longitude)`.
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude(), self.longitude())
    }

    /// The tile this record is filed under.
    pub fn key(&self) -> TileKey {
        cell_key(self.latitude(), self.longitude())
    }

    /// Serializes to the canonical tile line, without terminator.
    ///
    /// Fails if a text field contains a tab or line break, which would
    /// corrupt the tile.
    pub fn to_line(&self) -> Result<String> {
        for (field, value) in [
            ("name", self.name()),
            ("country", self.country()),
            ("region", self.region()),
        ] {
            if value.contains([FIELD_SEPARATOR, '\n', '\r']) {
                return Err(GeoError::InvalidData(format!(
                    "{field} {value:?} contains a field or line separator"
                )));
            }
        }
        Ok(format!(
            "{}\t{}\t{}\t{}\t{}",
            self.name(),
            self.latitude(),
            self.longitude(),
            self.country(),
            self.region()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::DefaultBackend;

    fn raw<'a>(lat: &'a str, lng: &'a str) -> RawRecord<'a> {
        RawRecord {
            name: "San Francisco",
            latitude: lat,
            longitude: lng,
            country: "US",
            region: "CA",
        }
    }

    #[test]
    fn parses_coordinates() {
        let rec: CityRecord<DefaultBackend> = raw("37.77493", "-122.41942").parse(1).unwrap();
        assert_eq!(rec.coordinates(), (37.77493, -122.41942));
        assert_eq!(rec.key(), TileKey::new(38, -122));
    }

    #[test]
    fn rejects_bad_coordinates() {
        assert!(matches!(
            raw("north", "1.0").parse::<DefaultBackend>(7),
            Err(GeoError::Parse { line: 7, .. })
        ));
        assert!(raw("1.0", "NaN").parse::<DefaultBackend>(1).is_err());
        assert!(raw("1.0", "inf").parse::<DefaultBackend>(1).is_err());
    }

    #[test]
    fn rejects_empty_name() {
        let mut r = raw("1.0", "1.0");
        r.name = "";
        assert!(r.parse::<DefaultBackend>(1).is_err());
    }

    #[test]
    fn line_keeps_empty_region() {
        let rec = CityRecord::<DefaultBackend>::new("Testville", 0.5, 0.5, "US", "");
        assert_eq!(rec.to_line().unwrap(), "Testville\t0.5\t0.5\tUS\t");
    }

    #[test]
    fn line_rejects_embedded_tab() {
        let rec = CityRecord::<DefaultBackend>::new("Bad\tName", 0.5, 0.5, "US", "CA");
        assert!(matches!(rec.to_line(), Err(GeoError::InvalidData(_))));
    }
}
