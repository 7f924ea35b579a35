// crates/geotile-core/src/loader/common_io.rs
use crate::error::Result;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader};
use std::path::Path;

#[cfg(feature = "compact")]
use flate2::read::MultiGzDecoder;

/// Opens a gazetteer input for line-by-line reading.
///
/// With the `compact` feature, `*.gz` files are decompressed on the fly.
/// Everything else is read as plain UTF-8 text.
pub fn open_stream(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path)?;

    #[cfg(feature = "compact")]
    {
        if is_gzip(path) {
            return Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))));
        }
    }

    Ok(Box::new(BufReader::new(file)))
}

#[cfg(feature = "compact")]
fn is_gzip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Opens `path` for appending, creating it if absent.
pub fn open_append(path: &Path) -> Result<File> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}
