//! geotile-cli
//! ===========
//!
//! Command-line interface for the `geotile-core` tiled city gazetteer.
//!
//! This crate primarily provides a binary (`geotile`). The library target
//! only exists so docs.rs renders this overview.
//!
//! Quick start
//! -----------
//!
//! ```text
//! cargo install geotile-cli
//! ```
//!
//! Basic usage:
//!
//! ```text
//! geotile --help
//! geotile build cities1000.txt --schema geonames
//! geotile nearest 37.7 -122.4
//! geotile sample --seed 42 --json
//! geotile stats
//! ```
//!
//! For programmatic access, use the [`geotile-core`] crate directly.
//!
#![cfg_attr(docsrs, feature(doc_cfg))]

// No API here; the binary is the deliverable.
