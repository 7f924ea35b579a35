//! geotile: command-line front end for geotile-core
//!
//! Builds a tile store from a flat gazetteer and answers nearest-city
//! queries against it.
//!
//! Usage examples
//! --------------
//!
//! - Split a GeoNames dump into tiles under ./quad
//!   $ geotile build cities1000.txt --schema geonames
//!
//! - Closest known city to a point
//!   $ geotile nearest 37.7 -122.4
//!   $ geotile --root /data/quad nearest 52.52 13.40 --json
//!
//! - Random points until one hits a populated tile
//!   $ geotile sample --seed 42
//!
//! - Inspect one cell, or the whole store
//!   $ geotile tile 0.6 0.6
//!   $ geotile stats
//!
//! Configuration
//! -------------
//!
//! The store root comes from, in increasing precedence: the default
//! (`quad`), `--config <file.json>`, `$GEOTILE_ROOT`, `--root`.
mod args;
mod logging;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use clap::Parser;
use geotile_core::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    logging::init_logging(args.verbose);

    let config = resolve_config(&args)?;
    debug!(root = %config.root().display(), "using tile store");

    match args.command {
        Commands::Build { input, schema } => build(&config, &input, schema)?,

        Commands::Nearest { lat, lng, json } => {
            let mut driver = QueryDriver::from_config(&config);
            let point = QueryPoint::new(lat, lng)?;
            let outcome = driver.query(point)?;
            if json {
                print_json(&outcome)?;
            } else {
                match outcome.result() {
                    Some(hit) => {
                        println!("{point} is around");
                        println!("{} ({}, {})", hit.name(), hit.region(), hit.country());
                    }
                    None => println!("No nearby city known"),
                }
            }
        }

        Commands::Sample { seed, json } => {
            let mut driver = QueryDriver::from_config(&config);
            let sampled = match seed {
                Some(seed) => driver.sample(&mut StdRng::seed_from_u64(seed))?,
                None => driver.sample(&mut rand::rng())?,
            };
            if json {
                print_json(&sampled)?;
            } else {
                println!("{} is around", sampled.point);
                println!(
                    "{} ({}, {}) after {} attempts",
                    sampled.result.name(),
                    sampled.result.region(),
                    sampled.result.country(),
                    sampled.attempts
                );
            }
        }

        Commands::Tile { lat, lng } => {
            let key = QueryPoint::new(lat, lng)?.key();
            let loader: TileLoader = TileLoader::from_config(&config);
            println!("Tile: {key}");
            println!("File: {}", loader.store().path_for(key).display());
            match loader.load(key)? {
                TileLoad::NotFound(_) => println!("No tile file"),
                TileLoad::Loaded(tile) => {
                    let stats = tile.stats();
                    println!("Lines: {}", stats.lines);
                    println!("Records: {}", stats.records);
                    println!("Skipped: {}", stats.skipped);
                    println!("Overwritten: {}", stats.overwritten);
                    for city in &tile {
                        println!(
                            "- {} ({}, {}) at {}, {}",
                            city.name(),
                            city.region(),
                            city.country(),
                            city.latitude(),
                            city.longitude()
                        );
                    }
                }
            }
        }

        Commands::Stats => {
            let stats = TileStore::from_config(&config).stats()?;
            println!("Tile store: {}", config.root().display());
            println!("  Tiles: {}", stats.tiles);
            println!("  Lines: {}", stats.lines);
        }
    }

    Ok(())
}

fn resolve_config(args: &CliArgs) -> anyhow::Result<TileStoreConfig> {
    let config = match &args.config {
        #[cfg(feature = "json")]
        Some(path) => TileStoreConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        #[cfg(not(feature = "json"))]
        Some(_) => anyhow::bail!("--config needs geotile-cli built with the `json` feature"),
        None => TileStoreConfig::default(),
    };

    let mut config = config.with_env_override();
    if let Some(root) = &args.root {
        config.root = root.clone();
    }
    Ok(config)
}

#[cfg(feature = "builder")]
fn build(
    config: &TileStoreConfig,
    input: &std::path::Path,
    schema: RecordSchema,
) -> anyhow::Result<()> {
    let stats = TileBuilder::new(TileStore::from_config(config))
        .with_schema(schema)?
        .build_from_path(input)
        .with_context(|| format!("building tiles from {}", input.display()))?;
    println!("Build finished:");
    println!("  Lines read: {}", stats.lines);
    println!("  Records written: {}", stats.written);
    println!("  Lines skipped: {}", stats.skipped);
    println!("  Tiles touched: {}", stats.tiles_touched);
    Ok(())
}

#[cfg(not(feature = "builder"))]
fn build(
    _config: &TileStoreConfig,
    _input: &std::path::Path,
    _schema: RecordSchema,
) -> anyhow::Result<()> {
    anyhow::bail!("`build` needs geotile-cli built with the `builder` feature")
}

#[cfg(feature = "json")]
fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(not(feature = "json"))]
fn print_json<T>(_value: &T) -> anyhow::Result<()> {
    anyhow::bail!("--json needs geotile-cli built with the `json` feature")
}
