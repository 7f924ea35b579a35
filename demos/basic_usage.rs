//! Basic usage example for geotile-rs
//!
//! This example demonstrates how to:
//! - Build a tile store from a handful of gazetteer lines
//! - Run direct nearest-city queries
//! - Put a cache in front of the loader
//! - Sample random points until one lands near a city

use geotile_rs::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const GAZETTEER: &str = "\
San Francisco\t37.77493\t-122.41942\tUS\tCA
Oakland\t37.80437\t-122.27080\tUS\tCA
Daly City\t37.70577\t-122.46192\tUS\tCA
Testville\t0.5\t0.5\tUS\tCA
Berlin\t52.52437\t13.41053\tDE\t16
broken line without coordinates
";

fn main() -> Result<()> {
    println!("=== geotile-rs Basic Usage Example ===\n");

    let dir = tempfile::tempdir()?;
    let config = TileStoreConfig::new(dir.path().join("quad")).with_cache_capacity(8);

    // Example 1: Build tiles
    println!("--- Example 1: Build a tile store ---");
    let builder = TileBuilder::new(TileStore::from_config(&config));
    let stats = builder.build_from_reader(GAZETTEER.as_bytes())?;
    println!(
        "Read {} lines, wrote {}, skipped {}, into {} tiles",
        stats.lines, stats.written, stats.skipped, stats.tiles_touched
    );
    for key in TileStore::from_config(&config).keys()? {
        println!("- {}", key.file_name());
    }
    println!();

    // Example 2: Direct queries
    println!("--- Example 2: Nearest city ---");
    let mut driver = QueryDriver::from_config(&config);
    for (lat, lng) in [(37.75, -122.45), (37.8, -122.3), (0.6, 0.6), (5.0, 5.0)] {
        match driver.query_coordinates(lat, lng)? {
            QueryOutcome::Nearest(hit) => println!(
                "{lat}, {lng} -> {} ({}, {}), distance² {:.5}",
                hit.name(),
                hit.region(),
                hit.country(),
                hit.distance
            ),
            miss => println!("{lat}, {lng} -> No nearby city known (tile {})", miss.key()),
        }
    }
    println!();

    // Example 3: Cache counters
    println!("--- Example 3: Cache ---");
    driver.query_coordinates(37.7, -122.4)?;
    let cache = driver.source().stats();
    println!(
        "hits {}, misses {}, stale {}, evictions {}",
        cache.hits, cache.misses, cache.stale, cache.evictions
    );
    println!();

    // Example 4: Sampling mode
    println!("--- Example 4: Sampling ---");
    let mut rng = StdRng::seed_from_u64(42);
    let sampled = driver.sample(&mut rng)?;
    println!(
        "{} is around {} after {} attempts",
        sampled.point,
        sampled.result.name(),
        sampled.attempts
    );

    Ok(())
}
