use clap::{ArgAction, Parser, Subcommand};
use geotile_core::RecordSchema;
use std::path::PathBuf;

/// CLI arguments for geotile-cli
#[derive(Debug, Parser)]
#[command(
    name = "geotile",
    version,
    about = "Build and query a tiled on-disk city gazetteer"
)]
pub struct CliArgs {
    /// Tile store directory (overrides the config file and $GEOTILE_ROOT)
    #[arg(short = 'r', long = "root", global = true)]
    pub root: Option<PathBuf>,

    /// JSON config file with root, cache_capacity and max_sample_attempts
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Split a gazetteer file (plain or .gz) into tile files
    Build {
        /// Input gazetteer, one tab-separated record per line
        input: PathBuf,

        /// Column layout of the input: canonical or geonames
        #[arg(short = 's', long = "schema", default_value = "canonical")]
        schema: RecordSchema,
    },

    /// Find the closest known city to a coordinate
    Nearest {
        /// Latitude in degrees, -90..=90
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in degrees, -180..=180
        #[arg(allow_negative_numbers = true)]
        lng: f64,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pick random points until one lands near a known city
    Sample {
        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the tile a coordinate falls into and what it holds
    Tile {
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },

    /// Show a summary of the tile store
    Stats,
}
