use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default number of anomalies shown by `list`.
pub const DEFAULT_LIST_LIMIT: i64 = 10;

/// Default number of anomalies shown by `search`.
pub const DEFAULT_SEARCH_LIMIT: i64 = 100;

/// Default number of anomalies written by `export`.
pub const DEFAULT_EXPORT_LIMIT: i64 = 1000;

/// Default file written by `export`.
pub const DEFAULT_EXPORT_PATH: &str = "anomalies_export.csv";

#[derive(Parser, Debug)]
#[command(
    name = "intellifactory",
    version,
    about = "Manufacturing anomaly detection operator tool"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Store readings from a CSV file and record their anomalies
    Detect {
        /// Path to the readings CSV
        csv: PathBuf,

        /// Keep anomalies from earlier runs instead of clearing them first
        #[arg(long)]
        keep_existing: bool,
    },

    /// Show the most recent anomalies
    List {
        #[arg(short, long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: i64,
    },

    /// Show anomalies for one machine
    Search {
        machine_id: String,

        #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: i64,
    },

    /// Write recent anomalies to a CSV file
    Export {
        #[arg(short, long, default_value = DEFAULT_EXPORT_PATH)]
        output: PathBuf,

        #[arg(short, long, default_value_t = DEFAULT_EXPORT_LIMIT)]
        limit: i64,
    },

    /// Delete every stored anomaly
    Clear,

    /// Interactive numbered menu
    Menu,
}
