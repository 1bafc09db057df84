//! Command-line interface definition for entrylog.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "entrylog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Log which campus building entrances you have visited, with offline queuing",
    long_about = None
)]
pub struct Cli {
    /// Team password (or set ENTRYLOG_PASSWORD)
    #[arg(global = true, long = "password", env = "ENTRYLOG_PASSWORD")]
    pub password: Option<String>,

    /// Display name shown in logs for this session
    #[arg(global = true, long = "name")]
    pub display_name: Option<String>,

    /// Override database path (useful for tests or custom layouts)
    #[arg(global = true, long = "db")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List buildings with their visit status and overall progress
    List {
        /// Filter by substring of building name or id
        query: Option<String>,
    },

    /// Log a visit to a building entrance at the given position
    Log {
        /// Building id, e.g. LIB-01
        building_id: String,

        /// Entrance number (1-based)
        entrance: u32,

        /// Latitude of the visit, in degrees
        #[arg(long = "lat", allow_hyphen_values = true)]
        lat: f64,

        /// Longitude of the visit, in degrees
        #[arg(long = "lng", allow_hyphen_values = true)]
        lng: f64,

        /// Accuracy radius of the fix, in meters
        #[arg(long = "accuracy", default_value_t = 10.0)]
        accuracy: f64,

        /// Mark the entrance as under construction
        #[arg(long = "under-construction")]
        under_construction: bool,
    },

    /// Delete remote logs for a building (all, or one entrance, or latest)
    Del {
        /// Building id, e.g. LIB-01
        building_id: String,

        /// Restrict to one entrance number
        #[arg(long = "entrance")]
        entrance: Option<u32>,

        /// Delete only the most recent matching record
        #[arg(long = "latest")]
        latest: bool,
    },

    /// Remove the single most recent log entry across all buildings
    Undo,

    /// Replay queued offline submissions against the remote store
    Sync,

    /// Show queue depth and device identity
    Status,
}
