use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "irrigation-scheduler",
    version,
    about = "Daily irrigation recommendations from soil moisture, ET0 and rain forecast"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Field capacity (FC) in percent
    #[arg(long, global = true)]
    pub field_capacity: Option<f64>,

    /// Crop coefficient (Kc)
    #[arg(long, global = true)]
    pub crop_coefficient: Option<f64>,

    /// Forecast rain (mm) at or above which irrigation is skipped
    #[arg(long, global = true)]
    pub rain_threshold: Option<f64>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive schedule table, chart and parameter editor (default)
    Dashboard {
        /// Sensor and weather data (.csv)
        input: Option<PathBuf>,
    },
    /// Print the irrigation schedule
    Schedule {
        /// Sensor and weather data (.csv)
        input: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Sort rows by timestamp before evaluating
        #[arg(long)]
        sort: bool,
    },
    /// Write the irrigation schedule to a CSV file
    Export {
        /// Sensor and weather data (.csv)
        input: Option<PathBuf>,

        /// Output file (defaults to the configured export filename)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sort rows by timestamp before evaluating
        #[arg(long)]
        sort: bool,
    },
    /// Validate config and parameters, and the data file if given
    Check {
        /// Sensor and weather data (.csv)
        input: Option<PathBuf>,
    },
    /// Interactively set irrigation parameters and write the config file
    Init,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}
