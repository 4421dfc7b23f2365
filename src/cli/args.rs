use crate::models::{Column, Pollutant};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "airq-report")]
#[command(about = "Air quality aggregation and statistics report")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "Configuration file [default: ./airq-report.toml if present]"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "Directory holding the three source CSV files"
    )]
    pub data_dir: Option<PathBuf>,

    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Headline metrics and a preview of the measurement table
    Overview {
        #[arg(short, long, help = "Preview rows [default: report.preview_rows]")]
        rows: Option<usize>,

        #[arg(
            long,
            value_delimiter = ',',
            help = "Columns to hide from the preview (e.g. 'wind_direction,wind_speed')"
        )]
        hide: Vec<Column>,
    },

    /// Spearman rank correlation matrix over the numeric columns
    Correlations {
        #[arg(long, value_delimiter = ',', help = "Columns to correlate [default: all numeric]")]
        columns: Vec<Column>,
    },

    /// Per-station pollutant means ranked by composite index
    Pollutants {
        #[arg(long, help = "Show the precomputed per-station table instead")]
        reported: bool,
    },

    /// Pollutant means by year, or by calendar month with --seasonal
    Trend {
        #[arg(
            short,
            long,
            value_delimiter = ',',
            help = "Pollutants to include [default: all five]"
        )]
        pollutant: Vec<Pollutant>,

        #[arg(long)]
        seasonal: bool,
    },

    /// Per-station temperature extremes
    Temperature,

    /// Per-station rain extremes and average rain volume
    Rain,
}
