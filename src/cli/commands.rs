use crate::cli::args::{Cli, Commands, OutputFormat};
use crate::config::{AppConfig, DataSources};
use crate::error::Result;
use crate::models::{Column, HeadlineMetrics, Pollutant};
use crate::report::{render, Preview, ReportFacade};
use crate::store::RecordStore;
use crate::utils::progress::ProgressReporter;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, Level};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::FmtSubscriber;

#[derive(Serialize)]
struct OverviewReport<'a> {
    headline: HeadlineMetrics,
    preview: Preview<'a>,
}

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir.as_deref() {
        config.data = DataSources::in_dir(dir);
    }
    info!(
        measurements = %config.data.measurements.display(),
        pollutant_levels = %config.data.pollutant_levels.display(),
        station_extremes = %config.data.station_extremes.display(),
        "loading sources"
    );

    let progress = ProgressReporter::new_spinner(
        "Loading air quality data...",
        cli.format == OutputFormat::Json,
    );
    let store = RecordStore::load_concurrent(&config.data).await?;
    progress.finish_with_message(&format!(
        "Loaded {} measurements from {} stations",
        store.len(),
        store.stations().len()
    ));

    let facade = ReportFacade::with_options(&store, config.report);
    let format = cli.format;

    match cli.command {
        Commands::Overview { rows, hide } => {
            let headline = facade.get_headline_metrics()?;
            let preview = facade.preview(rows, &hide);
            match format {
                OutputFormat::Json => print_json(&OverviewReport { headline, preview })?,
                OutputFormat::Text => {
                    println!("\n{}", render::headline(&headline));
                    println!(
                        "\nMeasurements (showing {} of {} rows):",
                        preview.rows.len(),
                        store.len()
                    );
                    print!("{}", render::preview(&preview));
                }
            }
        }

        Commands::Correlations { columns } => {
            let columns = if columns.is_empty() {
                Column::NUMERIC.to_vec()
            } else {
                columns
            };
            let matrix = facade.get_correlations_for(&columns)?;
            match format {
                OutputFormat::Json => print_json(&matrix)?,
                OutputFormat::Text => {
                    println!("\nSpearman rank correlation:");
                    print!("{}", render::correlations(&matrix));
                }
            }
        }

        Commands::Pollutants { reported } => {
            if reported {
                let levels = facade.get_pollutant_levels();
                match format {
                    OutputFormat::Json => print_json(&levels)?,
                    OutputFormat::Text => {
                        println!("\nReported pollutant levels per station:");
                        print!("{}", render::pollutant_levels(&levels));
                    }
                }
            } else {
                let summary = facade.get_station_summary()?;
                match format {
                    OutputFormat::Json => print_json(&summary)?,
                    OutputFormat::Text => {
                        println!("\nStations ranked by composite pollution index:");
                        print!("{}", render::station_summary(&summary));
                    }
                }
            }
        }

        Commands::Trend {
            pollutant,
            seasonal,
        } => {
            let pollutants = if pollutant.is_empty() {
                Pollutant::ALL.to_vec()
            } else {
                pollutant
            };
            if seasonal {
                let profile = facade.get_seasonal_profile_for(&pollutants)?;
                match format {
                    OutputFormat::Json => print_json(&profile)?,
                    OutputFormat::Text => {
                        println!("\nMonthly pollutant means:");
                        print!("{}", render::seasonal_profile(&profile));
                    }
                }
            } else {
                let trend = facade.get_yearly_trend_for(&pollutants)?;
                match format {
                    OutputFormat::Json => print_json(&trend)?,
                    OutputFormat::Text => {
                        println!("\nYearly pollutant means:");
                        print!("{}", render::yearly_trend(&trend));
                    }
                }
            }
        }

        Commands::Temperature => {
            let overview = facade.get_temperature_overview()?;
            match format {
                OutputFormat::Json => print_json(&overview)?,
                OutputFormat::Text => println!("\n{}", render::temperature(&overview)),
            }
        }

        Commands::Rain => {
            let overview = facade.get_rain_overview()?;
            match format {
                OutputFormat::Json => print_json(&overview)?,
                OutputFormat::Text => println!("\n{}", render::rain(&overview)),
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let (writer, ansi) = match log_file {
        Some(path) => (BoxMakeWriter::new(Mutex::new(File::create(path)?)), false),
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Logging already initialised; keeping the existing subscriber");
    }
    Ok(())
}
