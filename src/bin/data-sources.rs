use std::path::PathBuf;
use std::process;

use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use data_sources::csv::save_table;
use data_sources::scraper::WebScraper;
use data_sources::utils::{default_year, output_filename};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "data-sources")]
#[command(about = "Loads data tables", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Distribution of wage earners by level of net compensation
    Netcomp {
        #[arg(
            long,
            default_value_t = default_year(Local::now().date_naive()),
            help = "Year of data to load"
        )]
        year: i32,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "How to print the table to stdout"
        )]
        format: OutputFormat,

        #[arg(
            long,
            value_name = "DIR",
            default_value = ".",
            help = "Directory the CSV file is written to"
        )]
        output_dir: PathBuf,

        #[arg(long, help = "Include the source row index as the first CSV column")]
        index: bool,
    },
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let scraper = WebScraper::new().unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });

    match cli.command {
        Commands::Netcomp {
            year,
            format,
            output_dir,
            index,
        } => {
            log::info!("Fetching net compensation data from {}...", scraper.url_for(year));

            let table = scraper.fetch_net_compensation(year).unwrap_or_else(|e| {
                log::error!("Error fetching net compensation table: {}", e);
                process::exit(1);
            });

            match format {
                OutputFormat::Json => serialize_json(&table),
                OutputFormat::Text => println!("{}", table),
            }

            let path = save_table(&output_dir, &output_filename(year), &table, index)
                .unwrap_or_else(|e| {
                    log::error!("Error writing CSV file: {}", e);
                    process::exit(1);
                });

            log::info!("Wrote {} rows to {}", table.len(), path.display());
        }
    }
}
