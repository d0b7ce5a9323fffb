//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves settings
//! - initializes logging
//! - fetches DBnomics data, merges, fits and charts it
//! - prints reports/plots or launches the TUI
//! - writes optional exports

use std::fs::{File, create_dir_all};
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{ChartArgs, Command, DataArgs, PlotArgs, rewrite_args};
use crate::config::Settings;
use crate::data::DbnomicsClient;
use crate::error::AppError;
use crate::io::{ChartFile, read_chart_json, write_chart_json, write_merged_dir};
use crate::report::{compute_residuals, format_fit_summary, format_merged_table, rank_deviations};

pub mod pipeline;

/// Name of the log file written while the TUI owns the terminal.
const TUI_LOG_FILE: &str = "kz.log";

/// Entry point for the `kz` binary.
pub fn run() -> Result<(), AppError> {
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let settings = Settings::resolve(&cli.global.overrides())?;
    let is_tui = matches!(cli.command, Command::Tui);
    init_logging(cli.global.verbose, is_tui, &settings)?;

    match cli.command {
        Command::Tui => crate::tui::run(settings),
        Command::Chart(args) => handle_chart(args, &settings),
        Command::Data(args) => handle_data(args, &settings),
        Command::Plot(args) => handle_plot(args),
    }
}

fn init_logging(verbose: u8, to_file: bool, settings: &Settings) -> Result<(), AppError> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if to_file {
        // The TUI owns stdout/stderr; keep log lines out of the alternate screen.
        create_dir_all(&settings.export_dir).map_err(|e| {
            AppError::io(format!("Failed to create '{}': {e}", settings.export_dir.display()))
        })?;
        let path = settings.export_dir.join(TUI_LOG_FILE);
        let file = File::create(&path)
            .map_err(|e| AppError::io(format!("Failed to create log file '{}': {e}", path.display())))?;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
    Ok(())
}

fn handle_chart(args: ChartArgs, settings: &Settings) -> Result<(), AppError> {
    let client = DbnomicsClient::new(settings)?;
    let out = pipeline::build_view_chart(&client, args.view, args.country.as_deref(), &settings.countries)?;

    if let Some((country, kuznets)) = &out.kuznets {
        if let Some(table) = out.dataset.merged.get(country) {
            let residuals = compute_residuals(table, &kuznets.fit);
            let deviations = rank_deviations(&residuals, args.top);
            println!(
                "{}",
                format_fit_summary(country, table.indicator, &kuznets.fit, &deviations)
            );
        }
    }

    if !args.no_plot {
        println!("{}", crate::plot::render_chart_ascii(&out.chart, args.width, args.height));
    }

    if let Some(path) = &args.export_json {
        let fit = out.kuznets.as_ref().map(|(_, k)| k.fit.clone());
        write_chart_json(path, &ChartFile::new(out.chart.clone(), fit))?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn handle_data(args: DataArgs, settings: &Settings) -> Result<(), AppError> {
    let client = DbnomicsClient::new(settings)?;
    let dataset = pipeline::load_dataset(&client, args.pairing, &settings.countries)?;

    for table in dataset.merged.iter() {
        println!("{}", format_merged_table(table));
    }

    if let Some(dir) = &args.csv_dir {
        let paths = write_merged_dir(dir, &dataset.merged)?;
        println!("Wrote {} file(s) to {}", paths.len(), dir.display());
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = read_chart_json(&args.chart)?;
    let plot = crate::plot::render_chart_ascii(&file.chart, args.width, args.height);
    println!("{plot}");
    Ok(())
}
