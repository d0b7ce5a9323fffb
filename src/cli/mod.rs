//! Command-line parsing for the Kuznets curve explorer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fetch/merge/fit code.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::Overrides;
use crate::domain::{ChartView, Pairing};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "kz", version, about = "Kuznets environmental curves from DBnomics (World Bank WDI)")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct GlobalArgs {
    /// DBnomics API root (overrides KZ_API_URL).
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds (overrides KZ_TIMEOUT_SECS).
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Retries for transient fetch failures (overrides KZ_MAX_RETRIES).
    #[arg(long, global = true, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Directory for TUI exports and the TUI log file (overrides KZ_EXPORT_DIR).
    #[arg(long, global = true, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

impl GlobalArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            timeout_secs: self.timeout_secs,
            max_retries: self.max_retries,
            export_dir: self.export_dir.clone(),
        }
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive menu-driven TUI (default).
    Tui,
    /// Build one chart, print fit diagnostics and an ASCII plot; optionally export it.
    Chart(ChartArgs),
    /// Print the merged per-country tables; optionally write them as CSV.
    Data(DataArgs),
    /// Plot a previously exported chart JSON.
    Plot(PlotArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct ChartArgs {
    /// Which chart to build.
    #[arg(value_enum)]
    pub view: ChartView,

    /// Country name as labelled by DBnomics (e.g. "France"). Defaults to the first one.
    #[arg(short, long)]
    pub country: Option<String>,

    /// Skip the ASCII plot printed after the fit summary.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Show the N years deviating most above and below the trend.
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Export the chart description to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct DataArgs {
    /// Which indicator to pair with GDP per capita.
    #[arg(value_enum)]
    pub pairing: Pairing,

    /// Write one CSV per country into this directory.
    #[arg(long, value_name = "DIR")]
    pub csv_dir: Option<PathBuf>,
}

/// Options for plotting a saved chart.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Chart JSON file produced by `kz chart --export-json`.
    #[arg(long, value_name = "JSON")]
    pub chart: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Rewrite argv so `kz` defaults to `kz tui`.
///
/// Rules:
/// - `kz`                      -> `kz tui`
/// - `kz --timeout-secs 5 ...` -> `kz tui --timeout-secs 5 ...`
/// - `kz --help/--version/-h`  -> unchanged (show top-level help/version)
pub fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "chart" | "data" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(args(&["kz"])), args(&["kz", "tui"]));
        assert_eq!(
            rewrite_args(args(&["kz", "--timeout-secs", "5"])),
            args(&["kz", "tui", "--timeout-secs", "5"])
        );
        assert_eq!(rewrite_args(args(&["kz", "--help"])), args(&["kz", "--help"]));
        assert_eq!(rewrite_args(args(&["kz", "chart", "depletion"])), args(&["kz", "chart", "depletion"]));
    }

    #[test]
    fn chart_command_parses() {
        let cli = Cli::parse_from(args(&[
            "kz", "chart", "greenhouse-all", "--no-plot", "--export-json", "out.json", "-vv", "--max-retries", "0",
        ]));
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.global.max_retries, Some(0));
        match cli.command {
            Command::Chart(a) => {
                assert_eq!(a.view, ChartView::GreenhouseAll);
                assert!(a.no_plot);
                assert_eq!(a.country, None);
                assert_eq!(a.export_json, Some(PathBuf::from("out.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn plot_is_on_unless_disabled() {
        let cli = Cli::parse_from(args(&["kz", "chart", "depletion", "--country", "France"]));
        match cli.command {
            Command::Chart(a) => {
                assert!(!a.no_plot);
                assert_eq!(a.country.as_deref(), Some("France"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(args(&["kz", "chart", "depletion", "--plot"])).is_err());
    }

    #[test]
    fn data_command_parses_pairing() {
        let cli = Cli::parse_from(args(&["kz", "data", "depletion", "--csv-dir", "out"]));
        match cli.command {
            Command::Data(a) => {
                assert_eq!(a.pairing, Pairing::Depletion);
                assert_eq!(a.csv_dir, Some(PathBuf::from("out")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
