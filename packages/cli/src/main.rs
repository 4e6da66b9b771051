#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal host for the highway accident map.
//!
//! Loads a highway's accident CSV, runs the segment aggregator for the
//! requested selection, and prints the resulting view as tables or JSON.
//! Without a subcommand it starts an interactive menu.
//!
//! Uses `indicatif-log-bridge` (via [`accident_map_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the loading spinner never fight for the terminal.

mod interactive;
mod render;

use std::path::{Path, PathBuf};

use accident_map_accident_models::KmRange;
use accident_map_analytics::view::{compute_view, resolve_raw_selection};
use accident_map_analytics_models::{
    CoordinatePolicy, DEFAULT_BIN_WIDTH, DEFAULT_TOP_N, ViewSelection,
};
use accident_map_cli_utils::{IndicatifProgress, MultiProgress};
use accident_map_source::{csv_load::load_highway, registry};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "accident_map", about = "Highway accident segment explorer")]
struct Cli {
    /// Directory holding the per-highway CSV files
    #[arg(long, global = true, env = "ACCIDENT_MAP_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the configured highways
    Highways,
    /// Aggregate one highway and print the view
    View {
        /// Highway identifier or name (e.g., "BR242" or "BR 242")
        #[arg(long)]
        highway: String,
        /// Start of the kilometer sub-range
        #[arg(long, requires = "to", value_parser = parse_km)]
        from: Option<f64>,
        /// End of the kilometer sub-range
        #[arg(long, requires = "from", value_parser = parse_km)]
        to: Option<f64>,
        /// Bin width in kilometers
        #[arg(long, default_value_t = DEFAULT_BIN_WIDTH)]
        width: u32,
        /// Length of every ranking
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
        /// Representative coordinate of each bin (`mean` or `first`)
        #[arg(long, default_value_t = CoordinatePolicy::Mean)]
        coordinates: CoordinatePolicy,
        /// Lower kilometer bound of the bin to inspect
        #[arg(long)]
        select: Option<String>,
        /// Print the view as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
}

/// Accepts a kilometer bound only if it is a finite number.
fn finite_km(km: f64) -> Result<f64, String> {
    if km.is_finite() {
        Ok(km)
    } else {
        Err(format!("kilometer bound must be a finite number, got {km}"))
    }
}

fn parse_km(s: &str) -> Result<f64, String> {
    let km: f64 = s.trim().parse().map_err(|e| format!("invalid kilometer '{s}': {e}"))?;
    finite_km(km)
}

struct ViewArgs {
    highway: String,
    selection: ViewSelection,
    select: Option<String>,
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = accident_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run(&multi, &cli.data_dir);
    };

    match command {
        Commands::Highways => render::print_highways(&registry::all_highways()),
        Commands::View {
            highway,
            from,
            to,
            width,
            top,
            coordinates,
            select,
            json,
        } => {
            let km_range = from.zip(to).map(|(start, end)| KmRange::new(start, end));
            let args = ViewArgs {
                highway,
                selection: ViewSelection {
                    km_range,
                    bin_width: width,
                    coordinate_policy: coordinates,
                    top_n: top,
                    selected_bin: None,
                },
                select,
                json,
            };
            view(&multi, &cli.data_dir, &args)?;
        }
    }

    Ok(())
}

fn view(
    multi: &MultiProgress,
    data_dir: &Path,
    args: &ViewArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let profile = registry::find_highway(&args.highway)?;
    if let Some(range) = args.selection.km_range {
        log::info!("[{}] Restricting to {range}", profile.id);
    }

    let progress = IndicatifProgress::records_bar(multi, &format!("Loading {}", profile.name));
    let records = load_highway(&profile, data_dir, &progress)?;

    let mut view = compute_view(&records, &profile, &args.selection);
    if args.select.is_some() {
        view.selection = resolve_raw_selection(&view.bins, args.select.as_deref());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        render::print_view(&view);
    }

    Ok(())
}
