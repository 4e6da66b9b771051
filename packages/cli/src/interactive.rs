#![allow(clippy::module_name_repetitions)]

//! Interactive explorer.
//!
//! Provides a menu-driven interface using `dialoguer`: pick a highway and a
//! kilometer range, then inspect segments one at a time. Loaded records are
//! kept in a [`RecordCache`] so switching back to a highway does not re-read
//! its file.

use std::path::Path;
use std::sync::Arc;

use accident_map_accident_models::{AccidentRecord, HighwayProfile, KmRange};
use accident_map_analytics::view::{compute_view, resolve_selection};
use accident_map_analytics_models::{DEFAULT_BIN_WIDTH, ViewModel, ViewSelection};
use accident_map_cli_utils::{IndicatifProgress, MultiProgress};
use accident_map_source::{SourceError, cache::RecordCache, csv_load::load_highway, registry};
use dialoguer::{Input, Select};

use crate::{finite_km, render};

/// Actions offered once a view is on screen.
enum ViewAction {
    InspectSegment,
    ChangeRange,
    ChangeHighway,
    Reload,
    Quit,
}

impl ViewAction {
    const ALL: &[Self] = &[
        Self::InspectSegment,
        Self::ChangeRange,
        Self::ChangeHighway,
        Self::Reload,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::InspectSegment => "Inspect a segment",
            Self::ChangeRange => "Change kilometer range / bin width",
            Self::ChangeHighway => "Choose another highway",
            Self::Reload => "Reload data file",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive menu loop until the user quits.
///
/// A highway whose data file cannot be read is reported and the user is
/// asked to pick again.
///
/// # Errors
///
/// Returns an error if a prompt fails.
pub fn run(multi: &MultiProgress, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Highway Accident Map");
    println!();

    let highways = registry::all_highways();
    let mut cache = RecordCache::new();

    let mut profile = select_highway(&highways)?;
    let mut selection = prompt_selection(&profile)?;

    loop {
        let loaded = load_or_report(&mut cache, &profile, |p| {
            let progress = IndicatifProgress::records_bar(multi, &format!("Loading {}", p.name));
            load_highway(p, data_dir, &progress)
        });
        let Some(records) = loaded else {
            println!("Could not load {}. Choose another highway.", profile.name);
            profile = select_highway(&highways)?;
            selection = prompt_selection(&profile)?;
            continue;
        };

        let view = compute_view(&records, &profile, &selection);
        render::print_view(&view);
        println!();

        let labels: Vec<&str> = ViewAction::ALL.iter().map(ViewAction::label).collect();
        let idx = Select::new()
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact()?;

        match ViewAction::ALL[idx] {
            ViewAction::InspectSegment => inspect_segments(&view)?,
            ViewAction::ChangeRange => selection = prompt_selection(&profile)?,
            ViewAction::ChangeHighway => {
                profile = select_highway(&highways)?;
                selection = prompt_selection(&profile)?;
            }
            ViewAction::Reload => {
                if cache.invalidate(&profile.id) {
                    log::info!("[{}] Dropped cached records", profile.id);
                }
            }
            ViewAction::Quit => return Ok(()),
        }
    }
}

/// Returns the cached records of `profile`, calling `load` on a miss. A
/// failed load is logged and yields `None`.
fn load_or_report<F>(
    cache: &mut RecordCache,
    profile: &HighwayProfile,
    load: F,
) -> Option<Arc<[AccidentRecord]>>
where
    F: FnOnce(&HighwayProfile) -> Result<Vec<AccidentRecord>, SourceError>,
{
    match cache.get_or_load(profile, load) {
        Ok(records) => Some(records),
        Err(e) => {
            log::error!("[{}] Failed to load records: {e}", profile.id);
            None
        }
    }
}

fn select_highway(highways: &[HighwayProfile]) -> Result<HighwayProfile, Box<dyn std::error::Error>> {
    let labels: Vec<String> = highways
        .iter()
        .map(|h| format!("{} ({})", h.name, h.range))
        .collect();

    let idx = Select::new()
        .with_prompt("Select a highway")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(highways[idx].clone())
}

/// Prompts for the kilometer sub-range and bin width, defaulting to the
/// highway's full range.
fn prompt_selection(profile: &HighwayProfile) -> Result<ViewSelection, Box<dyn std::error::Error>> {
    let start: f64 = Input::new()
        .with_prompt("From km")
        .default(profile.range.start)
        .validate_with(|km: &f64| finite_km(*km).map(|_| ()))
        .interact_text()?;
    let end: f64 = Input::new()
        .with_prompt("To km")
        .default(profile.range.end)
        .validate_with(|km: &f64| finite_km(*km).map(|_| ()))
        .interact_text()?;
    let bin_width: u32 = Input::new()
        .with_prompt("Bin width (km)")
        .default(DEFAULT_BIN_WIDTH)
        .interact_text()?;

    let range = KmRange::new(start, end);
    Ok(ViewSelection {
        km_range: (range != profile.range).then_some(range),
        bin_width,
        ..ViewSelection::default()
    })
}

/// Lets the user pick segments from the current view until they go back.
fn inspect_segments(view: &ViewModel) -> Result<(), Box<dyn std::error::Error>> {
    if view.bins.is_empty() {
        println!("No segments to inspect.");
        return Ok(());
    }

    let mut labels: Vec<String> = view
        .markers
        .iter()
        .map(|m| format!("{} ({} accidents, {})", render::segment_label(&m.bin), m.bin.total, m.color))
        .collect();
    labels.push("Back".to_string());

    loop {
        let idx = Select::new()
            .with_prompt("Select a segment")
            .items(&labels)
            .default(0)
            .max_length(20)
            .interact()?;

        let Some(marker) = view.markers.get(idx) else {
            return Ok(());
        };

        render::print_selection(&resolve_selection(&view.bins, Some(marker.bin.key())));
        println!();
    }
}
