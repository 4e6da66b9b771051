//! Rankings: top bins, top ISO weeks, and categorical frequency tables.
//!
//! All rankings sort descending by count and break ties by ascending key
//! (kilometer, week number, or label), so equal inputs always produce equal
//! outputs.

use std::collections::BTreeMap;

use accident_map_accident_models::AccidentRecord;
use accident_map_analytics_models::{BinMetric, CategoryCount, CategoryField, KmBin, WeekCount};
use chrono::Datelike as _;

/// Returns the `n` bins with the highest `metric`, ties broken by ascending
/// lower bound. Returns fewer than `n` when fewer bins exist.
#[must_use]
pub fn top_n<'a, I>(bins: I, metric: BinMetric, n: usize) -> Vec<KmBin>
where
    I: IntoIterator<Item = &'a KmBin>,
{
    let mut ranked: Vec<&KmBin> = bins.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.metric(metric)
            .cmp(&a.metric(metric))
            .then_with(|| a.lower_bound.cmp(&b.lower_bound))
    });
    ranked.into_iter().take(n).cloned().collect()
}

/// Counts dated records per ISO week number and returns the `n` busiest
/// weeks, ties broken by ascending week.
///
/// Weeks from different years share a number, so week 3 of 2022 and week 3
/// of 2023 are counted together. Records without a date are ignored.
#[must_use]
pub fn weekly_counts<'a, I>(records: I, n: usize) -> Vec<WeekCount>
where
    I: IntoIterator<Item = &'a AccidentRecord>,
{
    let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
    for date in records.into_iter().filter_map(|r| r.date) {
        *counts.entry(date.iso_week().week()).or_default() += 1;
    }

    let mut weeks: Vec<WeekCount> = counts
        .into_iter()
        .map(|(week, count)| WeekCount { week, count })
        .collect();
    // Stable sort keeps the ascending week order from the map for ties.
    weeks.sort_by(|a, b| b.count.cmp(&a.count));
    weeks.truncate(n);
    weeks
}

/// Builds the frequency table of a categorical field, most frequent first,
/// ties broken by ascending label. Records missing the field are ignored.
#[must_use]
pub fn category_counts<'a, I>(records: I, field: CategoryField) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a AccidentRecord>,
{
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        let value = match field {
            CategoryField::VehicleType => record.vehicle_type.as_deref(),
            CategoryField::WeatherCondition => record.weather_condition.as_deref(),
        };
        if let Some(label) = value {
            *counts.entry(label).or_default() += 1;
        }
    }

    let mut table: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count,
        })
        .collect();
    table.sort_by(|a, b| b.count.cmp(&a.count));
    table
}
