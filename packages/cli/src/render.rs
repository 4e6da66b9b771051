//! Plain-text tables for the terminal.

use accident_map_accident_models::HighwayProfile;
use accident_map_analytics_models::{
    BinDetail, CategoryCount, KmBin, SelectionOutcome, ViewModel,
};

/// Prints a table of all configured highways.
pub fn print_highways(highways: &[HighwayProfile]) {
    println!("{:<8} {:<10} {:<16} FILE", "ID", "NAME", "KM RANGE");
    println!("{}", "-".repeat(60));
    for highway in highways {
        println!(
            "{:<8} {:<10} {:<16} {}",
            highway.id,
            highway.name,
            highway.range.to_string(),
            highway.file
        );
    }
}

/// Prints every table of a view.
pub fn print_view(view: &ViewModel) {
    println!();
    println!("{} ({})", view.highway.name, view.highway.state);
    match view.effective_range {
        Some(range) => println!("Range: {range}"),
        None => println!("Range: selected sub-range does not overlap {}", view.highway.range),
    }
    println!("Valid records: {}", view.valid_records);

    if view.bins.is_empty() {
        println!();
        println!("No accidents in the selected range.");
        return;
    }

    if let Some(mean) = view.mean_bin_total {
        println!("Mean accidents per segment: {mean:.2}");
    }

    println!();
    println!("Segments");
    println!(
        "{:<14} {:>7} {:>10} {:>10} {:>10}  COLOR",
        "KM", "TOTAL", "DEATHS", "LAT", "LNG"
    );
    println!("{}", "-".repeat(66));
    for marker in &view.markers {
        let bin = &marker.bin;
        println!(
            "{:<14} {:>7} {:>10} {:>10.5} {:>10.5}  {}",
            segment_label(bin),
            bin.total,
            bin.fatalities,
            bin.latitude,
            bin.longitude,
            marker.color
        );
    }

    print_ranking("Top segments by accidents", &view.top_by_total, |b| b.total);
    print_ranking("Top segments by deaths", &view.top_by_fatalities, |b| {
        b.fatalities
    });

    println!();
    println!("Top weeks");
    if view.top_weeks.is_empty() {
        println!("  (no dated records)");
    }
    for week in &view.top_weeks {
        println!("  week {:<4} {:>7}", week.week, week.count);
    }

    print_categories("Vehicle types", &view.vehicle_types);
    print_categories("Weather conditions", &view.weather_conditions);

    print_selection(&view.selection);
}

/// Prints the selected bin's breakdown or the reason nothing is selected.
pub fn print_selection(selection: &SelectionOutcome) {
    println!();
    match selection {
        SelectionOutcome::NoSelection { reason } => println!("{reason}"),
        SelectionOutcome::Selected(detail) => print_detail(detail),
    }
}

fn print_detail(detail: &BinDetail) {
    let b = &detail.breakdown;
    println!("Segment {}", segment_label(&detail.bin));
    println!("  Accidents:         {}", detail.bin.total);
    println!("  Deaths:            {}", detail.bin.fatalities);
    println!("  Fatal:             {}", b.fatal);
    println!("  Severe injury:     {}", b.severe);
    println!("  Minor injury:      {}", b.minor);
    println!("  No injury:         {}", b.uninjured);
    if b.data_quality_issue {
        println!("  (injury counts exceed the segment total; check the source data)");
    }
}

fn print_ranking(title: &str, bins: &[KmBin], value: impl Fn(&KmBin) -> u64) {
    println!();
    println!("{title}");
    for (rank, bin) in bins.iter().enumerate() {
        println!("  {:>2}. {:<14} {:>7}", rank + 1, segment_label(bin), value(bin));
    }
}

fn print_categories(title: &str, table: &[CategoryCount]) {
    println!();
    println!("{title}");
    if table.is_empty() {
        println!("  (none recorded)");
    }
    for entry in table {
        println!("  {:<32} {:>7}", entry.label, entry.count);
    }
}

pub fn segment_label(bin: &KmBin) -> String {
    format!("km {}-{}", bin.lower_bound, bin.upper_bound())
}
