//! Single entry point that recomputes every aggregate for one selection.

use accident_map_accident_models::{AccidentRecord, HighwayProfile};
use accident_map_analytics_models::{
    BinDetail, BinKey, BinMetric, CategoryField, KmBin, SelectionOutcome, ViewModel,
    ViewSelection,
};

use crate::{
    binning::bin_by_kilometer,
    classify::{mark_bins, mean_bin_total, severity_breakdown},
    filter::{effective_range, filter_valid},
    ranking::{category_counts, top_n, weekly_counts},
};

/// Builds the complete [`ViewModel`] for `selection` over `records`.
///
/// Rankings, outlier classes and frequency tables are all computed from the
/// records that survive [`filter_valid`] for the selection's sub-range.
/// The function is pure: the same inputs always produce an equal view.
#[must_use]
pub fn compute_view(
    records: &[AccidentRecord],
    profile: &HighwayProfile,
    selection: &ViewSelection,
) -> ViewModel {
    let valid = filter_valid(records, profile, selection.km_range.as_ref());

    let bins: Vec<KmBin> = bin_by_kilometer(
        valid.iter().copied(),
        selection.bin_width,
        selection.coordinate_policy,
    )
    .into_values()
    .collect();

    log::debug!(
        "[{}] {} valid records in {} bins",
        profile.id,
        valid.len(),
        bins.len()
    );

    let selection_outcome = resolve_selection(&bins, selection.selected_bin);

    ViewModel {
        highway: profile.clone(),
        effective_range: effective_range(profile, selection.km_range.as_ref()),
        valid_records: valid.len() as u64,
        mean_bin_total: mean_bin_total(&bins),
        markers: mark_bins(&bins),
        top_by_total: top_n(&bins, BinMetric::Total, selection.top_n),
        top_by_fatalities: top_n(&bins, BinMetric::Fatalities, selection.top_n),
        top_weeks: weekly_counts(valid.iter().copied(), selection.top_n),
        vehicle_types: category_counts(valid.iter().copied(), CategoryField::VehicleType),
        weather_conditions: category_counts(valid.iter().copied(), CategoryField::WeatherCondition),
        selection: selection_outcome,
        bins,
    }
}

/// Maps a selected bin key back to its bin and severity breakdown.
///
/// No key, or a key that matches no current bin, yields
/// [`SelectionOutcome::NoSelection`].
#[must_use]
pub fn resolve_selection<'a, I>(bins: I, key: Option<BinKey>) -> SelectionOutcome
where
    I: IntoIterator<Item = &'a KmBin>,
{
    let Some(key) = key else {
        return SelectionOutcome::NoSelection {
            reason: "No segment selected".to_string(),
        };
    };

    bins.into_iter().find(|bin| bin.key() == key).map_or_else(
        || {
            log::debug!("Bin key {key} matches no current bin");
            SelectionOutcome::NoSelection {
                reason: format!("No segment starts at km {key}"),
            }
        },
        |bin| {
            SelectionOutcome::Selected(BinDetail {
                bin: bin.clone(),
                breakdown: severity_breakdown(bin),
            })
        },
    )
}

/// Like [`resolve_selection`], for a key still in its raw textual form.
///
/// A key that is not an integer kilometer is reported as
/// [`SelectionOutcome::NoSelection`] rather than an error.
#[must_use]
pub fn resolve_raw_selection<'a, I>(bins: I, raw: Option<&str>) -> SelectionOutcome
where
    I: IntoIterator<Item = &'a KmBin>,
{
    match raw.map(str::parse::<BinKey>) {
        None => resolve_selection(bins, None),
        Some(Ok(key)) => resolve_selection(bins, Some(key)),
        Some(Err(e)) => {
            log::debug!("Ignoring selection: {e}");
            SelectionOutcome::NoSelection {
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use accident_map_accident_models::{InjurySeverity, KmRange};
    use accident_map_analytics_models::OutlierClass;

    use super::*;
    use crate::fixtures::{dated, record, with_severity};

    fn profile() -> HighwayProfile {
        HighwayProfile {
            id: "BR242".to_string(),
            name: "BR 242".to_string(),
            state: "BA".to_string(),
            file: "estradaBA-BR242.csv".to_string(),
            delimiter: b';',
            range: KmRange::new(140.0, 901.0),
        }
    }

    fn sample() -> Vec<AccidentRecord> {
        let mut records = vec![
            record(145.0, 1),
            record(148.0, 0),
            record(155.0, 2),
            with_severity(156.0, InjurySeverity::SevereInjury),
            with_severity(157.0, InjurySeverity::MinorInjury),
            dated(171.0, 2023, 1, 9),
            // Outside the highway range.
            record(120.0, 5),
            record(950.0, 5),
        ];
        records[0].vehicle_type = Some("Automóvel".to_string());
        records[2].vehicle_type = Some("Automóvel".to_string());
        records[3].vehicle_type = Some("Motocicleta".to_string());
        records
    }

    #[test]
    fn aggregates_valid_records_only() {
        let view = compute_view(&sample(), &profile(), &ViewSelection::default());

        assert_eq!(view.valid_records, 6);
        let bounds: Vec<i64> = view.bins.iter().map(|b| b.lower_bound).collect();
        assert_eq!(bounds, vec![140, 150, 170]);
        assert_eq!(view.bins.iter().map(|b| b.total).sum::<u64>(), 6);
        assert_eq!(view.markers.len(), view.bins.len());
        assert_eq!(view.top_by_total[0].lower_bound, 150);
        assert_eq!(view.top_by_fatalities[0].lower_bound, 150);
        assert_eq!(view.top_weeks.len(), 1);
        assert_eq!(view.vehicle_types[0].label, "Automóvel");
        assert_eq!(view.vehicle_types[0].count, 2);
        assert!(view.weather_conditions.is_empty());
        assert!(matches!(
            view.selection,
            SelectionOutcome::NoSelection { .. }
        ));
    }

    #[test]
    fn markers_classify_against_mean() {
        let view = compute_view(&sample(), &profile(), &ViewSelection::default());
        // Totals 2, 3, 1 around a mean of 2.
        let mean = view.mean_bin_total.unwrap();
        assert!((mean - 2.0).abs() < f64::EPSILON);
        let classes: Vec<OutlierClass> = view.markers.iter().map(|m| m.outlier).collect();
        assert_eq!(
            classes,
            vec![OutlierClass::Normal, OutlierClass::High, OutlierClass::Low]
        );
    }

    #[test]
    fn is_idempotent() {
        let records = sample();
        let selection = ViewSelection {
            selected_bin: Some(BinKey(150)),
            ..ViewSelection::default()
        };
        let first = compute_view(&records, &profile(), &selection);
        let second = compute_view(&records, &profile(), &selection);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_yields_empty_view() {
        let view = compute_view(&[], &profile(), &ViewSelection::default());
        assert_eq!(view.valid_records, 0);
        assert!(view.bins.is_empty());
        assert!(view.markers.is_empty());
        assert!(view.mean_bin_total.is_none());
        assert!(view.top_by_total.is_empty());
        assert!(view.top_weeks.is_empty());
    }

    #[test]
    fn disjoint_sub_range_yields_empty_view() {
        let selection = ViewSelection {
            km_range: Some(KmRange::new(0.0, 100.0)),
            ..ViewSelection::default()
        };
        let view = compute_view(&sample(), &profile(), &selection);
        assert!(view.effective_range.is_none());
        assert!(view.bins.is_empty());
    }

    #[test]
    fn sub_range_narrows_rankings() {
        let selection = ViewSelection {
            km_range: Some(KmRange::new(150.0, 160.0)),
            ..ViewSelection::default()
        };
        let view = compute_view(&sample(), &profile(), &selection);
        assert_eq!(view.valid_records, 3);
        assert_eq!(view.top_by_total.len(), 1);
        assert!(view.top_weeks.is_empty());
        assert_eq!(view.vehicle_types.len(), 2);
    }

    #[test]
    fn selected_bin_carries_breakdown() {
        let selection = ViewSelection {
            selected_bin: Some(BinKey(150)),
            ..ViewSelection::default()
        };
        let view = compute_view(&sample(), &profile(), &selection);
        let SelectionOutcome::Selected(detail) = view.selection else {
            panic!("expected a selected bin");
        };
        assert_eq!(detail.bin.lower_bound, 150);
        assert_eq!(detail.breakdown.severe, 1);
        assert_eq!(detail.breakdown.minor, 1);
        assert_eq!(detail.breakdown.uninjured, 1);
    }

    #[test]
    fn unknown_key_is_no_selection() {
        let view = compute_view(&sample(), &profile(), &ViewSelection::default());
        assert!(matches!(
            resolve_selection(&view.bins, Some(BinKey(990))),
            SelectionOutcome::NoSelection { .. }
        ));
    }

    #[test]
    fn malformed_raw_key_is_no_selection() {
        let view = compute_view(&sample(), &profile(), &ViewSelection::default());
        let SelectionOutcome::NoSelection { reason } =
            resolve_raw_selection(&view.bins, Some("Km 150"))
        else {
            panic!("expected no selection");
        };
        assert!(reason.contains("Km 150"));

        assert!(matches!(
            resolve_raw_selection(&view.bins, Some("150")),
            SelectionOutcome::Selected(_)
        ));
    }

    #[test]
    fn serializes_for_presentation() {
        let selection = ViewSelection {
            selected_bin: Some(BinKey(140)),
            ..ViewSelection::default()
        };
        let view = compute_view(&sample(), &profile(), &selection);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["validRecords"], 6);
        assert_eq!(json["bins"][0]["lowerBound"], 140);
        assert_eq!(json["markers"][1]["color"], "purple");
        assert_eq!(json["selection"]["status"], "selected");
        assert_eq!(json["selection"]["bin"]["lowerBound"], 140);
    }
}
