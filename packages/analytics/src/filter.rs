//! Record validity filtering.

use accident_map_accident_models::{AccidentRecord, HighwayProfile, KmRange};

/// Returns the highway's range narrowed by an optional sub-range, or `None`
/// when the two do not overlap.
#[must_use]
pub fn effective_range(profile: &HighwayProfile, km_range: Option<&KmRange>) -> Option<KmRange> {
    km_range.map_or(Some(profile.range), |sub| profile.range.intersect(sub))
}

/// Keeps the records usable for spatial aggregation on `profile`.
///
/// A record survives when it has a kilometer position and both coordinates,
/// and its kilometer lies inside the effective range (both ends inclusive).
/// Input order is preserved. An empty result is a normal outcome.
#[must_use]
pub fn filter_valid<'a>(
    records: &'a [AccidentRecord],
    profile: &HighwayProfile,
    km_range: Option<&KmRange>,
) -> Vec<&'a AccidentRecord> {
    let Some(range) = effective_range(profile, km_range) else {
        log::debug!(
            "[{}] Sub-range {km_range:?} does not overlap {}",
            profile.id,
            profile.range
        );
        return Vec::new();
    };

    let valid: Vec<&AccidentRecord> = records
        .iter()
        .filter(|r| r.position().is_some_and(|(km, _, _)| range.contains(km)))
        .collect();

    log::debug!(
        "[{}] {} of {} records valid for {range}",
        profile.id,
        valid.len(),
        records.len()
    );

    valid
}
