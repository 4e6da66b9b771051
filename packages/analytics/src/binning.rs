//! Fixed-width kilometer binning.
//!
//! A record at kilometer `km` belongs to the bin whose lower bound is
//! `floor(km / width) * width`. Each record lands in exactly one bin, so the
//! bin totals always sum to the number of binned records.

use std::collections::BTreeMap;

use accident_map_accident_models::{AccidentRecord, InjurySeverity};
use accident_map_analytics_models::{CoordinatePolicy, DEFAULT_BIN_WIDTH, KmBin};

/// Exclusive magnitude limit of a bin lower bound (2^63).
const LOWER_BOUND_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Returns the lower bound of the bin containing `km`, or `None` when `km`
/// is not finite or the bound does not fit in an `i64`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn bin_lower_bound(km: f64, width: u32) -> Option<i64> {
    let width = f64::from(width);
    let bound = (km / width).floor() * width;
    (bound.is_finite() && (-LOWER_BOUND_LIMIT..LOWER_BOUND_LIMIT).contains(&bound))
        .then_some(bound as i64)
}

/// Running sums for one bin.
struct BinAccumulator {
    first: (f64, f64),
    latitude_sum: f64,
    longitude_sum: f64,
    total: u64,
    fatalities: u64,
    fatal: u64,
    severe: u64,
    minor: u64,
}

impl BinAccumulator {
    const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            first: (latitude, longitude),
            latitude_sum: 0.0,
            longitude_sum: 0.0,
            total: 0,
            fatalities: 0,
            fatal: 0,
            severe: 0,
            minor: 0,
        }
    }

    fn add(&mut self, record: &AccidentRecord, latitude: f64, longitude: f64) {
        self.latitude_sum += latitude;
        self.longitude_sum += longitude;
        self.total += 1;
        self.fatalities += u64::from(record.fatalities);
        match record.injury_severity {
            InjurySeverity::Fatal => self.fatal += 1,
            InjurySeverity::SevereInjury => self.severe += 1,
            InjurySeverity::MinorInjury => self.minor += 1,
            InjurySeverity::Uninjured | InjurySeverity::Unknown => {}
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(self, lower_bound: i64, width: u32, policy: CoordinatePolicy) -> KmBin {
        let (latitude, longitude) = match policy {
            CoordinatePolicy::First => self.first,
            CoordinatePolicy::Mean => (
                self.latitude_sum / self.total as f64,
                self.longitude_sum / self.total as f64,
            ),
        };

        KmBin {
            lower_bound,
            width,
            latitude,
            longitude,
            total: self.total,
            fatalities: self.fatalities,
            fatal: self.fatal,
            severe: self.severe,
            minor: self.minor,
        }
    }
}

/// Partitions records into kilometer bins of `width` and aggregates each
/// non-empty bin.
///
/// Records without a kilometer position or coordinates are skipped, as are
/// records whose kilometer has no representable bin. A
/// `width` of zero falls back to [`DEFAULT_BIN_WIDTH`]. With
/// [`CoordinatePolicy::First`] the representative coordinate depends on
/// input order; with [`CoordinatePolicy::Mean`] the result is
/// order-independent.
#[must_use]
pub fn bin_by_kilometer<'a, I>(
    records: I,
    width: u32,
    policy: CoordinatePolicy,
) -> BTreeMap<i64, KmBin>
where
    I: IntoIterator<Item = &'a AccidentRecord>,
{
    let width = if width == 0 {
        log::warn!("Bin width 0 is invalid, using {DEFAULT_BIN_WIDTH}");
        DEFAULT_BIN_WIDTH
    } else {
        width
    };

    let mut accumulators: BTreeMap<i64, BinAccumulator> = BTreeMap::new();

    for record in records {
        let Some((km, latitude, longitude)) = record.position() else {
            continue;
        };
        let Some(lower_bound) = bin_lower_bound(km, width) else {
            log::warn!("Record {} at km {km} is out of binnable range, skipping", record.id);
            continue;
        };
        accumulators
            .entry(lower_bound)
            .or_insert_with(|| BinAccumulator::new(latitude, longitude))
            .add(record, latitude, longitude);
    }

    accumulators
        .into_iter()
        .map(|(lower_bound, acc)| (lower_bound, acc.finish(lower_bound, width, policy)))
        .collect()
}
