//! Outlier classification and per-bin injury breakdown.

use accident_map_analytics_models::{BinMarker, KmBin, OutlierClass, SeverityBreakdown};

/// A bin is [`OutlierClass::High`] above this multiple of the mean total.
pub const HIGH_FACTOR: f64 = 1.25;

/// A bin is [`OutlierClass::Low`] below this multiple of the mean total.
pub const LOW_FACTOR: f64 = 0.75;

/// Classifies a bin total against the mean total of the visible bins.
///
/// Monotonic in `bin_total`: raising it can only move the class from
/// `Low` to `Normal` to `High`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn classify_outlier(bin_total: u64, mean_total: f64) -> OutlierClass {
    let total = bin_total as f64;
    if total > mean_total * HIGH_FACTOR {
        OutlierClass::High
    } else if total < mean_total * LOW_FACTOR {
        OutlierClass::Low
    } else {
        OutlierClass::Normal
    }
}

/// Mean record total over `bins`, or `None` when there are no bins.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_bin_total<'a, I>(bins: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a KmBin>,
{
    let (count, sum) = bins
        .into_iter()
        .fold((0_u64, 0_u64), |(count, sum), bin| (count + 1, sum + bin.total));
    (count > 0).then(|| sum as f64 / count as f64)
}

/// Classifies every bin against the mean of all of them. Returns an empty
/// list when there are no bins.
#[must_use]
pub fn mark_bins(bins: &[KmBin]) -> Vec<BinMarker> {
    let Some(mean) = mean_bin_total(bins) else {
        return Vec::new();
    };

    bins.iter()
        .map(|bin| {
            let outlier = classify_outlier(bin.total, mean);
            BinMarker {
                bin: bin.clone(),
                outlier,
                color: outlier.marker_color().to_string(),
            }
        })
        .collect()
}

/// Splits a bin's total into fatal, severe, minor and "no reported injury"
/// counts.
///
/// The residual is `total - (fatal + severe + minor)`. If the injury counts
/// exceed the total the residual is clamped to zero, a warning is logged, and
/// [`SeverityBreakdown::data_quality_issue`] is set.
#[must_use]
pub fn severity_breakdown(bin: &KmBin) -> SeverityBreakdown {
    let injured = bin
        .fatal
        .saturating_add(bin.severe)
        .saturating_add(bin.minor);

    let (uninjured, data_quality_issue) = match bin.total.checked_sub(injured) {
        Some(residual) => (residual, false),
        None => {
            log::warn!(
                "Bin km {}-{}: {injured} injury records exceed total {}, clamping residual to 0",
                bin.lower_bound,
                bin.upper_bound(),
                bin.total
            );
            (0, true)
        }
    };

    SeverityBreakdown {
        fatal: bin.fatal,
        severe: bin.severe,
        minor: bin.minor,
        uninjured,
        data_quality_issue,
    }
}
