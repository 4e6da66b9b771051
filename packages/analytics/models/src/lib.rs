#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Kilometer-segment aggregate and view model types.
//!
//! These are the plain data structures the aggregator hands to a
//! presentation host: binned segments, rankings, frequency tables, outlier
//! classes for marker coloring, and the [`ViewModel`] that bundles them for
//! one [`ViewSelection`].

use accident_map_accident_models::{HighwayProfile, KmRange};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Default kilometer bin width.
pub const DEFAULT_BIN_WIDTH: u32 = 10;

/// Default length of every ranking.
pub const DEFAULT_TOP_N: usize = 10;

/// How a bin's representative coordinate is chosen.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CoordinatePolicy {
    /// Mean latitude/longitude of every record in the bin.
    #[default]
    Mean,
    /// Coordinate of the first record encountered in the bin.
    First,
}

/// Metric used to rank bins.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BinMetric {
    /// Number of accident records.
    Total,
    /// Sum of fatalities.
    Fatalities,
}

/// Aggregates for one fixed-width kilometer interval
/// `[lower_bound, lower_bound + width)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KmBin {
    /// Lower kilometer bound, a multiple of `width`.
    pub lower_bound: i64,
    /// Bin width in kilometers.
    pub width: u32,
    /// Representative latitude.
    pub latitude: f64,
    /// Representative longitude.
    pub longitude: f64,
    /// Number of records in the bin.
    pub total: u64,
    /// Sum of fatalities over the bin's records.
    pub fatalities: u64,
    /// Records classified as fatal.
    pub fatal: u64,
    /// Records classified as severe injury.
    pub severe: u64,
    /// Records classified as minor injury.
    pub minor: u64,
}

impl KmBin {
    /// Exclusive upper kilometer bound.
    #[must_use]
    pub fn upper_bound(&self) -> i64 {
        self.lower_bound.saturating_add(i64::from(self.width))
    }

    /// Value of `metric` for this bin.
    #[must_use]
    pub const fn metric(&self, metric: BinMetric) -> u64 {
        match metric {
            BinMetric::Total => self.total,
            BinMetric::Fatalities => self.fatalities,
        }
    }

    /// Stable identifier of this bin.
    #[must_use]
    pub const fn key(&self) -> BinKey {
        BinKey(self.lower_bound)
    }
}

/// Stable bin identifier (the bin's lower kilometer bound) passed from an
/// interactive element back to the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BinKey(pub i64);

impl std::fmt::Display for BinKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a raw bin key is not an integer kilometer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid bin key '{input}': expected an integer kilometer")]
pub struct ParseBinKeyError {
    /// The rejected input.
    pub input: String,
}

impl std::str::FromStr for BinKey {
    type Err = ParseBinKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ParseBinKeyError {
                input: s.to_string(),
            })
    }
}

/// Marker class comparing a bin's total to the mean total of visible bins.
///
/// Variants are ordered `Low < Normal < High`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OutlierClass {
    /// Below 75% of the mean.
    Low,
    /// Within 75%-125% of the mean.
    Normal,
    /// Above 125% of the mean.
    High,
}

impl OutlierClass {
    /// Marker color used by the map presentation.
    #[must_use]
    pub const fn marker_color(self) -> &'static str {
        match self {
            Self::High => "purple",
            Self::Normal => "red",
            Self::Low => "orange",
        }
    }
}

/// Injury breakdown of one bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityBreakdown {
    /// Fatal records.
    pub fatal: u64,
    /// Severe-injury records.
    pub severe: u64,
    /// Minor-injury records.
    pub minor: u64,
    /// Records without a reported injury (`total - injured`, clamped at 0).
    pub uninjured: u64,
    /// Set when the injury counts exceeded the bin total and the residual
    /// had to be clamped.
    pub data_quality_issue: bool,
}

impl SeverityBreakdown {
    /// Records with any reported injury (fatal, severe or minor).
    #[must_use]
    pub const fn injured(&self) -> u64 {
        self.fatal.saturating_add(self.severe).saturating_add(self.minor)
    }
}

/// Accident count for one ISO week number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekCount {
    /// ISO week number (1-53).
    pub week: u32,
    /// Number of accidents in that week across all years.
    pub count: u64,
}

/// Categorical record field that can be tabulated.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CategoryField {
    /// `tipo_veiculo`
    VehicleType,
    /// `condicao_metereologica`
    WeatherCondition,
}

/// Count of records sharing one categorical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category value as it appears in the data.
    pub label: String,
    /// Number of records.
    pub count: u64,
}

/// A bin annotated for map rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinMarker {
    /// The bin being marked.
    pub bin: KmBin,
    /// Outlier class relative to the view's mean bin total.
    pub outlier: OutlierClass,
    /// Marker color for `outlier`.
    pub color: String,
}

/// A selected bin with its injury breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinDetail {
    /// The selected bin.
    pub bin: KmBin,
    /// Injury breakdown of the bin.
    pub breakdown: SeverityBreakdown,
}

/// Result of mapping a marker selection back to a bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SelectionOutcome {
    /// Nothing selected, or the selection did not resolve to a bin. The
    /// reason is meant to be shown to the user as information.
    NoSelection {
        /// Human-readable explanation.
        reason: String,
    },
    /// A bin was selected.
    Selected(BinDetail),
}

/// User-controlled inputs of a view refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSelection {
    /// Optional kilometer sub-range narrowing the highway's extent.
    pub km_range: Option<KmRange>,
    /// Bin width in kilometers.
    pub bin_width: u32,
    /// Representative coordinate policy.
    pub coordinate_policy: CoordinatePolicy,
    /// Length of every ranking.
    pub top_n: usize,
    /// Bin picked on the map, if any.
    pub selected_bin: Option<BinKey>,
}

impl Default for ViewSelection {
    fn default() -> Self {
        Self {
            km_range: None,
            bin_width: DEFAULT_BIN_WIDTH,
            coordinate_policy: CoordinatePolicy::default(),
            top_n: DEFAULT_TOP_N,
            selected_bin: None,
        }
    }
}

/// Everything a presentation host needs to draw one highway view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    /// Highway being shown.
    pub highway: HighwayProfile,
    /// Highway range intersected with the selected sub-range. `None` when
    /// they do not overlap.
    pub effective_range: Option<KmRange>,
    /// Records that passed validity filtering.
    pub valid_records: u64,
    /// Every non-empty bin, in ascending kilometer order.
    pub bins: Vec<KmBin>,
    /// Mean total over `bins`, `None` when there are no bins.
    pub mean_bin_total: Option<f64>,
    /// Every bin with its outlier class, in ascending kilometer order.
    pub markers: Vec<BinMarker>,
    /// Bins with the most accidents.
    pub top_by_total: Vec<KmBin>,
    /// Bins with the most fatalities.
    pub top_by_fatalities: Vec<KmBin>,
    /// ISO weeks with the most accidents.
    pub top_weeks: Vec<WeekCount>,
    /// Vehicle type frequency table.
    pub vehicle_types: Vec<CategoryCount>,
    /// Weather condition frequency table.
    pub weather_conditions: Vec<CategoryCount>,
    /// Marker selection state.
    pub selection: SelectionOutcome,
}
