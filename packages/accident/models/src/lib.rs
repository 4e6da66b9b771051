#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Highway accident record types and the injury severity taxonomy.
//!
//! Every loader produces [`AccidentRecord`] values, and every highway is
//! described by a [`HighwayProfile`] whose [`KmRange`] decides which records
//! are valid for it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Worst physical outcome recorded for an accident row.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum InjurySeverity {
    /// Death (`Óbito`)
    Fatal,
    /// Severe injuries (`Lesões Graves`)
    SevereInjury,
    /// Minor injuries (`Lesões Leves`)
    MinorInjury,
    /// No injury (`Ileso`)
    Uninjured,
    /// Missing or unrecognized classification
    Unknown,
}

impl InjurySeverity {
    /// Whether this outcome counts as a reported injury (fatal, severe or
    /// minor).
    #[must_use]
    pub const fn is_injury(self) -> bool {
        matches!(self, Self::Fatal | Self::SevereInjury | Self::MinorInjury)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Fatal,
            Self::SevereInjury,
            Self::MinorInjury,
            Self::Uninjured,
            Self::Unknown,
        ]
    }
}

/// One row of accident data for a highway.
///
/// Numeric and date fields that could not be parsed are `None`; the record is
/// kept so that non-spatial aggregations can still see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccidentRecord {
    /// Identifier from the source file.
    pub id: String,
    /// Kilometer position along the highway.
    pub km: Option<f64>,
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
    /// Calendar date of the accident.
    pub date: Option<NaiveDate>,
    /// Number of deaths.
    pub fatalities: u32,
    /// Injury classification.
    pub injury_severity: InjurySeverity,
    /// Vehicle type involved.
    pub vehicle_type: Option<String>,
    /// Weather at the time of the accident.
    pub weather_condition: Option<String>,
}

impl AccidentRecord {
    /// Returns `(km, latitude, longitude)` when all three are present.
    #[must_use]
    pub fn position(&self) -> Option<(f64, f64, f64)> {
        Some((self.km?, self.latitude?, self.longitude?))
    }
}

/// Inclusive kilometer interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KmRange {
    /// First kilometer included.
    pub start: f64,
    /// Last kilometer included.
    pub end: f64,
}

impl KmRange {
    /// Creates a range, swapping the bounds if they were given backwards.
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Whether `km` lies inside the range (both ends inclusive).
    #[must_use]
    pub fn contains(&self, km: f64) -> bool {
        km >= self.start && km <= self.end
    }

    /// Returns the overlap of two ranges, or `None` when they are disjoint.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start <= end {
            Some(Self { start, end })
        } else {
            None
        }
    }
}

impl std::fmt::Display for KmRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "km {}-{}", self.start, self.end)
    }
}

/// Static description of one highway dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighwayProfile {
    /// Compact identifier (e.g. `"BR242"`).
    pub id: String,
    /// Display name (e.g. `"BR 242"`).
    pub name: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// Data file name, relative to the data directory.
    pub file: String,
    /// Field delimiter byte of the data file.
    pub delimiter: u8,
    /// Valid kilometer extent of the highway.
    pub range: KmRange,
}
