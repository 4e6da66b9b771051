//! Record builders shared by the unit tests.

use accident_map_accident_models::{AccidentRecord, InjurySeverity};
use chrono::NaiveDate;

pub fn record(km: f64, fatalities: u32) -> AccidentRecord {
    AccidentRecord {
        id: format!("km-{km}"),
        km: Some(km),
        latitude: Some(-12.0),
        longitude: Some(-41.0),
        date: None,
        fatalities,
        injury_severity: InjurySeverity::Uninjured,
        vehicle_type: None,
        weather_condition: None,
    }
}

pub fn located(km: f64, latitude: f64, longitude: f64) -> AccidentRecord {
    AccidentRecord {
        latitude: Some(latitude),
        longitude: Some(longitude),
        ..record(km, 0)
    }
}

pub fn with_severity(km: f64, severity: InjurySeverity) -> AccidentRecord {
    AccidentRecord {
        injury_severity: severity,
        ..record(km, u32::from(severity == InjurySeverity::Fatal))
    }
}

pub fn dated(km: f64, year: i32, month: u32, day: u32) -> AccidentRecord {
    AccidentRecord {
        date: NaiveDate::from_ymd_opt(year, month, day),
        ..record(km, 0)
    }
}
