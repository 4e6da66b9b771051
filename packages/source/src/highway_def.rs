//! Config-driven highway definition.
//!
//! [`HighwayDefinition`] is the serialized form of a
//! [`HighwayProfile`]: one TOML file per highway naming its data file, field
//! delimiter, and valid kilometer extent.

use accident_map_accident_models::{HighwayProfile, KmRange};
use serde::Deserialize;

use crate::SourceError;

/// A highway dataset definition as written in TOML.
#[derive(Debug, Deserialize)]
pub struct HighwayDefinition {
    /// Compact identifier (e.g. `"BR242"`).
    pub id: String,
    /// Display name (e.g. `"BR 242"`).
    pub name: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// Data file name, relative to the data directory.
    pub file: String,
    /// First valid kilometer.
    pub km_start: f64,
    /// Last valid kilometer.
    pub km_end: f64,
    /// Field delimiter (a single ASCII character).
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

fn default_delimiter() -> String {
    ";".to_string()
}

impl HighwayDefinition {
    /// Validates the definition and converts it into a [`HighwayProfile`].
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidDefinition`] if the delimiter is not a
    /// single ASCII byte, the kilometer bounds are not finite, reversed or
    /// negative, or a required text field is empty.
    pub fn into_profile(self) -> Result<HighwayProfile, SourceError> {
        let invalid = |message: String| SourceError::InvalidDefinition {
            id: self.id.clone(),
            message,
        };

        if self.id.trim().is_empty() || self.file.trim().is_empty() {
            return Err(invalid("id and file must not be empty".to_string()));
        }

        let delimiter = match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => *byte,
            _ => {
                return Err(invalid(format!(
                    "delimiter must be a single ASCII character, got '{}'",
                    self.delimiter
                )));
            }
        };

        if !self.km_start.is_finite()
            || !self.km_end.is_finite()
            || self.km_start < 0.0
            || self.km_start > self.km_end
        {
            return Err(invalid(format!(
                "kilometer range {}-{} is not a valid extent",
                self.km_start, self.km_end
            )));
        }

        Ok(HighwayProfile {
            range: KmRange::new(self.km_start, self.km_end),
            id: self.id,
            name: self.name,
            state: self.state,
            file: self.file,
            delimiter,
        })
    }
}

/// Parses a highway definition from a TOML string.
///
/// # Errors
///
/// Returns [`SourceError::Toml`] if the TOML is malformed or missing fields,
/// and [`SourceError::InvalidDefinition`] if its values are unusable.
pub fn parse_highway_toml(toml_str: &str) -> Result<HighwayProfile, SourceError> {
    let definition: HighwayDefinition = toml::from_str(toml_str)?;
    definition.into_profile()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_definition() {
        let profile = parse_highway_toml(
            r#"
            id = "BR999"
            name = "BR 999"
            state = "BA"
            file = "estradaBA-BR999.csv"
            km_start = 10
            km_end = 20.5
            "#,
        )
        .unwrap();

        assert_eq!(profile.id, "BR999");
        assert_eq!(profile.delimiter, b';');
        assert_eq!(profile.range, KmRange::new(10.0, 20.5));
    }

    #[test]
    fn rejects_multi_char_delimiter() {
        let err = parse_highway_toml(
            r#"
            id = "BR999"
            name = "BR 999"
            state = "BA"
            file = "x.csv"
            km_start = 0
            km_end = 1
            delimiter = ";;"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SourceError::InvalidDefinition { .. }));
    }

    #[test]
    fn rejects_reversed_range() {
        let err = parse_highway_toml(
            r#"
            id = "BR999"
            name = "BR 999"
            state = "BA"
            file = "x.csv"
            km_start = 50
            km_end = 10
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SourceError::InvalidDefinition { .. }));
    }

    #[test]
    fn rejects_non_finite_range() {
        let err = parse_highway_toml(
            r#"
            id = "BR999"
            name = "BR 999"
            state = "BA"
            file = "x.csv"
            km_start = 0
            km_end = inf
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SourceError::InvalidDefinition { .. }));
    }

    #[test]
    fn rejects_missing_fields() {
        let err = parse_highway_toml("id = \"BR999\"").unwrap_err();
        assert!(matches!(err, SourceError::Toml(_)));
    }
}
