//! Highway registry. Loads all highway profiles from embedded TOML configs.
//!
//! Each `.toml` file in `packages/source/highways/` is baked into the binary
//! at compile time via [`include_str!`]. Adding a highway means adding a TOML
//! file and listing it below.

use accident_map_accident_models::HighwayProfile;

use crate::SourceError;
use crate::highway_def::parse_highway_toml;

/// TOML configs embedded at compile time.
const HIGHWAY_TOMLS: &[(&str, &str)] = &[
    ("br242", include_str!("../highways/br242.toml")),
    ("br324", include_str!("../highways/br324.toml")),
    ("br101", include_str!("../highways/br101.toml")),
    ("br116", include_str!("../highways/br116.toml")),
    ("br110", include_str!("../highways/br110.toml")),
];

/// Total number of configured highways (used in tests).
#[cfg(test)]
const EXPECTED_HIGHWAY_COUNT: usize = 5;

/// Returns all configured highway profiles, parsed from embedded TOML, in
/// declaration order.
///
/// # Panics
///
/// Panics if any TOML config is malformed (the configs are embedded, so this
/// is caught by the registry tests).
#[must_use]
pub fn all_highways() -> Vec<HighwayProfile> {
    HIGHWAY_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_highway_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Finds a highway by identifier or display name.
///
/// Matching ignores whitespace and case, so `"BR 242"`, `"br242"` and
/// `"BR242"` all resolve to the same profile.
///
/// # Errors
///
/// Returns [`SourceError::UnknownHighway`] if nothing matches.
pub fn find_highway(query: &str) -> Result<HighwayProfile, SourceError> {
    let wanted = normalize_key(query);
    all_highways()
        .into_iter()
        .find(|h| normalize_key(&h.id) == wanted || normalize_key(&h.name) == wanted)
        .ok_or_else(|| SourceError::UnknownHighway {
            query: query.to_string(),
        })
}

fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_highways() {
        assert_eq!(all_highways().len(), EXPECTED_HIGHWAY_COUNT);
    }

    #[test]
    fn highway_ids_are_unique() {
        let highways = all_highways();
        let mut ids: Vec<&str> = highways.iter().map(|h| h.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), EXPECTED_HIGHWAY_COUNT);
    }

    #[test]
    fn all_highways_have_required_fields() {
        for highway in &all_highways() {
            assert!(!highway.name.is_empty(), "{}: empty name", highway.id);
            assert_eq!(highway.state, "BA");
            assert_eq!(highway.delimiter, b';');
            assert!(
                highway.file.ends_with(".csv"),
                "{}: data file is not a CSV",
                highway.id
            );
            assert!(highway.range.start <= highway.range.end);
        }
    }

    #[test]
    fn known_ranges() {
        let br242 = find_highway("BR242").unwrap();
        assert!((br242.range.start - 140.0).abs() < f64::EPSILON);
        assert!((br242.range.end - 901.0).abs() < f64::EPSILON);

        let br324 = find_highway("BR324").unwrap();
        assert!((br324.range.start - 486.0).abs() < f64::EPSILON);
        assert!((br324.range.end - 627.0).abs() < f64::EPSILON);
    }

    #[test]
    fn find_ignores_spacing_and_case() {
        assert_eq!(find_highway("BR 116").unwrap().id, "BR116");
        assert_eq!(find_highway("br-101").unwrap().id, "BR101");
        assert_eq!(find_highway(" br110 ").unwrap().id, "BR110");
    }

    #[test]
    fn unknown_highway_is_an_error() {
        let err = find_highway("BR 999").unwrap_err();
        assert!(matches!(err, SourceError::UnknownHighway { .. }));
    }
}
