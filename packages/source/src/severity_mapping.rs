//! Injury severity mapping.
//!
//! Maps the raw `estado_fisico` strings found in accident files to the
//! canonical [`InjurySeverity`]. Files are not consistent about accents or
//! casing (`"Óbito"`, `"OBITO"`, `"Lesoes Graves"`), so matching folds both
//! before looking for keywords.

use accident_map_accident_models::InjurySeverity;

/// Maps a raw injury classification to [`InjurySeverity`].
///
/// Returns [`InjurySeverity::Unknown`] when no mapping can be determined.
#[must_use]
pub fn map_injury_severity(raw: &str) -> InjurySeverity {
    let folded = fold(raw);

    if contains_any(&folded, &["obito", "morto", "fatal"]) {
        return InjurySeverity::Fatal;
    }
    if contains_any(&folded, &["lesoes graves", "lesao grave", "ferido grave"]) {
        return InjurySeverity::SevereInjury;
    }
    if contains_any(&folded, &["lesoes leves", "lesao leve", "ferido leve"]) {
        return InjurySeverity::MinorInjury;
    }
    if contains_any(&folded, &["ileso", "sem lesao", "sem ferimento"]) {
        return InjurySeverity::Uninjured;
    }

    InjurySeverity::Unknown
}

/// Lowercases and strips Portuguese diacritics.
fn fold(raw: &str) -> String {
    raw.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
