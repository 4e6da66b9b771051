//! Accident CSV loader.
//!
//! Reads one delimited text file per highway and converts every row into an
//! [`AccidentRecord`]. Headers are matched by name, so column order does not
//! matter. Cells that cannot be parsed become "missing" on the record; rows
//! the CSV reader cannot decode are skipped with a warning.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use accident_map_accident_models::{AccidentRecord, HighwayProfile, InjurySeverity};
use csv::StringRecord;

use crate::SourceError;
use crate::parsing::{non_empty, parse_count, parse_date, parse_decimal};
use crate::progress::ProgressCallback;
use crate::severity_mapping::map_injury_severity;

/// How often (in rows) the loader reports progress.
const PROGRESS_BATCH: u64 = 5_000;

/// Configuration for reading one accident file.
#[derive(Debug, Clone, Copy)]
pub struct CsvLoadConfig<'a> {
    /// Human-readable label for log messages.
    pub label: &'a str,
    /// Field delimiter byte.
    pub delimiter: u8,
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    id: Option<usize>,
    km: usize,
    latitude: usize,
    longitude: usize,
    date: Option<usize>,
    fatalities: Option<usize>,
    injury_severity: Option<usize>,
    vehicle_type: Option<usize>,
    weather_condition: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, label: &str) -> Result<Self, SourceError> {
        let names: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |name: &str| names.iter().position(|h| h == name);
        let require = |column: &'static str| {
            find(column).ok_or_else(|| SourceError::MissingColumn {
                column,
                label: label.to_string(),
            })
        };

        Ok(Self {
            id: find("id"),
            km: require("km")?,
            latitude: require("latitude")?,
            longitude: require("longitude")?,
            date: find("data_inversa"),
            fatalities: find("mortos"),
            injury_severity: find("estado_fisico"),
            vehicle_type: find("tipo_veiculo"),
            weather_condition: find("condicao_metereologica"),
        })
    }

    fn to_record(self, row: &StringRecord, row_number: u64) -> AccidentRecord {
        let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i));

        AccidentRecord {
            id: cell(self.id)
                .and_then(non_empty)
                .unwrap_or_else(|| row_number.to_string()),
            km: cell(Some(self.km)).and_then(parse_decimal),
            latitude: cell(Some(self.latitude)).and_then(parse_decimal),
            longitude: cell(Some(self.longitude)).and_then(parse_decimal),
            date: cell(self.date).and_then(parse_date),
            fatalities: cell(self.fatalities).map_or(0, parse_count),
            injury_severity: cell(self.injury_severity)
                .map_or(InjurySeverity::Unknown, map_injury_severity),
            vehicle_type: cell(self.vehicle_type).and_then(non_empty),
            weather_condition: cell(self.weather_condition).and_then(non_empty),
        }
    }
}

/// Lowercases a header and strips whitespace and a UTF-8 byte order mark.
fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
}

/// Reads accident records from any reader.
///
/// # Errors
///
/// Returns [`SourceError::MissingColumn`] if the header row lacks `km`,
/// `latitude` or `longitude`, and [`SourceError::Csv`] if the header row
/// cannot be read or the underlying reader fails.
pub fn read_records<R: Read>(
    reader: R,
    config: &CsvLoadConfig<'_>,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<AccidentRecord>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnIndex::resolve(reader.headers()?, config.label)?;

    let mut records = Vec::new();
    let mut skipped: u64 = 0;
    let mut row_number: u64 = 0;

    for result in reader.records() {
        row_number += 1;
        if row_number % PROGRESS_BATCH == 0 {
            progress.inc(PROGRESS_BATCH);
        }

        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                log::warn!("[{}] Skipping malformed row {row_number}: {e}", config.label);
                skipped += 1;
                continue;
            }
        };

        records.push(columns.to_record(&row, row_number));
    }
    progress.inc(row_number % PROGRESS_BATCH);

    let unplaced = records.iter().filter(|r| r.position().is_none()).count();
    log::info!(
        "[{}] Loaded {} records ({unplaced} without km/coordinates, {skipped} malformed rows skipped)",
        config.label,
        records.len()
    );
    progress.finish(format!(
        "[{}] load complete -- {} records",
        config.label,
        records.len()
    ));

    Ok(records)
}

/// Reads accident records from a file on disk.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be opened, plus every
/// error [`read_records`] can return.
pub fn load_records(
    path: &Path,
    config: &CsvLoadConfig<'_>,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<AccidentRecord>, SourceError> {
    log::info!("[{}] Reading {}", config.label, path.display());
    progress.set_message(format!("[{}] reading {}", config.label, path.display()));
    let file = std::fs::File::open(path)?;
    read_records(std::io::BufReader::new(file), config, progress)
}

/// Returns the path of a highway's data file inside `data_dir`.
#[must_use]
pub fn data_file_path(data_dir: &Path, profile: &HighwayProfile) -> PathBuf {
    data_dir.join(&profile.file)
}

/// Loads every record of a highway's data file.
///
/// # Errors
///
/// See [`load_records`].
pub fn load_highway(
    profile: &HighwayProfile,
    data_dir: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<AccidentRecord>, SourceError> {
    let config = CsvLoadConfig {
        label: &profile.id,
        delimiter: profile.delimiter,
    };
    load_records(&data_file_path(data_dir, profile), &config, progress)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use chrono::NaiveDate;

    use super::*;
    use crate::progress::null_progress;

    #[derive(Default)]
    struct CountingProgress {
        rows: AtomicU64,
    }

    impl ProgressCallback for CountingProgress {
        fn inc(&self, delta: u64) {
            self.rows.fetch_add(delta, Ordering::Relaxed);
        }
        fn set_message(&self, _msg: String) {}
        fn finish(&self, _msg: String) {}
    }

    const CONFIG: CsvLoadConfig<'static> = CsvLoadConfig {
        label: "test",
        delimiter: b';',
    };

    const SAMPLE: &str = "\u{feff}id;data_inversa;km;mortos;estado_fisico;tipo_veiculo;condicao_metereologica;latitude;longitude\n\
        1;2023-01-15;145,2;1;Óbito;Automóvel;Céu Claro;-12,10;-41,50\n\
        2;2023-01-16;148;0;Lesões Leves;Motocicleta;Chuva;-12.11;-41.51\n\
        3;not a date;;0;Ileso;Automóvel;Céu Claro;-12.12;-41.52\n\
        4;2023-02-01;155;2;Lesões Graves;;Nublado;;\n";

    fn read(input: &str) -> Result<Vec<AccidentRecord>, SourceError> {
        read_records(input.as_bytes(), &CONFIG, &null_progress())
    }

    #[test]
    fn reads_all_rows_with_bom_header() {
        let records = read(SAMPLE).unwrap();
        assert_eq!(records.len(), 4);

        let first = &records[0];
        assert_eq!(first.id, "1");
        assert!((first.km.unwrap() - 145.2).abs() < 1e-9);
        assert!((first.latitude.unwrap() - -12.10).abs() < 1e-9);
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2023, 1, 15));
        assert_eq!(first.fatalities, 1);
        assert_eq!(first.injury_severity, InjurySeverity::Fatal);
        assert_eq!(first.vehicle_type.as_deref(), Some("Automóvel"));
        assert_eq!(first.weather_condition.as_deref(), Some("Céu Claro"));
    }

    #[test]
    fn unparseable_cells_become_missing() {
        let records = read(SAMPLE).unwrap();

        let undated = &records[2];
        assert!(undated.date.is_none());
        assert!(undated.km.is_none());
        assert!(undated.position().is_none());

        let unplaced = &records[3];
        assert!(unplaced.latitude.is_none());
        assert!(unplaced.longitude.is_none());
        assert!(unplaced.vehicle_type.is_none());
        assert_eq!(unplaced.injury_severity, InjurySeverity::SevereInjury);
    }

    #[test]
    fn column_order_does_not_matter() {
        let input = "longitude;latitude;km\n-41.5;-12.1;200\n";
        let records = read(input).unwrap();
        assert_eq!(records.len(), 1);
        assert!((records[0].km.unwrap() - 200.0).abs() < f64::EPSILON);
        assert!((records[0].longitude.unwrap() - -41.5).abs() < f64::EPSILON);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].injury_severity, InjurySeverity::Unknown);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let err = read("id;km;latitude\n1;10;-12\n").unwrap_err();
        assert!(matches!(
            err,
            SourceError::MissingColumn {
                column: "longitude",
                ..
            }
        ));
    }

    #[test]
    fn short_rows_are_tolerated() {
        let records = read("id;km;latitude;longitude;mortos\n7;12\n").unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].latitude.is_none());
        assert_eq!(records[0].fatalities, 0);
    }

    #[test]
    fn empty_file_body_yields_no_records() {
        let records = read("id;km;latitude;longitude\n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_records(
            Path::new("/definitely/not/here.csv"),
            &CONFIG,
            &null_progress(),
        )
        .unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }

    #[test]
    fn data_file_path_joins_profile_file() {
        let profile = crate::registry::find_highway("BR242").unwrap();
        assert_eq!(
            data_file_path(Path::new("data"), &profile),
            Path::new("data").join("estradaBA-BR242.csv")
        );
    }

    #[test]
    fn progress_counts_every_row_including_skipped() {
        let mut input = b"id;km;latitude;longitude\n".to_vec();
        for i in 1..PROGRESS_BATCH {
            input.extend_from_slice(format!("{i};150;-12;-41\n").as_bytes());
        }
        // Row number PROGRESS_BATCH is not valid UTF-8 and gets skipped.
        input.extend_from_slice(b"\xff;150;-12;-41\n");
        input.extend_from_slice(b"a;151;-12;-41\nb;152;-12;-41\n");

        let counter = Arc::new(CountingProgress::default());
        let progress: Arc<dyn ProgressCallback> = counter.clone();
        let records = read_records(input.as_slice(), &CONFIG, &progress).unwrap();

        assert_eq!(records.len() as u64, PROGRESS_BATCH + 1);
        assert_eq!(counter.rows.load(Ordering::Relaxed), PROGRESS_BATCH + 2);
    }
}
