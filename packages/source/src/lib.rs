#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Highway profile registry and accident CSV loading.
//!
//! Highways are described by TOML definitions embedded at compile time (see
//! [`registry`]). Their data files are read by [`csv_load`] into
//! [`AccidentRecord`]s, and [`cache::RecordCache`] memoizes the loaded
//! record sets per highway.
//!
//! [`AccidentRecord`]: accident_map_accident_models::AccidentRecord

pub mod cache;
pub mod csv_load;
pub mod highway_def;
pub mod parsing;
pub mod progress;
pub mod registry;
pub mod severity_mapping;

/// Errors that can occur while resolving highways or loading their records.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A highway definition could not be parsed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The data file lacks a column needed for spatial aggregation.
    #[error("Missing required column '{column}' in {label}")]
    MissingColumn {
        /// Name of the missing column.
        column: &'static str,
        /// Human-readable label of the file being read.
        label: String,
    },

    /// No configured highway matches the query.
    #[error("Unknown highway '{query}'")]
    UnknownHighway {
        /// The identifier or name that was looked up.
        query: String,
    },

    /// A highway definition is syntactically valid but unusable.
    #[error("Invalid highway definition '{id}': {message}")]
    InvalidDefinition {
        /// Identifier of the offending definition.
        id: String,
        /// Description of what went wrong.
        message: String,
    },
}
