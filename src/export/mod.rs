//! Export module for memberfile
//!
//! Exports the member audit log in multiple formats:
//! - CSV: one row per changed field (spreadsheet-compatible)
//! - JSON: machine-readable, with schema version and metadata
//! - YAML: human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_logs_csv;
pub use json::{export_logs_json, AuditExport, ExportedField, ExportedLog, EXPORT_SCHEMA_VERSION};
pub use yaml::export_logs_yaml;
