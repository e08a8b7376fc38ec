//! CSV rendering for employee records.
//!
//! # Invariants
//! - Header is always `ID,Name,Age,Address`.
//! - Rows are joined by `\n` with no trailing newline.
//! - `name` and `address` are text columns; `id` and `age` are bare columns.

use crate::model::employee::EmployeeRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CSV_HEADER: &str = "ID,Name,Age,Address";
pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8";
pub const DEFAULT_EXPORT_PREFIX: &str = "employees";

/// Field quoting scheme used when rendering rows.
pub trait CsvDialect {
    /// Renders a free-text column.
    fn quote_text(&self, value: &str) -> String;
    /// Renders a column that is emitted without quotes when possible.
    fn bare(&self, value: &str) -> String;
}

/// Wraps text columns in quotes without escaping anything.
///
/// Values containing quotes or line breaks produce malformed CSV.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyCsv;

impl CsvDialect for LegacyCsv {
    fn quote_text(&self, value: &str) -> String {
        format!("\"{value}\"")
    }

    fn bare(&self, value: &str) -> String {
        value.to_string()
    }
}

/// RFC 4180 quoting: doubled quotes, quoted fields when needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rfc4180Csv;

impl CsvDialect for Rfc4180Csv {
    fn quote_text(&self, value: &str) -> String {
        format!("\"{}\"", value.replace('"', "\"\""))
    }

    fn bare(&self, value: &str) -> String {
        if value.contains([',', '"', '\r', '\n']) {
            self.quote_text(value)
        } else {
            value.to_string()
        }
    }
}

/// Dialect selector usable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsvDialectKind {
    #[default]
    Legacy,
    Rfc4180,
}

impl CsvDialectKind {
    pub fn dialect(self) -> Box<dyn CsvDialect> {
        match self {
            Self::Legacy => Box::new(LegacyCsv),
            Self::Rfc4180 => Box::new(Rfc4180Csv),
        }
    }
}

/// Renders records as CSV text. An empty slice yields the header alone;
/// callers that must reject empty exports check before calling.
pub fn render_csv(records: &[EmployeeRecord], dialect: &dyn CsvDialect) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.to_string());
    lines.extend(records.iter().map(|record| {
        [
            dialect.bare(&record.id),
            dialect.quote_text(&record.name),
            dialect.bare(&record.age),
            dialect.quote_text(&record.address),
        ]
        .join(",")
    }));
    lines.join("\n")
}

/// Builds `{prefix}_{YYYY-MM-DD}.csv`.
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_{}.csv", date.format("%Y-%m-%d"))
}

/// Writes an export under `dir`, creating it if needed, and returns the path.
pub fn write_export(
    dir: &Path,
    prefix: &str,
    date: NaiveDate,
    contents: &str,
) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(prefix, date));
    std::fs::write(&path, contents)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::{export_file_name, render_csv, CsvDialect, LegacyCsv, Rfc4180Csv};
    use crate::model::employee::EmployeeRecord;
    use chrono::NaiveDate;

    #[test]
    fn legacy_dialect_leaves_quotes_unescaped() {
        let records = vec![EmployeeRecord::new("7", "Sam \"Q\"", "40", "A")];
        let csv = render_csv(&records, &LegacyCsv);
        assert_eq!(csv, "ID,Name,Age,Address\n7,\"Sam \"Q\"\",40,\"A\"");
    }

    #[test]
    fn rfc4180_doubles_quotes_and_guards_bare_columns() {
        let dialect = Rfc4180Csv;
        assert_eq!(dialect.quote_text("Sam \"Q\""), "\"Sam \"\"Q\"\"\"");
        assert_eq!(dialect.bare("12,5"), "\"12,5\"");
        assert_eq!(dialect.bare("34"), "34");
    }

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name("employees", date), "employees_2024-03-09.csv");
    }
}
