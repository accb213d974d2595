//! Report output for query results.
//!
//! Supports pretty-printing, JSON rendering, and CSV write/append. Null
//! cells become empty CSV fields and JSON `null`.

use std::fmt::Debug;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::table::{Row, Table};

/// Logs any result using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    debug!("{:#?}", value);
}

fn header<R: Row>(table: &Table<R>) -> Vec<String> {
    table.column_names()
}

fn csv_fields<R: Row>(row: &R) -> Vec<String> {
    let mut fields = row.key_fields();
    fields.extend(
        row.values()
            .iter()
            .map(|v| v.map(|x| x.to_string()).unwrap_or_default()),
    );
    fields
}

/// Writes a table as CSV, header included.
pub fn write_table_csv<R: Row, W: Write>(table: &Table<R>, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(header(table))?;
    for row in table.rows() {
        wtr.write_record(csv_fields(row))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Appends a table's rows to a CSV file.
///
/// Creates the file with headers if it does not already exist. The caller
/// is responsible for appending tables with matching columns.
pub fn append_table_csv<R: Row>(path: &Path, table: &Table<R>) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, rows = table.len(), "Appending CSV rows");

    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);

    if !file_exists {
        wtr.write_record(header(table))?;
    }
    for row in table.rows() {
        wtr.write_record(csv_fields(row))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Renders a table as a JSON array of records keyed by column name.
pub fn table_to_json<R: Row>(table: &Table<R>) -> Result<String> {
    let records: Vec<Map<String, JsonValue>> = table
        .rows()
        .iter()
        .map(|row| {
            let keys = R::KEY_COLUMNS.iter().map(|k| k.to_string()).zip(row.key_json());
            let values = table
                .sensors()
                .iter()
                .map(|s| s.name().to_string())
                .zip(row.values().iter().map(|v| v.map_or(JsonValue::Null, JsonValue::from)));
            keys.chain(values).collect()
        })
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Writes plain records (locations, missing-data summaries) as CSV.
pub fn write_records_csv<T: Serialize, W: Write>(records: &[T], writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn records_to_json<T: Serialize>(records: &[T]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MissingSummary, YearMonth};
    use crate::sensors::Sensor;
    use crate::table::{MonthlyRow, MonthlyTable};
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(name)
    }

    fn sample() -> MonthlyTable {
        Table::new(
            vec![Sensor::Queen45, Sensor::LowerAlbertEw],
            vec![
                MonthlyRow {
                    year_month: YearMonth { year: 2022, month: 3 },
                    year: 2022,
                    month: 3,
                    values: vec![Some(1200.0), None],
                },
                MonthlyRow {
                    year_month: YearMonth { year: 2022, month: 4 },
                    year: 2022,
                    month: 4,
                    values: vec![Some(1350.5), Some(88.0)],
                },
            ],
        )
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample());
    }

    #[test]
    fn test_write_table_csv() {
        let mut buf = Vec::new();
        write_table_csv(&sample(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "year_month,year,month,45 Queen Street,188 Quay Street Lower Albert EW"
        );
        assert_eq!(lines[1], "2022-03,2022,3,1200,");
        assert_eq!(lines[2], "2022-04,2022,4,1350.5,88");
    }

    #[test]
    fn test_table_to_json_nulls() {
        let json = table_to_json(&sample()).unwrap();
        let parsed: JsonValue = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["year_month"], "2022-03");
        assert_eq!(parsed[0]["188 Quay Street Lower Albert EW"], JsonValue::Null);
        assert_eq!(parsed[1]["45 Queen Street"], 1350.5);
        assert_eq!(parsed[1]["month"], 4);
    }

    #[test]
    fn test_append_table_csv_writes_header_once() {
        let path = temp_path("akl_ped_counts_test_append.csv");
        let _ = fs::remove_file(&path);

        append_table_csv(&path, &sample()).unwrap();
        append_table_csv(&path, &sample()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.starts_with("year_month")).count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 5);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_records_csv_uses_field_names() {
        let rows = vec![MissingSummary {
            year: 2022,
            sensor: Sensor::LowerAlbertNs,
            total_hours: 6470,
            missing_hours: 96,
            pct_missing: 1.48,
        }];
        let mut buf = Vec::new();
        write_records_csv(&rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "year,sensor,total_hours,missing_hours,pct_missing\n\
             2022,188 Quay Street Lower Albert NS,6470,96,1.48\n"
        );
    }

    #[test]
    fn test_records_to_json() {
        let rows = vec![MissingSummary {
            year: 2019,
            sensor: Sensor::High2,
            total_hours: 8760,
            missing_hours: 0,
            pct_missing: 0.0,
        }];
        let parsed: JsonValue = serde_json::from_str(&records_to_json(&rows).unwrap()).unwrap();
        assert_eq!(parsed[0]["sensor"], "2 High Street");
        assert_eq!(parsed[0]["total_hours"], 8760);
    }
}
