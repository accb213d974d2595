//! Decoders for the three bundled files, plus the cross-file integrity check.
//!
//! Every failure here is a [`DatasetError::DataIntegrity`] naming the file
//! it came from; the dataset cannot be used with a partially valid file.

use std::collections::{BTreeMap, HashSet};
use std::io::Read;

use chrono::{Datelike, NaiveDate};
use csv::StringRecord;
use flate2::read::GzDecoder;
use tracing::debug;

use crate::error::{DatasetError, Result};
use crate::model::{HourWindow, HourlyRecord, MissingReport, SensorLocation};
use crate::sensors::{SENSOR_COUNT, SENSORS, Sensor};

pub const HOURLY_FILE: &str = "hourly_counts.csv";
pub const LOCATIONS_FILE: &str = "locations.csv";
pub const REPORT_FILE: &str = "missing_data_report.json";

const KEY_COLUMNS: [&str; 3] = ["date", "hour", "year"];
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decodes file bytes to text, transparently inflating gzip input.
pub fn decode_text(file: &str, bytes: &[u8]) -> Result<String> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut text = String::new();
        GzDecoder::new(bytes)
            .read_to_string(&mut text)
            .map_err(|e| DatasetError::integrity(file, format!("gzip decode failed: {e}")))?;
        debug!(file, compressed = bytes.len(), inflated = text.len(), "Inflated gzip input");
        Ok(text)
    } else {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| DatasetError::integrity(file, format!("not valid UTF-8: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Hourly panel
// ---------------------------------------------------------------------------

/// Maps each sensor (by canonical index) to its position in the CSV header.
fn sensor_columns(headers: &StringRecord) -> Result<[usize; SENSOR_COUNT]> {
    let expected = KEY_COLUMNS.len() + SENSOR_COUNT;
    if headers.len() != expected {
        return Err(DatasetError::integrity(
            HOURLY_FILE,
            format!("expected {expected} columns, header has {}", headers.len()),
        ));
    }
    for (i, key) in KEY_COLUMNS.iter().enumerate() {
        if headers.get(i) != Some(*key) {
            return Err(DatasetError::integrity(
                HOURLY_FILE,
                format!("column {i} should be '{key}', found '{}'", headers.get(i).unwrap_or("")),
            ));
        }
    }

    let mut columns = [usize::MAX; SENSOR_COUNT];
    for (pos, name) in headers.iter().enumerate().skip(KEY_COLUMNS.len()) {
        let sensor = Sensor::from_name(name).ok_or_else(|| {
            DatasetError::integrity(HOURLY_FILE, format!("unexpected sensor column '{name}'"))
        })?;
        if columns[sensor.index()] != usize::MAX {
            return Err(DatasetError::integrity(
                HOURLY_FILE,
                format!("duplicate sensor column '{name}'"),
            ));
        }
        columns[sensor.index()] = pos;
    }
    Ok(columns)
}

fn parse_count(line: u64, sensor: Sensor, raw: &str) -> Result<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("na") || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
        _ => Err(DatasetError::integrity(
            HOURLY_FILE,
            format!("line {line}: invalid count '{raw}' for {sensor}"),
        )),
    }
}

fn record_to_hourly(
    line: u64,
    record: &StringRecord,
    columns: &[usize; SENSOR_COUNT],
) -> Result<HourlyRecord> {
    let field = |i: usize| record.get(i).unwrap_or("").trim();
    let bad = |message: String| DatasetError::integrity(HOURLY_FILE, format!("line {line}: {message}"));

    let date = NaiveDate::parse_from_str(field(0), "%Y-%m-%d")
        .map_err(|e| bad(format!("invalid date '{}': {e}", field(0))))?;
    let hour: HourWindow = field(1).parse().map_err(bad)?;
    let year: i32 = field(2)
        .parse()
        .map_err(|e| bad(format!("invalid year '{}': {e}", field(2))))?;
    if year != date.year() {
        return Err(bad(format!("year {year} does not match date {date}")));
    }

    let mut counts = [None; SENSOR_COUNT];
    for sensor in SENSORS {
        counts[sensor.index()] = parse_count(line, sensor, field(columns[sensor.index()]))?;
    }

    Ok(HourlyRecord {
        date,
        hour,
        year,
        counts,
    })
}

/// Parses the hourly panel. Rows must be strictly chronological, which also
/// guarantees one record per (date, hour).
pub fn parse_hourly(text: &str) -> Result<Vec<HourlyRecord>> {
    let mut rdr = csv::Reader::from_reader(text.as_bytes());
    let headers = rdr
        .headers()
        .map_err(|e| DatasetError::integrity(HOURLY_FILE, format!("reading header: {e}")))?
        .clone();
    let columns = sensor_columns(&headers)?;

    let mut records: Vec<HourlyRecord> = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| DatasetError::integrity(HOURLY_FILE, e.to_string()))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row = record_to_hourly(line, &record, &columns)?;

        if let Some(prev) = records.last() {
            if (prev.date, prev.hour) >= (row.date, row.hour) {
                return Err(DatasetError::integrity(
                    HOURLY_FILE,
                    format!(
                        "line {line}: {} {} is duplicated or out of order",
                        row.date, row.hour
                    ),
                ));
            }
        }
        records.push(row);
    }

    debug!(rows = records.len(), "Parsed hourly panel");
    Ok(records)
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// Parses `locations.csv` and checks it covers exactly the sensor registry.
pub fn parse_locations(text: &str) -> Result<Vec<SensorLocation>> {
    let mut rdr = csv::Reader::from_reader(text.as_bytes());
    let mut locations = Vec::new();
    for result in rdr.deserialize() {
        let location: SensorLocation =
            result.map_err(|e| DatasetError::integrity(LOCATIONS_FILE, e.to_string()))?;
        locations.push(location);
    }

    if locations.len() != SENSOR_COUNT {
        return Err(DatasetError::integrity(
            LOCATIONS_FILE,
            format!("expected {SENSOR_COUNT} rows, found {}", locations.len()),
        ));
    }

    let mut seen = HashSet::new();
    for loc in &locations {
        let sensor = Sensor::from_name(&loc.address).ok_or_else(|| {
            DatasetError::integrity(
                LOCATIONS_FILE,
                format!("address '{}' is not a sensor column", loc.address),
            )
        })?;
        if !seen.insert(sensor) {
            return Err(DatasetError::integrity(
                LOCATIONS_FILE,
                format!("duplicate address '{}'", loc.address),
            ));
        }
        if !(-90.0..=90.0).contains(&loc.latitude) || !(-180.0..=180.0).contains(&loc.longitude) {
            return Err(DatasetError::integrity(
                LOCATIONS_FILE,
                format!("coordinates for '{}' are out of range", loc.address),
            ));
        }
    }

    Ok(locations)
}

// ---------------------------------------------------------------------------
// Missing-data report
// ---------------------------------------------------------------------------

pub fn parse_missing_report(text: &str) -> Result<MissingReport> {
    serde_json::from_str(text).map_err(|e| DatasetError::integrity(REPORT_FILE, e.to_string()))
}

/// Checks the precomputed report against the hourly panel: same years, same
/// row count per year, and the same raw null count for every listed sensor.
pub fn check_report(report: &MissingReport, records: &[HourlyRecord]) -> Result<()> {
    let mut rows: BTreeMap<i32, usize> = BTreeMap::new();
    let mut nulls: BTreeMap<i32, [usize; SENSOR_COUNT]> = BTreeMap::new();
    for r in records {
        *rows.entry(r.year).or_default() += 1;
        let per_sensor = nulls.entry(r.year).or_insert([0; SENSOR_COUNT]);
        for (i, count) in r.counts.iter().enumerate() {
            if count.is_none() {
                per_sensor[i] += 1;
            }
        }
    }

    let report_years: Vec<i32> = report.years.keys().copied().collect();
    let panel_years: Vec<i32> = rows.keys().copied().collect();
    if report_years != panel_years {
        return Err(DatasetError::integrity(
            REPORT_FILE,
            format!("covers years {report_years:?}, hourly table has {panel_years:?}"),
        ));
    }

    for (year, info) in &report.years {
        if info.rows != rows[year] {
            return Err(DatasetError::integrity(
                REPORT_FILE,
                format!("{year}: reports {} rows, hourly table has {}", info.rows, rows[year]),
            ));
        }
        for name in &info.sensor_names {
            let sensor = Sensor::from_name(name).ok_or_else(|| {
                DatasetError::integrity(REPORT_FILE, format!("{year}: unknown sensor '{name}'"))
            })?;
            let actual = nulls[year][sensor.index()];
            if info.missing(name) != actual {
                return Err(DatasetError::integrity(
                    REPORT_FILE,
                    format!(
                        "{year}: reports {} missing hours for {name}, hourly table has {actual}",
                        info.missing(name)
                    ),
                ));
            }
        }
    }

    Ok(())
}
