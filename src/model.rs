//! Record types for the bundled tables.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};

use crate::sensors::{SENSOR_COUNT, Sensor};

// ---------------------------------------------------------------------------
// HourWindow
// ---------------------------------------------------------------------------

/// A one-hour observation window, printed the way the source labels it
/// (`"6:00-6:59"`). Ordering follows the hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HourWindow(u8);

impl HourWindow {
    pub fn new(hour: u8) -> Option<Self> {
        (hour < 24).then_some(HourWindow(hour))
    }

    /// Hour of day the window starts at, 0-23.
    pub fn hour(self) -> u8 {
        self.0
    }
}

impl fmt::Display for HourWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{h}:00-{h}:59", h = self.0)
    }
}

impl FromStr for HourWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("hour label '{s}' is not of the form H:00-H:59"))?;
        let hour = start
            .strip_suffix(":00")
            .and_then(|h| h.parse::<u8>().ok())
            .and_then(HourWindow::new)
            .ok_or_else(|| format!("hour label '{s}' has an invalid start"))?;
        if end != format!("{}:59", hour.0) {
            return Err(format!("hour label '{s}' does not span one hour"));
        }
        Ok(hour)
    }
}

impl Serialize for HourWindow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// HourlyRecord
// ---------------------------------------------------------------------------

/// One row of the hourly panel as stored by the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    pub date: NaiveDate,
    pub hour: HourWindow,
    pub year: i32,
    /// Counts indexed by [`Sensor::index`]; `None` where the sensor has no
    /// observation (never zero-filled).
    pub counts: [Option<f64>; SENSOR_COUNT],
}

impl HourlyRecord {
    pub fn count(&self, sensor: Sensor) -> Option<f64> {
        self.counts[sensor.index()]
    }
}

// ---------------------------------------------------------------------------
// YearMonth
// ---------------------------------------------------------------------------

/// Calendar month key, sorted chronologically and printed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// One row of `locations.csv`. Coordinates are WGS 84 decimal degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorLocation {
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// Missing-data report
// ---------------------------------------------------------------------------

/// The bundled `missing_data_report.json`, keyed by year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissingReport {
    pub years: BTreeMap<i32, YearReport>,
}

/// Precomputed missing-data figures for one year of the raw panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearReport {
    /// Hourly rows in the year.
    pub rows: usize,
    /// Sensors present in that year's source panel.
    pub sensor_names: Vec<String>,
    /// Raw null counts; sensors without nulls may be absent.
    #[serde(default)]
    pub per_sensor: BTreeMap<String, usize>,
}

impl YearReport {
    pub fn missing(&self, sensor: &str) -> usize {
        self.per_sensor.get(sensor).copied().unwrap_or(0)
    }
}

/// One row of `describe_missing()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingSummary {
    pub year: i32,
    pub sensor: Sensor,
    /// Hourly slots in the year inside the sensor's active period.
    pub total_hours: usize,
    /// Null observations inside the active period.
    pub missing_hours: usize,
    pub pct_missing: f64,
}
