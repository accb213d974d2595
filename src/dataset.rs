//! The loaded dataset: owner of the three immutable tables.
//!
//! A [`Dataset`] is built once, from the copy compiled into the crate or from
//! a directory holding the same three files, and is never mutated afterwards.
//! Queries borrow it immutably, so one instance can be shared across threads.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::analyzers::missing::describe_missing;
use crate::config::DatasetConfig;
use crate::error::{DatasetError, Result};
use crate::model::{HourlyRecord, MissingReport, MissingSummary, SensorLocation};
use crate::parser::{
    HOURLY_FILE, LOCATIONS_FILE, REPORT_FILE, check_report, decode_text, parse_hourly,
    parse_locations, parse_missing_report,
};
use crate::query::Query;
use crate::sensors::{SENSOR_COUNT, SENSORS, Sensor};

static EMBEDDED_HOURLY: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/hourly_counts.csv.gz"));
static EMBEDDED_LOCATIONS: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/locations.csv"));
static EMBEDDED_REPORT: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/missing_data_report.json"));

static GLOBAL: OnceCell<Dataset> = OnceCell::new();

#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<HourlyRecord>,
    locations: Vec<SensorLocation>,
    report: MissingReport,
    /// Row index at which each sensor's active period starts, by
    /// [`Sensor::index`]. `None` if the sensor never becomes active.
    active_from: [Option<usize>; SENSOR_COUNT],
}

impl Dataset {
    /// Builds a dataset from the raw bytes of the three files. The hourly
    /// file may be gzip-compressed.
    pub fn from_bytes(hourly: &[u8], locations: &[u8], report: &[u8]) -> Result<Self> {
        let records = parse_hourly(&decode_text(HOURLY_FILE, hourly)?)?;
        let locations = parse_locations(&decode_text(LOCATIONS_FILE, locations)?)?;
        let report = parse_missing_report(&decode_text(REPORT_FILE, report)?)?;
        check_report(&report, &records)?;

        let active_from = active_periods(&records);
        for sensor in SENSORS {
            if active_from[sensor.index()].is_none() {
                warn!(sensor = %sensor, "Sensor has no observations in the panel");
            }
        }

        Ok(Dataset {
            records,
            locations,
            report,
            active_from,
        })
    }

    /// Loads the copy of the data compiled into the crate.
    #[tracing::instrument]
    pub fn embedded() -> Result<Self> {
        let dataset = Self::from_bytes(EMBEDDED_HOURLY, EMBEDDED_LOCATIONS, EMBEDDED_REPORT)?;
        info!(rows = dataset.records.len(), "Loaded embedded dataset");
        Ok(dataset)
    }

    /// Loads the three files from `dir`. `hourly_counts.csv.gz` is preferred
    /// over `hourly_counts.csv` when both are present.
    #[tracing::instrument(skip(dir), fields(dir = %dir.display()))]
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let gz_name = format!("{HOURLY_FILE}.gz");
        let hourly_path = if dir.join(&gz_name).exists() {
            dir.join(gz_name)
        } else {
            dir.join(HOURLY_FILE)
        };

        let read = |path: &Path| {
            fs::read(path).map_err(|source| DatasetError::Io {
                file: path.display().to_string(),
                source,
            })
        };
        let hourly = read(&hourly_path)?;
        let locations = read(&dir.join(LOCATIONS_FILE))?;
        let report = read(&dir.join(REPORT_FILE))?;

        let dataset = Self::from_bytes(&hourly, &locations, &report)?;
        info!(rows = dataset.records.len(), "Loaded dataset from directory");
        Ok(dataset)
    }

    /// The process-wide dataset, loaded on first access according to
    /// [`DatasetConfig::from_env`]. A load failure is returned to every
    /// caller until a load succeeds.
    pub fn global() -> Result<&'static Dataset> {
        GLOBAL.get_or_try_init(|| {
            let config = DatasetConfig::from_env();
            match &config.data_dir {
                Some(dir) => Dataset::from_dir(dir),
                None => Dataset::embedded(),
            }
        })
    }

    /// Starts a query over this dataset.
    pub fn query(&self) -> Query<'_> {
        Query::new(self)
    }

    /// All hourly rows in file (chronological) order.
    pub fn records(&self) -> &[HourlyRecord] {
        &self.records
    }

    pub fn locations(&self) -> &[SensorLocation] {
        &self.locations
    }

    pub fn location(&self, sensor: Sensor) -> Option<&SensorLocation> {
        self.locations.iter().find(|l| l.address == sensor.name())
    }

    /// The precomputed report exactly as bundled.
    pub fn missing_report(&self) -> &MissingReport {
        &self.report
    }

    /// Distinct years in the hourly table, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// See [`crate::analyzers::missing::describe_missing`].
    pub fn describe_missing(&self) -> Vec<MissingSummary> {
        describe_missing(self)
    }

    /// Row index where `sensor` starts counting.
    pub fn active_from(&self, sensor: Sensor) -> Option<usize> {
        self.active_from[sensor.index()]
    }
}

/// Sensors added in 2022 become active at their first observation; every
/// other sensor is active from the first row.
fn active_periods(records: &[HourlyRecord]) -> [Option<usize>; SENSOR_COUNT] {
    let mut active = [None; SENSOR_COUNT];
    for sensor in SENSORS {
        active[sensor.index()] = if sensor.added_2022() {
            records.iter().position(|r| r.count(sensor).is_some())
        } else if records.is_empty() {
            None
        } else {
            Some(0)
        };
    }
    active
}
