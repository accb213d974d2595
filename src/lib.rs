//! Hourly pedestrian counts from Heart of the City Auckland's monitoring
//! system: 21 sensor locations across Auckland CBD, 2019-2025.
//!
//! The data ships inside the crate and is parsed once per process on first
//! use. The free functions below query that process-wide copy; use
//! [`Dataset`] and [`Query`] directly to work with another copy or to chain
//! filters.
//!
//! ```no_run
//! use akl_ped_counts::{load_daily, load_hourly, list_sensors};
//!
//! let sensors = list_sensors();
//! assert_eq!(sensors.len(), 21);
//!
//! let hourly = load_hourly(Some(&[2023][..]), None, false)?;
//! let queen_st = load_daily(None, Some(&["45 Queen Street"][..]), true)?;
//! # Ok::<(), akl_ped_counts::DatasetError>(())
//! ```
//!
//! Data source: Heart of the City Auckland
//! (<https://www.hotcity.co.nz/pedestrian-counts>), licensed CC BY 4.0.

pub mod analyzers;
pub mod config;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod model;
pub mod output;
pub mod parser;
pub mod query;
pub mod sensors;
pub mod table;

pub use dataset::Dataset;
pub use error::{DatasetError, Result};
pub use model::{HourWindow, HourlyRecord, MissingReport, MissingSummary, SensorLocation, YearMonth};
pub use query::Query;
pub use sensors::{SENSOR_COUNT, SENSORS, SENSORS_ADDED_2022, Sensor, list_sensors};
pub use table::{DailyRow, DailyTable, HourlyRow, HourlyTable, MonthlyRow, MonthlyTable, Row, Table};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn query<'a>(
    dataset: &'a Dataset,
    years: Option<&[i32]>,
    sensors: Option<&[&str]>,
    dropna: bool,
) -> Query<'a> {
    let mut q = dataset.query().dropna(dropna);
    if let Some(years) = years {
        q = q.years(years.iter().copied());
    }
    if let Some(sensors) = sensors {
        q = q.sensors(sensors.iter().copied());
    }
    q
}

/// Hourly counts: `date`, `hour`, `year`, plus one column per sensor.
///
/// `years` and `sensors` restrict rows and columns when given; `dropna`
/// removes rows with a null in any selected sensor column. Years that are
/// not in the data match nothing; an unknown sensor name is an error.
pub fn load_hourly(years: Option<&[i32]>, sensors: Option<&[&str]>, dropna: bool) -> Result<HourlyTable> {
    query(Dataset::global()?, years, sensors, dropna).hourly()
}

/// Daily totals: `date`, `year`, plus one column per sensor.
///
/// Null hours are skipped when summing, and a day with no observation for a
/// sensor is null. With `dropna`, any day where a selected sensor misses an
/// hour is excluded.
pub fn load_daily(years: Option<&[i32]>, sensors: Option<&[&str]>, dropna: bool) -> Result<DailyTable> {
    query(Dataset::global()?, years, sensors, dropna).daily()
}

/// Monthly totals: `year_month`, `year`, `month`, plus one column per sensor,
/// with the same null policy as [`load_daily`] applied per month.
pub fn load_monthly(years: Option<&[i32]>, sensors: Option<&[&str]>, dropna: bool) -> Result<MonthlyTable> {
    query(Dataset::global()?, years, sensors, dropna).monthly()
}

/// Sensor addresses and WGS 84 coordinates, 21 rows in file order.
pub fn load_locations() -> Result<Vec<SensorLocation>> {
    Ok(Dataset::global()?.locations().to_vec())
}

/// Missing-data summary per (year, sensor), sorted by year then address.
pub fn describe_missing() -> Result<Vec<MissingSummary>> {
    Ok(Dataset::global()?.describe_missing())
}
