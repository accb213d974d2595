//! Deferred queries over a [`Dataset`].
//!
//! A [`Query`] only records the requested filters. Nothing is validated or
//! computed until one of the finalizers ([`Query::hourly`], [`Query::daily`],
//! [`Query::monthly`]) runs, which then makes a single pass over the stored
//! rows.
//!
//! ```no_run
//! use akl_ped_counts::Dataset;
//!
//! let dataset = Dataset::global()?;
//! let daily = dataset
//!     .query()
//!     .years([2024])
//!     .sensors(["45 Queen Street", "150 K Road"])
//!     .daily()?;
//! assert_eq!(daily.len(), 366);
//! # Ok::<(), akl_ped_counts::DatasetError>(())
//! ```

use std::collections::BTreeSet;

use tracing::debug;

use crate::analyzers::aggregate;
use crate::dataset::Dataset;
use crate::error::{DatasetError, Result};
use crate::model::HourlyRecord;
use crate::sensors::{SENSORS, Sensor};
use crate::table::{DailyTable, HourlyRow, HourlyTable, MonthlyTable, Table};

#[derive(Debug, Clone)]
pub struct Query<'a> {
    dataset: &'a Dataset,
    years: Option<BTreeSet<i32>>,
    sensors: Option<Vec<String>>,
    dropna: bool,
}

impl<'a> Query<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Query {
            dataset,
            years: None,
            sensors: None,
            dropna: false,
        }
    }

    /// Keeps only rows whose year is in `years`. Years absent from the data
    /// simply match nothing.
    pub fn years<I>(mut self, years: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        self.years = Some(years.into_iter().collect());
        self
    }

    /// Keeps only these sensor columns, in the given order. Names are checked
    /// when the query runs.
    pub fn sensors<I, S>(mut self, sensors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sensors = Some(sensors.into_iter().map(|s| s.as_ref().to_string()).collect());
        self
    }

    /// Drops incomplete rows. For hourly output that is any row with a null
    /// in a selected column; for daily and monthly output it is any period in
    /// which a selected sensor has at least one null hour.
    pub fn dropna(mut self, dropna: bool) -> Self {
        self.dropna = dropna;
        self
    }

    /// Resolves the sensor selection, collapsing repeats and keeping first
    /// occurrence order. No selection means all sensors in canonical order.
    fn resolve_sensors(&self) -> Result<Vec<Sensor>> {
        let Some(names) = &self.sensors else {
            return Ok(SENSORS.to_vec());
        };
        let mut resolved: Vec<Sensor> = Vec::with_capacity(names.len());
        for name in names {
            let sensor = Sensor::from_name(name)
                .ok_or_else(|| DatasetError::UnknownSensor { name: name.clone() })?;
            if !resolved.contains(&sensor) {
                resolved.push(sensor);
            }
        }
        Ok(resolved)
    }

    fn records(&self) -> impl Iterator<Item = &'a HourlyRecord> + '_ {
        self.dataset
            .records()
            .iter()
            .filter(move |r| self.years.as_ref().is_none_or(|years| years.contains(&r.year)))
    }

    pub fn hourly(&self) -> Result<HourlyTable> {
        let sensors = self.resolve_sensors()?;
        let rows: Vec<HourlyRow> = self
            .records()
            .map(|r| HourlyRow {
                date: r.date,
                hour: r.hour,
                year: r.year,
                values: sensors.iter().map(|s| r.count(*s)).collect(),
            })
            .filter(|row| !self.dropna || row.values.iter().all(Option::is_some))
            .collect();

        debug!(rows = rows.len(), sensors = sensors.len(), dropna = self.dropna, "Hourly query complete");
        Ok(Table::new(sensors, rows))
    }

    pub fn daily(&self) -> Result<DailyTable> {
        let sensors = self.resolve_sensors()?;
        let rows = aggregate::daily(self.records(), &sensors, self.dropna);

        debug!(rows = rows.len(), sensors = sensors.len(), dropna = self.dropna, "Daily query complete");
        Ok(Table::new(sensors, rows))
    }

    pub fn monthly(&self) -> Result<MonthlyTable> {
        let sensors = self.resolve_sensors()?;
        let rows = aggregate::monthly(self.records(), &sensors, self.dropna);

        debug!(rows = rows.len(), sensors = sensors.len(), dropna = self.dropna, "Monthly query complete");
        Ok(Table::new(sensors, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::fixture_dataset;
    use crate::parser::tests::fixture_row;

    fn dataset() -> Dataset {
        fixture_dataset(&[
            fixture_row("2021-12-31", 22, 1.0, &[Sensor::LowerAlbertEw, Sensor::LowerAlbertNs]),
            fixture_row("2021-12-31", 23, 2.0, &[Sensor::LowerAlbertEw, Sensor::LowerAlbertNs]),
            fixture_row("2022-01-01", 0, 3.0, &[Sensor::Queen45]),
            fixture_row("2022-01-01", 1, 4.0, &[]),
        ])
    }

    #[test]
    fn test_hourly_no_filters_returns_everything() {
        let ds = dataset();
        let table = ds.query().hourly().unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.sensors(), &SENSORS[..]);
        assert_eq!(table.column_names().len(), 24);
    }

    #[test]
    fn test_hourly_year_filter() {
        let ds = dataset();
        let table = ds.query().years([2022]).hourly().unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.rows().iter().all(|r| r.year == 2022));
    }

    #[test]
    fn test_unknown_year_yields_empty_table() {
        let ds = dataset();
        let table = ds.query().years([1999]).sensors(["150 K Road"]).hourly().unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_names(), vec!["date", "hour", "year", "150 K Road"]);

        let table = ds.query().years(Vec::new()).daily().unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_sensor_selection_keeps_requested_order() {
        let ds = dataset();
        let table = ds
            .query()
            .sensors(["150 K Road", "45 Queen Street", "150 K Road"])
            .hourly()
            .unwrap();
        assert_eq!(table.sensors(), &[Sensor::KRoad150, Sensor::Queen45]);
        assert_eq!(table.rows()[0].values, vec![Some(1.0), Some(1.0)]);
    }

    #[test]
    fn test_unknown_sensor_is_an_error() {
        let ds = dataset();
        let err = ds.query().sensors(["45 Queen Street", "Nowhere"]).monthly().unwrap_err();
        assert!(matches!(err, DatasetError::UnknownSensor { ref name } if name == "Nowhere"));
    }

    #[test]
    fn test_empty_sensor_selection() {
        let ds = dataset();
        let table = ds.query().sensors(Vec::<String>::new()).dropna(true).hourly().unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.column_names(), vec!["date", "hour", "year"]);
    }

    #[test]
    fn test_hourly_dropna() {
        let ds = dataset();
        let table = ds.query().sensors(["45 Queen Street"]).dropna(true).hourly().unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.null_count(Sensor::Queen45), Some(0));

        let all = ds.query().dropna(true).hourly().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all.rows()[0].hour.hour(), 1);
    }

    #[test]
    fn test_query_does_not_touch_dataset() {
        let ds = dataset();
        let before = ds.records().to_vec();
        let _ = ds.query().years([2022]).sensors(["2 High Street"]).dropna(true).daily().unwrap();
        assert_eq!(ds.records(), &before[..]);
    }
}
