//! Query results: a sensor selection plus rows of key columns and values.
//!
//! Every row's `values` lines up with [`Table::sensors`]; a `None` cell is a
//! missing observation.

use chrono::NaiveDate;
use serde_json::Value as JsonValue;

use crate::model::{HourWindow, YearMonth};
use crate::sensors::Sensor;

/// A result row with key columns followed by one value per selected sensor.
pub trait Row {
    /// Names of the key columns, in output order.
    const KEY_COLUMNS: &'static [&'static str];

    /// Key column values rendered as text, aligned with `KEY_COLUMNS`.
    fn key_fields(&self) -> Vec<String>;

    /// Key column values as JSON, aligned with `KEY_COLUMNS`.
    fn key_json(&self) -> Vec<JsonValue>;

    fn values(&self) -> &[Option<f64>];
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRow {
    pub date: NaiveDate,
    pub hour: HourWindow,
    pub year: i32,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub year: i32,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRow {
    pub year_month: YearMonth,
    pub year: i32,
    pub month: u32,
    pub values: Vec<Option<f64>>,
}

impl Row for HourlyRow {
    const KEY_COLUMNS: &'static [&'static str] = &["date", "hour", "year"];

    fn key_fields(&self) -> Vec<String> {
        vec![self.date.to_string(), self.hour.to_string(), self.year.to_string()]
    }

    fn key_json(&self) -> Vec<JsonValue> {
        vec![
            self.date.to_string().into(),
            self.hour.to_string().into(),
            self.year.into(),
        ]
    }

    fn values(&self) -> &[Option<f64>] {
        &self.values
    }
}

impl Row for DailyRow {
    const KEY_COLUMNS: &'static [&'static str] = &["date", "year"];

    fn key_fields(&self) -> Vec<String> {
        vec![self.date.to_string(), self.year.to_string()]
    }

    fn key_json(&self) -> Vec<JsonValue> {
        vec![self.date.to_string().into(), self.year.into()]
    }

    fn values(&self) -> &[Option<f64>] {
        &self.values
    }
}

impl Row for MonthlyRow {
    const KEY_COLUMNS: &'static [&'static str] = &["year_month", "year", "month"];

    fn key_fields(&self) -> Vec<String> {
        vec![
            self.year_month.to_string(),
            self.year.to_string(),
            self.month.to_string(),
        ]
    }

    fn key_json(&self) -> Vec<JsonValue> {
        vec![
            self.year_month.to_string().into(),
            self.year.into(),
            self.month.into(),
        ]
    }

    fn values(&self) -> &[Option<f64>] {
        &self.values
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table<R> {
    sensors: Vec<Sensor>,
    rows: Vec<R>,
}

pub type HourlyTable = Table<HourlyRow>;
pub type DailyTable = Table<DailyRow>;
pub type MonthlyTable = Table<MonthlyRow>;

impl<R: Row> Table<R> {
    pub(crate) fn new(sensors: Vec<Sensor>, rows: Vec<R>) -> Self {
        debug_assert!(rows.iter().all(|r| r.values().len() == sensors.len()));
        Table { sensors, rows }
    }

    /// Selected sensors, in column order.
    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Key columns followed by sensor addresses.
    pub fn column_names(&self) -> Vec<String> {
        R::KEY_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.sensors.iter().map(|s| s.name().to_string()))
            .collect()
    }

    fn position(&self, sensor: Sensor) -> Option<usize> {
        self.sensors.iter().position(|s| *s == sensor)
    }

    /// One sensor's column, or `None` if the sensor was not selected.
    pub fn column(&self, sensor: Sensor) -> Option<Vec<Option<f64>>> {
        let i = self.position(sensor)?;
        Some(self.rows.iter().map(|r| r.values()[i]).collect())
    }

    /// Sum of the non-null cells in a sensor's column.
    pub fn column_sum(&self, sensor: Sensor) -> Option<f64> {
        let i = self.position(sensor)?;
        Some(self.rows.iter().filter_map(|r| r.values()[i]).sum())
    }

    pub fn null_count(&self, sensor: Sensor) -> Option<usize> {
        let i = self.position(sensor)?;
        Some(self.rows.iter().filter(|r| r.values()[i].is_none()).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily(day: u32, values: Vec<Option<f64>>) -> DailyRow {
        DailyRow {
            date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            year: 2024,
            values,
        }
    }

    fn sample() -> DailyTable {
        Table::new(
            vec![Sensor::Queen45, Sensor::KRoad150],
            vec![
                daily(28, vec![Some(10.0), None]),
                daily(29, vec![Some(5.5), Some(3.0)]),
            ],
        )
    }

    #[test]
    fn test_column_names() {
        assert_eq!(
            sample().column_names(),
            vec!["date", "year", "45 Queen Street", "150 K Road"]
        );
    }

    #[test]
    fn test_column_accessors() {
        let table = sample();
        assert_eq!(table.len(), 2);
        assert_eq!(table.column(Sensor::KRoad150), Some(vec![None, Some(3.0)]));
        assert_eq!(table.column_sum(Sensor::Queen45), Some(15.5));
        assert_eq!(table.null_count(Sensor::KRoad150), Some(1));
        assert_eq!(table.column(Sensor::High2), None);
    }

    #[test]
    fn test_empty_table_keeps_columns() {
        let table: HourlyTable = Table::new(vec![Sensor::High2], vec![]);
        assert!(table.is_empty());
        assert_eq!(table.column_names(), vec!["date", "hour", "year", "2 High Street"]);
        assert_eq!(table.column_sum(Sensor::High2), Some(0.0));
    }

    #[test]
    fn test_monthly_key_fields() {
        let row = MonthlyRow {
            year_month: YearMonth { year: 2023, month: 7 },
            year: 2023,
            month: 7,
            values: vec![],
        };
        assert_eq!(row.key_fields(), vec!["2023-07", "2023", "7"]);
        assert_eq!(row.key_json()[0], "2023-07");
    }
}
