use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::{HourlyRecord, YearMonth};
use crate::sensors::Sensor;
use crate::table::{DailyRow, MonthlyRow};

/// Running totals for one period (day or month) across the selected sensors.
#[derive(Debug, Clone)]
struct PeriodTotals {
    sums: Vec<f64>,
    observed: Vec<u32>,
    hours: u32,
}

impl PeriodTotals {
    fn new(width: usize) -> Self {
        PeriodTotals {
            sums: vec![0.0; width],
            observed: vec![0; width],
            hours: 0,
        }
    }

    fn add(&mut self, record: &HourlyRecord, sensors: &[Sensor]) {
        self.hours += 1;
        for (i, sensor) in sensors.iter().enumerate() {
            if let Some(v) = record.count(*sensor) {
                self.sums[i] += v;
                self.observed[i] += 1;
            }
        }
    }

    /// Every selected sensor reported in every hour of the period.
    fn is_complete(&self) -> bool {
        self.observed.iter().all(|n| *n == self.hours)
    }

    /// Sum of the observed hours per sensor; a sensor with no observation in
    /// the period stays null rather than becoming zero.
    fn into_values(self) -> Vec<Option<f64>> {
        self.sums
            .into_iter()
            .zip(self.observed)
            .map(|(sum, n)| (n > 0).then_some(sum))
            .collect()
    }
}

/// Groups records by `key` and returns the finished totals in key order,
/// dropping incomplete periods when `dropna` is set.
fn group_by<'a, K, I, F>(records: I, sensors: &[Sensor], dropna: bool, key: F) -> Vec<(K, Vec<Option<f64>>)>
where
    K: Ord,
    I: Iterator<Item = &'a HourlyRecord>,
    F: Fn(&HourlyRecord) -> K,
{
    let mut groups: BTreeMap<K, PeriodTotals> = BTreeMap::new();
    for record in records {
        groups
            .entry(key(record))
            .or_insert_with(|| PeriodTotals::new(sensors.len()))
            .add(record, sensors);
    }

    groups
        .into_iter()
        .filter(|(_, totals)| !dropna || totals.is_complete())
        .map(|(k, totals)| (k, totals.into_values()))
        .collect()
}

/// Daily totals, one row per calendar date, sorted by date.
pub fn daily<'a, I>(records: I, sensors: &[Sensor], dropna: bool) -> Vec<DailyRow>
where
    I: Iterator<Item = &'a HourlyRecord>,
{
    group_by(records, sensors, dropna, |r| (r.date, r.year))
        .into_iter()
        .map(|((date, year), values): ((NaiveDate, i32), _)| DailyRow { date, year, values })
        .collect()
}

/// Monthly totals, one row per (year, month), sorted by `year_month`.
pub fn monthly<'a, I>(records: I, sensors: &[Sensor], dropna: bool) -> Vec<MonthlyRow>
where
    I: Iterator<Item = &'a HourlyRecord>,
{
    group_by(records, sensors, dropna, |r| YearMonth::of(r.date))
        .into_iter()
        .map(|(year_month, values)| MonthlyRow {
            year_month,
            year: year_month.year,
            month: year_month.month,
            values,
        })
        .collect()
}
