//! Missing-data summary by (year, sensor).
//!
//! Hours before a sensor's installation are structural gaps, not downtime,
//! so they count toward neither `total_hours` nor `missing_hours`.

use std::collections::BTreeMap;

use crate::analyzers::utility::{percent, round_to};
use crate::dataset::Dataset;
use crate::model::MissingSummary;
use crate::sensors::{SENSOR_COUNT, SENSORS, Sensor};

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    total: usize,
    missing: usize,
}

/// One row per (year, sensor) pair, sorted by year then sensor address.
pub fn describe_missing(dataset: &Dataset) -> Vec<MissingSummary> {
    let active: Vec<Option<usize>> = SENSORS.iter().map(|s| dataset.active_from(*s)).collect();

    let mut by_year: BTreeMap<i32, [Tally; SENSOR_COUNT]> = BTreeMap::new();
    for (row, record) in dataset.records().iter().enumerate() {
        let tallies = by_year.entry(record.year).or_insert([Tally::default(); SENSOR_COUNT]);
        for sensor in SENSORS {
            let i = sensor.index();
            if active[i].is_some_and(|start| row >= start) {
                tallies[i].total += 1;
                if record.counts[i].is_none() {
                    tallies[i].missing += 1;
                }
            }
        }
    }

    let mut by_name: Vec<Sensor> = SENSORS.to_vec();
    by_name.sort_by_key(|s| s.name());

    by_year
        .into_iter()
        .flat_map(|(year, tallies)| {
            by_name.iter().map(move |sensor| {
                let t = tallies[sensor.index()];
                MissingSummary {
                    year,
                    sensor: *sensor,
                    total_hours: t.total,
                    missing_hours: t.missing,
                    pct_missing: round_to(percent(t.missing, t.total), 2),
                }
            })
        })
        .collect()
}
