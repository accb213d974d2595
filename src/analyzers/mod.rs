//! Aggregation and missing-data analysis over the hourly panel.
//!
//! `aggregate` rolls hourly counts up into daily and monthly totals with an
//! explicit null policy; `missing` summarises gaps per (year, sensor).

pub mod aggregate;
pub mod missing;
pub mod utility;
