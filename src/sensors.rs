//! Sensor registry for the Auckland CBD pedestrian counting panel.
//!
//! Defines the fixed set of 21 camera locations in the panel. Every other
//! module refers to sensors through [`Sensor`] rather than by address
//! string; names are resolved once, at the public API boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::DatasetError;

/// Number of sensor columns in the hourly panel.
pub const SENSOR_COUNT: usize = 21;

/// A pedestrian counting sensor, identified by its street address.
///
/// Variants are declared in canonical schema order (north to south), which
/// is also the column order of the bundled hourly table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sensor {
    Quay107,
    LowerAlbertEw,
    LowerAlbertNs,
    TeAraTahuhu,
    CommerceWest,
    CustomsEast7,
    Queen45,
    Queen30,
    Shortland19,
    High2,
    CourthouseLane1,
    Federal61,
    High59,
    Queen210,
    Queen205,
    DarbyEw,
    DarbyNs,
    Queen261,
    Queen297,
    KRoad150,
    KRoad183,
}

/// All sensors in canonical schema order.
pub static SENSORS: [Sensor; SENSOR_COUNT] = [
    Sensor::Quay107,
    Sensor::LowerAlbertEw,
    Sensor::LowerAlbertNs,
    Sensor::TeAraTahuhu,
    Sensor::CommerceWest,
    Sensor::CustomsEast7,
    Sensor::Queen45,
    Sensor::Queen30,
    Sensor::Shortland19,
    Sensor::High2,
    Sensor::CourthouseLane1,
    Sensor::Federal61,
    Sensor::High59,
    Sensor::Queen210,
    Sensor::Queen205,
    Sensor::DarbyEw,
    Sensor::DarbyNs,
    Sensor::Queen261,
    Sensor::Queen297,
    Sensor::KRoad150,
    Sensor::KRoad183,
];

/// Sensors installed during 2022. They have no observations for 2019-2021,
/// so their nulls before installation are structural, not downtime.
pub static SENSORS_ADDED_2022: [Sensor; 2] = [Sensor::LowerAlbertEw, Sensor::LowerAlbertNs];

impl Sensor {
    /// Street address, exactly as it appears in the hourly table header and
    /// the locations file.
    pub fn name(self) -> &'static str {
        match self {
            Sensor::Quay107 => "107 Quay Street",
            Sensor::LowerAlbertEw => "188 Quay Street Lower Albert EW",
            Sensor::LowerAlbertNs => "188 Quay Street Lower Albert NS",
            Sensor::TeAraTahuhu => "Te Ara Tahuhu Walkway",
            Sensor::CommerceWest => "Commerce Street West",
            Sensor::CustomsEast7 => "7 Custom Street East",
            Sensor::Queen45 => "45 Queen Street",
            Sensor::Queen30 => "30 Queen Street",
            Sensor::Shortland19 => "19 Shortland Street",
            Sensor::High2 => "2 High Street",
            Sensor::CourthouseLane1 => "1 Courthouse Lane",
            Sensor::Federal61 => "61 Federal Street",
            Sensor::High59 => "59 High Street",
            Sensor::Queen210 => "210 Queen Street",
            Sensor::Queen205 => "205 Queen Street",
            Sensor::DarbyEw => "8 Darby Street EW",
            Sensor::DarbyNs => "8 Darby Street NS",
            Sensor::Queen261 => "261 Queen Street",
            Sensor::Queen297 => "297 Queen Street",
            Sensor::KRoad150 => "150 K Road",
            Sensor::KRoad183 => "183 K Road",
        }
    }

    /// Position of this sensor's column in the canonical schema.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Looks up a sensor by exact address.
    pub fn from_name(name: &str) -> Option<Sensor> {
        SENSORS.iter().copied().find(|s| s.name() == name)
    }

    /// Whether this sensor belongs to [`SENSORS_ADDED_2022`].
    pub fn added_2022(self) -> bool {
        SENSORS_ADDED_2022.contains(&self)
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sensor {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sensor::from_name(s).ok_or_else(|| DatasetError::UnknownSensor {
            name: s.to_string(),
        })
    }
}

impl Serialize for Sensor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Returns the addresses of all sensors in canonical schema order.
pub fn list_sensors() -> Vec<String> {
    SENSORS.iter().map(|s| s.name().to_string()).collect()
}
