//! Error taxonomy for loading and querying the dataset.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    /// A requested sensor name is not one of the 21 panel columns.
    #[error("unknown sensor '{name}'; see list_sensors() for valid names")]
    UnknownSensor { name: String },

    /// A bundled file is missing, malformed, or disagrees with the others.
    #[error("data integrity error in {file}: {message}")]
    DataIntegrity { file: String, message: String },

    #[error("failed to read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
}

impl DatasetError {
    pub(crate) fn integrity(file: &str, message: impl Into<String>) -> Self {
        DatasetError::DataIntegrity {
            file: file.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DatasetError>;
