//! Environment configuration.
//!
//! Values are read from the process environment after loading an optional
//! `.env` file from the working directory.

use std::path::PathBuf;

/// Directory holding replacement data files, overriding the embedded copy.
pub const DATA_DIR_VAR: &str = "AKL_PED_DATA_DIR";
/// `json` or `pretty`; selects the formatter installed by `init_tracing`.
pub const LOG_FORMAT_VAR: &str = "AKL_PED_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetConfig {
    pub data_dir: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl DatasetConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        DatasetConfig {
            data_dir: get(DATA_DIR_VAR).map(PathBuf::from),
            log_format: get(LOG_FORMAT_VAR)
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
        }
    }
}
