use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "tasks.json";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Loads settings from an optional `tasker.toml` in the working directory,
    /// then from `TASKER_*` environment variables.
    pub fn load() -> anyhow::Result<Self> {
        let s = config::Config::builder()
            .add_source(config::File::with_name("tasker").required(false))
            .add_source(config::Environment::with_prefix("TASKER"))
            .build()?;

        Ok(s.try_deserialize()?)
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
