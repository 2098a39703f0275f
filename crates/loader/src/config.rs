//! Record loader configuration.

use serde::{Deserialize, Serialize};

/// Published order-line dataset used when no locator is configured.
pub const DEFAULT_SOURCE: &str =
    "https://github.com/RisamStudy/Fundamental-Analisis-Data/releases/download/v1.1/main_data.csv";

/// Where the dataset comes from and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// URL (`http`, `https`, `file`) or local path of the CSV dataset
    #[serde(default = "default_source")]
    pub source: String,
    /// Remote fetch timeout in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl LoaderConfig {
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}
