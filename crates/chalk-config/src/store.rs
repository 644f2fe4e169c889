//! Journal store configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ".chalk/journal.db".to_string()
}

fn default_app_id() -> String {
    "chalk-it".to_string()
}

const fn default_poll_interval_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// libSQL database file. `:memory:` keeps everything in-process.
    #[serde(default = "default_path")]
    pub path: String,

    /// Namespace that scopes every entry, so several apps can share a file.
    #[serde(default = "default_app_id")]
    pub app_id: String,

    /// How often a live feed checks the file for writes made by other
    /// processes, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            app_id: default_app_id(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl StoreConfig {
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }

    /// Poll interval, floored at 10ms.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(10))
    }
}
