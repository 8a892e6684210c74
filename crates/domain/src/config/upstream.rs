use crate::upstream::UpstreamTopology;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Nested arrays of server strings; every array is a racing group.
    #[serde(default)]
    pub servers: UpstreamTopology,

    /// Per-server timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            servers: UpstreamTopology::empty(),
            timeout: default_timeout_ms(),
        }
    }
}

pub fn default_timeout_ms() -> u64 {
    5000
}
