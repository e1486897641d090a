//! Configuration for the sync manager.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Port every node serves its config API on.
pub const DEFAULT_FORWARD_PORT: u16 = 4122;

/// Path prefix of the config API.
pub const DEFAULT_API_PREFIX: &str = "/v1/api/config";

/// Configuration for a sync manager node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Address other nodes use to reach this node.
    pub advertise_addr: String,

    /// Port forwarded commands are sent to on the leader.
    pub forward_port: u16,

    /// Path prefix of the leader's config API.
    pub api_prefix: String,

    /// Timeout for a forwarded request in milliseconds. None waits forever.
    #[serde(default)]
    pub forward_timeout_ms: Option<u64>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            advertise_addr: format!("127.0.0.1:{}", DEFAULT_FORWARD_PORT),
            forward_port: DEFAULT_FORWARD_PORT,
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            forward_timeout_ms: None,
        }
    }
}

impl SyncConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the advertise address.
    pub fn with_advertise_addr(mut self, addr: impl Into<String>) -> Self {
        self.advertise_addr = addr.into();
        self
    }

    /// Set the port forwarded commands are sent to.
    pub fn with_forward_port(mut self, port: u16) -> Self {
        self.forward_port = port;
        self
    }

    /// Set the config API prefix.
    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    /// Bound forwarded requests by a timeout.
    pub fn with_forward_timeout(mut self, timeout: Duration) -> Self {
        self.forward_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Timeout for forwarded requests, if any.
    pub fn forward_timeout(&self) -> Option<Duration> {
        self.forward_timeout_ms.map(Duration::from_millis)
    }
}
