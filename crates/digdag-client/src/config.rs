//! Serializable client settings.
//!
//! `ClientConfig` is meant to be embedded in a caller's own config file:
//!
//! ```yaml
//! digdag:
//!   base-url: https://digdag.internal:65432
//!   verbose: false
//!   timeout-secs: 30
//!   headers:
//!     Authorization: Bearer secret
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Endpoint used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:65432";

/// Connection settings for a Digdag server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfig {
    /// Server base URL. Empty means [`DEFAULT_BASE_URL`].
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Dump every request and response through `tracing`.
    #[serde(default)]
    pub verbose: bool,

    /// Per-request timeout. Unset leaves the transport default (none).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Extra headers sent with every request.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            verbose: false,
            timeout_secs: None,
            headers: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Timeout as a [`Duration`], if one is set.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
