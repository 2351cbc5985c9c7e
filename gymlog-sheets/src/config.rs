//! Sheet proxy configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`SheetsClient`](crate::SheetsClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// Proxy base URL, without the `/api` suffix.
    pub api_base_url: String,
    /// HTTP-level timeout per request, in seconds.
    pub request_timeout_secs: u64,
}

impl SheetsConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3001".to_string(),
            request_timeout_secs: 30,
        }
    }
}
