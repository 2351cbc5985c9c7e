//! Engine configuration.

use std::time::Duration;

/// Configuration for the sync engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on any single remote call. Expiry counts as a failure
    /// and reverts the optimistic change.
    pub remote_timeout: Duration,
    /// Wait between a successful delete and the reload that renumbers rows.
    pub reload_delay: Duration,
    /// Capacity of the command queue.
    pub command_buffer: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            remote_timeout: Duration::from_secs(15),
            reload_delay: Duration::from_millis(500),
            command_buffer: 32,
        }
    }
}
