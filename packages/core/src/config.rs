//! Dispatch timing configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`DispatchConfig::processing_time_ms`].
pub const PROCESSING_TIME_ENV: &str = "DISPATCH_PROCESSING_MS";
/// Environment variable overriding [`DispatchConfig::idle_backoff_ms`].
pub const IDLE_BACKOFF_ENV: &str = "DISPATCH_IDLE_BACKOFF_MS";

/// Configuration for controller and bot timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// How long a bot spends on one order (milliseconds).
    pub processing_time_ms: u64,
    /// How long an idle bot waits before polling for work again (milliseconds).
    pub idle_backoff_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            processing_time_ms: 10_000,
            idle_backoff_ms: 100,
        }
    }
}

impl DispatchConfig {
    /// Defaults overlaid with any values found in the environment.
    ///
    /// Values that do not parse as milliseconds are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(ms) = read_millis(PROCESSING_TIME_ENV) {
            config.processing_time_ms = ms;
        }
        if let Some(ms) = read_millis(IDLE_BACKOFF_ENV) {
            config.idle_backoff_ms = ms;
        }
        config
    }

    pub fn with_processing_time(mut self, processing_time: Duration) -> Self {
        self.processing_time_ms = saturating_millis(processing_time);
        self
    }

    pub fn with_idle_backoff(mut self, idle_backoff: Duration) -> Self {
        self.idle_backoff_ms = saturating_millis(idle_backoff);
        self
    }

    pub fn processing_time(&self) -> Duration {
        Duration::from_millis(self.processing_time_ms)
    }

    pub fn idle_backoff(&self) -> Duration {
        Duration::from_millis(self.idle_backoff_ms)
    }
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn read_millis(var: &str) -> Option<u64> {
    let raw = std::env::var(var).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(ms),
        Err(e) => {
            tracing::warn!("Ignoring {}={:?}: {}", var, raw, e);
            None
        }
    }
}
