#![allow(dead_code)]

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actors::Controller;
use dispatch_core::DispatchConfig;
use tokio::time::Instant;

pub const PROCESSING_TIME: Duration = Duration::from_millis(400);
pub const IDLE_BACKOFF: Duration = Duration::from_millis(10);

/// Collects every line the controller emits.
#[derive(Clone, Default)]
pub struct EventLog {
    lines: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    /// Lines containing `needle`, in emission order.
    pub fn matching(&self, needle: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.contains(needle))
            .collect()
    }
}

pub fn fast_config() -> DispatchConfig {
    DispatchConfig::default()
        .with_processing_time(PROCESSING_TIME)
        .with_idle_backoff(IDLE_BACKOFF)
}

/// A controller with short timings and a recording sink.
pub fn setup_controller() -> (Controller, EventLog) {
    setup_controller_with(fast_config())
}

pub fn setup_controller_with(config: DispatchConfig) -> (Controller, EventLog) {
    let log = EventLog::default();
    let lines = log.lines.clone();
    let controller = Controller::with_config(config, move |line: &str| {
        lines.lock().unwrap().push(line.to_string());
    });
    (controller, log)
}

/// Poll `check` until it holds or `timeout` passes.
pub async fn eventually<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if check().await {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
