//! Event sink that echoes to stdout and keeps order events in a result file.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use actors::EventSink;

use crate::error::CliError;

/// Default location of the result file.
pub const DEFAULT_RESULT_FILE: &str = "scripts/result.txt";
/// Environment variable overriding the result file location.
pub const RESULT_FILE_ENV: &str = "DISPATCH_RESULT_FILE";

/// Prints every event and appends order lifecycle events to a file.
pub struct ResultLog {
    file: Option<Mutex<File>>,
    path: Option<PathBuf>,
    echo: bool,
}

impl ResultLog {
    /// Truncate (or create) the result file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let file = File::create(path)?;
        tracing::debug!("Writing order events to {:?}", path);
        Ok(Self {
            file: Some(Mutex::new(file)),
            path: Some(path.to_path_buf()),
            echo: true,
        })
    }

    /// Echo events to stdout only.
    pub fn stdout_only() -> Self {
        Self {
            file: None,
            path: None,
            echo: true,
        }
    }

    /// Stop echoing events to stdout.
    #[cfg(test)]
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn persist(&self, text: &str) -> std::io::Result<()> {
        let Some(file) = &self.file else {
            return Ok(());
        };
        let mut file = file.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(file, "{}", text)?;
        file.sync_data()
    }
}

impl EventSink for ResultLog {
    fn emit(&self, text: &str) {
        if self.echo {
            println!("{}", text);
        }
        if is_order_event(text)
            && let Err(e) = self.persist(text)
        {
            tracing::warn!("Failed to write result file: {}", e);
        }
    }
}

/// Whether a rendered event line belongs in the result file.
///
/// Only order lifecycle lines qualify: created, started, completed and
/// returned to PENDING. Bot additions and plain removals are skipped.
pub fn is_order_event(text: &str) -> bool {
    text.contains("Order #")
        && (text.contains("created - Status: PENDING")
            || text.contains("started processing Order #")
            || text.contains("completed by Bot #")
            || text.contains("returned to PENDING"))
}
