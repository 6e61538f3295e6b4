use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::error::AlertError;
use crate::intrusion::AlertEvent;

/// Human readable record for one event, timestamp in local time.
pub fn format_record(event: &AlertEvent) -> String {
    format!(
        "[ALERT] Object {} {} perimeter at {}",
        event.object_id,
        event.kind.verb(),
        event
            .timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
    )
}

/// Append-only alert log file.
///
/// The file is reopened in append mode for every record, so a record that
/// failed can be written again once the file is writable.
pub struct AlertLog {
    path: PathBuf,
}

impl AlertLog {
    /// Check that `path` can be appended to, creating it and its parent
    /// directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AlertError> {
        let log = Self {
            path: path.as_ref().to_path_buf(),
        };

        if let Some(parent) = log.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| log.open_error(source))?;
        }
        log.append_handle()?;

        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line for `event` and return it.
    pub fn record(&mut self, event: &AlertEvent) -> Result<String, AlertError> {
        let line = format_record(event);
        let mut file = self.append_handle()?;
        writeln!(file, "{line}").map_err(AlertError::WriteLog)?;
        file.flush().map_err(AlertError::WriteLog)?;
        info!("{line}");
        Ok(line)
    }

    fn append_handle(&self) -> Result<File, AlertError> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.open_error(source))
    }

    fn open_error(&self, source: std::io::Error) -> AlertError {
        AlertError::OpenLog {
            path: self.path.clone(),
            source,
        }
    }
}
