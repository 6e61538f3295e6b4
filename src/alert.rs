//! Persistence of confirmed crossings: an append-only text log and frame
//! snapshots.

mod dispatcher;
mod log_file;
mod snapshot;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use dispatcher::{AlertDispatcher, AlertOutcome, AlertStats};
pub use log_file::{AlertLog, format_record};
pub use snapshot::{DirectorySnapshotStore, SnapshotStore, snapshot_file_name};

use crate::intrusion::Transition;

/// Which crossings are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPolicy {
    #[default]
    EnterOnly,
    EnterAndExit,
}

impl AlertPolicy {
    pub fn accepts(self, kind: Transition) -> bool {
        match self {
            Self::EnterOnly => kind == Transition::Enter,
            Self::EnterAndExit => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub log_path: PathBuf,
    pub snapshot_dir: PathBuf,
    pub policy: AlertPolicy,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("alerts_log.txt"),
            snapshot_dir: PathBuf::from("snapshots"),
            policy: AlertPolicy::EnterOnly,
        }
    }
}
