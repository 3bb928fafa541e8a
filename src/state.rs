//! Local state file for the CLI
//!
//! Holds the last known current state of one monitor, the way the
//! orchestrator would persist it between runs. Writes go to a temporary file
//! next to the target and are renamed into place, so a crash never leaves a
//! half-written state behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::resource::MonitorRecord;

pub const STATE_VERSION: u32 = 1;

pub type StateResult<T> = Result<T, StateError>;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to access state file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("state file {path} is corrupt: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("state file version {0} is not supported (expected {STATE_VERSION})")]
    UnsupportedVersion(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFile {
    pub version: u32,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor: Option<MonitorRecord>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            updated_at: None,
            monitor: None,
        }
    }
}

impl StateFile {
    /// Load the state, or an empty one if the file does not exist yet
    pub fn load(path: &Path) -> StateResult<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no state at {}, starting empty", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(StateError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let state: StateFile =
            serde_json::from_str(&content).map_err(|source| StateError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        if state.version != STATE_VERSION {
            return Err(StateError::UnsupportedVersion(state.version));
        }

        Ok(state)
    }

    pub fn save(&mut self, path: &Path) -> StateResult<()> {
        self.updated_at = Some(Utc::now());

        let io_err = |source: std::io::Error| StateError::Io {
            path: path.to_path_buf(),
            source,
        };

        let content = serde_json::to_string_pretty(self).map_err(|source| StateError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, content).map_err(io_err)?;
        std::fs::rename(&tmp, path).map_err(io_err)?;

        debug!("saved state to {}", path.display());
        Ok(())
    }
}
