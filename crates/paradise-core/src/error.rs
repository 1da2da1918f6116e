//! Error types for configuration, snapshots and denied switches.

use thiserror::Error;

/// Failure to load or validate a [`crate::config::SimConfig`] or dialogue book
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {reason}")]
    Invalid { reason: String },
}

impl ConfigError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("snapshot version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("snapshot has no {0} entity")]
    MissingAgent(crate::components::AgentId),
}

/// Why a character switch was refused
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SwitchDenied {
    #[error("a character switch is already in progress")]
    InProgress,
    #[error("character switch cooling down ({remaining:.2}s left)")]
    CoolingDown { remaining: f32 },
    #[error("cannot switch characters during a conversation")]
    InDialogue,
}
