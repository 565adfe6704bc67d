// Copyright (c) 2025 - Cowboy AI, Inc.

//! Error types for projector operations

use thiserror::Error;
use uuid::Uuid;

use crate::sink::SinkError;
use crate::state_machine::TransitionError;

/// Errors that can occur while projecting utility network events
#[derive(Debug, Error)]
pub enum ProjectorError {
    /// A span equipment references a specification the registry has never seen
    #[error("Unknown span equipment specification: {0}")]
    UnknownSpanEquipmentSpecification(Uuid),

    /// A span equipment specification's root template references an unknown structure
    #[error("Unknown span structure specification: {0}")]
    UnknownSpanStructureSpecification(Uuid),

    /// A terminal equipment references a specification the registry has never seen
    #[error("Unknown terminal equipment specification: {0}")]
    UnknownTerminalEquipmentSpecification(Uuid),

    /// Relational sink operation failed
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// Mode transition rejected
    #[error("Mode transition error: {0}")]
    Transition(#[from] TransitionError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// NATS error
    #[error("NATS error: {0}")]
    Nats(String),

    /// Event payload could not be decoded
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl ProjectorError {
    /// Whether projection progress must halt on this error.
    ///
    /// Broken specification chains and sink failures mean the read model can
    /// no longer follow the event log, so the event must not be acknowledged.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ProjectorError::Deserialization(_))
    }
}

/// Result type for projector operations
pub type ProjectorResult<T> = Result<T, ProjectorError>;

impl From<async_nats::Error> for ProjectorError {
    fn from(err: async_nats::Error) -> Self {
        ProjectorError::Nats(err.to_string())
    }
}

impl From<serde_json::Error> for ProjectorError {
    fn from(err: serde_json::Error) -> Self {
        ProjectorError::Deserialization(err.to_string())
    }
}
