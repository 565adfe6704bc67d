// Copyright (c) 2025 - Cowboy AI, Inc.
//! Projection mode
//!
//! `Replaying → Live`, entered exactly once. A second `ReplayFinished`
//! signal is rejected by the state machine itself.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::state_machine::{StateMachine, TransitionError, TransitionResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectionMode {
    /// Catching up on history: mirror updates only
    #[default]
    Replaying,
    /// Caught up: mirror updates plus targeted sink writes
    Live,
}

/// Signals driving the mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSignal {
    ReplayFinished,
}

impl ProjectionMode {
    pub fn is_live(&self) -> bool {
        matches!(self, ProjectionMode::Live)
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionMode::Replaying => write!(f, "Replaying"),
            ProjectionMode::Live => write!(f, "Live"),
        }
    }
}

impl StateMachine for ProjectionMode {
    type Input = ModeSignal;
    type Output = ();

    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
        match (self, input) {
            (ProjectionMode::Replaying, ModeSignal::ReplayFinished) => {
                Ok((ProjectionMode::Live, ()))
            }
            (ProjectionMode::Live, ModeSignal::ReplayFinished) => {
                Err(TransitionError::InvalidTransition {
                    from: self.to_string(),
                    to: ProjectionMode::Live.to_string(),
                })
            }
        }
    }
}
