// Copyright (c) 2025 - Cowboy AI, Inc.
//! Finite State Machine Abstractions
//!
//! Generic state machine types used to model lifecycles whose transitions
//! must be explicit and checked, such as the projection's replay → live
//! mode switch (see [`crate::projection::mode`]).
//!
//! Transitions are pure: `(State, Input) → (State, Output)`. Whoever owns
//! the state decides when to commit the new state, which lets callers run
//! side effects between validating a transition and applying it.
//!
//! # Example
//!
//! ```rust
//! use utility_network_projector::state_machine::{StateMachine, TransitionError, TransitionResult};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! enum Door {
//!     Open,
//!     Closed,
//! }
//!
//! enum Push {
//!     Close,
//! }
//!
//! impl StateMachine for Door {
//!     type Input = Push;
//!     type Output = ();
//!
//!     fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
//!         match (self, input) {
//!             (Door::Open, Push::Close) => Ok((Door::Closed, ())),
//!             (Door::Closed, Push::Close) => Err(TransitionError::InvalidTransition {
//!                 from: "Closed".to_string(),
//!                 to: "Closed".to_string(),
//!             }),
//!         }
//!     }
//! }
//!
//! assert!(Door::Open.can_transition(&Push::Close));
//! assert!(!Door::Closed.can_transition(&Push::Close));
//! ```

use chrono::{DateTime, Utc};

/// Result of a state transition
pub type TransitionResult<S> = Result<S, TransitionError>;

/// Errors that can occur during state transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Transition from current state to target state is not allowed
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

/// Trait for finite state machines
///
/// Implement this trait to define a state machine with typed states,
/// inputs, and outputs.
pub trait StateMachine: Sized + Clone {
    /// Input type that triggers transitions
    type Input;

    /// Output type produced by transitions (use () if none)
    type Output;

    /// Attempt to transition to a new state given an input
    ///
    /// # Returns
    /// - Ok((new_state, output)) if transition is valid
    /// - Err(TransitionError) if transition is invalid
    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)>;

    /// Check if a transition is valid without performing it
    fn can_transition(&self, input: &Self::Input) -> bool {
        self.transition(input).is_ok()
    }
}

/// One committed transition
#[derive(Debug, Clone)]
pub struct Transition<S, I> {
    pub from: S,
    pub to: S,
    pub input: I,
    pub at: DateTime<Utc>,
}

/// A state machine value plus the audit trail of transitions it took.
///
/// Only [`transition_with_history`](Self::transition_with_history) moves
/// the state, so the history always ends at the current state.
#[derive(Debug, Clone)]
pub struct StateMachineWithHistory<FSM: StateMachine> {
    current: FSM,
    history: Vec<Transition<FSM, FSM::Input>>,
}

impl<FSM: StateMachine> StateMachineWithHistory<FSM> {
    /// Create a new state machine with history tracking
    pub fn new(initial: FSM) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    /// Transition with history recording
    ///
    /// The current state is left untouched when the transition is rejected.
    pub fn transition_with_history(
        &mut self,
        input: FSM::Input,
        at: DateTime<Utc>,
    ) -> TransitionResult<FSM::Output> {
        let (to, output) = self.current.transition(&input)?;
        let from = std::mem::replace(&mut self.current, to.clone());

        self.history.push(Transition { from, to, input, at });
        Ok(output)
    }

    /// Get transition history
    pub fn get_history(&self) -> &[Transition<FSM, FSM::Input>] {
        &self.history
    }

    /// Get current state
    pub fn current_state(&self) -> &FSM {
        &self.current
    }
}
