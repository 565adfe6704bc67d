// Copyright (c) 2025 - Cowboy AI, Inc.
//! Relational projection of utility network events
//!
//! Materializes a row-oriented read model (route element interests,
//! conduits, conduit slack, service terminations) from an ordered stream of
//! utility and fiber network events. History is replayed into an in-memory
//! mirror, bulk loaded once, and then kept current with targeted writes.

pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod projection;
pub mod sink;
pub mod state;
pub mod state_machine;
pub mod subscriber;

// Re-export commonly used types
pub use config::{ProjectorConfig, SchemaPreparation};
pub use errors::{ProjectorError, ProjectorResult};
pub use events::{EventEnvelope, UtilityNetworkEvent};
pub use projection::{
    ProjectionAdapter, ProjectionMode, ProjectionStats, RelationalProjection, SharedProjection,
};
pub use sink::{InMemorySink, RelationalSink, SinkError, SinkTable, SinkWrite};
pub use state::ProjectorState;
pub use subscriber::JetStreamEventSource;
