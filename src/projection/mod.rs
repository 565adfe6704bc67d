// Copyright (c) 2025 - Cowboy AI, Inc.

//! Projection Adapter - Events → Relational Read Model
//!
//! This module defines the contract a host transport drives, and the
//! dual-mode relational projection that implements it.
//!
//! # Architecture
//!
//! ```text
//! EventEnvelope ──> dispatcher ──> ProjectorState (mirror)
//!                                      │
//!                        Live only     ▼
//!                                  SinkWrite ──> RelationalSink
//!
//! replay_finished ──> prepare_schema ──> bulk_load ×4 ──> Live
//! ```
//!
//! A projection starts out [`ProjectionMode::Replaying`]: events only touch
//! the mirror. When the transport reports that the historical backlog has
//! been delivered, the mirror is exported to the sink in one pass and the
//! projection flips to [`ProjectionMode::Live`], where every event also
//! issues its targeted sink write.
//!
//! # Example
//!
//! ```rust
//! use utility_network_projector::config::{ProjectorConfig, SchemaPreparation};
//! use utility_network_projector::events::{EventEnvelope, InterestUnregistered};
//! use utility_network_projector::projection::{ProjectionAdapter, RelationalProjection};
//! use utility_network_projector::sink::InMemorySink;
//! use uuid::Uuid;
//!
//! # tokio_test::block_on(async {
//! let config = ProjectorConfig::new(SchemaPreparation::CreateIfMissing);
//! let mut projection = RelationalProjection::new(config, InMemorySink::new()).unwrap();
//!
//! let event = EventEnvelope::new(1, InterestUnregistered { interest_id: Uuid::nil() });
//! projection.project(event).await.unwrap();
//! projection.replay_finished().await.unwrap();
//!
//! assert!(projection.is_live());
//! # });
//! ```

pub mod dispatcher;
pub mod mode;
pub mod relational;
pub mod shared;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use dispatcher::{dispatch, DispatchOutcome, EventHandler};
pub use mode::{ModeSignal, ProjectionMode};
pub use relational::RelationalProjection;
pub use shared::SharedProjection;

/// Projection Adapter trait
///
/// The contract between a projection and the transport delivering its
/// events. Events are delivered in order, one at a time, and
/// `replay_finished` is signalled exactly once between the last historical
/// event and the first live one.
#[async_trait]
pub trait ProjectionAdapter: Send + Sync {
    /// The event type this projection handles
    type Event: Send + Sync;

    /// Error type for projection operations
    type Error: std::error::Error + Send + Sync;

    /// Apply one event
    async fn project(&mut self, event: Self::Event) -> Result<(), Self::Error>;

    /// The transport has delivered every historical event
    async fn replay_finished(&mut self) -> Result<(), Self::Error>;

    /// Health check for the projection target
    async fn health_check(&self) -> Result<(), Self::Error>;

    /// Get the name of this projection adapter
    fn name(&self) -> &str;
}

/// Counters kept by a projection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionStats {
    /// Events routed to a handler
    pub events_applied: u64,
    /// Events of a type this crate does not know
    pub events_ignored: u64,
    /// Incremental writes issued in live mode
    pub sink_writes: u64,
    /// Rows written by the bulk load
    pub rows_bulk_loaded: u64,
    /// Global version of the last event seen
    pub last_global_version: Option<u64>,
}
