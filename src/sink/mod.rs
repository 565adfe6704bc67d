// Copyright (c) 2025 - Cowboy AI, Inc.
//! Relational Sink
//!
//! The contract the projection writes through. A sink is a dumb executor:
//! it prepares schema objects, bulk loads whole tables once at the
//! replay → live transition, and afterwards applies single incremental
//! writes. It holds no business logic.
//!
//! # Architecture
//!
//! ```text
//! Projection                         Sink
//! ──────────                         ────
//!
//! replay finished ──prepare_schema──> CREATE ...
//!                 ──bulk_load ×4────> one batch per table
//!
//! live event ─────execute(SinkWrite)─> INSERT / UPDATE / DELETE
//! ```
//!
//! Incremental writes are described as data ([`SinkWrite`]) and handed to
//! [`RelationalSink::execute`]; the sink decides how to run them.
//!
//! # Atomicity
//!
//! Every call must be individually all-or-nothing. A failed call leaves the
//! sink as it was before the call, so the projection can halt without the
//! read model drifting from the mirror.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod rows;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::config::SchemaPreparation;

pub use memory::InMemorySink;
#[cfg(feature = "postgres")]
pub use postgres::PostgresSink;
pub use rows::{ConduitRow, ConduitSlackRow, RouteElementInterestRow, ServiceTerminationRow};

/// Tables maintained by the projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SinkTable {
    RouteElementInterest,
    ServiceTermination,
    Conduit,
    ConduitSlack,
}

impl SinkTable {
    /// All tables in bulk-load order
    pub const ALL: [SinkTable; 4] = [
        SinkTable::RouteElementInterest,
        SinkTable::ServiceTermination,
        SinkTable::Conduit,
        SinkTable::ConduitSlack,
    ];

    /// Unqualified table name
    pub fn table_name(&self) -> &'static str {
        match self {
            SinkTable::RouteElementInterest => "route_network_element_interest",
            SinkTable::ServiceTermination => "service_termination",
            SinkTable::Conduit => "conduit",
            SinkTable::ConduitSlack => "conduit_slack",
        }
    }

    /// Table name qualified with the schema
    pub fn qualified_name(&self, schema: &str) -> String {
        format!("{}.{}", schema, self.table_name())
    }
}

impl fmt::Display for SinkTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// The full content of one table, loaded in one batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableRows {
    RouteElementInterests(Vec<RouteElementInterestRow>),
    ServiceTerminations(Vec<ServiceTerminationRow>),
    Conduits(Vec<ConduitRow>),
    ConduitSlacks(Vec<ConduitSlackRow>),
}

impl TableRows {
    /// Table these rows belong to
    pub fn table(&self) -> SinkTable {
        match self {
            TableRows::RouteElementInterests(_) => SinkTable::RouteElementInterest,
            TableRows::ServiceTerminations(_) => SinkTable::ServiceTermination,
            TableRows::Conduits(_) => SinkTable::Conduit,
            TableRows::ConduitSlacks(_) => SinkTable::ConduitSlack,
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        match self {
            TableRows::RouteElementInterests(rows) => rows.len(),
            TableRows::ServiceTerminations(rows) => rows.len(),
            TableRows::Conduits(rows) => rows.len(),
            TableRows::ConduitSlacks(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single incremental write issued in live mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SinkWrite {
    /// Insert the element rows of one interest
    InsertRouteElementInterests {
        interest_id: Uuid,
        rows: Vec<RouteElementInterestRow>,
    },

    /// Delete every element row of one interest
    DeleteRouteElementInterests { interest_id: Uuid },

    InsertConduit(ConduitRow),

    UpdateConduitDiameter { conduit_id: Uuid, outer_diameter: u32 },

    DeleteConduit { conduit_id: Uuid },

    InsertServiceTermination(ServiceTerminationRow),

    UpdateServiceTerminationName {
        service_termination_id: Uuid,
        name: Option<String>,
    },

    DeleteServiceTermination { service_termination_id: Uuid },
}

impl SinkWrite {
    /// Table the write targets
    pub fn table(&self) -> SinkTable {
        match self {
            SinkWrite::InsertRouteElementInterests { .. }
            | SinkWrite::DeleteRouteElementInterests { .. } => SinkTable::RouteElementInterest,
            SinkWrite::InsertConduit(_)
            | SinkWrite::UpdateConduitDiameter { .. }
            | SinkWrite::DeleteConduit { .. } => SinkTable::Conduit,
            SinkWrite::InsertServiceTermination(_)
            | SinkWrite::UpdateServiceTerminationName { .. }
            | SinkWrite::DeleteServiceTermination { .. } => SinkTable::ServiceTermination,
        }
    }

    /// Short operation name for logs
    pub fn operation(&self) -> &'static str {
        match self {
            SinkWrite::InsertRouteElementInterests { .. }
            | SinkWrite::InsertConduit(_)
            | SinkWrite::InsertServiceTermination(_) => "insert",
            SinkWrite::UpdateConduitDiameter { .. }
            | SinkWrite::UpdateServiceTerminationName { .. } => "update",
            SinkWrite::DeleteRouteElementInterests { .. }
            | SinkWrite::DeleteConduit { .. }
            | SinkWrite::DeleteServiceTermination { .. } => "delete",
        }
    }
}

/// Errors reported by a sink
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Schema exists although the preparation policy requires it absent
    #[error("Schema already exists: {0}")]
    SchemaAlreadyExists(String),

    /// Sink is not reachable
    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Relational sink trait
///
/// Implementations must make each call individually atomic. Calls are
/// issued strictly sequentially by one projection.
#[async_trait]
pub trait RelationalSink: Send + Sync {
    /// Create the schema and its tables and views according to `preparation`
    async fn prepare_schema(
        &mut self,
        schema: &str,
        preparation: SchemaPreparation,
    ) -> SinkResult<()>;

    /// Load the full content of one table in a single batch
    ///
    /// Returns the number of rows written.
    async fn bulk_load(&mut self, schema: &str, rows: TableRows) -> SinkResult<u64>;

    /// Apply one incremental write
    async fn execute(&mut self, schema: &str, write: SinkWrite) -> SinkResult<()>;

    /// Verify the sink is reachable
    async fn health_check(&self) -> SinkResult<()>;

    /// Get the name of this sink
    fn name(&self) -> &str;
}
