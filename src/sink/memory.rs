// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-memory relational sink
//!
//! Keeps the four tables in memory with the same key constraints the
//! database enforces, and journals every call it receives. Useful for tests
//! and for dry runs of a replay without a database.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

use super::{
    ConduitRow, ConduitSlackRow, RelationalSink, RouteElementInterestRow, ServiceTerminationRow,
    SinkError, SinkResult, SinkTable, SinkWrite, TableRows,
};
use crate::config::SchemaPreparation;

/// Tables of one schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySchema {
    pub route_element_interests: Vec<RouteElementInterestRow>,
    pub service_terminations: BTreeMap<Uuid, ServiceTerminationRow>,
    pub conduits: BTreeMap<Uuid, ConduitRow>,
    pub conduit_slacks: BTreeMap<Uuid, ConduitSlackRow>,
}

impl MemorySchema {
    /// Element ids of one interest ordered by sequence number
    pub fn interest_elements(&self, interest_id: Uuid) -> Vec<Uuid> {
        let mut rows: Vec<_> = self
            .route_element_interests
            .iter()
            .filter(|row| row.interest_id == interest_id)
            .collect();
        rows.sort_by_key(|row| row.seq_no);
        rows.into_iter().map(|row| row.route_network_element_id).collect()
    }

    fn clear_bulk_tables(&mut self) {
        self.route_element_interests.clear();
        self.service_terminations.clear();
        self.conduits.clear();
        self.conduit_slacks.clear();
    }

    fn row_count(&self, table: SinkTable) -> usize {
        match table {
            SinkTable::RouteElementInterest => self.route_element_interests.len(),
            SinkTable::ServiceTermination => self.service_terminations.len(),
            SinkTable::Conduit => self.conduits.len(),
            SinkTable::ConduitSlack => self.conduit_slacks.len(),
        }
    }

    fn has_interest_row(&self, row: &RouteElementInterestRow) -> bool {
        self.route_element_interests.iter().any(|existing| {
            existing.interest_id == row.interest_id
                && existing.route_network_element_id == row.route_network_element_id
        })
    }
}

/// A call received by the sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    PrepareSchema {
        schema: String,
        preparation: SchemaPreparation,
    },
    BulkLoad {
        schema: String,
        table: SinkTable,
        rows: usize,
    },
    Execute {
        schema: String,
        write: SinkWrite,
    },
}

/// Point at which the sink should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePoint {
    PrepareSchema,
    BulkLoad(SinkTable),
    Write(SinkTable),
}

/// In-memory sink with call journal and failure injection
#[derive(Debug, Clone, Default)]
pub struct InMemorySink {
    schemas: BTreeMap<String, MemorySchema>,
    journal: Vec<SinkCall>,
    failure: Option<FailurePoint>,
}

impl InMemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call matching `point` fail until cleared
    pub fn fail_on(&mut self, point: FailurePoint) {
        self.failure = Some(point);
    }

    /// Remove any injected failure
    pub fn clear_failure(&mut self) {
        self.failure = None;
    }

    /// Tables of a prepared schema
    pub fn schema(&self, name: &str) -> Option<&MemorySchema> {
        self.schemas.get(name)
    }

    /// Every call received, in order
    pub fn calls(&self) -> &[SinkCall] {
        &self.journal
    }

    /// Incremental writes received, in order
    pub fn writes(&self) -> Vec<&SinkWrite> {
        self.journal
            .iter()
            .filter_map(|call| match call {
                SinkCall::Execute { write, .. } => Some(write),
                _ => None,
            })
            .collect()
    }

    /// Bulk loads received, in order
    pub fn bulk_loads(&self) -> Vec<SinkTable> {
        self.journal
            .iter()
            .filter_map(|call| match call {
                SinkCall::BulkLoad { table, .. } => Some(*table),
                _ => None,
            })
            .collect()
    }

    /// Forget the journal, keeping the tables
    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    fn check_failure(&self, point: FailurePoint) -> SinkResult<()> {
        if self.failure == Some(point) {
            return Err(SinkError::Database(format!("injected failure at {:?}", point)));
        }
        Ok(())
    }

    fn schema_mut(&mut self, schema: &str) -> SinkResult<&mut MemorySchema> {
        self.schemas
            .get_mut(schema)
            .ok_or_else(|| SinkError::Database(format!("schema \"{}\" does not exist", schema)))
    }
}

fn duplicate_key(table: SinkTable, key: Uuid) -> SinkError {
    SinkError::Database(format!(
        "duplicate key value violates unique constraint on {} ({})",
        table, key
    ))
}

/// Apply one write, checking key constraints before touching any row
fn apply_write(tables: &mut MemorySchema, write: &SinkWrite) -> SinkResult<()> {
    match write {
        SinkWrite::InsertRouteElementInterests { rows, .. } => {
            if let Some(row) = rows.iter().find(|row| tables.has_interest_row(row)) {
                return Err(duplicate_key(
                    SinkTable::RouteElementInterest,
                    row.route_network_element_id,
                ));
            }
            tables.route_element_interests.extend(rows.iter().cloned());
        }
        SinkWrite::DeleteRouteElementInterests { interest_id } => {
            tables
                .route_element_interests
                .retain(|row| row.interest_id != *interest_id);
        }
        SinkWrite::InsertConduit(row) => {
            if tables.conduits.contains_key(&row.id) {
                return Err(duplicate_key(SinkTable::Conduit, row.id));
            }
            tables.conduits.insert(row.id, row.clone());
        }
        SinkWrite::UpdateConduitDiameter {
            conduit_id,
            outer_diameter,
        } => {
            if let Some(row) = tables.conduits.get_mut(conduit_id) {
                row.outer_diameter = *outer_diameter;
            }
        }
        SinkWrite::DeleteConduit { conduit_id } => {
            tables.conduits.remove(conduit_id);
        }
        SinkWrite::InsertServiceTermination(row) => {
            if tables.service_terminations.contains_key(&row.id) {
                return Err(duplicate_key(SinkTable::ServiceTermination, row.id));
            }
            tables.service_terminations.insert(row.id, row.clone());
        }
        SinkWrite::UpdateServiceTerminationName {
            service_termination_id,
            name,
        } => {
            if let Some(row) = tables.service_terminations.get_mut(service_termination_id) {
                row.name = name.clone();
            }
        }
        SinkWrite::DeleteServiceTermination {
            service_termination_id,
        } => {
            tables.service_terminations.remove(service_termination_id);
        }
    }
    Ok(())
}

#[async_trait]
impl RelationalSink for InMemorySink {
    async fn prepare_schema(
        &mut self,
        schema: &str,
        preparation: SchemaPreparation,
    ) -> SinkResult<()> {
        self.journal.push(SinkCall::PrepareSchema {
            schema: schema.to_string(),
            preparation,
        });
        self.check_failure(FailurePoint::PrepareSchema)?;

        match preparation {
            SchemaPreparation::RequireAbsent => {
                if self.schemas.contains_key(schema) {
                    return Err(SinkError::SchemaAlreadyExists(schema.to_string()));
                }
                self.schemas.insert(schema.to_string(), MemorySchema::default());
            }
            SchemaPreparation::CreateIfMissing => {
                self.schemas
                    .entry(schema.to_string())
                    .or_default()
                    .clear_bulk_tables();
            }
        }

        debug!("Prepared in-memory schema {} ({})", schema, preparation);
        Ok(())
    }

    async fn bulk_load(&mut self, schema: &str, rows: TableRows) -> SinkResult<u64> {
        let table = rows.table();
        self.journal.push(SinkCall::BulkLoad {
            schema: schema.to_string(),
            table,
            rows: rows.len(),
        });
        self.check_failure(FailurePoint::BulkLoad(table))?;

        let tables = self.schema_mut(schema)?;
        if tables.row_count(table) > 0 {
            return Err(SinkError::Database(format!(
                "bulk load into non-empty table {}",
                table.qualified_name(schema)
            )));
        }

        // Build the replacement first so a constraint violation leaves the table empty
        let mut staged = MemorySchema::default();
        let count = rows.len() as u64;
        match rows {
            TableRows::RouteElementInterests(rows) => {
                for row in rows {
                    if staged.has_interest_row(&row) {
                        return Err(duplicate_key(table, row.route_network_element_id));
                    }
                    staged.route_element_interests.push(row);
                }
                tables.route_element_interests = staged.route_element_interests;
            }
            TableRows::ServiceTerminations(rows) => {
                for row in rows {
                    if staged.service_terminations.insert(row.id, row.clone()).is_some() {
                        return Err(duplicate_key(table, row.id));
                    }
                }
                tables.service_terminations = staged.service_terminations;
            }
            TableRows::Conduits(rows) => {
                for row in rows {
                    if staged.conduits.insert(row.id, row.clone()).is_some() {
                        return Err(duplicate_key(table, row.id));
                    }
                }
                tables.conduits = staged.conduits;
            }
            TableRows::ConduitSlacks(rows) => {
                for row in rows {
                    if staged
                        .conduit_slacks
                        .insert(row.route_node_id, row.clone())
                        .is_some()
                    {
                        return Err(duplicate_key(table, row.route_node_id));
                    }
                }
                tables.conduit_slacks = staged.conduit_slacks;
            }
        }

        Ok(count)
    }

    async fn execute(&mut self, schema: &str, write: SinkWrite) -> SinkResult<()> {
        self.journal.push(SinkCall::Execute {
            schema: schema.to_string(),
            write: write.clone(),
        });
        self.check_failure(FailurePoint::Write(write.table()))?;

        let tables = self.schema_mut(schema)?;
        apply_write(tables, &write)
    }

    async fn health_check(&self) -> SinkResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
