// Copyright (c) 2025 - Cowboy AI, Inc.
//! PostgreSQL sink
//!
//! Bulk loads are chunked multi-row `INSERT`s inside one transaction per
//! table, so a table is either fully loaded or untouched. Incremental writes
//! are single statements.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};

use super::{
    RelationalSink, SinkError, SinkResult, SinkTable, SinkWrite, TableRows,
};
use crate::config::SchemaPreparation;

/// Bind parameters PostgreSQL accepts in one statement
const MAX_BIND_PARAMETERS: usize = u16::MAX as usize;

/// Sink writing to a PostgreSQL database
#[derive(Clone)]
pub struct PostgresSink {
    pool: PgPool,
    batch_size: usize,
}

impl PostgresSink {
    pub fn new(pool: PgPool, batch_size: usize) -> Self {
        Self {
            pool,
            batch_size: batch_size.max(1),
        }
    }

    /// Open a connection pool to `database_url`
    pub async fn connect(database_url: &str, batch_size: usize) -> SinkResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect(database_url)
            .await
            .map_err(|e| SinkError::Unavailable(e.to_string()))?;

        Ok(Self::new(pool, batch_size))
    }

    /// Rows per `INSERT` for a table with `columns` columns
    fn chunk_size(&self, columns: usize) -> usize {
        self.batch_size.min(MAX_BIND_PARAMETERS / columns)
    }

    async fn schema_exists(&self, schema: &str) -> SinkResult<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM information_schema.schemata WHERE schema_name = $1)",
        )
        .bind(schema)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("schema", "lookup", e))?;

        Ok(exists)
    }
}

fn map_sqlx_error(target: impl std::fmt::Display, operation: &str, error: sqlx::Error) -> SinkError {
    SinkError::Database(format!("{} {} failed: {}", operation, target, error))
}

fn quote_ident(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn table_ref(schema: &str, table: SinkTable) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table.table_name()))
}

fn to_i32(value: u32, table: SinkTable) -> SinkResult<i32> {
    i32::try_from(value)
        .map_err(|_| SinkError::Database(format!("value {} out of range for {}", value, table)))
}

fn schema_ddl(schema: &str) -> Vec<String> {
    let interest = table_ref(schema, SinkTable::RouteElementInterest);
    let conduit = table_ref(schema, SinkTable::Conduit);

    vec![
        format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(schema)),
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                route_network_element_id uuid NOT NULL,
                interest_id uuid NOT NULL,
                seq_no integer NOT NULL,
                PRIMARY KEY (interest_id, seq_no)
            )",
            interest
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS route_network_element_interest_element_idx ON {} (route_network_element_id)",
            interest
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id uuid PRIMARY KEY,
                name text,
                route_node_id uuid NOT NULL
            )",
            table_ref(schema, SinkTable::ServiceTermination)
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id uuid PRIMARY KEY,
                walk_of_interest_id uuid NOT NULL,
                outer_diameter integer NOT NULL
            )",
            conduit
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                route_node_id uuid PRIMARY KEY,
                number_of_ends integer NOT NULL
            )",
            table_ref(schema, SinkTable::ConduitSlack)
        ),
        // Conduit count and diameters per route element, for map labels
        format!(
            "CREATE OR REPLACE VIEW {}.{} AS
                SELECT rei.route_network_element_id,
                       count(c.id) AS number_of_conduits,
                       string_agg(c.outer_diameter::text, ', ' ORDER BY c.outer_diameter) AS outer_diameters
                FROM {} rei
                JOIN {} c ON c.walk_of_interest_id = rei.interest_id
                GROUP BY rei.route_network_element_id",
            quote_ident(schema),
            quote_ident("route_element_conduit_label"),
            interest,
            conduit
        ),
    ]
}

#[async_trait]
impl RelationalSink for PostgresSink {
    async fn prepare_schema(
        &mut self,
        schema: &str,
        preparation: SchemaPreparation,
    ) -> SinkResult<()> {
        if preparation == SchemaPreparation::RequireAbsent && self.schema_exists(schema).await? {
            return Err(SinkError::SchemaAlreadyExists(schema.to_string()));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error(schema, "begin", e))?;

        for statement in schema_ddl(schema) {
            sqlx::query(&statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error(schema, "prepare", e))?;
        }

        if preparation == SchemaPreparation::CreateIfMissing {
            let tables: Vec<String> = SinkTable::ALL
                .iter()
                .map(|table| table_ref(schema, *table))
                .collect();
            sqlx::query(&format!("TRUNCATE {}", tables.join(", ")))
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error(schema, "truncate", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error(schema, "commit", e))?;

        info!("Prepared schema '{}' ({})", schema, preparation);
        Ok(())
    }

    async fn bulk_load(&mut self, schema: &str, rows: TableRows) -> SinkResult<u64> {
        let table = rows.table();
        let target = table_ref(schema, table);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error(table, "begin", e))?;
        let mut written = 0;

        match &rows {
            TableRows::RouteElementInterests(rows) => {
                for chunk in rows.chunks(self.chunk_size(3)) {
                    let mut builder = QueryBuilder::<Postgres>::new(format!(
                        "INSERT INTO {} (route_network_element_id, interest_id, seq_no) ",
                        target
                    ));
                    builder.push_values(chunk, |mut b, row| {
                        b.push_bind(row.route_network_element_id)
                            .push_bind(row.interest_id)
                            .push_bind(row.seq_no);
                    });
                    written += builder
                        .build()
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| map_sqlx_error(table, "bulk load", e))?
                        .rows_affected();
                }
            }
            TableRows::ServiceTerminations(rows) => {
                for chunk in rows.chunks(self.chunk_size(3)) {
                    let mut builder = QueryBuilder::<Postgres>::new(format!(
                        "INSERT INTO {} (id, name, route_node_id) ",
                        target
                    ));
                    builder.push_values(chunk, |mut b, row| {
                        b.push_bind(row.id)
                            .push_bind(row.name.clone())
                            .push_bind(row.route_node_id);
                    });
                    written += builder
                        .build()
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| map_sqlx_error(table, "bulk load", e))?
                        .rows_affected();
                }
            }
            TableRows::Conduits(rows) => {
                for chunk in rows.chunks(self.chunk_size(3)) {
                    let values = chunk
                        .iter()
                        .map(|row| Ok((row.id, row.walk_of_interest_id, to_i32(row.outer_diameter, table)?)))
                        .collect::<SinkResult<Vec<_>>>()?;

                    let mut builder = QueryBuilder::<Postgres>::new(format!(
                        "INSERT INTO {} (id, walk_of_interest_id, outer_diameter) ",
                        target
                    ));
                    builder.push_values(values, |mut b, (id, walk_of_interest_id, outer_diameter)| {
                        b.push_bind(id)
                            .push_bind(walk_of_interest_id)
                            .push_bind(outer_diameter);
                    });
                    written += builder
                        .build()
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| map_sqlx_error(table, "bulk load", e))?
                        .rows_affected();
                }
            }
            TableRows::ConduitSlacks(rows) => {
                for chunk in rows.chunks(self.chunk_size(2)) {
                    let values = chunk
                        .iter()
                        .map(|row| Ok((row.route_node_id, to_i32(row.number_of_ends, table)?)))
                        .collect::<SinkResult<Vec<_>>>()?;

                    let mut builder = QueryBuilder::<Postgres>::new(format!(
                        "INSERT INTO {} (route_node_id, number_of_ends) ",
                        target
                    ));
                    builder.push_values(values, |mut b, (route_node_id, number_of_ends)| {
                        b.push_bind(route_node_id).push_bind(number_of_ends);
                    });
                    written += builder
                        .build()
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| map_sqlx_error(table, "bulk load", e))?
                        .rows_affected();
                }
            }
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error(table, "commit", e))?;

        debug!("Bulk loaded {} rows into {}", written, target);
        Ok(written)
    }

    async fn execute(&mut self, schema: &str, write: SinkWrite) -> SinkResult<()> {
        let table = write.table();
        let operation = write.operation();
        let target = table_ref(schema, table);

        let result = match write {
            SinkWrite::InsertRouteElementInterests { rows, .. } => {
                if rows.is_empty() {
                    return Ok(());
                }
                let mut builder = QueryBuilder::<Postgres>::new(format!(
                    "INSERT INTO {} (route_network_element_id, interest_id, seq_no) ",
                    target
                ));
                builder.push_values(rows, |mut b, row| {
                    b.push_bind(row.route_network_element_id)
                        .push_bind(row.interest_id)
                        .push_bind(row.seq_no);
                });
                builder.build().execute(&self.pool).await
            }
            SinkWrite::DeleteRouteElementInterests { interest_id } => {
                sqlx::query(&format!("DELETE FROM {} WHERE interest_id = $1", target))
                    .bind(interest_id)
                    .execute(&self.pool)
                    .await
            }
            SinkWrite::InsertConduit(row) => {
                sqlx::query(&format!(
                    "INSERT INTO {} (id, walk_of_interest_id, outer_diameter) VALUES ($1, $2, $3)",
                    target
                ))
                .bind(row.id)
                .bind(row.walk_of_interest_id)
                .bind(to_i32(row.outer_diameter, table)?)
                .execute(&self.pool)
                .await
            }
            SinkWrite::UpdateConduitDiameter {
                conduit_id,
                outer_diameter,
            } => {
                sqlx::query(&format!(
                    "UPDATE {} SET outer_diameter = $2 WHERE id = $1",
                    target
                ))
                .bind(conduit_id)
                .bind(to_i32(outer_diameter, table)?)
                .execute(&self.pool)
                .await
            }
            SinkWrite::DeleteConduit { conduit_id } => {
                sqlx::query(&format!("DELETE FROM {} WHERE id = $1", target))
                    .bind(conduit_id)
                    .execute(&self.pool)
                    .await
            }
            SinkWrite::InsertServiceTermination(row) => {
                sqlx::query(&format!(
                    "INSERT INTO {} (id, name, route_node_id) VALUES ($1, $2, $3)",
                    target
                ))
                .bind(row.id)
                .bind(row.name)
                .bind(row.route_node_id)
                .execute(&self.pool)
                .await
            }
            SinkWrite::UpdateServiceTerminationName {
                service_termination_id,
                name,
            } => {
                sqlx::query(&format!("UPDATE {} SET name = $2 WHERE id = $1", target))
                    .bind(service_termination_id)
                    .bind(name)
                    .execute(&self.pool)
                    .await
            }
            SinkWrite::DeleteServiceTermination {
                service_termination_id,
            } => {
                sqlx::query(&format!("DELETE FROM {} WHERE id = $1", target))
                    .bind(service_termination_id)
                    .execute(&self.pool)
                    .await
            }
        };

        result.map_err(|e| map_sqlx_error(table, operation, e))?;
        Ok(())
    }

    async fn health_check(&self) -> SinkResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| SinkError::Unavailable(e.to_string()))?;
        Ok(())
    }

    fn name(&self) -> &str {
        "postgres"
    }
}
