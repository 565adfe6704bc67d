// Copyright (c) 2025 - Cowboy AI, Inc.
//! Relational Projector Service
//!
//! Replays the utility network event stream from NATS JetStream into an
//! in-memory mirror, bulk loads it into PostgreSQL once caught up, then
//! keeps the tables current with targeted writes.
//!
//! Run with: cargo run --bin relational-projector --features postgres
//!
//! Prerequisites:
//! 1. NATS server running (default: localhost:4222)
//! 2. PostgreSQL reachable via DATABASE_URL
//! 3. PROJECTOR_SCHEMA_PREPARATION set to `create_if_missing` or `require_absent`

use anyhow::{Context, Result};
use tracing::{error, info};
use utility_network_projector::{
    config::ProjectorConfig,
    projection::{ProjectionAdapter, RelationalProjection},
    sink::PostgresSink,
    subscriber::JetStreamEventSource,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting relational projector");

    let config = ProjectorConfig::from_env().context("Failed to load configuration")?;
    info!("Configuration loaded:");
    info!("  - NATS URL: {}", config.nats_url);
    info!("  - Stream: {} ({})", config.stream_name, config.subject_filter);
    info!("  - Schema: {} ({})", config.schema_name, config.schema_preparation);

    let database_url = config
        .database_url
        .clone()
        .context("DATABASE_URL not set")?;

    let sink = PostgresSink::connect(&database_url, config.bulk_batch_size)
        .await
        .context("Failed to connect to PostgreSQL")?;
    info!("Connected to PostgreSQL");

    let source = JetStreamEventSource::connect(&config)
        .await
        .context("Failed to connect to NATS")?;
    info!("Connected to NATS at {}", config.nats_url);

    let mut projection =
        RelationalProjection::new(config, sink).context("Invalid projector configuration")?;
    projection
        .health_check()
        .await
        .context("Relational sink health check failed")?;

    match source.run(&mut projection).await {
        Ok(stats) => {
            info!(
                "Event stream ended: {} received, {} projected, {} skipped",
                stats.received, stats.projected, stats.skipped
            );
        }
        Err(e) => {
            error!("Projector stopped: {}", e);
            return Err(e).context("Projection halted");
        }
    }

    let projection_stats = projection.stats();
    info!(
        "Projection stats: {} applied, {} ignored, {} sink writes, {} rows bulk loaded",
        projection_stats.events_applied,
        projection_stats.events_ignored,
        projection_stats.sink_writes,
        projection_stats.rows_bulk_loaded
    );

    Ok(())
}
