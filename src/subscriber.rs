// Copyright (c) 2025 - Cowboy AI, Inc.

//! JetStream event source
//!
//! Feeds a [`ProjectionAdapter`] from a NATS JetStream stream:
//!
//! 1. Reads the stream's last sequence number at start.
//! 2. Replays the stream from the first message with an ordered consumer.
//! 3. Signals `replay_finished` once the recorded sequence has been
//!    delivered, or straight away when there is nothing to replay.
//! 4. Keeps following the stream live.
//!
//! Ordered consumers are ack-less, so nothing is acknowledged. A message
//! that cannot be decoded is logged and skipped; a fatal projection error
//! stops the source.
//!
//! # Example
//!
//! ```rust,no_run
//! use utility_network_projector::config::{ProjectorConfig, SchemaPreparation};
//! use utility_network_projector::projection::RelationalProjection;
//! use utility_network_projector::sink::InMemorySink;
//! use utility_network_projector::subscriber::JetStreamEventSource;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProjectorConfig::new(SchemaPreparation::CreateIfMissing);
//!     let source = JetStreamEventSource::connect(&config).await?;
//!
//!     let mut projection = RelationalProjection::new(config, InMemorySink::new())?;
//!     source.run(&mut projection).await?;
//!
//!     Ok(())
//! }
//! ```

use async_nats::jetstream::{self, consumer::DeliverPolicy};
use futures::StreamExt;
use tracing::{debug, error, info, warn};

use crate::config::ProjectorConfig;
use crate::errors::{ProjectorError, ProjectorResult};
use crate::events::EventEnvelope;
use crate::projection::ProjectionAdapter;

/// Where the source stands relative to the end of the replay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplayProgress {
    /// Replaying up to and including this stream sequence
    Replaying { last_sequence: u64 },
    /// Backlog delivered, `replay_finished` not yet signalled
    Due,
    Signalled,
}

/// Detects when the backlog recorded at start has been delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayTracker {
    progress: ReplayProgress,
}

impl ReplayTracker {
    /// `last_sequence` is the stream's last sequence at start, `pending`
    /// the number of messages the consumer has yet to deliver.
    pub fn new(last_sequence: u64, pending: u64) -> Self {
        let progress = if last_sequence == 0 || pending == 0 {
            ReplayProgress::Due
        } else {
            ReplayProgress::Replaying { last_sequence }
        };
        Self { progress }
    }

    /// Record a delivered message
    pub fn observe(&mut self, stream_sequence: u64, pending: u64) {
        if let ReplayProgress::Replaying { last_sequence } = self.progress {
            if stream_sequence >= last_sequence || pending == 0 {
                self.progress = ReplayProgress::Due;
            }
        }
    }

    /// True exactly once: when the replay has just been caught up
    pub fn take_due(&mut self) -> bool {
        if self.progress == ReplayProgress::Due {
            self.progress = ReplayProgress::Signalled;
            return true;
        }
        false
    }

    pub fn is_signalled(&self) -> bool {
        self.progress == ReplayProgress::Signalled
    }
}

/// Counters kept while consuming
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriberStats {
    pub received: u64,
    pub projected: u64,
    pub skipped: u64,
}

/// Replays and follows a JetStream stream into a projection
pub struct JetStreamEventSource {
    jetstream: jetstream::Context,
    stream_name: String,
    subject_filter: String,
}

impl JetStreamEventSource {
    pub fn new(client: async_nats::Client, config: &ProjectorConfig) -> Self {
        Self {
            jetstream: jetstream::new(client),
            stream_name: config.stream_name.clone(),
            subject_filter: config.subject_filter.clone(),
        }
    }

    /// Connect to the NATS server named in the configuration
    pub async fn connect(config: &ProjectorConfig) -> ProjectorResult<Self> {
        let client = async_nats::connect(&config.nats_url)
            .await
            .map_err(|e| ProjectorError::Nats(e.to_string()))?;

        Ok(Self::new(client, config))
    }

    /// Consume until the stream ends or the projection fails fatally
    pub async fn run<P>(&self, projection: &mut P) -> ProjectorResult<SubscriberStats>
    where
        P: ProjectionAdapter<Event = EventEnvelope, Error = ProjectorError>,
    {
        let mut stream = self
            .jetstream
            .get_stream(&self.stream_name)
            .await
            .map_err(|e| ProjectorError::Nats(e.to_string()))?;

        let last_sequence = stream
            .info()
            .await
            .map_err(|e| ProjectorError::Nats(e.to_string()))?
            .state
            .last_sequence;

        let consumer = stream
            .create_consumer(jetstream::consumer::pull::OrderedConfig {
                filter_subject: self.subject_filter.clone(),
                deliver_policy: DeliverPolicy::All,
                ..Default::default()
            })
            .await
            .map_err(|e| ProjectorError::Nats(e.to_string()))?;

        let pending = consumer.cached_info().num_pending;
        info!(
            "Replaying stream '{}' up to sequence {} ({} pending for '{}')",
            self.stream_name, last_sequence, pending, self.subject_filter
        );

        let mut tracker = ReplayTracker::new(last_sequence, pending);
        let mut stats = SubscriberStats::default();

        if tracker.take_due() {
            info!("Nothing to replay");
            projection.replay_finished().await?;
        }

        let messages = consumer
            .messages()
            .await
            .map_err(|e| ProjectorError::Nats(e.to_string()))?;
        tokio::pin!(messages);

        while let Some(message) = messages.next().await {
            let message = message.map_err(|e| ProjectorError::Nats(e.to_string()))?;
            stats.received += 1;

            let (stream_sequence, pending) = match message.info() {
                Ok(info) => (info.stream_sequence, info.pending),
                Err(e) => return Err(ProjectorError::Nats(e.to_string())),
            };

            match serde_json::from_slice::<EventEnvelope>(&message.payload) {
                Ok(envelope) => {
                    debug!(
                        "Received {} at stream sequence {}",
                        envelope.data.event_type_name(),
                        stream_sequence
                    );
                    if let Err(e) = projection.project(envelope).await {
                        if e.is_fatal() {
                            error!("Projection halted at stream sequence {}: {}", stream_sequence, e);
                            return Err(e);
                        }
                        warn!("Skipping event at stream sequence {}: {}", stream_sequence, e);
                        stats.skipped += 1;
                    } else {
                        stats.projected += 1;
                    }
                }
                Err(e) => {
                    warn!(
                        "Skipping undecodable message at stream sequence {}: {}",
                        stream_sequence, e
                    );
                    stats.skipped += 1;
                }
            }

            tracker.observe(stream_sequence, pending);
            if tracker.take_due() {
                info!(
                    "Replay caught up at stream sequence {} after {} messages",
                    stream_sequence, stats.received
                );
                projection.replay_finished().await?;
            }
        }

        warn!("Message stream ended");
        Ok(stats)
    }
}
