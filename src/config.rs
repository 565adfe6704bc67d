// Copyright (c) 2025 - Cowboy AI, Inc.

//! Projector configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{ProjectorError, ProjectorResult};

/// How schema objects are prepared at the replay → live transition.
///
/// Has no default. Callers choose whether a rerun against an already
/// populated schema succeeds or fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaPreparation {
    /// Create missing schema objects and empty the bulk-loaded tables
    CreateIfMissing,
    /// Fail the transition if the schema already exists
    RequireAbsent,
}

impl FromStr for SchemaPreparation {
    type Err = ProjectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "create_if_missing" => Ok(SchemaPreparation::CreateIfMissing),
            "require_absent" => Ok(SchemaPreparation::RequireAbsent),
            other => Err(ProjectorError::Configuration(format!(
                "Unknown schema preparation '{}' (expected create_if_missing or require_absent)",
                other
            ))),
        }
    }
}

impl fmt::Display for SchemaPreparation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaPreparation::CreateIfMissing => write!(f, "create_if_missing"),
            SchemaPreparation::RequireAbsent => write!(f, "require_absent"),
        }
    }
}

fn default_schema_name() -> String {
    "utility_network".to_string()
}

fn default_nats_url() -> String {
    "nats://localhost:4222".to_string()
}

fn default_stream_name() -> String {
    "UTILITY_NETWORK_EVENTS".to_string()
}

fn default_subject_filter() -> String {
    "utility_network.>".to_string()
}

fn default_bulk_batch_size() -> usize {
    5000
}

/// Largest batch whose widest table (three columns) stays within the 65535
/// bind parameters PostgreSQL accepts per statement
pub const MAX_BULK_BATCH_SIZE: usize = u16::MAX as usize / 3;

/// Configuration for the relational projector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectorConfig {
    /// Schema (namespace) scoping every table the projection writes
    #[serde(default = "default_schema_name")]
    pub schema_name: String,

    /// Schema preparation policy, must be chosen explicitly
    pub schema_preparation: SchemaPreparation,

    /// NATS server URL
    #[serde(default = "default_nats_url")]
    pub nats_url: String,

    /// JetStream stream holding the utility network events
    #[serde(default = "default_stream_name")]
    pub stream_name: String,

    /// Subject filter for the consumer
    #[serde(default = "default_subject_filter")]
    pub subject_filter: String,

    /// Connection string of the relational database
    #[serde(default)]
    pub database_url: Option<String>,

    /// Rows per statement when bulk loading
    #[serde(default = "default_bulk_batch_size")]
    pub bulk_batch_size: usize,
}

impl ProjectorConfig {
    /// Create a configuration with defaults for everything but the schema policy
    pub fn new(schema_preparation: SchemaPreparation) -> Self {
        Self {
            schema_name: default_schema_name(),
            schema_preparation,
            nats_url: default_nats_url(),
            stream_name: default_stream_name(),
            subject_filter: default_subject_filter(),
            database_url: None,
            bulk_batch_size: default_bulk_batch_size(),
        }
    }

    /// Set the schema name
    pub fn with_schema_name(mut self, schema_name: impl Into<String>) -> Self {
        self.schema_name = schema_name.into();
        self
    }

    /// Set the database URL
    pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = Some(database_url.into());
        self
    }

    /// Load configuration from environment variables
    ///
    /// `PROJECTOR_SCHEMA_PREPARATION` is required; everything else falls back
    /// to defaults.
    pub fn from_env() -> ProjectorResult<Self> {
        let schema_preparation = std::env::var("PROJECTOR_SCHEMA_PREPARATION")
            .map_err(|_| {
                ProjectorError::Configuration(
                    "PROJECTOR_SCHEMA_PREPARATION not set (create_if_missing | require_absent)"
                        .to_string(),
                )
            })?
            .parse()?;

        let mut config = Self::new(schema_preparation);

        if let Ok(schema_name) = std::env::var("PROJECTOR_SCHEMA") {
            config.schema_name = schema_name;
        }
        if let Ok(nats_url) = std::env::var("NATS_URL") {
            config.nats_url = nats_url;
        }
        if let Ok(stream_name) = std::env::var("NATS_STREAM") {
            config.stream_name = stream_name;
        }
        if let Ok(subject_filter) = std::env::var("NATS_SUBJECT") {
            config.subject_filter = subject_filter;
        }
        config.database_url = std::env::var("DATABASE_URL").ok();

        if let Ok(batch_size) = std::env::var("PROJECTOR_BULK_BATCH_SIZE") {
            config.bulk_batch_size = batch_size.parse().map_err(|e| {
                ProjectorError::Configuration(format!(
                    "Invalid PROJECTOR_BULK_BATCH_SIZE '{}': {}",
                    batch_size, e
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check values that would only fail later at the database
    pub fn validate(&self) -> ProjectorResult<()> {
        let valid_identifier = !self.schema_name.is_empty()
            && self
                .schema_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !self.schema_name.starts_with(|c: char| c.is_ascii_digit());

        if !valid_identifier {
            return Err(ProjectorError::Configuration(format!(
                "Invalid schema name '{}'",
                self.schema_name
            )));
        }

        if self.bulk_batch_size == 0 || self.bulk_batch_size > MAX_BULK_BATCH_SIZE {
            return Err(ProjectorError::Configuration(format!(
                "bulk_batch_size must be between 1 and {}, got {}",
                MAX_BULK_BATCH_SIZE, self.bulk_batch_size
            )));
        }

        Ok(())
    }
}
