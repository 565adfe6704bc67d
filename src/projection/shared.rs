// Copyright (c) 2025 - Cowboy AI, Inc.
//! Shared projection for hosts with concurrent delivery
//!
//! Cloneable handle around a [`RelationalProjection`] behind a tokio
//! mutex. Every event and the replay → live transition take the lock for
//! their whole duration, so no event runs while schema preparation or the
//! bulk export is in progress.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use super::dispatcher::DispatchOutcome;
use super::mode::ProjectionMode;
use super::relational::RelationalProjection;
use super::{ProjectionAdapter, ProjectionStats};
use crate::errors::{ProjectorError, ProjectorResult};
use crate::events::EventEnvelope;
use crate::sink::RelationalSink;

pub struct SharedProjection<S: RelationalSink> {
    inner: Arc<Mutex<RelationalProjection<S>>>,
}

impl<S: RelationalSink> Clone for SharedProjection<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: RelationalSink> SharedProjection<S> {
    pub fn new(projection: RelationalProjection<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(projection)),
        }
    }

    pub async fn apply(&self, envelope: &EventEnvelope) -> ProjectorResult<DispatchOutcome> {
        self.inner.lock().await.apply(envelope).await
    }

    pub async fn finish_replay(&self) -> ProjectorResult<()> {
        self.inner.lock().await.finish_replay().await
    }

    pub async fn mode(&self) -> ProjectionMode {
        self.inner.lock().await.mode()
    }

    pub async fn stats(&self) -> ProjectionStats {
        self.inner.lock().await.stats()
    }

    /// Exclusive access to the wrapped projection
    pub async fn lock(&self) -> MutexGuard<'_, RelationalProjection<S>> {
        self.inner.lock().await
    }
}

#[async_trait]
impl<S: RelationalSink> ProjectionAdapter for SharedProjection<S> {
    type Event = EventEnvelope;
    type Error = ProjectorError;

    async fn project(&mut self, event: Self::Event) -> Result<(), Self::Error> {
        self.apply(&event).await.map(|_| ())
    }

    async fn replay_finished(&mut self) -> Result<(), Self::Error> {
        self.finish_replay().await
    }

    async fn health_check(&self) -> Result<(), Self::Error> {
        self.inner.lock().await.health_check().await
    }

    fn name(&self) -> &str {
        "shared-relational-projection"
    }
}
