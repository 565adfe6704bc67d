// Copyright (c) 2025 - Cowboy AI, Inc.
//! Relational projection: mode controller and synchronizer
//!
//! Owns the mirror, the sink and the mode. Every handler mutates the
//! mirror the same way in both modes; only in [`ProjectionMode::Live`] does
//! it also issue the [`SinkWrite`]s the event implies. The mirror therefore
//! ends up identical for a given event sequence regardless of where the
//! replay → live boundary falls.
//!
//! # Transition
//!
//! [`RelationalProjection::finish_replay`] runs schema preparation, the
//! four bulk loads and the mode flip in order while holding `&mut self`, so
//! no event can be applied in between. If any step fails the mode stays
//! `Replaying` and the transition may be retried. A retry reuses the schema
//! the failed attempt prepared, emptying its tables instead of checking
//! that it is absent.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use super::dispatcher::{dispatch, DispatchOutcome, EventHandler};
use super::mode::{ModeSignal, ProjectionMode};
use super::{ProjectionAdapter, ProjectionStats};
use crate::config::{ProjectorConfig, SchemaPreparation};
use crate::errors::{ProjectorError, ProjectorResult};
use crate::events::*;
use crate::sink::{RelationalSink, RouteElementInterestRow, SinkWrite, TableRows};
use crate::state::{resolve_outer_diameter, ProjectorState};
use crate::state_machine::{StateMachine, StateMachineWithHistory, Transition};

/// Dual-mode projection of utility network events into a relational sink
pub struct RelationalProjection<S: RelationalSink> {
    config: ProjectorConfig,
    state: ProjectorState,
    mode: StateMachineWithHistory<ProjectionMode>,
    sink: S,
    stats: ProjectionStats,
    /// Set once `prepare_schema` has succeeded in this process
    schema_prepared: bool,
}

impl<S: RelationalSink> RelationalProjection<S> {
    /// Create a projection in `Replaying` mode with an empty mirror
    pub fn new(config: ProjectorConfig, sink: S) -> ProjectorResult<Self> {
        config.validate()?;

        Ok(Self {
            config,
            state: ProjectorState::new(),
            mode: StateMachineWithHistory::new(ProjectionMode::Replaying),
            sink,
            stats: ProjectionStats::default(),
            schema_prepared: false,
        })
    }

    pub fn mode(&self) -> ProjectionMode {
        *self.mode.current_state()
    }

    pub fn is_live(&self) -> bool {
        self.mode().is_live()
    }

    pub fn mode_history(&self) -> &[Transition<ProjectionMode, ModeSignal>] {
        self.mode.get_history()
    }

    pub fn state(&self) -> &ProjectorState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn stats(&self) -> ProjectionStats {
        self.stats
    }

    pub fn config(&self) -> &ProjectorConfig {
        &self.config
    }

    /// Apply one event envelope
    pub async fn apply(&mut self, envelope: &EventEnvelope) -> ProjectorResult<DispatchOutcome> {
        debug!(
            event_type = envelope.data.event_type_name(),
            global_version = envelope.global_version,
            mode = %self.mode(),
            "Applying event"
        );

        let outcome = dispatch(self, &envelope.data).await?;

        match outcome {
            DispatchOutcome::Handled => self.stats.events_applied += 1,
            DispatchOutcome::Ignored => {
                debug!(event_id = %envelope.event_id, "Ignoring unknown event type");
                self.stats.events_ignored += 1;
            }
        }
        self.stats.last_global_version = Some(envelope.global_version);

        Ok(outcome)
    }

    /// Run the replay → live transition
    ///
    /// Prepares the schema, bulk loads every table from the mirror and then
    /// flips the mode. A second call after reaching `Live` fails with
    /// [`ProjectorError::Transition`] without touching the sink.
    pub async fn finish_replay(&mut self) -> ProjectorResult<()> {
        self.mode.current_state().transition(&ModeSignal::ReplayFinished)?;

        let schema = self.config.schema_name.clone();

        let preparation = if self.schema_prepared {
            debug!("Reusing schema '{}' prepared by an earlier attempt", schema);
            SchemaPreparation::CreateIfMissing
        } else {
            self.config.schema_preparation
        };
        self.sink.prepare_schema(&schema, preparation).await?;
        self.schema_prepared = true;

        info!("Bulk write to tables in schema '{}' started", schema);

        let tables = [
            TableRows::RouteElementInterests(self.state.route_element_interest_rows()),
            TableRows::ServiceTerminations(self.state.service_termination_rows()),
            TableRows::Conduits(self.state.conduit_rows()?),
            TableRows::ConduitSlacks(self.state.conduit_slack_rows()),
        ];

        let mut rows_written = 0;
        for rows in tables {
            let table = rows.table();
            info!("Writing {} ({} rows)", table, rows.len());
            rows_written += self.sink.bulk_load(&schema, rows).await?;
        }

        self.mode
            .transition_with_history(ModeSignal::ReplayFinished, Utc::now())?;
        self.stats.rows_bulk_loaded = rows_written;

        info!(
            "Bulk write finished: {} rows, projection is live",
            rows_written
        );
        Ok(())
    }

    /// Issue sink writes, but only in live mode
    async fn write_live(&mut self, writes: Vec<SinkWrite>) -> ProjectorResult<()> {
        if !self.is_live() {
            return Ok(());
        }

        for write in writes {
            debug!(table = %write.table(), operation = write.operation(), "Sink write");
            self.sink.execute(&self.config.schema_name, write).await?;
            self.stats.sink_writes += 1;
        }
        Ok(())
    }

    fn interest_rows_write(&self, interest_id: uuid::Uuid) -> Option<SinkWrite> {
        let elements = self.state.interest(interest_id)?;
        Some(SinkWrite::InsertRouteElementInterests {
            interest_id,
            rows: RouteElementInterestRow::for_walk(interest_id, elements),
        })
    }
}

#[async_trait]
impl<S: RelationalSink> EventHandler for RelationalProjection<S> {
    async fn on_node_container_placed(
        &mut self,
        event: &NodeContainerPlacedInRouteNetwork,
    ) -> ProjectorResult<()> {
        let moved = self.state.process_node_container_added(&event.container);

        let writes = moved
            .into_iter()
            .flat_map(|termination| {
                [
                    SinkWrite::DeleteServiceTermination {
                        service_termination_id: termination.id,
                    },
                    SinkWrite::InsertServiceTermination(termination.to_row()),
                ]
            })
            .collect();
        self.write_live(writes).await
    }

    async fn on_node_container_removed(
        &mut self,
        event: &NodeContainerRemovedFromRouteNetwork,
    ) -> ProjectorResult<()> {
        let Some(removed) = self
            .state
            .process_node_container_removed(event.node_container_id)
        else {
            debug!("Node container {} not found", event.node_container_id);
            return Ok(());
        };

        let writes = removed
            .service_termination_ids
            .into_iter()
            .map(|service_termination_id| SinkWrite::DeleteServiceTermination {
                service_termination_id,
            })
            .collect();
        self.write_live(writes).await
    }

    async fn on_walk_of_interest_registered(
        &mut self,
        event: &WalkOfInterestRegistered,
    ) -> ProjectorResult<()> {
        let interest_id = event.interest.id;
        let replaced = self.state.process_walk_of_interest_added(&event.interest);

        let mut writes = Vec::with_capacity(2);
        if replaced {
            writes.push(SinkWrite::DeleteRouteElementInterests { interest_id });
        }
        writes.extend(self.interest_rows_write(interest_id));
        self.write_live(writes).await
    }

    async fn on_walk_of_interest_elements_modified(
        &mut self,
        event: &WalkOfInterestRouteNetworkElementsModified,
    ) -> ProjectorResult<()> {
        let interest_id = event.interest_id;
        if !self
            .state
            .process_walk_of_interest_updated(interest_id, &event.route_network_element_ids)
        {
            warn!("Elements modified on unknown interest {}", interest_id);
            return Ok(());
        }

        let mut writes = vec![SinkWrite::DeleteRouteElementInterests { interest_id }];
        writes.extend(self.interest_rows_write(interest_id));
        self.write_live(writes).await
    }

    async fn on_interest_unregistered(
        &mut self,
        event: &InterestUnregistered,
    ) -> ProjectorResult<()> {
        if !self.state.process_interest_removed(event.interest_id) {
            debug!("Interest {} not found", event.interest_id);
            return Ok(());
        }

        self.write_live(vec![SinkWrite::DeleteRouteElementInterests {
            interest_id: event.interest_id,
        }])
        .await
    }

    async fn on_span_equipment_placed(
        &mut self,
        event: &SpanEquipmentPlacedInRouteNetwork,
    ) -> ProjectorResult<()> {
        let equipment = &event.equipment;

        // Resolve before mutating so a broken chain leaves the mirror untouched
        let conduit = if self.is_live() && !equipment.is_cable {
            Some(self.state.conduit_row(equipment)?)
        } else {
            None
        };

        let previous = self.state.process_span_equipment_added(equipment);

        let mut writes = Vec::with_capacity(2);
        if previous.is_some_and(|previous| !previous.equipment.is_cable) {
            writes.push(SinkWrite::DeleteConduit {
                conduit_id: equipment.id,
            });
        }
        writes.extend(conduit.map(SinkWrite::InsertConduit));
        self.write_live(writes).await
    }

    async fn on_span_equipment_moved(&mut self, event: &SpanEquipmentMoved) -> ProjectorResult<()> {
        if !self.state.process_span_equipment_moved(event) {
            debug!("Span equipment {} not found", event.span_equipment_id);
        }
        Ok(())
    }

    async fn on_span_equipment_removed(
        &mut self,
        event: &SpanEquipmentRemoved,
    ) -> ProjectorResult<()> {
        let Some(removed) = self
            .state
            .process_span_equipment_removed(event.span_equipment_id)
        else {
            debug!("Span equipment {} not found", event.span_equipment_id);
            return Ok(());
        };

        if removed.equipment.is_cable {
            return Ok(());
        }

        self.write_live(vec![SinkWrite::DeleteConduit {
            conduit_id: event.span_equipment_id,
        }])
        .await
    }

    async fn on_span_equipment_affixed_to_parent(
        &mut self,
        event: &SpanEquipmentAffixedToParent,
    ) -> ProjectorResult<()> {
        if !self.state.process_span_equipment_affixed_to_parent(event) {
            debug!("Span equipment {} not found", event.span_equipment_id);
        }
        Ok(())
    }

    async fn on_span_equipment_detached_from_parent(
        &mut self,
        event: &SpanEquipmentDetachedFromParent,
    ) -> ProjectorResult<()> {
        if !self.state.process_span_equipment_detached_from_parent(event) {
            debug!("Span equipment {} not found", event.span_equipment_id);
        }
        Ok(())
    }

    async fn on_span_segments_connected(
        &mut self,
        event: &SpanSegmentsConnectedToSimpleTerminals,
    ) -> ProjectorResult<()> {
        if !self.state.process_span_equipment_connects(event) {
            debug!("Span equipment {} not found", event.span_equipment_id);
        }
        Ok(())
    }

    async fn on_span_segments_disconnected(
        &mut self,
        event: &SpanSegmentsDisconnectedFromTerminals,
    ) -> ProjectorResult<()> {
        if !self.state.process_span_equipment_disconnects(event) {
            debug!("Span equipment {} not found", event.span_equipment_id);
        }
        Ok(())
    }

    async fn on_span_equipment_specification_added(
        &mut self,
        event: &SpanEquipmentSpecificationAdded,
    ) -> ProjectorResult<()> {
        self.state
            .process_span_equipment_specification_added(&event.specification);
        Ok(())
    }

    async fn on_span_structure_specification_added(
        &mut self,
        event: &SpanStructureSpecificationAdded,
    ) -> ProjectorResult<()> {
        self.state
            .process_span_structure_specification_added(&event.specification);
        Ok(())
    }

    async fn on_span_equipment_specification_changed(
        &mut self,
        event: &SpanEquipmentSpecificationChanged,
    ) -> ProjectorResult<()> {
        let Some(current) = self.state.span_equipment(event.span_equipment_id) else {
            warn!(
                "Specification changed on unknown span equipment {}",
                event.span_equipment_id
            );
            return Ok(());
        };

        // Resolve before mutating so a broken chain leaves the mirror untouched
        let outer_diameter = if self.is_live() && !current.equipment.is_cable {
            Some(resolve_outer_diameter(
                self.state.specifications(),
                event.new_specification_id,
            )?)
        } else {
            None
        };

        self.state
            .process_span_equipment_specification_changed(event);

        let Some(outer_diameter) = outer_diameter else {
            return Ok(());
        };
        self.write_live(vec![SinkWrite::UpdateConduitDiameter {
            conduit_id: event.span_equipment_id,
            outer_diameter,
        }])
        .await
    }

    async fn on_terminal_equipment_specification_added(
        &mut self,
        event: &TerminalEquipmentSpecificationAdded,
    ) -> ProjectorResult<()> {
        self.state
            .process_terminal_equipment_specification_added(&event.specification);
        Ok(())
    }

    async fn on_terminal_equipment_placed(
        &mut self,
        event: &TerminalEquipmentPlacedInNodeContainer,
    ) -> ProjectorResult<()> {
        let placement = self.state.process_terminal_equipment_placed(event)?;

        let mut writes = Vec::with_capacity(2);
        if placement.replaced_service_termination {
            writes.push(SinkWrite::DeleteServiceTermination {
                service_termination_id: event.equipment.id,
            });
        }
        if let Some(termination) = &placement.service_termination {
            writes.push(SinkWrite::InsertServiceTermination(termination.to_row()));
        }
        self.write_live(writes).await
    }

    async fn on_terminal_equipment_naming_info_changed(
        &mut self,
        event: &TerminalEquipmentNamingInfoChanged,
    ) -> ProjectorResult<()> {
        let Some(termination) = self
            .state
            .process_terminal_equipment_naming_info_changed(event)
        else {
            return Ok(());
        };

        let write = SinkWrite::UpdateServiceTerminationName {
            service_termination_id: termination.id,
            name: termination.name.clone(),
        };
        self.write_live(vec![write]).await
    }

    async fn on_terminal_equipment_removed(
        &mut self,
        event: &TerminalEquipmentRemoved,
    ) -> ProjectorResult<()> {
        // Not projected: the removal is routed but leaves mirror and sink alone
        debug!(
            "Terminal equipment {} removed from node container {}, not projected",
            event.terminal_equipment_id, event.node_container_id
        );
        Ok(())
    }
}

#[async_trait]
impl<S: RelationalSink> ProjectionAdapter for RelationalProjection<S> {
    type Event = EventEnvelope;
    type Error = ProjectorError;

    async fn project(&mut self, event: Self::Event) -> Result<(), Self::Error> {
        self.apply(&event).await.map(|_| ())
    }

    async fn replay_finished(&mut self) -> Result<(), Self::Error> {
        self.finish_replay().await
    }

    async fn health_check(&self) -> Result<(), Self::Error> {
        self.sink.health_check().await.map_err(ProjectorError::from)
    }

    fn name(&self) -> &str {
        "relational-projection"
    }
}
