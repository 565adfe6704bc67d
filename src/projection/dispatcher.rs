// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event Dispatcher
//!
//! Routes an event to exactly one handler method selected by its variant.
//! The match is exhaustive, so adding a variant to
//! [`UtilityNetworkEvent`] without a handler does not compile. Events of a
//! type this crate does not know are reported as
//! [`DispatchOutcome::Ignored`] and never reach a handler.

use async_trait::async_trait;

use crate::errors::ProjectorResult;
use crate::events::*;

/// Whether a handler ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled,
    Ignored,
}

/// One handler per event variant
#[async_trait]
pub trait EventHandler: Send {
    async fn on_node_container_placed(
        &mut self,
        event: &NodeContainerPlacedInRouteNetwork,
    ) -> ProjectorResult<()>;

    async fn on_node_container_removed(
        &mut self,
        event: &NodeContainerRemovedFromRouteNetwork,
    ) -> ProjectorResult<()>;

    async fn on_walk_of_interest_registered(
        &mut self,
        event: &WalkOfInterestRegistered,
    ) -> ProjectorResult<()>;

    async fn on_walk_of_interest_elements_modified(
        &mut self,
        event: &WalkOfInterestRouteNetworkElementsModified,
    ) -> ProjectorResult<()>;

    async fn on_interest_unregistered(&mut self, event: &InterestUnregistered)
        -> ProjectorResult<()>;

    async fn on_span_equipment_placed(
        &mut self,
        event: &SpanEquipmentPlacedInRouteNetwork,
    ) -> ProjectorResult<()>;

    async fn on_span_equipment_moved(&mut self, event: &SpanEquipmentMoved) -> ProjectorResult<()>;

    async fn on_span_equipment_removed(
        &mut self,
        event: &SpanEquipmentRemoved,
    ) -> ProjectorResult<()>;

    async fn on_span_equipment_affixed_to_parent(
        &mut self,
        event: &SpanEquipmentAffixedToParent,
    ) -> ProjectorResult<()>;

    async fn on_span_equipment_detached_from_parent(
        &mut self,
        event: &SpanEquipmentDetachedFromParent,
    ) -> ProjectorResult<()>;

    async fn on_span_segments_connected(
        &mut self,
        event: &SpanSegmentsConnectedToSimpleTerminals,
    ) -> ProjectorResult<()>;

    async fn on_span_segments_disconnected(
        &mut self,
        event: &SpanSegmentsDisconnectedFromTerminals,
    ) -> ProjectorResult<()>;

    async fn on_span_equipment_specification_added(
        &mut self,
        event: &SpanEquipmentSpecificationAdded,
    ) -> ProjectorResult<()>;

    async fn on_span_structure_specification_added(
        &mut self,
        event: &SpanStructureSpecificationAdded,
    ) -> ProjectorResult<()>;

    async fn on_span_equipment_specification_changed(
        &mut self,
        event: &SpanEquipmentSpecificationChanged,
    ) -> ProjectorResult<()>;

    async fn on_terminal_equipment_specification_added(
        &mut self,
        event: &TerminalEquipmentSpecificationAdded,
    ) -> ProjectorResult<()>;

    async fn on_terminal_equipment_placed(
        &mut self,
        event: &TerminalEquipmentPlacedInNodeContainer,
    ) -> ProjectorResult<()>;

    async fn on_terminal_equipment_naming_info_changed(
        &mut self,
        event: &TerminalEquipmentNamingInfoChanged,
    ) -> ProjectorResult<()>;

    async fn on_terminal_equipment_removed(
        &mut self,
        event: &TerminalEquipmentRemoved,
    ) -> ProjectorResult<()>;
}

/// Route an event to its handler
pub async fn dispatch<H>(handler: &mut H, event: &UtilityNetworkEvent) -> ProjectorResult<DispatchOutcome>
where
    H: EventHandler + ?Sized,
{
    use UtilityNetworkEvent as E;

    match event {
        E::NodeContainerPlacedInRouteNetwork(e) => handler.on_node_container_placed(e).await?,
        E::NodeContainerRemovedFromRouteNetwork(e) => handler.on_node_container_removed(e).await?,
        E::WalkOfInterestRegistered(e) => handler.on_walk_of_interest_registered(e).await?,
        E::WalkOfInterestRouteNetworkElementsModified(e) => {
            handler.on_walk_of_interest_elements_modified(e).await?
        }
        E::InterestUnregistered(e) => handler.on_interest_unregistered(e).await?,
        E::SpanEquipmentPlacedInRouteNetwork(e) => handler.on_span_equipment_placed(e).await?,
        E::SpanEquipmentMoved(e) => handler.on_span_equipment_moved(e).await?,
        E::SpanEquipmentRemoved(e) => handler.on_span_equipment_removed(e).await?,
        E::SpanEquipmentAffixedToParent(e) => {
            handler.on_span_equipment_affixed_to_parent(e).await?
        }
        E::SpanEquipmentDetachedFromParent(e) => {
            handler.on_span_equipment_detached_from_parent(e).await?
        }
        E::SpanSegmentsConnectedToSimpleTerminals(e) => {
            handler.on_span_segments_connected(e).await?
        }
        E::SpanSegmentsDisconnectedFromTerminals(e) => {
            handler.on_span_segments_disconnected(e).await?
        }
        E::SpanEquipmentSpecificationAdded(e) => {
            handler.on_span_equipment_specification_added(e).await?
        }
        E::SpanStructureSpecificationAdded(e) => {
            handler.on_span_structure_specification_added(e).await?
        }
        E::SpanEquipmentSpecificationChanged(e) => {
            handler.on_span_equipment_specification_changed(e).await?
        }
        E::TerminalEquipmentSpecificationAdded(e) => {
            handler.on_terminal_equipment_specification_added(e).await?
        }
        E::TerminalEquipmentPlacedInNodeContainer(e) => {
            handler.on_terminal_equipment_placed(e).await?
        }
        E::TerminalEquipmentNamingInfoChanged(e) => {
            handler.on_terminal_equipment_naming_info_changed(e).await?
        }
        E::TerminalEquipmentRemoved(e) => handler.on_terminal_equipment_removed(e).await?,
        E::Unknown => return Ok(DispatchOutcome::Ignored),
    }

    Ok(DispatchOutcome::Handled)
}
