// Copyright (c) 2025 - Cowboy AI, Inc.
//! State Mirror
//!
//! In-memory, id-indexed materialization of every entity the relational
//! projection cares about. It is built and mutated only by event
//! application and is the single source of truth for "current domain state
//! as seen by the projection":
//!
//! - during replay it is the *only* thing updated
//! - at the replay → live transition it is exported table by table
//! - in live mode it is consulted to decide which targeted write to issue
//!
//! # Idempotency
//!
//! Every `process_*` method consumes one event instance and can be applied
//! twice without corrupting the mirror: re-adding an id overwrites, removing
//! an absent id is a no-op.
//!
//! # Derived values
//!
//! A conduit's outer diameter is resolved through the
//! [`SpecificationRegistry`] whenever it is needed (see [`export`]) and
//! never cached on the span equipment, because a specification change can
//! repoint the chain at any time.

pub mod export;
pub mod specifications;

use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    remove_duplicated_ids, NodeContainer, RouteNetworkElementIdList, SpanEquipment,
    SpanEquipmentSpecification, SpanSegmentEnd, SpanStructureSpecification,
    TerminalEquipment, TerminalEquipmentSpecification, WalkOfInterest,
};
use crate::errors::ProjectorResult;
use crate::events::{
    SpanEquipmentAffixedToParent, SpanEquipmentDetachedFromParent, SpanEquipmentMoved,
    SpanEquipmentSpecificationChanged, SpanSegmentsConnectedToSimpleTerminals,
    SpanSegmentsDisconnectedFromTerminals, TerminalEquipmentNamingInfoChanged,
    TerminalEquipmentPlacedInNodeContainer,
};

pub use specifications::{resolve_outer_diameter, SpecificationRegistry};

/// Terminals attached to the two ends of one span segment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentConnections {
    pub from_terminal_id: Option<Uuid>,
    pub to_terminal_id: Option<Uuid>,
}

impl SegmentConnections {
    pub fn terminal_at(&self, end: SpanSegmentEnd) -> Option<Uuid> {
        match end {
            SpanSegmentEnd::From => self.from_terminal_id,
            SpanSegmentEnd::To => self.to_terminal_id,
        }
    }

    fn is_empty(&self) -> bool {
        self.from_terminal_id.is_none() && self.to_terminal_id.is_none()
    }
}

/// Span equipment plus the connectivity of its segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanEquipmentState {
    pub equipment: SpanEquipment,
    pub segment_connections: BTreeMap<Uuid, SegmentConnections>,
}

impl SpanEquipmentState {
    /// Whether any segment is attached to a terminal at the given end
    pub fn is_connected_at(&self, end: SpanSegmentEnd) -> bool {
        self.segment_connections
            .values()
            .any(|connections| connections.terminal_at(end).is_some())
    }
}

/// Terminal equipment and the container it sits in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalEquipmentState {
    pub equipment: TerminalEquipment,
    pub node_container_id: Uuid,
}

/// Customer service termination derived from placed terminal equipment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTerminationState {
    pub id: Uuid,
    pub name: Option<String>,
    pub route_node_id: Uuid,
    pub node_container_id: Uuid,
}

/// What removing a node container took with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedNodeContainer {
    pub container: NodeContainer,
    pub service_termination_ids: Vec<Uuid>,
}

/// Result of placing terminal equipment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalEquipmentPlacement {
    /// Service termination the placement yields, if any
    pub service_termination: Option<ServiceTerminationState>,
    /// A service termination with the same id existed before the placement
    pub replaced_service_termination: bool,
}

/// The projection's in-memory mirror of domain state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectorState {
    node_containers: BTreeMap<Uuid, NodeContainer>,
    interests: BTreeMap<Uuid, RouteNetworkElementIdList>,
    span_equipments: BTreeMap<Uuid, SpanEquipmentState>,
    terminal_equipments: BTreeMap<Uuid, TerminalEquipmentState>,
    service_terminations: BTreeMap<Uuid, ServiceTerminationState>,
    specifications: SpecificationRegistry,
}

impl ProjectorState {
    pub fn new() -> Self {
        Self::default()
    }

    // Node containers

    /// Add (or re-place) a container. Service terminations already in it
    /// follow it to its route node; the ones that moved are returned.
    pub fn process_node_container_added(
        &mut self,
        container: &NodeContainer,
    ) -> Vec<ServiceTerminationState> {
        self.node_containers.insert(container.id, container.clone());

        self.service_terminations
            .values_mut()
            .filter(|termination| {
                termination.node_container_id == container.id
                    && termination.route_node_id != container.route_node_id
            })
            .map(|termination| {
                termination.route_node_id = container.route_node_id;
                termination.clone()
            })
            .collect()
    }

    /// Remove a container together with the terminal equipment placed in it
    pub fn process_node_container_removed(
        &mut self,
        node_container_id: Uuid,
    ) -> Option<RemovedNodeContainer> {
        let container = self.node_containers.remove(&node_container_id)?;

        self.terminal_equipments
            .retain(|_, terminal| terminal.node_container_id != node_container_id);

        let service_termination_ids: Vec<Uuid> = self
            .service_terminations
            .values()
            .filter(|termination| termination.node_container_id == node_container_id)
            .map(|termination| termination.id)
            .collect();

        for id in &service_termination_ids {
            self.service_terminations.remove(id);
        }

        Some(RemovedNodeContainer {
            container,
            service_termination_ids,
        })
    }

    pub fn node_container(&self, id: Uuid) -> Option<&NodeContainer> {
        self.node_containers.get(&id)
    }

    // Interests

    /// Register a walk, deduplicating its elements. Returns true if an
    /// interest with the same id was replaced.
    pub fn process_walk_of_interest_added(&mut self, interest: &WalkOfInterest) -> bool {
        self.interests
            .insert(
                interest.id,
                remove_duplicated_ids(&interest.route_network_element_refs),
            )
            .is_some()
    }

    /// Replace the elements of a known walk. Returns false if the interest is unknown.
    pub fn process_walk_of_interest_updated(
        &mut self,
        interest_id: Uuid,
        route_network_element_ids: &[Uuid],
    ) -> bool {
        match self.interests.get_mut(&interest_id) {
            Some(elements) => {
                *elements = remove_duplicated_ids(route_network_element_ids);
                true
            }
            None => false,
        }
    }

    pub fn process_interest_removed(&mut self, interest_id: Uuid) -> bool {
        self.interests.remove(&interest_id).is_some()
    }

    /// Deduplicated elements of an interest
    pub fn interest(&self, interest_id: Uuid) -> Option<&[Uuid]> {
        self.interests.get(&interest_id).map(Vec::as_slice)
    }

    // Span equipment

    /// Add (or overwrite) a span equipment. Returns the state it replaced.
    pub fn process_span_equipment_added(
        &mut self,
        equipment: &SpanEquipment,
    ) -> Option<SpanEquipmentState> {
        self.span_equipments.insert(
            equipment.id,
            SpanEquipmentState {
                equipment: equipment.clone(),
                segment_connections: BTreeMap::new(),
            },
        )
    }

    pub fn process_span_equipment_moved(&mut self, event: &SpanEquipmentMoved) -> bool {
        match self.span_equipments.get_mut(&event.span_equipment_id) {
            Some(state) => {
                state.equipment.node_of_interest_ids = event.node_of_interest_ids.clone();
                true
            }
            None => false,
        }
    }

    pub fn process_span_equipment_removed(
        &mut self,
        span_equipment_id: Uuid,
    ) -> Option<SpanEquipmentState> {
        self.span_equipments.remove(&span_equipment_id)
    }

    pub fn process_span_equipment_affixed_to_parent(
        &mut self,
        event: &SpanEquipmentAffixedToParent,
    ) -> bool {
        let Some(state) = self.span_equipments.get_mut(&event.span_equipment_id) else {
            return false;
        };

        let affixes = &mut state.equipment.parent_affixes;
        affixes.retain(|affix| affix.parent_id != event.parent.parent_id);
        affixes.push(event.parent.clone());
        true
    }

    pub fn process_span_equipment_detached_from_parent(
        &mut self,
        event: &SpanEquipmentDetachedFromParent,
    ) -> bool {
        let Some(state) = self.span_equipments.get_mut(&event.span_equipment_id) else {
            return false;
        };

        state
            .equipment
            .parent_affixes
            .retain(|affix| affix.parent_id != event.parent_id);
        true
    }

    pub fn process_span_equipment_connects(
        &mut self,
        event: &SpanSegmentsConnectedToSimpleTerminals,
    ) -> bool {
        let Some(state) = self.span_equipments.get_mut(&event.span_equipment_id) else {
            return false;
        };

        for connect in &event.connects {
            let connections = state
                .segment_connections
                .entry(connect.segment_id)
                .or_default();

            match connect.end {
                SpanSegmentEnd::From => connections.from_terminal_id = Some(connect.terminal_id),
                SpanSegmentEnd::To => connections.to_terminal_id = Some(connect.terminal_id),
            }
        }
        true
    }

    pub fn process_span_equipment_disconnects(
        &mut self,
        event: &SpanSegmentsDisconnectedFromTerminals,
    ) -> bool {
        let Some(state) = self.span_equipments.get_mut(&event.span_equipment_id) else {
            return false;
        };

        for disconnect in &event.disconnects {
            let Some(connections) = state.segment_connections.get_mut(&disconnect.segment_id)
            else {
                continue;
            };

            if connections.from_terminal_id == Some(disconnect.terminal_id) {
                connections.from_terminal_id = None;
            }
            if connections.to_terminal_id == Some(disconnect.terminal_id) {
                connections.to_terminal_id = None;
            }
            if connections.is_empty() {
                state.segment_connections.remove(&disconnect.segment_id);
            }
        }
        true
    }

    /// Repoint a span equipment to another specification. Returns the
    /// updated equipment, or None if it is unknown.
    pub fn process_span_equipment_specification_changed(
        &mut self,
        event: &SpanEquipmentSpecificationChanged,
    ) -> Option<&SpanEquipment> {
        let state = self.span_equipments.get_mut(&event.span_equipment_id)?;
        state.equipment.specification_id = event.new_specification_id;
        Some(&state.equipment)
    }

    pub fn span_equipment(&self, span_equipment_id: Uuid) -> Option<&SpanEquipmentState> {
        self.span_equipments.get(&span_equipment_id)
    }

    // Specifications

    pub fn process_span_equipment_specification_added(
        &mut self,
        specification: &SpanEquipmentSpecification,
    ) {
        self.specifications
            .add_span_equipment_specification(specification.clone());
    }

    pub fn process_span_structure_specification_added(
        &mut self,
        specification: &SpanStructureSpecification,
    ) {
        self.specifications
            .add_span_structure_specification(specification.clone());
    }

    pub fn process_terminal_equipment_specification_added(
        &mut self,
        specification: &TerminalEquipmentSpecification,
    ) {
        self.specifications
            .add_terminal_equipment_specification(specification.clone());
    }

    pub fn specifications(&self) -> &SpecificationRegistry {
        &self.specifications
    }

    // Terminal equipment

    /// Place terminal equipment in a container.
    ///
    /// Equipment whose specification is a customer termination yields a
    /// service termination located at the container's route node. Placing
    /// into an unknown container is a no-op; an unknown specification is
    /// fatal.
    pub fn process_terminal_equipment_placed(
        &mut self,
        event: &TerminalEquipmentPlacedInNodeContainer,
    ) -> ProjectorResult<TerminalEquipmentPlacement> {
        let is_customer_termination = self
            .specifications
            .terminal_equipment_specification(event.equipment.specification_id)?
            .is_customer_termination;

        let Some(container) = self.node_containers.get(&event.node_container_id) else {
            debug!(
                "Terminal equipment {} placed in unknown node container {}",
                event.equipment.id, event.node_container_id
            );
            return Ok(TerminalEquipmentPlacement::default());
        };
        let route_node_id = container.route_node_id;

        self.terminal_equipments.insert(
            event.equipment.id,
            TerminalEquipmentState {
                equipment: event.equipment.clone(),
                node_container_id: event.node_container_id,
            },
        );

        let previous = self.service_terminations.remove(&event.equipment.id);

        let service_termination = is_customer_termination.then(|| ServiceTerminationState {
            id: event.equipment.id,
            name: event.equipment.naming_info.name.clone(),
            route_node_id,
            node_container_id: event.node_container_id,
        });

        if let Some(termination) = &service_termination {
            self.service_terminations
                .insert(termination.id, termination.clone());
        }

        Ok(TerminalEquipmentPlacement {
            service_termination,
            replaced_service_termination: previous.is_some(),
        })
    }

    /// Rename terminal equipment. Returns the service termination it
    /// renamed, if the equipment is one.
    pub fn process_terminal_equipment_naming_info_changed(
        &mut self,
        event: &TerminalEquipmentNamingInfoChanged,
    ) -> Option<&ServiceTerminationState> {
        let terminal = self.terminal_equipments.get_mut(&event.terminal_equipment_id)?;
        terminal.equipment.naming_info = event.naming_info.clone();

        let termination = self
            .service_terminations
            .get_mut(&event.terminal_equipment_id)?;
        termination.name = event.naming_info.name.clone();
        Some(termination)
    }

    pub fn terminal_equipment(&self, id: Uuid) -> Option<&TerminalEquipmentState> {
        self.terminal_equipments.get(&id)
    }

    pub fn service_termination(&self, id: Uuid) -> Option<&ServiceTerminationState> {
        self.service_terminations.get(&id)
    }
}
