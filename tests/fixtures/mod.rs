// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for utility-network-projector
//!
//! Deterministic ids and event builders shared by the integration tests.
//! All UUIDs are fixed constants so failures are reproducible.
#![allow(dead_code)]

use uuid::Uuid;

use utility_network_projector::config::{ProjectorConfig, SchemaPreparation};
use utility_network_projector::domain::*;
use utility_network_projector::events::*;
use utility_network_projector::projection::RelationalProjection;
use utility_network_projector::sink::InMemorySink;

pub const SCHEMA: &str = "utility_network";

// Route network elements
pub const ELEMENT_A: &str = "01934f4a-0a00-7000-8000-00000000000a";
pub const ELEMENT_B: &str = "01934f4a-0b00-7000-8000-00000000000b";
pub const ELEMENT_C: &str = "01934f4a-0c00-7000-8000-00000000000c";
pub const ROUTE_NODE_1: &str = "01934f4a-1001-7000-8000-000000001001";
pub const ROUTE_NODE_2: &str = "01934f4a-1002-7000-8000-000000001002";
pub const ROUTE_NODE_3: &str = "01934f4a-1003-7000-8000-000000001003";

// Interests
pub const INTEREST_1: &str = "01934f4a-2001-7000-8000-000000002001";
pub const INTEREST_2: &str = "01934f4a-2002-7000-8000-000000002002";

// Specifications
pub const STRUCTURE_SPEC_40: &str = "01934f4a-3040-7000-8000-000000003040";
pub const STRUCTURE_SPEC_50: &str = "01934f4a-3050-7000-8000-000000003050";
pub const EQUIPMENT_SPEC_1: &str = "01934f4a-3101-7000-8000-000000003101";
pub const EQUIPMENT_SPEC_2: &str = "01934f4a-3102-7000-8000-000000003102";
pub const CUSTOMER_TERMINAL_SPEC: &str = "01934f4a-3201-7000-8000-000000003201";
pub const RACK_TERMINAL_SPEC: &str = "01934f4a-3202-7000-8000-000000003202";

// Equipment
pub const CONDUIT_X: &str = "01934f4a-4001-7000-8000-000000004001";
pub const CABLE_Y: &str = "01934f4a-4002-7000-8000-000000004002";
pub const SEGMENT_1: &str = "01934f4a-4101-7000-8000-000000004101";
pub const NODE_CONTAINER_1: &str = "01934f4a-5001-7000-8000-000000005001";
pub const TERMINAL_1: &str = "01934f4a-6001-7000-8000-000000006001";
pub const TERMINAL_2: &str = "01934f4a-6002-7000-8000-000000006002";

/// Parse a fixed UUID from a constant string
pub fn parse_uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).expect("Invalid UUID in test fixture")
}

pub fn ids(values: &[&str]) -> Vec<Uuid> {
    values.iter().map(|value| parse_uuid(value)).collect()
}

pub fn projection(preparation: SchemaPreparation) -> RelationalProjection<InMemorySink> {
    let config = ProjectorConfig::new(preparation).with_schema_name(SCHEMA);
    RelationalProjection::new(config, InMemorySink::new()).expect("Invalid test configuration")
}

/// Apply events in order, numbering envelopes from 1
pub async fn apply_all(
    projection: &mut RelationalProjection<InMemorySink>,
    events: impl IntoIterator<Item = UtilityNetworkEvent>,
) {
    for (n, event) in events.into_iter().enumerate() {
        projection
            .apply(&EventEnvelope::new(n as u64 + 1, event))
            .await
            .expect("Failed to apply event");
    }
}

// Catalog

pub fn structure_spec_added(id: &str, outer_diameter: u32) -> UtilityNetworkEvent {
    SpanStructureSpecificationAdded {
        specification: SpanStructureSpecification {
            id: parse_uuid(id),
            name: format!("Ø{}", outer_diameter),
            outer_diameter,
        },
    }
    .into()
}

pub fn equipment_spec_added(id: &str, structure_id: &str) -> UtilityNetworkEvent {
    SpanEquipmentSpecificationAdded {
        specification: SpanEquipmentSpecification {
            id: parse_uuid(id),
            name: "Multi conduit".to_string(),
            root_template: SpanStructureTemplate {
                span_structure_specification_id: parse_uuid(structure_id),
            },
        },
    }
    .into()
}

pub fn terminal_spec_added(id: &str, is_customer_termination: bool) -> UtilityNetworkEvent {
    TerminalEquipmentSpecificationAdded {
        specification: TerminalEquipmentSpecification {
            id: parse_uuid(id),
            name: "Terminal".to_string(),
            is_customer_termination,
        },
    }
    .into()
}

/// Ø40 and Ø50 structures, one equipment spec for each, both terminal kinds
pub fn catalog() -> Vec<UtilityNetworkEvent> {
    vec![
        structure_spec_added(STRUCTURE_SPEC_40, 40),
        structure_spec_added(STRUCTURE_SPEC_50, 50),
        equipment_spec_added(EQUIPMENT_SPEC_1, STRUCTURE_SPEC_40),
        equipment_spec_added(EQUIPMENT_SPEC_2, STRUCTURE_SPEC_50),
        terminal_spec_added(CUSTOMER_TERMINAL_SPEC, true),
        terminal_spec_added(RACK_TERMINAL_SPEC, false),
    ]
}

// Interests

pub fn interest_registered(id: &str, elements: &[&str]) -> UtilityNetworkEvent {
    WalkOfInterestRegistered {
        interest: WalkOfInterest {
            id: parse_uuid(id),
            route_network_element_refs: ids(elements),
        },
    }
    .into()
}

pub fn interest_modified(id: &str, elements: &[&str]) -> UtilityNetworkEvent {
    WalkOfInterestRouteNetworkElementsModified {
        interest_id: parse_uuid(id),
        route_network_element_ids: ids(elements),
    }
    .into()
}

pub fn interest_unregistered(id: &str) -> UtilityNetworkEvent {
    InterestUnregistered {
        interest_id: parse_uuid(id),
    }
    .into()
}

// Span equipment

pub fn span_equipment(id: &str, specification_id: &str, is_cable: bool) -> SpanEquipment {
    SpanEquipment {
        id: parse_uuid(id),
        specification_id: parse_uuid(specification_id),
        walk_of_interest_id: parse_uuid(INTEREST_1),
        node_of_interest_ids: ids(&[ROUTE_NODE_1, ROUTE_NODE_2]),
        is_cable,
        name: None,
        parent_affixes: Vec::new(),
    }
}

pub fn span_equipment_placed(id: &str, specification_id: &str, is_cable: bool) -> UtilityNetworkEvent {
    SpanEquipmentPlacedInRouteNetwork {
        equipment: span_equipment(id, specification_id, is_cable),
    }
    .into()
}

pub fn span_equipment_removed(id: &str) -> UtilityNetworkEvent {
    SpanEquipmentRemoved {
        span_equipment_id: parse_uuid(id),
    }
    .into()
}

pub fn specification_changed(id: &str, new_specification_id: &str) -> UtilityNetworkEvent {
    SpanEquipmentSpecificationChanged {
        span_equipment_id: parse_uuid(id),
        new_specification_id: parse_uuid(new_specification_id),
    }
    .into()
}

pub fn span_equipment_moved(id: &str, route_node_ids: &[&str]) -> UtilityNetworkEvent {
    SpanEquipmentMoved {
        span_equipment_id: parse_uuid(id),
        node_of_interest_ids: ids(route_node_ids),
    }
    .into()
}

pub fn segment_connected(
    id: &str,
    segment_id: &str,
    terminal_id: &str,
    end: SpanSegmentEnd,
) -> UtilityNetworkEvent {
    SpanSegmentsConnectedToSimpleTerminals {
        span_equipment_id: parse_uuid(id),
        connects: vec![SpanSegmentToSimpleTerminalConnectInfo {
            segment_id: parse_uuid(segment_id),
            terminal_id: parse_uuid(terminal_id),
            end,
        }],
    }
    .into()
}

pub fn segment_disconnected(id: &str, segment_id: &str, terminal_id: &str) -> UtilityNetworkEvent {
    SpanSegmentsDisconnectedFromTerminals {
        span_equipment_id: parse_uuid(id),
        disconnects: vec![SpanSegmentToTerminalDisconnectInfo {
            segment_id: parse_uuid(segment_id),
            terminal_id: parse_uuid(terminal_id),
        }],
    }
    .into()
}

// Node containers and terminal equipment

pub fn node_container_placed(id: &str, route_node_id: &str) -> UtilityNetworkEvent {
    NodeContainerPlacedInRouteNetwork {
        container: NodeContainer {
            id: parse_uuid(id),
            route_node_id: parse_uuid(route_node_id),
        },
    }
    .into()
}

pub fn node_container_removed(id: &str) -> UtilityNetworkEvent {
    NodeContainerRemovedFromRouteNetwork {
        node_container_id: parse_uuid(id),
    }
    .into()
}

pub fn terminal_placed(
    id: &str,
    specification_id: &str,
    node_container_id: &str,
    name: &str,
) -> UtilityNetworkEvent {
    TerminalEquipmentPlacedInNodeContainer {
        node_container_id: parse_uuid(node_container_id),
        equipment: TerminalEquipment {
            id: parse_uuid(id),
            specification_id: parse_uuid(specification_id),
            naming_info: NamingInfo {
                name: Some(name.to_string()),
                description: None,
            },
        },
    }
    .into()
}

pub fn terminal_renamed(id: &str, name: &str) -> UtilityNetworkEvent {
    TerminalEquipmentNamingInfoChanged {
        terminal_equipment_id: parse_uuid(id),
        naming_info: NamingInfo {
            name: Some(name.to_string()),
            description: None,
        },
    }
    .into()
}
