// Copyright (c) 2025 - Cowboy AI, Inc.
//! Mode equivalence
//!
//! Any event sequence leaves the same mirror, and the same incrementally
//! maintained tables, whether it is replayed and bulk loaded or applied
//! live from the start. Conduit slack is bulk loaded only and is left out
//! of the table comparison; the slack scenarios cover it.

use proptest::prelude::*;
use uuid::Uuid;

use utility_network_projector::config::SchemaPreparation;
use utility_network_projector::domain::*;
use utility_network_projector::events::*;
use utility_network_projector::sink::memory::MemorySchema;
use utility_network_projector::sink::RouteElementInterestRow;
use utility_network_projector::state::ProjectorState;

use crate::fixtures::{
    apply_all, catalog, parse_uuid, projection, CUSTOMER_TERMINAL_SPEC, EQUIPMENT_SPEC_1,
    EQUIPMENT_SPEC_2, RACK_TERMINAL_SPEC, SCHEMA,
};

fn interest_id(n: u128) -> Uuid {
    Uuid::from_u128(0x100 + n)
}

fn element_id(n: u128) -> Uuid {
    Uuid::from_u128(0x200 + n)
}

fn span_id(n: u128) -> Uuid {
    Uuid::from_u128(0x300 + n)
}

fn container_id(n: u128) -> Uuid {
    Uuid::from_u128(0x400 + n)
}

fn terminal_id(n: u128) -> Uuid {
    Uuid::from_u128(0x500 + n)
}

fn route_node_id(n: u128) -> Uuid {
    Uuid::from_u128(0x600 + n)
}

fn equipment_spec(second: bool) -> Uuid {
    parse_uuid(if second { EQUIPMENT_SPEC_2 } else { EQUIPMENT_SPEC_1 })
}

fn elements() -> impl Strategy<Value = Vec<Uuid>> {
    prop::collection::vec((0u128..6).prop_map(element_id), 0..6)
}

fn interest_event() -> impl Strategy<Value = UtilityNetworkEvent> {
    prop_oneof![
        (0u128..3, elements()).prop_map(|(n, refs)| WalkOfInterestRegistered {
            interest: WalkOfInterest {
                id: interest_id(n),
                route_network_element_refs: refs,
            },
        }
        .into()),
        (0u128..3, elements()).prop_map(|(n, ids)| WalkOfInterestRouteNetworkElementsModified {
            interest_id: interest_id(n),
            route_network_element_ids: ids,
        }
        .into()),
        (0u128..3).prop_map(|n| InterestUnregistered {
            interest_id: interest_id(n),
        }
        .into()),
    ]
}

fn span_equipment_event() -> impl Strategy<Value = UtilityNetworkEvent> {
    prop_oneof![
        (0u128..3, any::<bool>(), any::<bool>(), 0u128..3, 0u128..3).prop_map(
            |(n, is_cable, second, from, to)| SpanEquipmentPlacedInRouteNetwork {
                equipment: SpanEquipment {
                    id: span_id(n),
                    specification_id: equipment_spec(second),
                    walk_of_interest_id: interest_id(n),
                    node_of_interest_ids: vec![route_node_id(from), route_node_id(to)],
                    is_cable,
                    name: None,
                    parent_affixes: Vec::new(),
                },
            }
            .into()
        ),
        (0u128..3, 0u128..3, 0u128..3).prop_map(|(n, from, to)| SpanEquipmentMoved {
            span_equipment_id: span_id(n),
            node_of_interest_ids: vec![route_node_id(from), route_node_id(to)],
        }
        .into()),
        (0u128..3).prop_map(|n| SpanEquipmentRemoved {
            span_equipment_id: span_id(n),
        }
        .into()),
        (0u128..3, any::<bool>()).prop_map(|(n, second)| SpanEquipmentSpecificationChanged {
            span_equipment_id: span_id(n),
            new_specification_id: equipment_spec(second),
        }
        .into()),
        (0u128..3, 0u128..3, 0u128..2).prop_map(|(n, node, parent)| {
            SpanEquipmentAffixedToParent {
                span_equipment_id: span_id(n),
                parent: SpanEquipmentParentAffix {
                    route_node_id: route_node_id(node),
                    parent_id: Uuid::from_u128(0x800 + parent),
                },
            }
            .into()
        }),
        (0u128..3, 0u128..2).prop_map(|(n, parent)| SpanEquipmentDetachedFromParent {
            span_equipment_id: span_id(n),
            parent_id: Uuid::from_u128(0x800 + parent),
        }
        .into()),
        (0u128..3, 0u128..2, any::<bool>()).prop_map(|(n, segment, to_end)| {
            SpanSegmentsConnectedToSimpleTerminals {
                span_equipment_id: span_id(n),
                connects: vec![SpanSegmentToSimpleTerminalConnectInfo {
                    segment_id: Uuid::from_u128(0x700 + segment),
                    terminal_id: terminal_id(segment),
                    end: if to_end { SpanSegmentEnd::To } else { SpanSegmentEnd::From },
                }],
            }
            .into()
        }),
        (0u128..3, 0u128..2).prop_map(|(n, segment)| SpanSegmentsDisconnectedFromTerminals {
            span_equipment_id: span_id(n),
            disconnects: vec![SpanSegmentToTerminalDisconnectInfo {
                segment_id: Uuid::from_u128(0x700 + segment),
                terminal_id: terminal_id(segment),
            }],
        }
        .into()),
    ]
}

fn terminal_event() -> impl Strategy<Value = UtilityNetworkEvent> {
    prop_oneof![
        (0u128..2, 0u128..3).prop_map(|(n, node)| NodeContainerPlacedInRouteNetwork {
            container: NodeContainer {
                id: container_id(n),
                route_node_id: route_node_id(node),
            },
        }
        .into()),
        (0u128..2).prop_map(|n| NodeContainerRemovedFromRouteNetwork {
            node_container_id: container_id(n),
        }
        .into()),
        (0u128..3, any::<bool>(), 0u128..2, "[a-z]{1,6}").prop_map(
            |(n, customer, container, name)| TerminalEquipmentPlacedInNodeContainer {
                node_container_id: container_id(container),
                equipment: TerminalEquipment {
                    id: terminal_id(n),
                    specification_id: parse_uuid(if customer {
                        CUSTOMER_TERMINAL_SPEC
                    } else {
                        RACK_TERMINAL_SPEC
                    }),
                    naming_info: NamingInfo {
                        name: Some(name),
                        description: None,
                    },
                },
            }
            .into()
        ),
        (0u128..3, "[a-z]{1,6}").prop_map(|(n, name)| TerminalEquipmentNamingInfoChanged {
            terminal_equipment_id: terminal_id(n),
            naming_info: NamingInfo {
                name: Some(name),
                description: None,
            },
        }
        .into()),
    ]
}

/// Redelivered catalog entries and new, unused ones
///
/// Specifications are immutable once added, so a re-added id carries the
/// values it was first added with.
fn catalog_event() -> impl Strategy<Value = UtilityNetworkEvent> {
    prop_oneof![
        prop::sample::select(catalog()),
        (0u32..3).prop_map(|n| SpanStructureSpecificationAdded {
            specification: SpanStructureSpecification {
                id: Uuid::from_u128(0x900 + n as u128),
                name: format!("Ø{}", 60 + n * 10),
                outer_diameter: 60 + n * 10,
            },
        }
        .into()),
        (0u128..3).prop_map(|n| TerminalEquipmentSpecificationAdded {
            specification: TerminalEquipmentSpecification {
                id: Uuid::from_u128(0xa00 + n),
                name: format!("terminal {}", n),
                is_customer_termination: n == 0,
            },
        }
        .into()),
    ]
}

fn event() -> impl Strategy<Value = UtilityNetworkEvent> {
    prop_oneof![
        3 => interest_event(),
        6 => span_equipment_event(),
        4 => terminal_event(),
        1 => catalog_event(),
        1 => Just(UtilityNetworkEvent::Unknown),
    ]
}

/// Tables with row order normalized
fn incremental_tables(tables: &MemorySchema) -> MemorySchema {
    let mut interests: Vec<RouteElementInterestRow> = tables.route_element_interests.clone();
    interests.sort_by_key(|row| (row.interest_id, row.seq_no));

    MemorySchema {
        route_element_interests: interests,
        service_terminations: tables.service_terminations.clone(),
        conduits: tables.conduits.clone(),
        conduit_slacks: Default::default(),
    }
}

async fn replay_then_bulk(events: Vec<UtilityNetworkEvent>) -> (ProjectorState, MemorySchema) {
    let mut projection = projection(SchemaPreparation::CreateIfMissing);
    apply_all(&mut projection, catalog().into_iter().chain(events)).await;
    projection.finish_replay().await.unwrap();

    let tables = incremental_tables(projection.sink().schema(SCHEMA).unwrap());
    (projection.state().clone(), tables)
}

async fn live_from_start(events: Vec<UtilityNetworkEvent>) -> (ProjectorState, MemorySchema) {
    let mut projection = projection(SchemaPreparation::CreateIfMissing);
    projection.finish_replay().await.unwrap();
    apply_all(&mut projection, catalog().into_iter().chain(events)).await;

    let tables = incremental_tables(projection.sink().schema(SCHEMA).unwrap());
    (projection.state().clone(), tables)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_mirror_and_tables_match_across_modes(
        events in prop::collection::vec(event(), 0..40)
    ) {
        let (replayed_state, replayed_tables) =
            tokio_test::block_on(replay_then_bulk(events.clone()));
        let (live_state, live_tables) = tokio_test::block_on(live_from_start(events));

        prop_assert_eq!(replayed_state, live_state);
        prop_assert_eq!(replayed_tables, live_tables);
    }

    /// Splitting the sequence anywhere gives the same result
    #[test]
    fn prop_transition_point_does_not_matter(
        events in prop::collection::vec(event(), 0..40),
        split in any::<prop::sample::Index>()
    ) {
        let at = split.index(events.len() + 1);
        let (before, after) = events.split_at(at);

        let (expected_state, expected_tables) =
            tokio_test::block_on(replay_then_bulk(events.clone()));

        let (state, tables) = tokio_test::block_on(async {
            let mut projection = projection(SchemaPreparation::CreateIfMissing);
            apply_all(&mut projection, catalog().into_iter().chain(before.to_vec())).await;
            projection.finish_replay().await.unwrap();
            apply_all(&mut projection, after.to_vec()).await;

            let tables = incremental_tables(projection.sink().schema(SCHEMA).unwrap());
            (projection.state().clone(), tables)
        });

        prop_assert_eq!(state, expected_state);
        prop_assert_eq!(tables, expected_tables);
    }
}
