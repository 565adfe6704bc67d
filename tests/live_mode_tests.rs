// Copyright (c) 2025 - Cowboy AI, Inc.
//! Replay → live transition and live write path

mod fixtures;

use fixtures::*;
use pretty_assertions::assert_eq;
use utility_network_projector::config::SchemaPreparation;
use utility_network_projector::events::{
    EventEnvelope, TerminalEquipmentRemoved, UtilityNetworkEvent,
};
use utility_network_projector::projection::{
    ProjectionAdapter, ProjectionMode, SharedProjection,
};
use utility_network_projector::sink::memory::{FailurePoint, SinkCall};
use utility_network_projector::sink::{ConduitRow, SinkError, SinkTable, SinkWrite};
use utility_network_projector::ProjectorError;

#[tokio::test]
async fn test_replay_issues_one_batch_per_table() {
    let mut projection = projection(SchemaPreparation::CreateIfMissing);
    let mut events = catalog();
    for _ in 0..50 {
        events.push(interest_registered(INTEREST_1, &[ELEMENT_A, ELEMENT_B]));
        events.push(span_equipment_placed(CONDUIT_X, EQUIPMENT_SPEC_1, false));
    }
    apply_all(&mut projection, events).await;

    assert!(projection.sink().calls().is_empty());

    projection.finish_replay().await.unwrap();

    assert_eq!(projection.sink().calls().len(), 5);
    assert_eq!(projection.sink().bulk_loads(), SinkTable::ALL.to_vec());
    assert!(projection.sink().writes().is_empty());
    assert_eq!(projection.stats().sink_writes, 0);
}

#[tokio::test]
async fn test_live_issues_targeted_writes() {
    let mut projection = projection(SchemaPreparation::CreateIfMissing);
    apply_all(&mut projection, catalog()).await;
    projection.finish_replay().await.unwrap();
    projection.sink_mut().clear_journal();

    apply_all(
        &mut projection,
        vec![
            span_equipment_placed(CONDUIT_X, EQUIPMENT_SPEC_1, false),
            span_equipment_placed(CABLE_Y, EQUIPMENT_SPEC_1, true),
            specification_changed(CONDUIT_X, EQUIPMENT_SPEC_2),
            span_equipment_removed(CABLE_Y),
            span_equipment_removed(CONDUIT_X),
        ],
    )
    .await;

    let x = parse_uuid(CONDUIT_X);
    let writes: Vec<SinkWrite> = projection.sink().writes().into_iter().cloned().collect();
    assert_eq!(
        writes,
        vec![
            SinkWrite::InsertConduit(ConduitRow {
                id: x,
                walk_of_interest_id: parse_uuid(INTEREST_1),
                outer_diameter: 40,
            }),
            SinkWrite::UpdateConduitDiameter {
                conduit_id: x,
                outer_diameter: 50,
            },
            SinkWrite::DeleteConduit { conduit_id: x },
        ]
    );
    assert_eq!(projection.stats().sink_writes, 3);
}

#[tokio::test]
async fn test_events_before_signal_are_bulk_loaded_and_after_are_written() {
    let mut projection = projection(SchemaPreparation::CreateIfMissing);
    apply_all(
        &mut projection,
        vec![interest_registered(INTEREST_1, &[ELEMENT_A])],
    )
    .await;

    projection.replay_finished().await.unwrap();
    apply_all(
        &mut projection,
        vec![interest_registered(INTEREST_2, &[ELEMENT_B])],
    )
    .await;

    let calls = projection.sink().calls();
    let bulk_rows = calls
        .iter()
        .find_map(|call| match call {
            SinkCall::BulkLoad {
                table: SinkTable::RouteElementInterest,
                rows,
                ..
            } => Some(*rows),
            _ => None,
        })
        .unwrap();
    assert_eq!(bulk_rows, 1);

    let writes = projection.sink().writes();
    assert_eq!(writes.len(), 1);
    assert!(matches!(
        writes[0],
        SinkWrite::InsertRouteElementInterests { interest_id, .. }
            if *interest_id == parse_uuid(INTEREST_2)
    ));
}

#[tokio::test]
async fn test_require_absent_fails_on_existing_schema() {
    let mut first = projection(SchemaPreparation::RequireAbsent);
    first.finish_replay().await.unwrap();

    // A second projection against the same sink
    let config = first.config().clone();
    let sink = first.into_sink();
    let mut second =
        utility_network_projector::RelationalProjection::new(config, sink).unwrap();

    let err = second.finish_replay().await.unwrap_err();

    assert!(matches!(
        err,
        ProjectorError::Sink(SinkError::SchemaAlreadyExists(ref schema)) if schema == SCHEMA
    ));
    assert_eq!(second.mode(), ProjectionMode::Replaying);
}

#[tokio::test]
async fn test_failed_transition_can_be_retried() {
    let mut projection = projection(SchemaPreparation::CreateIfMissing);
    apply_all(
        &mut projection,
        vec![interest_registered(INTEREST_1, &[ELEMENT_A, ELEMENT_B])],
    )
    .await;
    projection
        .sink_mut()
        .fail_on(FailurePoint::BulkLoad(SinkTable::ConduitSlack));

    assert!(projection.finish_replay().await.is_err());
    assert_eq!(projection.mode(), ProjectionMode::Replaying);
    assert!(projection.mode_history().is_empty());

    projection.sink_mut().clear_failure();
    projection.finish_replay().await.unwrap();

    assert_eq!(projection.mode(), ProjectionMode::Live);
    let stored = projection
        .sink()
        .schema(SCHEMA)
        .unwrap()
        .interest_elements(parse_uuid(INTEREST_1));
    assert_eq!(stored, ids(&[ELEMENT_A, ELEMENT_B]));
}

#[tokio::test]
async fn test_failed_transition_with_require_absent_can_be_retried() {
    let mut projection = projection(SchemaPreparation::RequireAbsent);
    apply_all(
        &mut projection,
        vec![interest_registered(INTEREST_1, &[ELEMENT_A, ELEMENT_B])],
    )
    .await;
    projection
        .sink_mut()
        .fail_on(FailurePoint::BulkLoad(SinkTable::ConduitSlack));

    assert!(projection.finish_replay().await.is_err());
    assert_eq!(projection.mode(), ProjectionMode::Replaying);

    projection.sink_mut().clear_failure();
    projection.sink_mut().clear_journal();
    projection.finish_replay().await.unwrap();

    assert_eq!(projection.mode(), ProjectionMode::Live);
    assert_eq!(
        projection.sink().calls()[0],
        SinkCall::PrepareSchema {
            schema: SCHEMA.to_string(),
            preparation: SchemaPreparation::CreateIfMissing,
        }
    );
    // The partial load from the failed attempt is not duplicated
    let stored = projection
        .sink()
        .schema(SCHEMA)
        .unwrap()
        .interest_elements(parse_uuid(INTEREST_1));
    assert_eq!(stored, ids(&[ELEMENT_A, ELEMENT_B]));
}

#[tokio::test]
async fn test_unresolvable_specification_change_leaves_mirror_unchanged() {
    let mut projection = projection(SchemaPreparation::CreateIfMissing);
    apply_all(&mut projection, catalog()).await;
    projection.finish_replay().await.unwrap();
    apply_all(
        &mut projection,
        vec![span_equipment_placed(CONDUIT_X, EQUIPMENT_SPEC_1, false)],
    )
    .await;
    projection.sink_mut().clear_journal();

    let err = projection
        .apply(&EventEnvelope::new(
            2,
            specification_changed(CONDUIT_X, ELEMENT_C),
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProjectorError::UnknownSpanEquipmentSpecification(id) if id == parse_uuid(ELEMENT_C)
    ));
    let conduit = projection
        .state()
        .span_equipment(parse_uuid(CONDUIT_X))
        .unwrap();
    assert_eq!(
        conduit.equipment.specification_id,
        parse_uuid(EQUIPMENT_SPEC_1)
    );
    assert!(projection.sink().writes().is_empty());
}

#[tokio::test]
async fn test_live_write_failure_is_fatal() {
    let mut projection = projection(SchemaPreparation::CreateIfMissing);
    projection.finish_replay().await.unwrap();
    projection
        .sink_mut()
        .fail_on(FailurePoint::Write(SinkTable::RouteElementInterest));

    let err = projection
        .apply(&EventEnvelope::new(
            1,
            interest_registered(INTEREST_1, &[ELEMENT_A]),
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, ProjectorError::Sink(_)));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_terminal_equipment_removed_is_inert() {
    let mut projection = projection(SchemaPreparation::CreateIfMissing);
    apply_all(
        &mut projection,
        [
            catalog(),
            vec![
                node_container_placed(NODE_CONTAINER_1, ROUTE_NODE_1),
                terminal_placed(TERMINAL_1, CUSTOMER_TERMINAL_SPEC, NODE_CONTAINER_1, "C1"),
            ],
        ]
        .concat(),
    )
    .await;
    projection.finish_replay().await.unwrap();
    projection.sink_mut().clear_journal();
    let state_before = projection.state().clone();

    apply_all(
        &mut projection,
        vec![UtilityNetworkEvent::from(TerminalEquipmentRemoved {
            terminal_equipment_id: parse_uuid(TERMINAL_1),
            node_container_id: parse_uuid(NODE_CONTAINER_1),
        })],
    )
    .await;

    assert_eq!(projection.state(), &state_before);
    assert!(projection.sink().calls().is_empty());
    assert!(projection
        .state()
        .service_termination(parse_uuid(TERMINAL_1))
        .is_some());
}

#[tokio::test]
async fn test_shared_projection_quiesces_events_during_transition() {
    let shared = SharedProjection::new(projection(SchemaPreparation::CreateIfMissing));
    shared
        .apply(&EventEnvelope::new(
            1,
            interest_registered(INTEREST_1, &[ELEMENT_A]),
        ))
        .await
        .unwrap();

    // Hold the lock, then race a live event against the transition
    let guard = shared.lock().await;
    let transition = tokio::spawn({
        let shared = shared.clone();
        async move { shared.finish_replay().await }
    });
    let event = tokio::spawn({
        let shared = shared.clone();
        async move {
            shared
                .apply(&EventEnvelope::new(
                    2,
                    interest_registered(INTEREST_2, &[ELEMENT_B]),
                ))
                .await
        }
    });
    drop(guard);

    transition.await.unwrap().unwrap();
    event.await.unwrap().unwrap();

    let projection = shared.lock().await;
    assert_eq!(projection.mode(), ProjectionMode::Live);
    let tables = projection.sink().schema(SCHEMA).unwrap();
    assert_eq!(tables.interest_elements(parse_uuid(INTEREST_1)), ids(&[ELEMENT_A]));
    assert_eq!(tables.interest_elements(parse_uuid(INTEREST_2)), ids(&[ELEMENT_B]));
}
