// Copyright (c) 2025 - Cowboy AI, Inc.
//! Properties of interest element deduplication

use proptest::prelude::*;
use std::collections::HashSet;
use uuid::Uuid;

use utility_network_projector::config::SchemaPreparation;
use utility_network_projector::domain::{remove_duplicated_ids, WalkOfInterest};
use utility_network_projector::events::{EventEnvelope, WalkOfInterestRegistered};

use crate::fixtures::{projection, SCHEMA};

/// Element lists drawn from a small pool so duplicates are common
fn element_ids() -> impl Strategy<Value = Vec<Uuid>> {
    prop::collection::vec((0u128..8).prop_map(Uuid::from_u128), 0..24)
}

/// First occurrences in order, computed the obvious way
fn first_occurrences(ids: &[Uuid]) -> Vec<Uuid> {
    let mut result: Vec<Uuid> = Vec::new();
    for id in ids {
        if !result.contains(id) {
            result.push(*id);
        }
    }
    result
}

proptest! {
    #[test]
    fn prop_dedup_keeps_first_occurrences_in_order(ids in element_ids()) {
        prop_assert_eq!(remove_duplicated_ids(&ids), first_occurrences(&ids));
    }

    #[test]
    fn prop_dedup_leaves_no_duplicates(ids in element_ids()) {
        let deduplicated = remove_duplicated_ids(&ids);
        let unique: HashSet<_> = deduplicated.iter().collect();

        prop_assert_eq!(unique.len(), deduplicated.len());
    }

    #[test]
    fn prop_dedup_is_idempotent(ids in element_ids()) {
        let once = remove_duplicated_ids(&ids);
        prop_assert_eq!(remove_duplicated_ids(&once), once.clone());
    }

    /// Registering the same walk twice stores the same sequence
    #[test]
    fn prop_repeated_registration_stores_same_sequence(ids in element_ids()) {
        let interest_id = Uuid::from_u128(0x100);
        let event = WalkOfInterestRegistered {
            interest: WalkOfInterest {
                id: interest_id,
                route_network_element_refs: ids.clone(),
            },
        };

        let stored = tokio_test::block_on(async {
            let mut projection = projection(SchemaPreparation::CreateIfMissing);
            projection.finish_replay().await.unwrap();

            projection.apply(&EventEnvelope::new(1, event.clone())).await.unwrap();
            let first = projection.sink().schema(SCHEMA).unwrap().interest_elements(interest_id);

            projection.apply(&EventEnvelope::new(2, event)).await.unwrap();
            let second = projection.sink().schema(SCHEMA).unwrap().interest_elements(interest_id);

            (first, second)
        });

        prop_assert_eq!(&stored.0, &first_occurrences(&ids));
        prop_assert_eq!(stored.0, stored.1);
    }
}
