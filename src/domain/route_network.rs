// Copyright (c) 2025 - Cowboy AI, Inc.
//! Route Network Value Objects

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Ordered list of route node and route segment ids
pub type RouteNetworkElementIdList = Vec<Uuid>;

/// A named reference to an ordered path through the route network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkOfInterest {
    /// Interest id
    pub id: Uuid,
    /// Route network elements walked, in order (may contain duplicates)
    pub route_network_element_refs: RouteNetworkElementIdList,
}

/// Collapse duplicated element ids, keeping the first occurrence of each.
///
/// Walks frequently revisit a route node (e.g. a loop through a cabinet);
/// the relational read model stores each element once, in the order it was
/// first walked.
///
/// ```rust
/// use utility_network_projector::domain::remove_duplicated_ids;
/// use uuid::Uuid;
///
/// let (a, b, c) = (Uuid::from_u128(1), Uuid::from_u128(2), Uuid::from_u128(3));
/// assert_eq!(remove_duplicated_ids(&[a, b, a, c]), vec![a, b, c]);
/// ```
pub fn remove_duplicated_ids(ids: &[Uuid]) -> RouteNetworkElementIdList {
    let mut already_added = HashSet::with_capacity(ids.len());

    ids.iter()
        .copied()
        .filter(|id| already_added.insert(*id))
        .collect()
}
