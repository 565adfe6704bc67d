// Copyright (c) 2025 - Cowboy AI, Inc.
//! Rows of the relational read model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One route network element walked by an interest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteElementInterestRow {
    pub route_network_element_id: Uuid,
    pub interest_id: Uuid,
    /// Position of the element in the deduplicated walk, starting at 1
    pub seq_no: i32,
}

impl RouteElementInterestRow {
    /// Rows for an already deduplicated walk, numbered in walk order
    pub fn for_walk(interest_id: Uuid, element_ids: &[Uuid]) -> Vec<Self> {
        element_ids
            .iter()
            .zip(1..)
            .map(|(element_id, seq_no)| Self {
                route_network_element_id: *element_id,
                interest_id,
                seq_no,
            })
            .collect()
    }
}

/// Non-cable span equipment with its resolved outer diameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConduitRow {
    pub id: Uuid,
    pub walk_of_interest_id: Uuid,
    pub outer_diameter: u32,
}

/// Unconnected conduit ends in a route node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConduitSlackRow {
    pub route_node_id: Uuid,
    pub number_of_ends: u32,
}

/// Customer service termination and where it sits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTerminationRow {
    pub id: Uuid,
    pub name: Option<String>,
    pub route_node_id: Uuid,
}
