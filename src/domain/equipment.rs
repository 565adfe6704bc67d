// Copyright (c) 2025 - Cowboy AI, Inc.
//! Equipment Placed in the Route Network

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical container (well, cabinet, building) placed at a route node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContainer {
    pub id: Uuid,
    pub route_node_id: Uuid,
}

/// Relation of a span equipment to the parent it is affixed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentParentAffix {
    /// Route node where the affix happens
    pub route_node_id: Uuid,
    /// Parent span equipment (e.g. the conduit a cable is pulled through)
    pub parent_id: Uuid,
}

/// A physical cable or conduit placed along a walk of interest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipment {
    pub id: Uuid,
    pub specification_id: Uuid,
    pub walk_of_interest_id: Uuid,
    /// Route nodes the equipment passes through; first and last are its ends
    pub node_of_interest_ids: Vec<Uuid>,
    pub is_cable: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent_affixes: Vec<SpanEquipmentParentAffix>,
}

impl SpanEquipment {
    /// Route nodes at the two ends of the equipment, if it has any.
    pub fn end_node_ids(&self) -> Option<(Uuid, Uuid)> {
        let from = *self.node_of_interest_ids.first()?;
        let to = *self.node_of_interest_ids.last()?;
        Some((from, to))
    }
}

/// End of a span segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanSegmentEnd {
    From,
    To,
}

/// One span segment end attached to a simple terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanSegmentToSimpleTerminalConnectInfo {
    pub segment_id: Uuid,
    pub terminal_id: Uuid,
    pub end: SpanSegmentEnd,
}

/// One span segment detached from a terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanSegmentToTerminalDisconnectInfo {
    pub segment_id: Uuid,
    pub terminal_id: Uuid,
}

/// Naming info of a terminal equipment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A terminal device placed in a node container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalEquipment {
    pub id: Uuid,
    pub specification_id: Uuid,
    #[serde(default)]
    pub naming_info: NamingInfo,
}
