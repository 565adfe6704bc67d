// Copyright (c) 2025 - Cowboy AI, Inc.
//! Span Equipment Events

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    SpanEquipment, SpanEquipmentParentAffix, SpanSegmentToSimpleTerminalConnectInfo,
    SpanSegmentToTerminalDisconnectInfo,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentPlacedInRouteNetwork {
    pub equipment: SpanEquipment,
}

/// The span equipment was moved to a new set of route nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentMoved {
    pub span_equipment_id: Uuid,
    pub node_of_interest_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentRemoved {
    pub span_equipment_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentAffixedToParent {
    pub span_equipment_id: Uuid,
    pub parent: SpanEquipmentParentAffix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentDetachedFromParent {
    pub span_equipment_id: Uuid,
    pub parent_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanSegmentsConnectedToSimpleTerminals {
    pub span_equipment_id: Uuid,
    pub connects: Vec<SpanSegmentToSimpleTerminalConnectInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanSegmentsDisconnectedFromTerminals {
    pub span_equipment_id: Uuid,
    pub disconnects: Vec<SpanSegmentToTerminalDisconnectInfo>,
}
