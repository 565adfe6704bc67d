// Copyright (c) 2025 - Cowboy AI, Inc.
//! Utility Network Domain Events
//!
//! Events consumed by the relational projection. They are produced upstream
//! by the route network and utility graph services; this crate only reads
//! them.
//!
//! # Event Flow
//!
//! ```text
//! Upstream services → EventStore → EventEnvelope → Dispatcher → Projection
//!   (what happened)     (ordered)     (position)     (route)     (mirror + sink)
//! ```
//!
//! # Forward Compatibility
//!
//! [`UtilityNetworkEvent`] is internally tagged by `event_type`. Any tag this
//! crate does not know deserializes into [`UtilityNetworkEvent::Unknown`],
//! which the dispatcher ignores, so new upstream event types never abort the
//! stream.
//!
//! # Module Organization
//!
//! - [`route_network`] - node container and interest events
//! - [`span_equipment`] - span equipment placement, movement and connectivity
//! - [`specification`] - catalog events
//! - [`terminal_equipment`] - terminal equipment events

pub mod route_network;
pub mod span_equipment;
pub mod specification;
pub mod terminal_equipment;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use route_network::{
    InterestUnregistered, NodeContainerPlacedInRouteNetwork, NodeContainerRemovedFromRouteNetwork,
    WalkOfInterestRegistered, WalkOfInterestRouteNetworkElementsModified,
};
pub use span_equipment::{
    SpanEquipmentAffixedToParent, SpanEquipmentDetachedFromParent, SpanEquipmentMoved,
    SpanEquipmentPlacedInRouteNetwork, SpanEquipmentRemoved, SpanSegmentsConnectedToSimpleTerminals,
    SpanSegmentsDisconnectedFromTerminals,
};
pub use specification::{
    SpanEquipmentSpecificationAdded, SpanEquipmentSpecificationChanged,
    SpanStructureSpecificationAdded, TerminalEquipmentSpecificationAdded,
};
pub use terminal_equipment::{
    TerminalEquipmentNamingInfoChanged, TerminalEquipmentPlacedInNodeContainer,
    TerminalEquipmentRemoved,
};

/// Ordered, immutable record carrying one domain event plus delivery metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event id
    pub event_id: Uuid,
    /// Position of the event in the global, totally ordered stream
    pub global_version: u64,
    /// When the event was stored upstream
    pub timestamp: DateTime<Utc>,
    /// The domain event
    pub data: UtilityNetworkEvent,
}

impl EventEnvelope {
    /// Wrap an event at the given stream position
    pub fn new(global_version: u64, data: impl Into<UtilityNetworkEvent>) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            global_version,
            timestamp: Utc::now(),
            data: data.into(),
        }
    }
}

/// Every event the relational projection understands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type")]
pub enum UtilityNetworkEvent {
    NodeContainerPlacedInRouteNetwork(NodeContainerPlacedInRouteNetwork),
    NodeContainerRemovedFromRouteNetwork(NodeContainerRemovedFromRouteNetwork),

    WalkOfInterestRegistered(WalkOfInterestRegistered),
    WalkOfInterestRouteNetworkElementsModified(WalkOfInterestRouteNetworkElementsModified),
    InterestUnregistered(InterestUnregistered),

    SpanEquipmentPlacedInRouteNetwork(SpanEquipmentPlacedInRouteNetwork),
    SpanEquipmentMoved(SpanEquipmentMoved),
    SpanEquipmentRemoved(SpanEquipmentRemoved),
    SpanEquipmentAffixedToParent(SpanEquipmentAffixedToParent),
    SpanEquipmentDetachedFromParent(SpanEquipmentDetachedFromParent),
    SpanSegmentsConnectedToSimpleTerminals(SpanSegmentsConnectedToSimpleTerminals),
    SpanSegmentsDisconnectedFromTerminals(SpanSegmentsDisconnectedFromTerminals),

    SpanEquipmentSpecificationAdded(SpanEquipmentSpecificationAdded),
    SpanStructureSpecificationAdded(SpanStructureSpecificationAdded),
    SpanEquipmentSpecificationChanged(SpanEquipmentSpecificationChanged),

    TerminalEquipmentSpecificationAdded(TerminalEquipmentSpecificationAdded),
    TerminalEquipmentPlacedInNodeContainer(TerminalEquipmentPlacedInNodeContainer),
    TerminalEquipmentNamingInfoChanged(TerminalEquipmentNamingInfoChanged),
    TerminalEquipmentRemoved(TerminalEquipmentRemoved),

    /// Any event type introduced upstream after this crate was built
    #[serde(other)]
    Unknown,
}

impl UtilityNetworkEvent {
    /// Get human-readable event type name
    pub fn event_type_name(&self) -> &'static str {
        use UtilityNetworkEvent::*;

        match self {
            NodeContainerPlacedInRouteNetwork(_) => "NodeContainerPlacedInRouteNetwork",
            NodeContainerRemovedFromRouteNetwork(_) => "NodeContainerRemovedFromRouteNetwork",
            WalkOfInterestRegistered(_) => "WalkOfInterestRegistered",
            WalkOfInterestRouteNetworkElementsModified(_) => {
                "WalkOfInterestRouteNetworkElementsModified"
            }
            InterestUnregistered(_) => "InterestUnregistered",
            SpanEquipmentPlacedInRouteNetwork(_) => "SpanEquipmentPlacedInRouteNetwork",
            SpanEquipmentMoved(_) => "SpanEquipmentMoved",
            SpanEquipmentRemoved(_) => "SpanEquipmentRemoved",
            SpanEquipmentAffixedToParent(_) => "SpanEquipmentAffixedToParent",
            SpanEquipmentDetachedFromParent(_) => "SpanEquipmentDetachedFromParent",
            SpanSegmentsConnectedToSimpleTerminals(_) => "SpanSegmentsConnectedToSimpleTerminals",
            SpanSegmentsDisconnectedFromTerminals(_) => "SpanSegmentsDisconnectedFromTerminals",
            SpanEquipmentSpecificationAdded(_) => "SpanEquipmentSpecificationAdded",
            SpanStructureSpecificationAdded(_) => "SpanStructureSpecificationAdded",
            SpanEquipmentSpecificationChanged(_) => "SpanEquipmentSpecificationChanged",
            TerminalEquipmentSpecificationAdded(_) => "TerminalEquipmentSpecificationAdded",
            TerminalEquipmentPlacedInNodeContainer(_) => "TerminalEquipmentPlacedInNodeContainer",
            TerminalEquipmentNamingInfoChanged(_) => "TerminalEquipmentNamingInfoChanged",
            TerminalEquipmentRemoved(_) => "TerminalEquipmentRemoved",
            Unknown => "Unknown",
        }
    }
}

macro_rules! impl_from_payload {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for UtilityNetworkEvent {
                fn from(event: $variant) -> Self {
                    UtilityNetworkEvent::$variant(event)
                }
            }
        )*
    };
}

impl_from_payload!(
    NodeContainerPlacedInRouteNetwork,
    NodeContainerRemovedFromRouteNetwork,
    WalkOfInterestRegistered,
    WalkOfInterestRouteNetworkElementsModified,
    InterestUnregistered,
    SpanEquipmentPlacedInRouteNetwork,
    SpanEquipmentMoved,
    SpanEquipmentRemoved,
    SpanEquipmentAffixedToParent,
    SpanEquipmentDetachedFromParent,
    SpanSegmentsConnectedToSimpleTerminals,
    SpanSegmentsDisconnectedFromTerminals,
    SpanEquipmentSpecificationAdded,
    SpanStructureSpecificationAdded,
    SpanEquipmentSpecificationChanged,
    TerminalEquipmentSpecificationAdded,
    TerminalEquipmentPlacedInNodeContainer,
    TerminalEquipmentNamingInfoChanged,
    TerminalEquipmentRemoved,
);
