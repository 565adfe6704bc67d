// Copyright (c) 2025 - Cowboy AI, Inc.
//! Utility Network Domain Models
//!
//! Value types carried by utility network events and held by the
//! projection's state mirror.
//!
//! # Route Network
//!
//! - [`WalkOfInterest`] - ordered path of route node/segment ids
//! - [`remove_duplicated_ids`] - first-occurrence deduplication of element lists
//!
//! # Equipment
//!
//! - [`NodeContainer`] - container placed in a route node
//! - [`SpanEquipment`] - cable or conduit placed along a walk of interest
//! - [`TerminalEquipment`] - terminal device placed in a node container
//!
//! # Catalog
//!
//! - [`SpanEquipmentSpecification`] / [`SpanStructureSpecification`] - the
//!   specification chain used to resolve a conduit's outer diameter
//! - [`TerminalEquipmentSpecification`] - decides whether placed terminal
//!   equipment is a customer service termination

pub mod equipment;
pub mod route_network;
pub mod specification;

pub use equipment::{
    NamingInfo, NodeContainer, SpanEquipment, SpanEquipmentParentAffix, SpanSegmentEnd,
    SpanSegmentToSimpleTerminalConnectInfo, SpanSegmentToTerminalDisconnectInfo,
    TerminalEquipment,
};
pub use route_network::{remove_duplicated_ids, RouteNetworkElementIdList, WalkOfInterest};
pub use specification::{
    SpanEquipmentSpecification, SpanStructureSpecification, SpanStructureTemplate,
    TerminalEquipmentSpecification,
};
