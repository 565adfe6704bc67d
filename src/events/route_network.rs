// Copyright (c) 2025 - Cowboy AI, Inc.
//! Node Container and Interest Events

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{NodeContainer, RouteNetworkElementIdList, WalkOfInterest};

/// A node container was placed at a route node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContainerPlacedInRouteNetwork {
    pub container: NodeContainer,
}

/// A node container was removed together with everything placed in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContainerRemovedFromRouteNetwork {
    pub node_container_id: Uuid,
}

/// A walk of interest was registered
///
/// The element list is as walked and may contain duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkOfInterestRegistered {
    pub interest: WalkOfInterest,
}

/// The elements of a walk of interest were replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkOfInterestRouteNetworkElementsModified {
    pub interest_id: Uuid,
    pub route_network_element_ids: RouteNetworkElementIdList,
}

/// An interest was unregistered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestUnregistered {
    pub interest_id: Uuid,
}
