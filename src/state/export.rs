// Copyright (c) 2025 - Cowboy AI, Inc.
//! Row builders over the mirror
//!
//! Full-table exports used by the bulk load, plus the single-row builders
//! live mode needs. Rows come out in id order because the mirror is kept
//! in ordered maps.

use std::collections::BTreeMap;
use uuid::Uuid;

use super::{resolve_outer_diameter, ProjectorState, ServiceTerminationState};
use crate::domain::{SpanEquipment, SpanSegmentEnd};
use crate::errors::ProjectorResult;
use crate::sink::{ConduitRow, ConduitSlackRow, RouteElementInterestRow, ServiceTerminationRow};

impl ServiceTerminationState {
    pub fn to_row(&self) -> ServiceTerminationRow {
        ServiceTerminationRow {
            id: self.id,
            name: self.name.clone(),
            route_node_id: self.route_node_id,
        }
    }
}

impl ProjectorState {
    /// Every interest, one row per deduplicated element
    pub fn route_element_interest_rows(&self) -> Vec<RouteElementInterestRow> {
        self.interests
            .iter()
            .flat_map(|(interest_id, elements)| {
                RouteElementInterestRow::for_walk(*interest_id, elements)
            })
            .collect()
    }

    pub fn service_termination_rows(&self) -> Vec<ServiceTerminationRow> {
        self.service_terminations
            .values()
            .map(ServiceTerminationState::to_row)
            .collect()
    }

    /// Every non-cable span equipment with its diameter resolved now
    pub fn conduit_rows(&self) -> ProjectorResult<Vec<ConduitRow>> {
        self.span_equipments
            .values()
            .filter(|state| !state.equipment.is_cable)
            .map(|state| self.conduit_row(&state.equipment))
            .collect()
    }

    /// Build the conduit row for one span equipment
    pub fn conduit_row(&self, equipment: &SpanEquipment) -> ProjectorResult<ConduitRow> {
        Ok(ConduitRow {
            id: equipment.id,
            walk_of_interest_id: equipment.walk_of_interest_id,
            outer_diameter: self.outer_diameter(equipment)?,
        })
    }

    pub fn outer_diameter(&self, equipment: &SpanEquipment) -> ProjectorResult<u32> {
        resolve_outer_diameter(&self.specifications, equipment.specification_id)
    }

    /// Unconnected conduit ends counted per route node
    ///
    /// A conduit's ends are the first and last of its nodes of interest. An
    /// end is connected when any segment has a terminal at that end. Nodes
    /// without slack produce no row.
    pub fn conduit_slack_rows(&self) -> Vec<ConduitSlackRow> {
        let mut ends_per_node: BTreeMap<Uuid, u32> = BTreeMap::new();

        for state in self.span_equipments.values() {
            if state.equipment.is_cable {
                continue;
            }
            let Some((from_node_id, to_node_id)) = state.equipment.end_node_ids() else {
                continue;
            };

            for (node_id, end) in [
                (from_node_id, SpanSegmentEnd::From),
                (to_node_id, SpanSegmentEnd::To),
            ] {
                if !state.is_connected_at(end) {
                    *ends_per_node.entry(node_id).or_insert(0) += 1;
                }
            }
        }

        ends_per_node
            .into_iter()
            .map(|(route_node_id, number_of_ends)| ConduitSlackRow {
                route_node_id,
                number_of_ends,
            })
            .collect()
    }
}
