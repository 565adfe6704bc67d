// Copyright (c) 2025 - Cowboy AI, Inc.
//! Equipment and Structure Catalog Entries

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Template at the root of a span equipment specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanStructureTemplate {
    /// Structure specification describing the outer cross-section
    pub span_structure_specification_id: Uuid,
}

/// Catalog entry for a span equipment type (a cable or conduit product)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentSpecification {
    pub id: Uuid,
    pub name: String,
    pub root_template: SpanStructureTemplate,
}

/// Catalog entry for the physical cross-section of a span structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanStructureSpecification {
    pub id: Uuid,
    pub name: String,
    /// Outer diameter in millimetres
    pub outer_diameter: u32,
}

/// Catalog entry for terminal equipment types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalEquipmentSpecification {
    pub id: Uuid,
    pub name: String,
    /// Terminal equipment of this type terminates a customer service
    #[serde(default)]
    pub is_customer_termination: bool,
}
