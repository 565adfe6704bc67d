// Copyright (c) 2025 - Cowboy AI, Inc.
//! Catalog Events
//!
//! Specifications are added once and never deleted. The only mutation is
//! [`SpanEquipmentSpecificationChanged`], which repoints one span equipment
//! to another specification (and thereby to another structure and diameter).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    SpanEquipmentSpecification, SpanStructureSpecification, TerminalEquipmentSpecification,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentSpecificationAdded {
    pub specification: SpanEquipmentSpecification,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanStructureSpecificationAdded {
    pub specification: SpanStructureSpecification,
}

/// A span equipment was switched to another specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentSpecificationChanged {
    pub span_equipment_id: Uuid,
    pub new_specification_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalEquipmentSpecificationAdded {
    pub specification: TerminalEquipmentSpecification,
}
