// Copyright (c) 2025 - Cowboy AI, Inc.
//! Specification Registry
//!
//! Flat id → record storage for the catalog. Specifications are guaranteed
//! by upstream to be added before anything references them, so a lookup of
//! an unknown id is a fatal inconsistency rather than a missing value.

use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::{
    SpanEquipmentSpecification, SpanStructureSpecification, TerminalEquipmentSpecification,
};
use crate::errors::{ProjectorError, ProjectorResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecificationRegistry {
    span_equipment_specifications: HashMap<Uuid, SpanEquipmentSpecification>,
    span_structure_specifications: HashMap<Uuid, SpanStructureSpecification>,
    terminal_equipment_specifications: HashMap<Uuid, TerminalEquipmentSpecification>,
}

impl SpecificationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-adding an id overwrites the previous entry.
    pub fn add_span_equipment_specification(&mut self, specification: SpanEquipmentSpecification) {
        self.span_equipment_specifications
            .insert(specification.id, specification);
    }

    pub fn add_span_structure_specification(&mut self, specification: SpanStructureSpecification) {
        self.span_structure_specifications
            .insert(specification.id, specification);
    }

    pub fn add_terminal_equipment_specification(
        &mut self,
        specification: TerminalEquipmentSpecification,
    ) {
        self.terminal_equipment_specifications
            .insert(specification.id, specification);
    }

    pub fn span_equipment_specification(
        &self,
        id: Uuid,
    ) -> ProjectorResult<&SpanEquipmentSpecification> {
        self.span_equipment_specifications
            .get(&id)
            .ok_or(ProjectorError::UnknownSpanEquipmentSpecification(id))
    }

    pub fn span_structure_specification(
        &self,
        id: Uuid,
    ) -> ProjectorResult<&SpanStructureSpecification> {
        self.span_structure_specifications
            .get(&id)
            .ok_or(ProjectorError::UnknownSpanStructureSpecification(id))
    }

    pub fn terminal_equipment_specification(
        &self,
        id: Uuid,
    ) -> ProjectorResult<&TerminalEquipmentSpecification> {
        self.terminal_equipment_specifications
            .get(&id)
            .ok_or(ProjectorError::UnknownTerminalEquipmentSpecification(id))
    }
}

/// Resolve the outer diameter reached from a span equipment specification.
///
/// Follows `SpecificationId → RootTemplate.SpanStructureSpecificationId →
/// OuterDiameter`. Always evaluated against the registry as it is now; the
/// result is never stored on the equipment.
pub fn resolve_outer_diameter(
    registry: &SpecificationRegistry,
    span_equipment_specification_id: Uuid,
) -> ProjectorResult<u32> {
    let specification = registry.span_equipment_specification(span_equipment_specification_id)?;
    let structure = registry
        .span_structure_specification(specification.root_template.span_structure_specification_id)?;

    Ok(structure.outer_diameter)
}
