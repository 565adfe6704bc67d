// Copyright (c) 2025 - Cowboy AI, Inc.
//! Terminal Equipment Events

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{NamingInfo, TerminalEquipment};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalEquipmentPlacedInNodeContainer {
    pub node_container_id: Uuid,
    pub equipment: TerminalEquipment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalEquipmentNamingInfoChanged {
    pub terminal_equipment_id: Uuid,
    pub naming_info: NamingInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalEquipmentRemoved {
    pub terminal_equipment_id: Uuid,
    pub node_container_id: Uuid,
}
