use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;

use crate::model::{ResourceType, ToolType};

/// Who owns an item. Exactly one owner reference per state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Possession {
    #[default]
    Free,
    Held {
        agent: Entity,
    },
    Stored {
        container: Entity,
    },
}

impl Possession {
    pub fn is_free(&self) -> bool {
        matches!(self, Possession::Free)
    }

    pub fn holder(&self) -> Option<Entity> {
        match self {
            Possession::Held { agent } => Some(*agent),
            _ => None,
        }
    }

    pub fn container(&self) -> Option<Entity> {
        match self {
            Possession::Stored { container } => Some(*container),
            _ => None,
        }
    }
}

/// A pickupable entity.
///
/// `possession` only changes through the transfer operations in
/// `ecs::commands`, which also keep the owner's back-reference in step.
#[derive(Component, Debug, Clone)]
pub struct Item {
    pub resource_type: ResourceType,
    pub(crate) possession: Possession,
    /// False for a short grace window after an eject.
    pub pickup_eligible: bool,
}

impl Item {
    pub fn free(resource_type: ResourceType) -> Self {
        Self {
            resource_type,
            possession: Possession::Free,
            pickup_eligible: true,
        }
    }

    pub fn possession(&self) -> Possession {
        self.possession
    }

    /// Free and eligible: may become a pickup candidate or be deposited.
    pub fn is_available(&self) -> bool {
        self.possession.is_free() && self.pickup_eligible
    }
}

/// Counts down to re-enabling `pickup_eligible`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupCooldown {
    pub remaining_ticks: u32,
}

/// Marks an item usable as a tool when held.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    pub tool_type: ToolType,
}

/// A world object worn down by hits from the right tool.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Harvestable {
    pub health: i32,
    pub required_tool: ToolType,
    /// Catalog spec spawned in its place when depleted.
    pub replacement: Option<String>,
}
