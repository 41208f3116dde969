use std::collections::BTreeSet;

use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;
use bevy_math::Vec3;

use crate::error::TransferError;
use crate::model::{
    CompletionMode, CompletionState, DepositRefusal, Recipe, ResourceType, StoragePolicy,
    StoredCounts,
};

/// Stationary accumulator of items.
#[derive(Component, Debug, Clone)]
pub struct Container {
    pub recipe: Recipe,
    pub(crate) stored: StoredCounts,
    pub(crate) state: CompletionState,
    pub mode: CompletionMode,
    pub policy: StoragePolicy,
    /// Catalog spec instantiated on completion.
    pub replacement: Option<String>,
    /// Withdrawn and ejected items appear here, relative to the container.
    pub spawn_offset: Vec3,
    /// Preserved items attach here. `None` attaches to the container itself.
    pub storage_anchor: Option<Entity>,
}

impl Container {
    pub fn new(recipe: Recipe) -> Self {
        Self {
            recipe,
            stored: StoredCounts::new(),
            state: CompletionState::Accumulating,
            mode: CompletionMode::Replace,
            policy: StoragePolicy::Consume,
            replacement: None,
            spawn_offset: Vec3::new(0.0, 1.0, 0.0),
            storage_anchor: None,
        }
    }

    pub fn with_mode(mut self, mode: CompletionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_policy(mut self, policy: StoragePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_replacement(mut self, spec: impl Into<String>) -> Self {
        self.replacement = Some(spec.into());
        self
    }

    pub fn with_spawn_offset(mut self, offset: Vec3) -> Self {
        self.spawn_offset = offset;
        self
    }

    pub fn stored(&self) -> &StoredCounts {
        &self.stored
    }

    pub fn state(&self) -> CompletionState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == CompletionState::Completed
    }

    /// Would a deposit of one `resource_type` be accepted right now?
    pub fn check_deposit(
        &self,
        container: Entity,
        resource_type: &ResourceType,
    ) -> Result<(), TransferError> {
        if self.is_completed() {
            return Err(TransferError::ContainerCompleted(container));
        }
        self.recipe
            .check_deposit(&self.stored, resource_type)
            .map_err(|refusal| match refusal {
                DepositRefusal::NotAccepted => TransferError::NotAccepted {
                    container,
                    resource_type: resource_type.clone(),
                },
                DepositRefusal::QuotaFull { required } => TransferError::QuotaExceeded {
                    container,
                    resource_type: resource_type.clone(),
                    required,
                },
            })
    }

    pub fn accepts(&self, resource_type: &ResourceType) -> bool {
        !self.is_completed()
            && self
                .recipe
                .check_deposit(&self.stored, resource_type)
                .is_ok()
    }

    pub fn is_recipe_complete(&self) -> bool {
        self.mode == CompletionMode::Replace && self.recipe.is_satisfied(&self.stored)
    }

    pub fn counter_text(&self) -> String {
        if self.is_completed() {
            return CompletionState::Completed.to_string();
        }
        self.recipe.describe(&self.stored)
    }

    pub(crate) fn anchor_for(&self, container: Entity) -> Entity {
        self.storage_anchor.unwrap_or(container)
    }
}

/// Agents currently inside the container's trigger volume.
#[derive(Component, Debug, Clone, Default)]
pub struct VolumeOccupants {
    agents: BTreeSet<Entity>,
}

impl VolumeOccupants {
    pub fn insert(&mut self, agent: Entity) -> bool {
        self.agents.insert(agent)
    }

    pub fn remove(&mut self, agent: Entity) -> bool {
        self.agents.remove(&agent)
    }

    pub fn contains(&self, agent: Entity) -> bool {
        self.agents.contains(&agent)
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.agents.iter().copied()
    }
}

/// Text shown on the container's counter.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterDisplay(pub String);
