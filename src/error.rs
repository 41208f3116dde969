use bevy_ecs::entity::Entity;
use thiserror::Error;

use crate::model::ResourceType;

/// Coarse classification of a rejected transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The entity is not in the state the operation needs. Ordinary input
    /// racing against state; dropped silently.
    InvalidTransfer,
    /// Deposit for a type already at its required amount.
    QuotaExceeded,
    /// A spawn spec or replacement is missing; a fallback was used.
    ConfigurationMissing,
    /// Withdraw spawned a unit the agent could not receive; undone.
    RaceRollback,
}

/// Why a possession transfer did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("entity {0} no longer exists")]
    Missing(Entity),
    #[error("item {0} already has an owner")]
    AlreadyOwned(Entity),
    #[error("item {0} is not held")]
    NotHeld(Entity),
    #[error("item {0} is already stored")]
    AlreadyStored(Entity),
    #[error("item {0} is not eligible for pickup")]
    NotEligible(Entity),
    #[error("agent {0} is already holding an item")]
    AgentBusy(Entity),
    #[error("agent {0} has nothing in hand")]
    AgentEmpty(Entity),
    #[error("agent {0} dropped something within the guard window")]
    DropGuardActive(Entity),
    #[error("container {0} is completed")]
    ContainerCompleted(Entity),
    #[error("container {container} does not accept {resource_type}")]
    NotAccepted {
        container: Entity,
        resource_type: ResourceType,
    },
    #[error("container {container} already holds {required} {resource_type}")]
    QuotaExceeded {
        container: Entity,
        resource_type: ResourceType,
        required: u32,
    },
    #[error("container {0} has nothing stored")]
    NothingStored(Entity),
    #[error("entity {0} is not harvestable")]
    NotHarvestable(Entity),
    #[error("item {0} is not a tool")]
    NotATool(Entity),
    #[error("no spawn spec named {0:?}")]
    MissingSpawnSpec(String),
    #[error("agent {agent} could not receive from container {container}; withdraw rolled back")]
    RaceRollback { container: Entity, agent: Entity },
}

impl TransferError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TransferError::QuotaExceeded { .. } => ErrorCategory::QuotaExceeded,
            TransferError::MissingSpawnSpec(_) => ErrorCategory::ConfigurationMissing,
            TransferError::RaceRollback { .. } => ErrorCategory::RaceRollback,
            _ => ErrorCategory::InvalidTransfer,
        }
    }
}

/// Problems loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("no spawn spec named {0:?}")]
    MissingSpec(String),
}
