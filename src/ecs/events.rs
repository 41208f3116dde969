use bevy_ecs::entity::Entity;
use bevy_ecs::message::Message;
use bevy_math::{Quat, Vec3};

use crate::error::TransferError;
use crate::model::ResourceType;

/// Where a body stands relative to a trigger volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumePhase {
    Enter,
    Stay,
    Exit,
}

/// Trigger-volume report from the physics collaborator.
///
/// `volume` is the container entity owning the volume. `body` is whatever
/// crossed it: an agent or a free item.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeEvent {
    pub volume: Entity,
    pub body: Entity,
    pub phase: VolumePhase,
}

/// Physical-body request for the physics collaborator.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct BodyCommand {
    pub body: Entity,
    pub kind: BodyCommandKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyCommandKind {
    DisableResponse,
    EnableResponse,
    AttachTo {
        anchor: Entity,
        offset: Vec3,
        rotation: Quat,
    },
    Detach,
    Impulse(Vec3),
}

/// Outbound notification of a possession transition.
///
/// Written by the command applicator after each command, in application order.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum PossessionEvent {
    PickedUp {
        agent: Entity,
        item: Entity,
    },
    Dropped {
        agent: Entity,
        item: Entity,
    },
    Thrown {
        agent: Entity,
        item: Entity,
        impulse: Vec3,
    },
    Deposited {
        container: Entity,
        item: Entity,
        resource_type: ResourceType,
    },
    Withdrawn {
        container: Entity,
        agent: Entity,
        item: Entity,
        resource_type: ResourceType,
    },
    WithdrawRolledBack {
        container: Entity,
        agent: Entity,
    },
    Completed {
        container: Entity,
        replacement: Option<Entity>,
    },
    Ejected {
        container: Entity,
        items: Vec<Entity>,
    },
    HarvestHit {
        target: Entity,
        remaining: i32,
    },
    HarvestDepleted {
        target: Entity,
        replacement: Option<Entity>,
    },
    Rejected {
        error: TransferError,
    },
}
