use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;
use bevy_math::{Quat, Vec3};

use crate::model::Signature;

/// World-space placement. Items, agents and containers all carry one.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn at(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Facing direction (local +Z).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn distance(&self, other: &Pose) -> f32 {
        self.translation.distance(other.translation)
    }

    /// Pose of something fixed at `offset`/`rotation` relative to `self`.
    pub fn compose(&self, offset: Vec3, rotation: Quat) -> Pose {
        Pose {
            translation: self.translation + self.rotation * offset,
            rotation: self.rotation * rotation,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// Parent-to-anchor link requested from the physics collaborator.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    pub anchor: Entity,
    pub offset: Vec3,
    pub rotation: Quat,
}

impl Attachment {
    /// Zero offset, identity orientation.
    pub fn snapped(anchor: Entity) -> Self {
        Self {
            anchor,
            offset: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Last physical state requested for a body. The physics collaborator
/// receives the same requests as `BodyCommand` messages.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    pub response_enabled: bool,
    pub last_impulse: Option<Vec3>,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            response_enabled: true,
            last_impulse: None,
        }
    }
}

/// Render surface whose signature the highlight coordinator reads and writes.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Surface {
    pub signature: Signature,
}

/// Name of the catalog spec an entity was instantiated from.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct SpawnedFrom(pub String);
