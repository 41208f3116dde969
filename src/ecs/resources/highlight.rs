use std::collections::BTreeMap;

use bevy_ecs::entity::Entity;
use bevy_ecs::prelude::Mut;
use bevy_ecs::resource::Resource;
use bevy_ecs::system::Query;
use bevy_ecs::world::World;
use tracing::debug;

use crate::ecs::components::Surface;
use crate::model::{EmphasisStyle, Signature};

/// Read/write access to render surfaces by entity.
///
/// Exclusive code passes the `World`; systems pass their `Query<&mut Surface>`.
pub trait SurfaceAccess {
    fn read_signature(&self, target: Entity) -> Option<Signature>;

    /// Returns false when `target` has no surface.
    fn write_signature(&mut self, target: Entity, signature: Signature) -> bool;
}

impl SurfaceAccess for World {
    fn read_signature(&self, target: Entity) -> Option<Signature> {
        self.get::<Surface>(target).map(|s| s.signature)
    }

    fn write_signature(&mut self, target: Entity, signature: Signature) -> bool {
        match self.get_mut::<Surface>(target) {
            Some(mut surface) => {
                surface.signature = signature;
                true
            }
            None => false,
        }
    }
}

impl SurfaceAccess for Query<'_, '_, &mut Surface> {
    fn read_signature(&self, target: Entity) -> Option<Signature> {
        self.get(target).ok().map(|s| s.signature)
    }

    fn write_signature(&mut self, target: Entity, signature: Signature) -> bool {
        match self.get_mut(target) {
            Ok(mut surface) => {
                surface.signature = signature;
                true
            }
            Err(_) => false,
        }
    }
}

/// Reversible emphasis on render surfaces.
///
/// Every key in `saved` currently shows the emphasized signature, and its
/// value is what the surface looked like before. Applying twice is a no-op;
/// removing always writes the saved signature back.
#[derive(Resource, Debug, Clone, Default)]
pub struct HighlightCoordinator {
    saved: BTreeMap<Entity, Signature>,
    style: EmphasisStyle,
}

impl HighlightCoordinator {
    pub fn new(style: EmphasisStyle) -> Self {
        Self {
            saved: BTreeMap::new(),
            style,
        }
    }

    pub fn style(&self) -> EmphasisStyle {
        self.style
    }

    /// Emphasize `target`. Returns true only when the emphasis was newly applied.
    pub fn apply(&mut self, surfaces: &mut impl SurfaceAccess, target: Entity) -> bool {
        if self.saved.contains_key(&target) {
            return false;
        }
        let Some(original) = surfaces.read_signature(target) else {
            return false;
        };
        if !surfaces.write_signature(target, self.style.emphasize(original)) {
            return false;
        }
        self.saved.insert(target, original);
        debug!(?target, "emphasis applied");
        true
    }

    /// Restore `target`. Returns true when something was restored.
    pub fn remove(&mut self, surfaces: &mut impl SurfaceAccess, target: Entity) -> bool {
        let Some(original) = self.saved.remove(&target) else {
            return false;
        };
        surfaces.write_signature(target, original);
        debug!(?target, "emphasis removed");
        true
    }

    pub fn is_emphasized(&self, target: Entity) -> bool {
        self.saved.contains_key(&target)
    }

    pub fn saved_signature(&self, target: Entity) -> Option<Signature> {
        self.saved.get(&target).copied()
    }

    pub fn emphasized(&self) -> impl Iterator<Item = Entity> + '_ {
        self.saved.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    /// Drop the entry for a target whose surface is gone, without writing.
    pub fn forget(&mut self, target: Entity) -> Option<Signature> {
        self.saved.remove(&target)
    }

    /// Write back every saved signature and clear the mapping.
    pub fn restore_all(&mut self, surfaces: &mut impl SurfaceAccess) -> usize {
        let saved = std::mem::take(&mut self.saved);
        let count = saved.len();
        for (target, original) in saved {
            surfaces.write_signature(target, original);
        }
        count
    }

    /// Session teardown: restore everything still emphasized in `world`.
    pub fn teardown(world: &mut World) -> usize {
        if !world.contains_resource::<HighlightCoordinator>() {
            return 0;
        }
        world.resource_scope(|world, mut coordinator: Mut<HighlightCoordinator>| {
            coordinator.restore_all(world)
        })
    }
}
