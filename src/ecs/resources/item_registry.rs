use std::collections::{BTreeMap, BTreeSet};

use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;

use crate::model::ResourceType;

/// Live item entities indexed by resource type.
///
/// Agents scan this instead of the whole world. `ecs::spawn` keeps it current
/// on every item spawn and despawn.
#[derive(Resource, Debug, Clone, Default)]
pub struct ItemRegistry {
    by_type: BTreeMap<ResourceType, BTreeSet<Entity>>,
    types: BTreeMap<Entity, ResourceType>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item. Re-registering moves it to the new type.
    pub fn insert(&mut self, entity: Entity, resource_type: ResourceType) {
        self.remove(entity);
        self.by_type
            .entry(resource_type.clone())
            .or_default()
            .insert(entity);
        self.types.insert(entity, resource_type);
    }

    pub fn remove(&mut self, entity: Entity) -> Option<ResourceType> {
        let resource_type = self.types.remove(&entity)?;
        if let Some(set) = self.by_type.get_mut(&resource_type) {
            set.remove(&entity);
            if set.is_empty() {
                self.by_type.remove(&resource_type);
            }
        }
        Some(resource_type)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.types.contains_key(&entity)
    }

    pub fn resource_type(&self, entity: Entity) -> Option<&ResourceType> {
        self.types.get(&entity)
    }

    pub fn of_type<'a>(&'a self, resource_type: &ResourceType) -> impl Iterator<Item = Entity> + use<'a> {
        self.by_type
            .get(resource_type)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.types.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_type.clear();
        self.types.clear();
    }
}
