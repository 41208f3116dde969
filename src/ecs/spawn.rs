use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;
use tracing::warn;

use crate::ecs::components::*;
use crate::ecs::resources::{
    HighlightCoordinator, ItemRegistry, PossessionConfig, SpawnCatalog, SpawnSpec,
};
use crate::error::TransferError;
use crate::model::{CompletionMode, ResourceType, Signature};

fn register(world: &mut World, entity: Entity, resource_type: ResourceType) {
    // Graceful when the registry is absent (bare worlds in unit tests).
    if let Some(mut registry) = world.get_resource_mut::<ItemRegistry>() {
        registry.insert(entity, resource_type);
    }
}

/// Spawn a free item and register it.
pub fn spawn_item(
    world: &mut World,
    resource_type: ResourceType,
    pose: Pose,
    signature: Signature,
) -> Entity {
    let entity = world
        .spawn((
            Item::free(resource_type.clone()),
            pose,
            PhysicsBody::default(),
            Surface { signature },
        ))
        .id();
    register(world, entity, resource_type);
    entity
}

/// Spawn a free item of `resource_type` using the first matching catalog
/// spec. Without one, a plain item is spawned and a warning logged.
pub fn spawn_item_from_catalog(
    world: &mut World,
    resource_type: ResourceType,
    pose: Pose,
) -> Entity {
    let found = world.get_resource::<SpawnCatalog>().and_then(|catalog| {
        catalog
            .item_spec_for(&resource_type)
            .map(|(name, spec)| (name.to_string(), spec.clone()))
    });
    match found {
        Some((name, SpawnSpec::Item { signature, tool, .. })) => {
            let entity = spawn_item(world, resource_type, pose, signature);
            let mut entity_mut = world.entity_mut(entity);
            entity_mut.insert(SpawnedFrom(name));
            if let Some(tool_type) = tool {
                entity_mut.insert(Tool { tool_type });
            }
            entity
        }
        _ => {
            warn!(
                %resource_type,
                error = %TransferError::MissingSpawnSpec(resource_type.to_string()),
                "no item spec for resource type, spawning a plain item"
            );
            spawn_item(world, resource_type, pose, Signature::default())
        }
    }
}

/// Spawn an agent tuned from the session `PossessionConfig`.
pub fn spawn_agent(world: &mut World, pose: Pose) -> Entity {
    let config = world
        .get_resource::<PossessionConfig>()
        .cloned()
        .unwrap_or_default();
    world
        .spawn((
            Agent::new(config.pickup_range, config.throw_force),
            ActionInput::default(),
            pose,
            PhysicsBody::default(),
        ))
        .id()
}

/// Spawn a container with its trigger-volume bookkeeping and counter.
///
/// A replace-mode container whose recipe has no positive requirement could
/// never complete, so it is downgraded to eject-all.
pub fn spawn_container(
    world: &mut World,
    mut container: Container,
    pose: Pose,
    signature: Signature,
) -> Entity {
    if container.mode == CompletionMode::Replace && !container.recipe.has_positive_requirement() {
        warn!(
            recipe = %container.recipe.describe(container.stored()),
            "container recipe has no positive requirement, falling back to eject-all"
        );
        container.mode = CompletionMode::EjectAll;
    }
    let counter = CounterDisplay(container.counter_text());
    world
        .spawn((
            container,
            VolumeOccupants::default(),
            counter,
            pose,
            Surface { signature },
        ))
        .id()
}

pub fn spawn_harvestable(
    world: &mut World,
    harvestable: Harvestable,
    pose: Pose,
    signature: Signature,
) -> Entity {
    world.spawn((harvestable, pose, Surface { signature })).id()
}

/// Instantiate a named catalog spec at `pose`.
pub fn spawn_from_catalog(
    world: &mut World,
    name: &str,
    pose: Pose,
) -> Result<Entity, TransferError> {
    let spec = world
        .get_resource::<SpawnCatalog>()
        .and_then(|catalog| catalog.get(name).cloned())
        .ok_or_else(|| TransferError::MissingSpawnSpec(name.to_string()))?;

    let entity = match spec {
        SpawnSpec::Item {
            resource_type,
            signature,
            tool,
        } => {
            let entity = spawn_item(world, resource_type, pose, signature);
            if let Some(tool_type) = tool {
                world.entity_mut(entity).insert(Tool { tool_type });
            }
            entity
        }
        SpawnSpec::Prop { signature } => world.spawn((pose, Surface { signature })).id(),
        SpawnSpec::Container(spec) => {
            let signature = spec.signature;
            spawn_container(world, spec.to_container(), pose, signature)
        }
        SpawnSpec::Harvestable {
            health,
            required_tool,
            replacement,
            signature,
        } => spawn_harvestable(
            world,
            Harvestable {
                health,
                required_tool,
                replacement,
            },
            pose,
            signature,
        ),
    };
    world.entity_mut(entity).insert(SpawnedFrom(name.to_string()));
    Ok(entity)
}

/// Despawn an entity and drop every reference the session keeps to it.
///
/// A held item also clears its holder's slot, so no agent is left pointing
/// at a dead entity.
pub fn despawn_tracked(world: &mut World, entity: Entity) -> bool {
    if let Some(holder) = world.get::<Item>(entity).and_then(|i| i.possession.holder())
        && let Some(mut agent) = world.get_mut::<Agent>(holder)
        && agent.held_item == Some(entity)
    {
        agent.held_item = None;
    }
    if let Some(mut coordinator) = world.get_resource_mut::<HighlightCoordinator>() {
        coordinator.forget(entity);
    }
    if let Some(mut registry) = world.get_resource_mut::<ItemRegistry>() {
        registry.remove(entity);
    }
    world.despawn(entity)
}
