use bevy_ecs::entity::Entity;
use bevy_ecs::message::Messages;
use bevy_ecs::prelude::Mut;
use bevy_ecs::world::World;
use bevy_math::{Quat, Vec3};
use tracing::{debug, info, warn};

use crate::ecs::components::{
    Agent, Attachment, Container, Harvestable, Item, PhysicsBody, Pose, Possession, Tool,
};
use crate::ecs::events::{BodyCommand, BodyCommandKind};
use crate::ecs::resources::{HighlightCoordinator, PossessionConfig};
use crate::ecs::spawn;
use crate::error::TransferError;
use crate::model::{StoragePolicy, ToolType};

/// Result of one tool strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Wrong tool; health unchanged.
    Mismatch,
    Damaged { remaining: i32 },
    Depleted { replacement: Option<Entity> },
}

/// Ask the physics collaborator for `kind` and mirror it on `PhysicsBody`.
pub(crate) fn send_body(world: &mut World, body: Entity, kind: BodyCommandKind) {
    if let Some(mut physics) = world.get_mut::<PhysicsBody>(body) {
        match kind {
            BodyCommandKind::DisableResponse => physics.response_enabled = false,
            BodyCommandKind::EnableResponse => physics.response_enabled = true,
            BodyCommandKind::Impulse(impulse) => physics.last_impulse = Some(impulse),
            BodyCommandKind::AttachTo { .. } | BodyCommandKind::Detach => {}
        }
    }
    if let Some(mut messages) = world.get_resource_mut::<Messages<BodyCommand>>() {
        messages.write(BodyCommand { body, kind });
    }
}

pub(crate) fn clear_emphasis(world: &mut World, target: Entity) {
    if !world.contains_resource::<HighlightCoordinator>() {
        return;
    }
    world.resource_scope(|world, mut coordinator: Mut<HighlightCoordinator>| {
        coordinator.remove(world, target);
    });
}

pub(crate) fn config(world: &World) -> PossessionConfig {
    world
        .get_resource::<PossessionConfig>()
        .cloned()
        .unwrap_or_default()
}

fn attach(world: &mut World, item: Entity, anchor: Entity) {
    let attachment = Attachment::snapped(anchor);
    world.entity_mut(item).insert(attachment);
    send_body(world, item, BodyCommandKind::DisableResponse);
    send_body(
        world,
        item,
        BodyCommandKind::AttachTo {
            anchor,
            offset: attachment.offset,
            rotation: attachment.rotation,
        },
    );
}

fn set_possession(world: &mut World, item: Entity, possession: Possession) {
    if let Some(mut it) = world.get_mut::<Item>(item) {
        it.possession = possession;
    }
}

/// Free -> Held. Only the agent operations call this; they keep the agent's
/// slot in step.
pub(crate) fn mark_held(
    world: &mut World,
    item: Entity,
    agent: Entity,
) -> Result<(), TransferError> {
    let anchor = world
        .get::<Agent>(agent)
        .ok_or(TransferError::Missing(agent))?
        .anchor_for(agent);
    let possession = world
        .get::<Item>(item)
        .ok_or(TransferError::Missing(item))?
        .possession;
    if !possession.is_free() {
        return Err(TransferError::AlreadyOwned(item));
    }

    clear_emphasis(world, item);
    set_possession(world, item, Possession::Held { agent });
    attach(world, item, anchor);
    Ok(())
}

/// Held -> Free. A zero `force` is a plain drop and gets the configured
/// upward impulse instead. Clears the holder's slot. Returns the impulse
/// actually applied.
pub(crate) fn release(
    world: &mut World,
    item: Entity,
    force: Vec3,
) -> Result<Vec3, TransferError> {
    let holder = world
        .get::<Item>(item)
        .ok_or(TransferError::Missing(item))?
        .possession
        .holder()
        .ok_or(TransferError::NotHeld(item))?;

    let impulse = if force == Vec3::ZERO {
        Vec3::Y * config(world).drop_impulse
    } else {
        force
    };

    if let Some(mut agent) = world.get_mut::<Agent>(holder)
        && agent.held_item == Some(item)
    {
        agent.held_item = None;
    }
    set_possession(world, item, Possession::Free);
    world.entity_mut(item).remove::<Attachment>();
    send_body(world, item, BodyCommandKind::Detach);
    send_body(world, item, BodyCommandKind::EnableResponse);
    send_body(world, item, BodyCommandKind::Impulse(impulse));
    Ok(impulse)
}

/// Free or Held -> Stored. Under `Consume` the item is destroyed and only
/// the container's count remembers it.
pub(crate) fn mark_stored(
    world: &mut World,
    item: Entity,
    container: Entity,
) -> Result<(), TransferError> {
    let (policy, anchor) = {
        let c = world
            .get::<Container>(container)
            .ok_or(TransferError::Missing(container))?;
        (c.policy, c.anchor_for(container))
    };
    let possession = world
        .get::<Item>(item)
        .ok_or(TransferError::Missing(item))?
        .possession;
    if let Possession::Stored { .. } = possession {
        return Err(TransferError::AlreadyStored(item));
    }
    if let Possession::Held { agent } = possession
        && let Some(mut holder) = world.get_mut::<Agent>(agent)
        && holder.held_item == Some(item)
    {
        holder.held_item = None;
    }

    match policy {
        StoragePolicy::Consume => {
            spawn::despawn_tracked(world, item);
        }
        StoragePolicy::Preserve => {
            clear_emphasis(world, item);
            set_possession(world, item, Possession::Stored { container });
            attach(world, item, anchor);
        }
    }
    Ok(())
}

/// Stored -> Free at `pose`, for preserved instances leaving a container.
pub(crate) fn unstore(world: &mut World, item: Entity, pose: Pose) {
    set_possession(world, item, Possession::Free);
    let mut entity = world.entity_mut(item);
    entity.remove::<Attachment>();
    entity.insert(pose);
    send_body(world, item, BodyCommandKind::Detach);
    send_body(world, item, BodyCommandKind::EnableResponse);
}

/// Strike a harvestable with `tool_type`. The matching tool takes one point
/// of health; at zero the target is replaced by its catalog spec.
pub fn process_hit(
    world: &mut World,
    target: Entity,
    tool_type: &ToolType,
) -> Result<HitOutcome, TransferError> {
    if world.get_entity(target).is_err() {
        return Err(TransferError::Missing(target));
    }
    let mut harvestable = world
        .get_mut::<Harvestable>(target)
        .ok_or(TransferError::NotHarvestable(target))?;
    if harvestable.required_tool != *tool_type {
        debug!(?target, %tool_type, required = %harvestable.required_tool, "tool mismatch");
        return Ok(HitOutcome::Mismatch);
    }
    harvestable.health -= 1;
    if harvestable.health > 0 {
        return Ok(HitOutcome::Damaged {
            remaining: harvestable.health,
        });
    }

    let replacement_name = harvestable.replacement.clone();
    let pose = world.get::<Pose>(target).copied().unwrap_or_default();
    spawn::despawn_tracked(world, target);

    let replacement = match replacement_name {
        Some(name) => match spawn::spawn_from_catalog(world, &name, pose) {
            Ok(entity) => Some(entity),
            Err(error) => {
                warn!(?target, %error, "harvest replacement unavailable");
                None
            }
        },
        None => None,
    };
    info!(?target, ?replacement, "harvestable depleted");
    Ok(HitOutcome::Depleted { replacement })
}

/// Strike `target` with whatever tool `agent` is holding.
pub fn hit_with_held_tool(
    world: &mut World,
    agent: Entity,
    target: Entity,
) -> Result<HitOutcome, TransferError> {
    let held = super::apply_agent::held_by(world, agent)?.ok_or(TransferError::AgentEmpty(agent))?;
    let tool_type = world
        .get::<Tool>(held)
        .ok_or(TransferError::NotATool(held))?
        .tool_type
        .clone();
    process_hit(world, target, &tool_type)
}

/// Orientation-free placement helper for items appearing beside an entity.
pub(crate) fn pose_at_offset(world: &World, origin: Entity, offset: Vec3) -> Pose {
    world
        .get::<Pose>(origin)
        .copied()
        .unwrap_or_default()
        .compose(offset, Quat::IDENTITY)
}
