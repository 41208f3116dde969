use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;
use bevy_math::Vec3;
use tracing::debug;

use crate::ecs::components::{Agent, Item, Pose, Possession};
use crate::ecs::resources::MIN_DROP_GUARD_TICKS;
use crate::error::TransferError;

use super::apply_item;

/// The agent's held item, re-validated against the item's own possession.
/// A slot pointing at an item that is no longer `Held` by this agent counts
/// as empty.
pub(crate) fn held_by(world: &World, agent: Entity) -> Result<Option<Entity>, TransferError> {
    let slot = world
        .get::<Agent>(agent)
        .ok_or(TransferError::Missing(agent))?
        .held_item;
    Ok(slot.filter(|&item| {
        world.get::<Item>(item).map(|i| i.possession) == Some(Possession::Held { agent })
    }))
}

fn bind(world: &mut World, agent: Entity, item: Entity) {
    if let Some(mut a) = world.get_mut::<Agent>(agent) {
        a.held_item = Some(item);
        a.candidate = None;
    }
}

pub(crate) fn arm_drop_guard(world: &mut World, agent: Entity) {
    let ticks = apply_item::config(world)
        .drop_guard_ticks
        .max(MIN_DROP_GUARD_TICKS);
    if let Some(mut a) = world.get_mut::<Agent>(agent) {
        a.drop_guard_ticks = ticks;
    }
}

/// Empty -> Holding with `item`, which must be free and eligible.
pub fn pickup(world: &mut World, agent: Entity, item: Entity) -> Result<(), TransferError> {
    if held_by(world, agent)?.is_some() {
        return Err(TransferError::AgentBusy(agent));
    }
    let target = world.get::<Item>(item).ok_or(TransferError::Missing(item))?;
    if !target.possession.is_free() {
        return Err(TransferError::AlreadyOwned(item));
    }
    if !target.pickup_eligible {
        return Err(TransferError::NotEligible(item));
    }

    apply_item::mark_held(world, item, agent)?;
    bind(world, agent, item);
    debug!(?agent, ?item, "picked up");
    Ok(())
}

/// Holding -> Empty with a plain drop. Arms the drop guard.
pub fn drop_held(world: &mut World, agent: Entity) -> Result<Entity, TransferError> {
    let item = held_by(world, agent)?.ok_or(TransferError::AgentEmpty(agent))?;
    apply_item::release(world, item, Vec3::ZERO)?;
    arm_drop_guard(world, agent);
    debug!(?agent, ?item, "dropped");
    Ok(item)
}

/// Holding -> Empty, launching the item along the agent's facing. With no
/// throw force this is a plain drop and arms the drop guard.
pub fn throw_held(world: &mut World, agent: Entity) -> Result<(Entity, Vec3), TransferError> {
    let item = held_by(world, agent)?.ok_or(TransferError::AgentEmpty(agent))?;
    let throw_force = world
        .get::<Agent>(agent)
        .map(|a| a.throw_force)
        .unwrap_or_default();
    let facing = world
        .get::<Pose>(agent)
        .map(Pose::forward)
        .unwrap_or(Vec3::Z);
    let force = facing * throw_force;
    let impulse = apply_item::release(world, item, force)?;
    // A forceless throw lands like a drop, so it gets the same guard.
    if force == Vec3::ZERO {
        arm_drop_guard(world, agent);
    }
    debug!(?agent, ?item, ?impulse, "thrown");
    Ok((item, impulse))
}

/// Hand `item` to `agent`. The only way containers give an item back.
///
/// Succeeds only while the agent is empty and the item free; otherwise
/// nothing changes and false is returned.
pub fn try_receive(world: &mut World, agent: Entity, item: Entity) -> bool {
    match held_by(world, agent) {
        Ok(None) => {}
        _ => return false,
    }
    if apply_item::mark_held(world, item, agent).is_err() {
        return false;
    }
    bind(world, agent, item);
    true
}
