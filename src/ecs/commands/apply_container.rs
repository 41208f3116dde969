use std::f32::consts::TAU;

use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;
use bevy_math::Vec3;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::ecs::components::{
    Agent, Container, CounterDisplay, Item, PickupCooldown, Pose, Possession,
};
use crate::ecs::events::BodyCommandKind;
use crate::ecs::resources::{EjectRng, ItemRegistry};
use crate::ecs::spawn;
use crate::error::TransferError;
use crate::model::{CompletionState, ResourceType, StoragePolicy};

use super::apply_agent;
use super::apply_item;

/// How a container left the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Replaced { replacement: Option<Entity> },
    Ejected { items: Vec<Entity> },
}

/// An accepted deposit and whatever completion it triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deposit {
    pub item: Entity,
    pub resource_type: ResourceType,
    pub completion: Option<Completion>,
}

fn refresh_counter(world: &mut World, container: Entity) {
    let Some(text) = world.get::<Container>(container).map(Container::counter_text) else {
        return;
    };
    if let Some(mut display) = world.get_mut::<CounterDisplay>(container) {
        display.0 = text;
    }
}

/// Preserved instances stored in `container`, in entity order.
fn stored_instances(world: &World, container: Entity) -> Vec<Entity> {
    let Some(registry) = world.get_resource::<ItemRegistry>() else {
        return Vec::new();
    };
    registry
        .iter()
        .filter(|&e| {
            world.get::<Item>(e).map(|i| i.possession) == Some(Possession::Stored { container })
        })
        .collect()
}

fn stored_instance_of(
    world: &World,
    container: Entity,
    resource_type: &ResourceType,
) -> Option<Entity> {
    let registry = world.get_resource::<ItemRegistry>()?;
    registry.of_type(resource_type).find(|&e| {
        world.get::<Item>(e).map(|i| i.possession) == Some(Possession::Stored { container })
    })
}

fn store(
    world: &mut World,
    container: Entity,
    item: Entity,
    resource_type: ResourceType,
) -> Result<Deposit, TransferError> {
    world
        .get::<Container>(container)
        .ok_or(TransferError::Missing(container))?
        .check_deposit(container, &resource_type)?;

    apply_item::mark_stored(world, item, container)?;
    if let Some(mut c) = world.get_mut::<Container>(container) {
        c.stored.increment(&resource_type);
    }
    refresh_counter(world, container);
    debug!(?container, ?item, %resource_type, "deposited");

    let complete_now = world
        .get::<Container>(container)
        .is_some_and(Container::is_recipe_complete);
    let completion = if complete_now {
        Some(complete(world, container)?)
    } else {
        None
    };
    Ok(Deposit {
        item,
        resource_type,
        completion,
    })
}

/// Deposit a free item whose body entered the container's volume.
pub fn deposit_free(
    world: &mut World,
    container: Entity,
    item: Entity,
) -> Result<Deposit, TransferError> {
    let it = world.get::<Item>(item).ok_or(TransferError::Missing(item))?;
    match it.possession {
        Possession::Free => {}
        Possession::Held { .. } => return Err(TransferError::AlreadyOwned(item)),
        Possession::Stored { .. } => return Err(TransferError::AlreadyStored(item)),
    }
    if !it.pickup_eligible {
        return Err(TransferError::NotEligible(item));
    }
    let resource_type = it.resource_type.clone();
    store(world, container, item, resource_type)
}

/// Deposit the item `agent` is holding. Arms the agent's drop guard so the
/// same interaction cannot turn into a withdraw.
pub fn deposit_held(
    world: &mut World,
    container: Entity,
    agent: Entity,
) -> Result<Deposit, TransferError> {
    let item = apply_agent::held_by(world, agent)?.ok_or(TransferError::AgentEmpty(agent))?;
    let resource_type = world
        .get::<Item>(item)
        .ok_or(TransferError::Missing(item))?
        .resource_type
        .clone();
    let deposit = store(world, container, item, resource_type)?;
    apply_agent::arm_drop_guard(world, agent);
    Ok(deposit)
}

/// Hand one stored unit to `agent`.
///
/// Picks the first requirement-ordered type with a positive count. The
/// agent's emptiness is settled by `try_receive`; if it refuses, the unit is
/// taken back and the count restored.
pub fn withdraw(
    world: &mut World,
    container: Entity,
    agent: Entity,
) -> Result<Entity, TransferError> {
    if world
        .get::<Agent>(agent)
        .ok_or(TransferError::Missing(agent))?
        .has_recent_drop()
    {
        return Err(TransferError::DropGuardActive(agent));
    }
    let (resource_type, policy, offset) = {
        let c = world
            .get::<Container>(container)
            .ok_or(TransferError::Missing(container))?;
        if c.is_completed() {
            return Err(TransferError::ContainerCompleted(container));
        }
        let resource_type = c
            .recipe
            .first_available(&c.stored)
            .cloned()
            .ok_or(TransferError::NothingStored(container))?;
        (resource_type, c.policy, c.spawn_offset)
    };
    let pose = apply_item::pose_at_offset(world, container, offset);

    if let Some(mut c) = world.get_mut::<Container>(container) {
        c.stored.decrement(&resource_type);
    }
    let unit = match policy {
        StoragePolicy::Preserve => match stored_instance_of(world, container, &resource_type) {
            Some(instance) => {
                apply_item::unstore(world, instance, pose);
                instance
            }
            None => spawn::spawn_item_from_catalog(world, resource_type.clone(), pose),
        },
        StoragePolicy::Consume => spawn::spawn_item_from_catalog(world, resource_type.clone(), pose),
    };

    if !apply_agent::try_receive(world, agent, unit) {
        match policy {
            StoragePolicy::Consume => {
                spawn::despawn_tracked(world, unit);
            }
            StoragePolicy::Preserve => {
                apply_item::mark_stored(world, unit, container)?;
            }
        }
        if let Some(mut c) = world.get_mut::<Container>(container) {
            c.stored.increment(&resource_type);
        }
        refresh_counter(world, container);
        warn!(
            ?container,
            ?agent,
            %resource_type,
            "agent could not receive withdrawn unit, rolled back"
        );
        return Err(TransferError::RaceRollback { container, agent });
    }

    refresh_counter(world, container);
    debug!(?container, ?agent, item = ?unit, %resource_type, "withdrawn");
    Ok(unit)
}

fn mark_completed(world: &mut World, container: Entity) {
    if let Some(mut c) = world.get_mut::<Container>(container) {
        c.state = CompletionState::Completed;
    }
    refresh_counter(world, container);
    apply_item::clear_emphasis(world, container);
}

/// Put every stored unit back in the world beside the container, scattered
/// outward and briefly ineligible for pickup or deposit.
fn eject_units(world: &mut World, container: Entity) -> Vec<Entity> {
    let Some((policy, offset, counts)) = world.get::<Container>(container).map(|c| {
        let counts: Vec<(ResourceType, u32)> =
            c.stored.iter().map(|(rt, n)| (rt.clone(), n)).collect();
        (c.policy, c.spawn_offset, counts)
    }) else {
        return Vec::new();
    };
    let config = apply_item::config(world);
    let pose = apply_item::pose_at_offset(world, container, offset);
    let total: u32 = counts.iter().map(|(_, n)| n).sum();

    let directions: Vec<Vec3> = match world.get_resource_mut::<EjectRng>() {
        Some(mut rng) => (0..total)
            .map(|_| {
                let angle = rng.0.random_range(0.0..TAU);
                Vec3::new(angle.cos(), 1.0, angle.sin()).normalize()
            })
            .collect(),
        None => vec![Vec3::Y; total as usize],
    };
    let mut directions = directions.into_iter();

    let mut instances = match policy {
        StoragePolicy::Preserve => stored_instances(world, container),
        StoragePolicy::Consume => Vec::new(),
    };
    let mut ejected = Vec::with_capacity(total as usize);
    for (resource_type, count) in counts {
        for _ in 0..count {
            let reused = instances.iter().position(|&e| {
                world
                    .get::<Item>(e)
                    .is_some_and(|i| i.resource_type == resource_type)
            });
            let unit = match reused {
                Some(index) => {
                    let instance = instances.remove(index);
                    apply_item::unstore(world, instance, pose);
                    instance
                }
                None => spawn::spawn_item_from_catalog(world, resource_type.clone(), pose),
            };
            // A zero grace window leaves the unit eligible straight away.
            if config.eject_grace_ticks > 0 {
                if let Some(mut item) = world.get_mut::<Item>(unit) {
                    item.pickup_eligible = false;
                }
                world.entity_mut(unit).insert(PickupCooldown {
                    remaining_ticks: config.eject_grace_ticks,
                });
            }
            let direction = directions.next().unwrap_or(Vec3::Y);
            apply_item::send_body(
                world,
                unit,
                BodyCommandKind::Impulse(direction * config.eject_force),
            );
            ejected.push(unit);
        }
    }
    if let Some(mut c) = world.get_mut::<Container>(container) {
        c.stored.clear();
    }
    ejected
}

fn destroy_with_contents(world: &mut World, container: Entity) {
    for instance in stored_instances(world, container) {
        spawn::despawn_tracked(world, instance);
    }
    spawn::despawn_tracked(world, container);
}

/// Terminal completion: mark completed, instantiate the replacement at the
/// container's pose and destroy the container with everything it stores.
///
/// With no replacement configured the container still completes. A
/// replacement missing from the catalog degrades to ejecting the stored
/// units instead.
pub fn complete(world: &mut World, container: Entity) -> Result<Completion, TransferError> {
    let replacement = {
        let c = world
            .get::<Container>(container)
            .ok_or(TransferError::Missing(container))?;
        if c.is_completed() {
            return Err(TransferError::ContainerCompleted(container));
        }
        c.replacement.clone()
    };
    let pose = world
        .get::<Pose>(container)
        .copied()
        .unwrap_or_default();
    mark_completed(world, container);

    let completion = match replacement {
        None => {
            warn!(?container, "container completed with no replacement spec");
            Completion::Replaced { replacement: None }
        }
        Some(name) => match spawn::spawn_from_catalog(world, &name, pose) {
            Ok(entity) => Completion::Replaced {
                replacement: Some(entity),
            },
            Err(error) => {
                warn!(?container, %error, "replacement unavailable, ejecting stored units");
                Completion::Ejected {
                    items: eject_units(world, container),
                }
            }
        },
    };

    destroy_with_contents(world, container);
    info!(?container, ?completion, "container completed");
    Ok(completion)
}

/// Eject-all completion on interaction by an empty agent.
pub fn eject_all(
    world: &mut World,
    container: Entity,
    agent: Entity,
) -> Result<Vec<Entity>, TransferError> {
    if apply_agent::held_by(world, agent)?.is_some() {
        return Err(TransferError::AgentBusy(agent));
    }
    if world
        .get::<Agent>(agent)
        .is_some_and(|a| a.has_recent_drop())
    {
        return Err(TransferError::DropGuardActive(agent));
    }
    {
        let c = world
            .get::<Container>(container)
            .ok_or(TransferError::Missing(container))?;
        if c.is_completed() {
            return Err(TransferError::ContainerCompleted(container));
        }
        if !c.stored.has_any() {
            return Err(TransferError::NothingStored(container));
        }
    }

    mark_completed(world, container);
    let items = eject_units(world, container);
    destroy_with_contents(world, container);
    info!(?container, count = items.len(), "container ejected its contents");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use bevy_ecs::message::Messages;

    use super::*;
    use crate::ecs::components::{Agent, Attachment};
    use crate::ecs::events::BodyCommand;
    use crate::ecs::resources::{
        HighlightCoordinator, PossessionConfig, SpawnCatalog, SpawnSpec,
    };
    use crate::model::{CompletionMode, Recipe, Signature};

    fn world() -> World {
        let mut world = World::new();
        world.insert_resource(ItemRegistry::new());
        world.insert_resource(HighlightCoordinator::default());
        world.insert_resource(PossessionConfig::default());
        world.insert_resource(SpawnCatalog::new());
        world.insert_resource(EjectRng::default());
        world.insert_resource(Messages::<BodyCommand>::default());
        world
    }

    fn item(world: &mut World, resource_type: ResourceType) -> Entity {
        spawn::spawn_item(world, resource_type, Pose::default(), Signature::default())
    }

    fn container(world: &mut World, container: Container) -> Entity {
        spawn::spawn_container(world, container, Pose::default(), Signature::default())
    }

    fn stored(world: &World, container: Entity, resource_type: ResourceType) -> u32 {
        world
            .get::<Container>(container)
            .unwrap()
            .stored()
            .get(&resource_type)
    }

    #[test]
    fn quota_full_deposit_is_rejected_not_clamped() {
        let mut world = world();
        let bin = container(
            &mut world,
            Container::new(Recipe::new([(ResourceType::Stone, 1), (ResourceType::Wood, 5)])),
        );
        let first = item(&mut world, ResourceType::Stone);
        let second = item(&mut world, ResourceType::Stone);

        deposit_free(&mut world, bin, first).unwrap();
        assert_eq!(
            deposit_free(&mut world, bin, second),
            Err(TransferError::QuotaExceeded {
                container: bin,
                resource_type: ResourceType::Stone,
                required: 1,
            })
        );
        assert_eq!(stored(&world, bin, ResourceType::Stone), 1);
        assert!(world.get::<Item>(second).unwrap().possession().is_free());
        assert_eq!(
            world.get::<CounterDisplay>(bin).unwrap().0,
            "stone 1/1, wood 0/5"
        );
    }

    #[test]
    fn consume_policy_destroys_deposited_item() {
        let mut world = world();
        let bin = container(&mut world, Container::new(Recipe::new([(ResourceType::Wood, 3)])));
        let wood = item(&mut world, ResourceType::Wood);

        let deposit = deposit_free(&mut world, bin, wood).unwrap();
        assert_eq!(deposit.completion, None);
        assert!(world.get_entity(wood).is_err());
        assert!(!world.resource::<ItemRegistry>().contains(wood));
    }

    #[test]
    fn preserve_policy_attaches_item_to_storage_anchor() {
        let mut world = world();
        let bin = container(
            &mut world,
            Container::new(Recipe::new([(ResourceType::Wood, 3)]))
                .with_policy(StoragePolicy::Preserve),
        );
        let wood = item(&mut world, ResourceType::Wood);

        deposit_free(&mut world, bin, wood).unwrap();
        assert_eq!(
            world.get::<Item>(wood).unwrap().possession(),
            Possession::Stored { container: bin }
        );
        assert_eq!(world.get::<Attachment>(wood).unwrap().anchor, bin);
        assert_eq!(
            deposit_free(&mut world, bin, wood),
            Err(TransferError::AlreadyStored(wood))
        );
    }

    #[test]
    fn held_deposit_clears_agent_and_arms_guard() {
        let mut world = world();
        let agent = spawn::spawn_agent(&mut world, Pose::default());
        let bin = container(&mut world, Container::new(Recipe::new([(ResourceType::Ore, 2)])));
        let ore = item(&mut world, ResourceType::Ore);
        apply_agent::pickup(&mut world, agent, ore).unwrap();

        deposit_held(&mut world, bin, agent).unwrap();
        let a = world.get::<Agent>(agent).unwrap();
        assert!(a.is_empty());
        assert!(a.has_recent_drop());
        assert_eq!(stored(&world, bin, ResourceType::Ore), 1);
    }

    #[test]
    fn withdraw_hands_fresh_unit_to_agent() {
        let mut world = world();
        let agent = spawn::spawn_agent(&mut world, Pose::default());
        let bin = container(&mut world, Container::new(Recipe::new([(ResourceType::Wood, 5)])));
        for _ in 0..3 {
            let wood = item(&mut world, ResourceType::Wood);
            deposit_free(&mut world, bin, wood).unwrap();
        }

        let unit = withdraw(&mut world, bin, agent).unwrap();
        assert_eq!(stored(&world, bin, ResourceType::Wood), 2);
        assert_eq!(world.get::<Agent>(agent).unwrap().held_item(), Some(unit));
        assert_eq!(
            world.get::<Item>(unit).unwrap().possession(),
            Possession::Held { agent }
        );
    }

    #[test]
    fn withdraw_rolls_back_when_agent_is_busy() {
        let mut world = world();
        let agent = spawn::spawn_agent(&mut world, Pose::default());
        let bin = container(&mut world, Container::new(Recipe::new([(ResourceType::Wood, 5)])));
        let wood = item(&mut world, ResourceType::Wood);
        deposit_free(&mut world, bin, wood).unwrap();
        let held = item(&mut world, ResourceType::Stone);
        apply_agent::pickup(&mut world, agent, held).unwrap();
        let live_items = world.resource::<ItemRegistry>().len();

        assert_eq!(
            withdraw(&mut world, bin, agent),
            Err(TransferError::RaceRollback { container: bin, agent })
        );
        assert_eq!(stored(&world, bin, ResourceType::Wood), 1);
        assert_eq!(world.resource::<ItemRegistry>().len(), live_items);
        assert_eq!(world.get::<Agent>(agent).unwrap().held_item(), Some(held));
    }

    #[test]
    fn withdraw_respects_drop_guard() {
        let mut world = world();
        let agent = spawn::spawn_agent(&mut world, Pose::default());
        let bin = container(&mut world, Container::new(Recipe::new([(ResourceType::Wood, 5)])));
        let wood = item(&mut world, ResourceType::Wood);
        deposit_free(&mut world, bin, wood).unwrap();
        apply_agent::arm_drop_guard(&mut world, agent);

        assert_eq!(
            withdraw(&mut world, bin, agent),
            Err(TransferError::DropGuardActive(agent))
        );
        assert_eq!(stored(&world, bin, ResourceType::Wood), 1);
    }

    #[test]
    fn completion_spawns_replacement_and_destroys_container() {
        let mut world = world();
        world.insert_resource(
            SpawnCatalog::new().with("opened_chest", SpawnSpec::Prop { signature: Signature::default() }),
        );
        let chest = container(
            &mut world,
            Container::new(Recipe::new([(ResourceType::Stone, 2)]))
                .with_replacement("opened_chest"),
        );
        let a = item(&mut world, ResourceType::Stone);
        let b = item(&mut world, ResourceType::Stone);

        assert_eq!(deposit_free(&mut world, chest, a).unwrap().completion, None);
        let Some(Completion::Replaced {
            replacement: Some(opened),
        }) = deposit_free(&mut world, chest, b).unwrap().completion
        else {
            panic!("second stone should complete the chest");
        };
        assert!(world.get_entity(chest).is_err());
        assert!(world.get_entity(opened).is_ok());
    }

    #[test]
    fn missing_replacement_spec_falls_back_to_eject() {
        let mut world = world();
        let chest = container(
            &mut world,
            Container::new(Recipe::new([(ResourceType::Stone, 1)])).with_replacement("gone"),
        );
        let stone = item(&mut world, ResourceType::Stone);

        let Some(Completion::Ejected { items }) =
            deposit_free(&mut world, chest, stone).unwrap().completion
        else {
            panic!("missing replacement should eject");
        };
        assert_eq!(items.len(), 1);
        assert!(!world.get::<Item>(items[0]).unwrap().pickup_eligible);
        assert!(world.get_entity(chest).is_err());
    }

    #[test]
    fn eject_all_scatters_every_unit() {
        let mut world = world();
        let agent = spawn::spawn_agent(&mut world, Pose::default());
        let sack = container(
            &mut world,
            Container::new(Recipe::open()).with_mode(CompletionMode::EjectAll),
        );
        for rt in [ResourceType::Clay, ResourceType::Clay, ResourceType::Fiber] {
            let unit = item(&mut world, rt);
            deposit_free(&mut world, sack, unit).unwrap();
        }
        assert_eq!(world.get::<CounterDisplay>(sack).unwrap().0, "3 stored");

        let items = eject_all(&mut world, sack, agent).unwrap();
        assert_eq!(items.len(), 3);
        for unit in &items {
            let it = world.get::<Item>(*unit).unwrap();
            assert!(it.possession().is_free());
            assert!(!it.pickup_eligible);
            assert_eq!(
                world.get::<PickupCooldown>(*unit).unwrap().remaining_ticks,
                PossessionConfig::default().eject_grace_ticks
            );
        }
        assert!(world.get_entity(sack).is_err());
    }

    #[test]
    fn completed_container_is_terminal() {
        let mut world = world();
        let agent = spawn::spawn_agent(&mut world, Pose::default());
        let bin = container(&mut world, Container::new(Recipe::new([(ResourceType::Wood, 5)])));
        let wood = item(&mut world, ResourceType::Wood);
        deposit_free(&mut world, bin, wood).unwrap();
        world.get_mut::<Container>(bin).unwrap().state = CompletionState::Completed;

        let late = item(&mut world, ResourceType::Wood);
        assert_eq!(
            deposit_free(&mut world, bin, late),
            Err(TransferError::ContainerCompleted(bin))
        );
        assert_eq!(
            withdraw(&mut world, bin, agent),
            Err(TransferError::ContainerCompleted(bin))
        );
        assert_eq!(complete(&mut world, bin), Err(TransferError::ContainerCompleted(bin)));
        assert_eq!(stored(&world, bin, ResourceType::Wood), 1);
    }

    #[test]
    fn zero_grace_eject_leaves_units_eligible() {
        let mut world = world();
        world.insert_resource(PossessionConfig {
            eject_grace_ticks: 0,
            ..Default::default()
        });
        let agent = spawn::spawn_agent(&mut world, Pose::default());
        let sack = container(
            &mut world,
            Container::new(Recipe::open()).with_mode(CompletionMode::EjectAll),
        );
        let clay = item(&mut world, ResourceType::Clay);
        deposit_free(&mut world, sack, clay).unwrap();

        let items = eject_all(&mut world, sack, agent).unwrap();
        assert_eq!(items.len(), 1);
        assert!(world.get::<Item>(items[0]).unwrap().is_available());
        assert!(world.get::<PickupCooldown>(items[0]).is_none());
    }

    fn preserving(world: &mut World, container: Container) -> Entity {
        self::container(world, container.with_policy(StoragePolicy::Preserve))
    }

    #[test]
    fn preserved_withdraw_returns_the_stored_instance() {
        let mut world = world();
        let agent = spawn::spawn_agent(&mut world, Pose::default());
        let bin = preserving(&mut world, Container::new(Recipe::new([(ResourceType::Wood, 5)])));
        let wood = item(&mut world, ResourceType::Wood);
        deposit_free(&mut world, bin, wood).unwrap();
        let live_items = world.resource::<ItemRegistry>().len();

        assert_eq!(withdraw(&mut world, bin, agent), Ok(wood));
        assert_eq!(
            world.get::<Item>(wood).unwrap().possession(),
            Possession::Held { agent }
        );
        assert_eq!(world.get::<Attachment>(wood).unwrap().anchor, agent);
        assert_eq!(stored(&world, bin, ResourceType::Wood), 0);
        assert_eq!(world.resource::<ItemRegistry>().len(), live_items);
    }

    #[test]
    fn preserved_rollback_puts_instance_back_in_storage() {
        let mut world = world();
        let agent = spawn::spawn_agent(&mut world, Pose::default());
        let bin = preserving(&mut world, Container::new(Recipe::new([(ResourceType::Wood, 5)])));
        let wood = item(&mut world, ResourceType::Wood);
        deposit_free(&mut world, bin, wood).unwrap();
        let held = item(&mut world, ResourceType::Stone);
        apply_agent::pickup(&mut world, agent, held).unwrap();

        assert_eq!(
            withdraw(&mut world, bin, agent),
            Err(TransferError::RaceRollback { container: bin, agent })
        );
        assert_eq!(
            world.get::<Item>(wood).unwrap().possession(),
            Possession::Stored { container: bin }
        );
        assert_eq!(world.get::<Attachment>(wood).unwrap().anchor, bin);
        assert_eq!(stored(&world, bin, ResourceType::Wood), 1);
        assert_eq!(world.get::<Agent>(agent).unwrap().held_item(), Some(held));
    }

    #[test]
    fn preserved_eject_reuses_stored_instances() {
        let mut world = world();
        let agent = spawn::spawn_agent(&mut world, Pose::default());
        let sack = preserving(
            &mut world,
            Container::new(Recipe::open()).with_mode(CompletionMode::EjectAll),
        );
        let clay = item(&mut world, ResourceType::Clay);
        let fiber = item(&mut world, ResourceType::Fiber);
        deposit_free(&mut world, sack, clay).unwrap();
        deposit_free(&mut world, sack, fiber).unwrap();
        let live_items = world.resource::<ItemRegistry>().len();

        let mut items = eject_all(&mut world, sack, agent).unwrap();
        items.sort();
        let mut expected = vec![clay, fiber];
        expected.sort();
        assert_eq!(items, expected);
        for unit in &items {
            assert!(world.get::<Item>(*unit).unwrap().possession().is_free());
            assert!(world.get::<Attachment>(*unit).is_none());
        }
        assert_eq!(world.resource::<ItemRegistry>().len(), live_items);
        assert!(world.get_entity(sack).is_err());
    }

    #[test]
    fn preserved_contents_are_destroyed_on_completion() {
        let mut world = world();
        let chest = preserving(
            &mut world,
            Container::new(Recipe::new([(ResourceType::Stone, 2)])),
        );
        let a = item(&mut world, ResourceType::Stone);
        let b = item(&mut world, ResourceType::Stone);

        deposit_free(&mut world, chest, a).unwrap();
        assert!(world.get_entity(a).is_ok());
        let completion = deposit_free(&mut world, chest, b).unwrap().completion;
        assert_eq!(completion, Some(Completion::Replaced { replacement: None }));

        assert!(world.get_entity(chest).is_err());
        assert!(world.get_entity(a).is_err());
        assert!(world.get_entity(b).is_err());
        let registry = world.resource::<ItemRegistry>();
        assert!(!registry.contains(a) && !registry.contains(b));
    }
}
