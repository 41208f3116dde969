//! Container emphasis reconciliation (PostUpdate, `PossessionSet::Emphasis`).
//!
//! Pickup-candidate emphasis is owned by the agent scan; these systems handle
//! containers and sweep entries whose target no longer exists.

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, ResMut};
use tracing::debug;

use crate::ecs::components::{Agent, Container, Item, Surface, VolumeOccupants};
use crate::ecs::resources::HighlightCoordinator;
use crate::ecs::schedule::{PossessionSet, SimTick};

pub struct EmphasisPlugin;

impl Plugin for EmphasisPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            SimTick,
            (release_stale_emphasis, reconcile_container_emphasis)
                .chain()
                .in_set(PossessionSet::Emphasis),
        );
    }
}

/// Should `container` glow for this set of occupants?
///
/// Only evaluated while some agent is inside the volume: a complete recipe,
/// an occupant holding something the container accepts, or stored units
/// with an empty occupant to take them.
fn wants_emphasis(
    container: &Container,
    occupants: &VolumeOccupants,
    agents: &Query<&Agent>,
    items: &Query<&Item>,
) -> bool {
    if occupants.is_empty() {
        return false;
    }
    if container.is_recipe_complete() {
        return true;
    }
    occupants.iter().any(|entity| {
        let Ok(agent) = agents.get(entity) else {
            return false;
        };
        match agent.held_item() {
            Some(held) => items
                .get(held)
                .is_ok_and(|item| container.accepts(&item.resource_type)),
            None => container.stored().has_any(),
        }
    })
}

pub fn reconcile_container_emphasis(
    containers: Query<(Entity, &Container, &VolumeOccupants)>,
    agents: Query<&Agent>,
    items: Query<&Item>,
    mut coordinator: ResMut<HighlightCoordinator>,
    mut surfaces: Query<&mut Surface>,
) {
    for (entity, container, occupants) in containers.iter() {
        let wanted =
            !container.is_completed() && wants_emphasis(container, occupants, &agents, &items);
        if wanted {
            coordinator.apply(&mut surfaces, entity);
        } else {
            coordinator.remove(&mut surfaces, entity);
        }
    }
}

/// Drop coordinator entries whose target was despawned outside `ecs::spawn`.
pub fn release_stale_emphasis(
    mut coordinator: ResMut<HighlightCoordinator>,
    live: Query<(), With<Surface>>,
) {
    let stale: Vec<Entity> = coordinator
        .emphasized()
        .filter(|target| !live.contains(*target))
        .collect();
    for target in stale {
        coordinator.forget(target);
        debug!(?target, "released emphasis on despawned target");
    }
}

#[cfg(test)]
mod tests {
    use bevy_ecs::prelude::Mut;
    use bevy_math::Vec3;

    use super::*;
    use crate::ecs::commands;
    use crate::ecs::components::Pose;
    use crate::ecs::events::VolumePhase;
    use crate::ecs::spawn;
    use crate::ecs::test_helpers::{report_volume, test_app, tick};
    use crate::model::{Recipe, ResourceType, Signature};

    #[test]
    fn container_glows_only_with_agent_inside() {
        let mut app = test_app();
        let world = app.world_mut();
        let agent = spawn::spawn_agent(world, Pose::at(Vec3::new(0.0, 0.0, -50.0)));
        let bin = spawn::spawn_container(
            world,
            Container::new(Recipe::new([(ResourceType::Wood, 3)])),
            Pose::default(),
            Signature::default(),
        );
        let wood = spawn::spawn_item(
            world,
            ResourceType::Wood,
            Pose::default(),
            Signature::default(),
        );
        report_volume(&mut app, bin, wood, VolumePhase::Enter);
        tick(&mut app);
        assert!(!app.world().resource::<HighlightCoordinator>().is_emphasized(bin));

        report_volume(&mut app, bin, agent, VolumePhase::Enter);
        tick(&mut app);
        assert!(app.world().resource::<HighlightCoordinator>().is_emphasized(bin));

        report_volume(&mut app, bin, agent, VolumePhase::Exit);
        tick(&mut app);
        assert!(!app.world().resource::<HighlightCoordinator>().is_emphasized(bin));
        assert_eq!(
            app.world().get::<Surface>(bin).unwrap().signature,
            Signature::default()
        );
    }

    fn holding_agent_in_volume(resource_type: ResourceType) -> (bevy_app::App, Entity) {
        let mut app = test_app();
        let world = app.world_mut();
        let agent = spawn::spawn_agent(world, Pose::default());
        let bin = spawn::spawn_container(
            world,
            Container::new(Recipe::new([(ResourceType::Stone, 2)])),
            Pose::at(Vec3::Z * 5.0),
            Signature::default(),
        );
        let held = spawn::spawn_item(world, resource_type, Pose::default(), Signature::default());
        commands::pickup(world, agent, held).unwrap();
        report_volume(&mut app, bin, agent, VolumePhase::Enter);
        tick(&mut app);
        (app, bin)
    }

    #[test]
    fn holding_an_accepted_item_lights_the_container() {
        let (app, bin) = holding_agent_in_volume(ResourceType::Stone);
        assert!(app.world().resource::<HighlightCoordinator>().is_emphasized(bin));
    }

    #[test]
    fn holding_a_rejected_item_leaves_the_container_dark() {
        let (app, bin) = holding_agent_in_volume(ResourceType::Ore);
        assert!(!app.world().resource::<HighlightCoordinator>().is_emphasized(bin));
    }

    #[test]
    fn despawned_targets_are_swept() {
        let mut app = test_app();
        let world = app.world_mut();
        let target = world.spawn(Surface::default()).id();
        world.resource_scope(|world, mut coordinator: Mut<HighlightCoordinator>| {
            coordinator.apply(world, target);
        });
        world.despawn(target);

        tick(&mut app);
        assert!(app.world().resource::<HighlightCoordinator>().is_empty());
    }
}
