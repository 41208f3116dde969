//! Agent possession systems.
//!
//! PreUpdate:
//! 1. `tick_drop_guards` counts every agent's drop guard toward zero
//!
//! Update (`PossessionSet::Agent`, chained):
//! 2. `scan_pickup_candidates` picks the nearest eligible free item per agent
//!    and moves candidate emphasis to match
//! 3. `resolve_agent_input` turns pickup/drop/throw presses into commands
//! 4. `resolve_tool_use` turns tool presses into `Hit` commands

use std::collections::BTreeSet;

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::message::MessageWriter;
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, Res, ResMut};
use tracing::debug;

use crate::ecs::commands::{PossessionCommand, PossessionCommandKind};
use crate::ecs::components::{
    ActionInput, Agent, Attachment, Harvestable, Item, Pose, Surface, Tool,
};
use crate::ecs::resources::{HighlightCoordinator, ItemRegistry, PossessionConfig};
use crate::ecs::schedule::{PossessionSet, SimPhase, SimTick};

pub struct AgentPlugin;

impl Plugin for AgentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(SimTick, tick_drop_guards.in_set(SimPhase::PreUpdate));
        app.add_systems(
            SimTick,
            (scan_pickup_candidates, resolve_agent_input, resolve_tool_use)
                .chain()
                .in_set(PossessionSet::Agent),
        );
    }
}

/// Decrement every drop guard, never below zero.
pub fn tick_drop_guards(mut agents: Query<&mut Agent>) {
    for mut agent in agents.iter_mut() {
        if agent.drop_guard_ticks > 0 {
            agent.drop_guard_ticks -= 1;
        }
    }
}

/// Recompute each agent's pickup candidate and move emphasis to match.
///
/// Emphasis is shared: an item stays emphasized while it is any empty
/// agent's candidate. Holding agents have no candidate.
pub fn scan_pickup_candidates(
    mut agents: Query<(Entity, &mut Agent, &Pose)>,
    items: Query<(&Item, &Pose, Option<&Attachment>)>,
    registry: Res<ItemRegistry>,
    mut coordinator: ResMut<HighlightCoordinator>,
    mut surfaces: Query<&mut Surface>,
) {
    let mut previous = BTreeSet::new();
    let mut current = BTreeSet::new();

    for (entity, mut agent, pose) in agents.iter_mut() {
        if let Some(old) = agent.candidate {
            previous.insert(old);
        }
        let candidate = if agent.is_empty() {
            let own_anchor = agent.anchor_for(entity);
            registry
                .iter()
                .filter_map(|e| {
                    let (item, item_pose, attachment) = items.get(e).ok()?;
                    if !item.is_available() || attachment.is_some_and(|a| a.anchor == own_anchor) {
                        return None;
                    }
                    let distance = pose.distance(item_pose);
                    (distance <= agent.pickup_range).then_some((e, distance))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(e, _)| e)
        } else {
            None
        };
        if candidate != agent.candidate {
            debug!(agent = ?entity, ?candidate, "pickup candidate changed");
        }
        agent.candidate = candidate;
        if let Some(new) = candidate {
            current.insert(new);
        }
    }

    for stale in previous.difference(&current) {
        coordinator.remove(&mut surfaces, *stale);
    }
    for target in &current {
        coordinator.apply(&mut surfaces, *target);
    }
}

/// Pickup-or-drop takes precedence over throw within one tick.
pub fn resolve_agent_input(
    agents: Query<(Entity, &Agent, &ActionInput)>,
    mut commands: MessageWriter<PossessionCommand>,
) {
    for (entity, agent, input) in agents.iter() {
        if input.pickup_or_drop {
            if let Some(held) = agent.held_item {
                commands.write(PossessionCommand::new(
                    PossessionCommandKind::Drop { agent: entity },
                    format!("agent {entity} drops {held}"),
                ));
            } else if let Some(item) = agent.candidate {
                commands.write(PossessionCommand::new(
                    PossessionCommandKind::Pickup {
                        agent: entity,
                        item,
                    },
                    format!("agent {entity} picks up {item}"),
                ));
            }
        } else if input.throw
            && let Some(held) = agent.held_item
        {
            commands.write(PossessionCommand::new(
                PossessionCommandKind::Throw { agent: entity },
                format!("agent {entity} throws {held}"),
            ));
        }
    }
}

/// Strike the nearest harvestable within reach with the held tool.
pub fn resolve_tool_use(
    agents: Query<(Entity, &Agent, &ActionInput, &Pose)>,
    tools: Query<&Tool>,
    harvestables: Query<(Entity, &Pose), With<Harvestable>>,
    config: Res<PossessionConfig>,
    mut commands: MessageWriter<PossessionCommand>,
) {
    for (entity, agent, input, pose) in agents.iter() {
        if !input.use_tool || input.pickup_or_drop {
            continue;
        }
        let Some(held) = agent.held_item else {
            continue;
        };
        if tools.get(held).is_err() {
            continue;
        }
        let nearest = harvestables
            .iter()
            .map(|(target, target_pose)| (target, pose.distance(target_pose)))
            .filter(|(_, distance)| *distance <= config.tool_reach)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((target, _)) = nearest {
            commands.write(PossessionCommand::new(
                PossessionCommandKind::Hit {
                    agent: entity,
                    target,
                },
                format!("agent {entity} hits {target}"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy_math::Vec3;

    use super::*;
    use crate::ecs::spawn;
    use crate::ecs::test_helpers::{press, test_app, tick};
    use crate::model::{ResourceType, Signature};

    #[test]
    fn nearest_free_item_becomes_emphasized_candidate() {
        let mut app = test_app();
        let world = app.world_mut();
        let agent = spawn::spawn_agent(world, Pose::default());
        let near = spawn::spawn_item(
            world,
            ResourceType::Stone,
            Pose::at(Vec3::X),
            Signature::default(),
        );
        let far = spawn::spawn_item(
            world,
            ResourceType::Stone,
            Pose::at(Vec3::X * 1.5),
            Signature::default(),
        );
        let out_of_range = spawn::spawn_item(
            world,
            ResourceType::Stone,
            Pose::at(Vec3::X * 10.0),
            Signature::default(),
        );

        tick(&mut app);
        let world = app.world();
        assert_eq!(world.get::<Agent>(agent).unwrap().candidate(), Some(near));
        let coordinator = world.resource::<HighlightCoordinator>();
        assert!(coordinator.is_emphasized(near));
        assert!(!coordinator.is_emphasized(far));
        assert!(!coordinator.is_emphasized(out_of_range));
    }

    #[test]
    fn emphasis_follows_candidate_change() {
        let mut app = test_app();
        let world = app.world_mut();
        let agent = spawn::spawn_agent(world, Pose::default());
        let first = spawn::spawn_item(
            world,
            ResourceType::Wood,
            Pose::at(Vec3::X),
            Signature::default(),
        );
        tick(&mut app);
        assert!(app.world().resource::<HighlightCoordinator>().is_emphasized(first));

        app.world_mut().get_mut::<Pose>(agent).unwrap().translation = Vec3::X * 20.0;
        tick(&mut app);
        let world = app.world();
        assert_eq!(world.get::<Agent>(agent).unwrap().candidate(), None);
        assert!(!world.resource::<HighlightCoordinator>().is_emphasized(first));
        assert_eq!(world.get::<Surface>(first).unwrap().signature, Signature::default());
    }

    #[test]
    fn drop_guard_counts_down_to_zero() {
        let mut app = test_app();
        let world = app.world_mut();
        let agent = spawn::spawn_agent(world, Pose::default());
        let stone = spawn::spawn_item(
            world,
            ResourceType::Stone,
            Pose::at(Vec3::X),
            Signature::default(),
        );
        tick(&mut app);
        press(&mut app, agent, |input| input.pickup_or_drop = true);
        tick(&mut app);
        assert_eq!(app.world().get::<Agent>(agent).unwrap().held_item(), Some(stone));

        press(&mut app, agent, |input| input.pickup_or_drop = true);
        tick(&mut app);
        assert_eq!(app.world().get::<Agent>(agent).unwrap().drop_guard_ticks(), 2);
        tick(&mut app);
        assert_eq!(app.world().get::<Agent>(agent).unwrap().drop_guard_ticks(), 1);
        tick(&mut app);
        tick(&mut app);
        assert_eq!(app.world().get::<Agent>(agent).unwrap().drop_guard_ticks(), 0);
    }

    #[test]
    fn pickup_wins_over_throw_in_same_tick() {
        let mut app = test_app();
        let world = app.world_mut();
        let agent = spawn::spawn_agent(world, Pose::default());
        let stone = spawn::spawn_item(
            world,
            ResourceType::Stone,
            Pose::at(Vec3::X),
            Signature::default(),
        );
        tick(&mut app);
        press(&mut app, agent, |input| input.pickup_or_drop = true);
        tick(&mut app);

        press(&mut app, agent, |input| {
            input.pickup_or_drop = true;
            input.throw = true;
        });
        tick(&mut app);
        let world = app.world();
        assert!(world.get::<Item>(stone).unwrap().possession().is_free());
        assert!(world.get::<Agent>(agent).unwrap().has_recent_drop());
    }

    #[test]
    fn shared_candidate_stays_emphasized_until_last_agent_leaves() {
        let mut app = test_app();
        let world = app.world_mut();
        let left = spawn::spawn_agent(world, Pose::default());
        let right = spawn::spawn_agent(world, Pose::at(Vec3::X * 2.0));
        let original = Signature {
            base: crate::model::Rgb::new(0.5, 0.4, 0.3),
            emission: None,
        };
        let ore = spawn::spawn_item(world, ResourceType::Ore, Pose::at(Vec3::X), original);

        tick(&mut app);
        let world = app.world();
        assert_eq!(world.get::<Agent>(left).unwrap().candidate(), Some(ore));
        assert_eq!(world.get::<Agent>(right).unwrap().candidate(), Some(ore));
        assert!(world.resource::<HighlightCoordinator>().is_emphasized(ore));

        app.world_mut().get_mut::<Pose>(left).unwrap().translation = Vec3::X * -20.0;
        tick(&mut app);
        let world = app.world();
        assert_eq!(world.get::<Agent>(left).unwrap().candidate(), None);
        assert!(world.resource::<HighlightCoordinator>().is_emphasized(ore));
        assert_ne!(world.get::<Surface>(ore).unwrap().signature, original);

        app.world_mut().get_mut::<Pose>(right).unwrap().translation = Vec3::X * 20.0;
        tick(&mut app);
        let world = app.world();
        assert!(!world.resource::<HighlightCoordinator>().is_emphasized(ore));
        assert_eq!(world.get::<Surface>(ore).unwrap().signature, original);
    }
}
