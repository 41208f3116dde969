//! Container fulfillment systems.
//!
//! PreUpdate:
//! 1. `track_volume_occupancy` keeps each container's set of agents inside
//!    its trigger volume current
//!
//! Update (`PossessionSet::Container`, chained):
//! 2. `resolve_volume_deposits` turns free items entering a volume into
//!    deposit commands
//! 3. `resolve_container_interactions` turns interaction presses by agents
//!    inside a volume into deposit, withdraw or eject commands

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::message::{MessageReader, MessageWriter, message_update_system};
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::Query;
use tracing::debug;

use crate::ecs::commands::{PossessionCommand, PossessionCommandKind};
use crate::ecs::components::{ActionInput, Agent, Container, Item, VolumeOccupants};
use crate::ecs::events::{VolumeEvent, VolumePhase};
use crate::ecs::schedule::{PossessionSet, SimPhase, SimTick};
use crate::model::CompletionMode;

pub struct ContainerPlugin;

impl Plugin for ContainerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            SimTick,
            track_volume_occupancy
                .in_set(SimPhase::PreUpdate)
                .after(message_update_system),
        );
        app.add_systems(
            SimTick,
            (resolve_volume_deposits, resolve_container_interactions)
                .chain()
                .in_set(PossessionSet::Container),
        );
    }
}

/// Record agents entering and leaving container volumes. `Stay` re-asserts
/// presence in case an `Enter` was missed.
pub fn track_volume_occupancy(
    mut events: MessageReader<VolumeEvent>,
    mut volumes: Query<&mut VolumeOccupants>,
    agents: Query<(), With<Agent>>,
) {
    for event in events.read() {
        if !agents.contains(event.body) {
            continue;
        }
        let Ok(mut occupants) = volumes.get_mut(event.volume) else {
            continue;
        };
        match event.phase {
            VolumePhase::Enter | VolumePhase::Stay => {
                if occupants.insert(event.body) {
                    debug!(volume = ?event.volume, agent = ?event.body, "agent entered volume");
                }
            }
            VolumePhase::Exit => {
                if occupants.remove(event.body) {
                    debug!(volume = ?event.volume, agent = ?event.body, "agent left volume");
                }
            }
        }
    }
}

/// A free item entering a volume is offered to the container. Acceptance
/// and quota are decided by the applicator, so rejections land in the log.
pub fn resolve_volume_deposits(
    mut events: MessageReader<VolumeEvent>,
    containers: Query<&Container>,
    items: Query<&Item>,
    mut commands: MessageWriter<PossessionCommand>,
) {
    for event in events.read() {
        if event.phase != VolumePhase::Enter {
            continue;
        }
        let (Ok(container), Ok(item)) = (containers.get(event.volume), items.get(event.body))
        else {
            continue;
        };
        if container.is_completed() || !item.possession().is_free() {
            continue;
        }
        commands.write(PossessionCommand::new(
            PossessionCommandKind::DepositFree {
                container: event.volume,
                item: event.body,
            },
            format!(
                "{} {} entered container {}",
                item.resource_type, event.body, event.volume
            ),
        ));
    }
}

/// Interaction inside a volume: a holding agent deposits; an empty agent
/// outside its drop guard withdraws (replace mode) or ejects (eject-all).
pub fn resolve_container_interactions(
    containers: Query<(Entity, &Container, &VolumeOccupants)>,
    agents: Query<(&Agent, &ActionInput)>,
    mut commands: MessageWriter<PossessionCommand>,
) {
    for (entity, container, occupants) in containers.iter() {
        if container.is_completed() {
            continue;
        }
        for agent in occupants.iter() {
            let Ok((state, input)) = agents.get(agent) else {
                continue;
            };
            if !input.interact {
                continue;
            }
            if let Some(held) = state.held_item() {
                commands.write(PossessionCommand::new(
                    PossessionCommandKind::DepositHeld {
                        container: entity,
                        agent,
                    },
                    format!("agent {agent} deposits {held} into {entity}"),
                ));
                continue;
            }
            if state.has_recent_drop() {
                debug!(container = ?entity, ?agent, "interaction suppressed by drop guard");
                continue;
            }
            if !container.stored().has_any() {
                continue;
            }
            let kind = match container.mode {
                CompletionMode::Replace => PossessionCommandKind::Withdraw {
                    container: entity,
                    agent,
                },
                CompletionMode::EjectAll => PossessionCommandKind::EjectAll {
                    container: entity,
                    agent,
                },
            };
            commands.write(PossessionCommand::new(
                kind,
                format!("agent {agent} interacts with {entity}"),
            ));
        }
    }
}
