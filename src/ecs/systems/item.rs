//! Item lifecycle systems.
//!
//! PreUpdate:
//! 1. `tick_pickup_cooldowns` re-enables pickup on ejected items once their
//!    grace window runs out
//!
//! PostUpdate (`PossessionSet::Emphasis`):
//! 2. `follow_anchors` keeps held and preserved items on their anchors
//!
//! Last:
//! 3. `clear_action_input` drops this tick's latched input

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{ParamSet, Query};
use tracing::debug;

use crate::ecs::components::{ActionInput, Attachment, Item, PickupCooldown, Pose};
use crate::ecs::schedule::{PossessionSet, SimPhase, SimTick};

pub struct ItemPlugin;

impl Plugin for ItemPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(SimTick, tick_pickup_cooldowns.in_set(SimPhase::PreUpdate));
        app.add_systems(SimTick, follow_anchors.in_set(PossessionSet::Emphasis));
        app.add_systems(SimTick, clear_action_input.in_set(SimPhase::Last));
    }
}

/// Count down eject grace windows. A finished cooldown stays at zero until
/// the next eject overwrites it.
pub fn tick_pickup_cooldowns(mut items: Query<(Entity, &mut Item, &mut PickupCooldown)>) {
    for (entity, mut item, mut cooldown) in items.iter_mut() {
        if cooldown.remaining_ticks == 0 {
            continue;
        }
        cooldown.remaining_ticks -= 1;
        if cooldown.remaining_ticks == 0 {
            item.pickup_eligible = true;
            debug!(item = ?entity, "pickup grace window over");
        }
    }
}

/// Snap every attached entity onto its anchor's pose.
pub fn follow_anchors(
    attached: Query<(Entity, &Attachment)>,
    mut poses: ParamSet<(Query<&Pose>, Query<&mut Pose>)>,
) {
    let targets: Vec<(Entity, Pose)> = {
        let anchors = poses.p0();
        attached
            .iter()
            .filter_map(|(entity, attachment)| {
                let anchor = anchors.get(attachment.anchor).ok()?;
                Some((entity, anchor.compose(attachment.offset, attachment.rotation)))
            })
            .collect()
    };
    let mut poses = poses.p1();
    for (entity, target) in targets {
        if let Ok(mut pose) = poses.get_mut(entity) {
            *pose = target;
        }
    }
}

pub fn clear_action_input(mut inputs: Query<&mut ActionInput>) {
    for mut input in inputs.iter_mut() {
        if !input.is_idle() {
            *input = ActionInput::default();
        }
    }
}
