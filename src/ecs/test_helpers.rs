use bevy_app::App;
use bevy_ecs::entity::Entity;
use bevy_ecs::message::{Message, Messages};
use bevy_ecs::world::World;

use crate::ecs::app::build_possession_app;
use crate::ecs::components::ActionInput;
use crate::ecs::events::{VolumeEvent, VolumePhase};
use crate::ecs::resources::{PossessionConfig, SpawnCatalog};
use crate::ecs::schedule::SimTick;

/// Session with default config and an empty catalog.
pub fn test_app() -> App {
    build_possession_app(PossessionConfig::default(), SpawnCatalog::new())
}

pub fn tick(app: &mut App) {
    app.world_mut().run_schedule(SimTick);
}

pub fn tick_n(app: &mut App, n: u32) {
    for _ in 0..n {
        tick(app);
    }
}

/// Latch input on `agent` for the next tick.
pub fn press(app: &mut App, agent: Entity, latch: impl FnOnce(&mut ActionInput)) {
    if let Some(mut input) = app.world_mut().get_mut::<ActionInput>(agent) {
        latch(&mut input);
    }
}

/// Report a trigger-volume crossing as the physics collaborator would.
pub fn report_volume(app: &mut App, volume: Entity, body: Entity, phase: VolumePhase) {
    app.world_mut()
        .resource_mut::<Messages<VolumeEvent>>()
        .write(VolumeEvent {
            volume,
            body,
            phase,
        });
}

/// Take every pending message of type `M`.
pub fn drain_messages<M: Message>(world: &mut World) -> Vec<M> {
    world
        .get_resource_mut::<Messages<M>>()
        .map(|mut messages| messages.drain().collect())
        .unwrap_or_default()
}
