use bevy_app::App;
use bevy_ecs::message::MessageRegistry;
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs};
use bevy_ecs::world::World;
use tracing::info;

use super::clock::SimClock;
use super::commands::{PossessionCommand, apply_possession_commands};
use super::events::{BodyCommand, PossessionEvent, VolumeEvent};
use super::plugin::PossessionPlugin;
use super::resources::{
    EcsIdGenerator, EjectRng, HighlightCoordinator, ItemRegistry, PossessionConfig, SpawnCatalog,
    TransferLog, distribute_rng,
};
use super::schedule::{PossessionSet, SimPhase, configure_sim_schedule};

/// Build a headless Bevy app for one possession session: clock, config,
/// catalog, registry, highlight coordinator, message types, the `SimTick`
/// schedule with both applicator passes, and `PossessionPlugin`.
///
/// Manual tick control:
/// ```no_run
/// # use possession_engine::ecs::{build_possession_app, SimTick};
/// # use possession_engine::ecs::resources::{PossessionConfig, SpawnCatalog};
/// let mut app = build_possession_app(PossessionConfig::default(), SpawnCatalog::new());
/// for _ in 0..600 {
///     app.world_mut().run_schedule(SimTick);
/// }
/// ```
pub fn build_possession_app(config: PossessionConfig, catalog: SpawnCatalog) -> App {
    let mut app = App::empty();

    // Core resources
    app.insert_resource(SimClock::new());
    app.insert_resource(HighlightCoordinator::new(config.emphasis));
    app.insert_resource(config);
    app.insert_resource(catalog);
    app.insert_resource(ItemRegistry::new());
    app.insert_resource(TransferLog::new());
    app.insert_resource(EcsIdGenerator::default());
    // Reseeded each tick by distribute_rng
    app.init_resource::<EjectRng>();

    // Register message types
    MessageRegistry::register_message::<VolumeEvent>(app.world_mut());
    MessageRegistry::register_message::<BodyCommand>(app.world_mut());
    MessageRegistry::register_message::<PossessionCommand>(app.world_mut());
    MessageRegistry::register_message::<PossessionEvent>(app.world_mut());

    // Single-threaded: the possession model is cooperative and tick-ordered.
    let mut schedule = configure_sim_schedule(ExecutorKind::SingleThreaded);
    schedule.add_systems(bevy_ecs::message::message_update_system.in_set(SimPhase::PreUpdate));
    schedule.add_systems(distribute_rng.in_set(SimPhase::PreUpdate));
    schedule.add_systems(apply_possession_commands.in_set(PossessionSet::AgentApply));
    schedule.add_systems(apply_possession_commands.in_set(PossessionSet::ContainerApply));
    app.add_schedule(schedule);
    app.add_plugins(PossessionPlugin);
    app
}

/// End the session: restore every emphasized surface, forget all items and
/// empty the transfer log.
pub fn end_session(world: &mut World) {
    let restored = HighlightCoordinator::teardown(world);
    let forgotten = world
        .get_resource_mut::<ItemRegistry>()
        .map(|mut registry| {
            let count = registry.len();
            registry.clear();
            count
        })
        .unwrap_or_default();
    let records = world
        .get_resource_mut::<TransferLog>()
        .map(|mut log| log.drain().len())
        .unwrap_or_default();
    info!(restored, forgotten, records, "possession session ended");
}
