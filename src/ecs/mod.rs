pub mod app;
pub mod clock;
pub mod commands;
pub mod components;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod schedule;
pub mod spawn;
pub mod systems;
pub mod test_helpers;

pub use app::{build_possession_app, end_session};
pub use clock::SimClock;
pub use commands::{PossessionCommand, PossessionCommandKind, try_receive};
pub use components::{
    ActionInput, Agent, Attachment, Container, CounterDisplay, Harvestable, Item, PhysicsBody,
    PickupCooldown, Pose, Possession, SpawnedFrom, Surface, Tool, VolumeOccupants,
};
pub use events::{BodyCommand, BodyCommandKind, PossessionEvent, VolumeEvent, VolumePhase};
pub use plugin::PossessionPlugin;
pub use resources::{
    HighlightCoordinator, ItemRegistry, PossessionConfig, SpawnCatalog, SpawnSpec, SurfaceAccess,
    TransferLog,
};
pub use schedule::{PossessionSet, SimPhase, SimTick, configure_sim_schedule};
