pub mod catalog;
pub mod highlight;
pub mod item_registry;
pub mod sim_resources;
pub mod transfer_log;

pub use catalog::{ContainerSpec, SpawnCatalog, SpawnSpec};
pub use highlight::{HighlightCoordinator, SurfaceAccess};
pub use item_registry::ItemRegistry;
pub use sim_resources::{
    EcsIdGenerator, EjectRng, MIN_DROP_GUARD_TICKS, PossessionConfig, distribute_rng,
};
pub use transfer_log::{TransferLog, TransferRecord};
