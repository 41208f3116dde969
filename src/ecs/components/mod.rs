pub mod agent;
pub mod common;
pub mod container;
pub mod items;

pub use agent::{ActionInput, Agent};
pub use common::{Attachment, PhysicsBody, Pose, SpawnedFrom, Surface};
pub use container::{Container, CounterDisplay, VolumeOccupants};
pub use items::{Harvestable, Item, PickupCooldown, Possession, Tool};
