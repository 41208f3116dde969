pub mod applicator;
pub mod apply_agent;
pub mod apply_container;
pub mod apply_item;

use bevy_ecs::entity::Entity;
use bevy_ecs::message::Message;

pub use applicator::apply_possession_commands;
pub use apply_agent::{drop_held, pickup, throw_held, try_receive};
pub use apply_container::{
    Completion, Deposit, complete, deposit_free, deposit_held, eject_all, withdraw,
};
pub use apply_item::{HitOutcome, hit_with_held_tool, process_hit};

/// An intended possession transfer.
///
/// Decision systems emit these via `MessageWriter<PossessionCommand>`. The
/// applicator drains them in emission order, re-validates every entity
/// reference against current state and applies or rejects each one.
#[derive(Message, Clone, Debug)]
pub struct PossessionCommand {
    pub kind: PossessionCommandKind,
    /// Human-readable description for the `TransferLog`.
    pub description: String,
}

impl PossessionCommand {
    pub fn new(kind: PossessionCommandKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PossessionCommandKind {
    // -- Agent --
    Pickup { agent: Entity, item: Entity },
    Drop { agent: Entity },
    Throw { agent: Entity },

    // -- Container --
    /// A free item's body entered the container's volume.
    DepositFree { container: Entity, item: Entity },
    /// Interaction while holding an item inside the volume.
    DepositHeld { container: Entity, agent: Entity },
    Withdraw { container: Entity, agent: Entity },
    EjectAll { container: Entity, agent: Entity },

    // -- Tools --
    /// Strike `target` with the tool `agent` is holding.
    Hit { agent: Entity, target: Entity },
}
