use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;

/// Per-actor possession state: at most one held item.
///
/// `held_item` and `candidate` are weak references; anything that reads them
/// re-validates against the item's own `Possession` before acting.
#[derive(Component, Debug, Clone)]
pub struct Agent {
    pub(crate) held_item: Option<Entity>,
    pub(crate) candidate: Option<Entity>,
    pub(crate) drop_guard_ticks: u8,
    /// Where held items attach. `None` attaches to the agent itself.
    pub hold_anchor: Option<Entity>,
    pub pickup_range: f32,
    pub throw_force: f32,
}

impl Agent {
    pub fn new(pickup_range: f32, throw_force: f32) -> Self {
        Self {
            held_item: None,
            candidate: None,
            drop_guard_ticks: 0,
            hold_anchor: None,
            pickup_range,
            throw_force,
        }
    }

    pub fn held_item(&self) -> Option<Entity> {
        self.held_item
    }

    pub fn candidate(&self) -> Option<Entity> {
        self.candidate
    }

    pub fn is_empty(&self) -> bool {
        self.held_item.is_none()
    }

    /// True while the post-drop guard is counting down.
    pub fn has_recent_drop(&self) -> bool {
        self.drop_guard_ticks > 0
    }

    pub fn drop_guard_ticks(&self) -> u8 {
        self.drop_guard_ticks
    }

    pub(crate) fn anchor_for(&self, agent: Entity) -> Entity {
        self.hold_anchor.unwrap_or(agent)
    }
}

/// Logical actions pressed this tick. Latched by the host before the tick,
/// cleared at the end of it.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionInput {
    pub pickup_or_drop: bool,
    pub throw: bool,
    pub interact: bool,
    pub use_tool: bool,
}

impl ActionInput {
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}
