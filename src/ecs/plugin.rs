use bevy_app::{App, Plugin};

use super::systems::agent::AgentPlugin;
use super::systems::container::ContainerPlugin;
use super::systems::emphasis::EmphasisPlugin;
use super::systems::item::ItemPlugin;

/// Aggregate plugin that installs the four possession plugins.
pub struct PossessionPlugin;

impl Plugin for PossessionPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((AgentPlugin, ContainerPlugin, ItemPlugin, EmphasisPlugin));
    }
}
