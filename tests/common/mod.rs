#![allow(dead_code)]

use bevy_app::App;
use bevy_ecs::entity::Entity;
use bevy_math::Vec3;
use possession_engine::ecs::components::{ActionInput, Agent, Container, Item, Pose, Possession};
use possession_engine::ecs::events::{PossessionEvent, VolumePhase};
use possession_engine::ecs::resources::{PossessionConfig, SpawnCatalog, TransferLog};
use possession_engine::ecs::{build_possession_app, spawn, test_helpers};
use possession_engine::model::{Recipe, ResourceType, Signature};

/// A running possession session plus the bookkeeping tests keep repeating.
pub struct Session {
    pub app: App,
    /// Every `PossessionEvent` seen so far, drained after each tick.
    pub events: Vec<PossessionEvent>,
}

impl Session {
    pub fn new() -> Self {
        Self::with(PossessionConfig::default(), SpawnCatalog::new())
    }

    pub fn with_catalog(catalog: SpawnCatalog) -> Self {
        Self::with(PossessionConfig::default(), catalog)
    }

    pub fn with(config: PossessionConfig, catalog: SpawnCatalog) -> Self {
        Self {
            app: build_possession_app(config, catalog),
            events: Vec::new(),
        }
    }

    pub fn agent(&mut self, at: Vec3) -> Entity {
        spawn::spawn_agent(self.app.world_mut(), Pose::at(at))
    }

    pub fn item(&mut self, resource_type: ResourceType, at: Vec3) -> Entity {
        spawn::spawn_item(
            self.app.world_mut(),
            resource_type,
            Pose::at(at),
            Signature::default(),
        )
    }

    pub fn container(&mut self, container: Container, at: Vec3) -> Entity {
        spawn::spawn_container(
            self.app.world_mut(),
            container,
            Pose::at(at),
            Signature::default(),
        )
    }

    pub fn bin(&mut self, requirements: &[(ResourceType, u32)], at: Vec3) -> Entity {
        self.container(Container::new(Recipe::new(requirements.iter().cloned())), at)
    }

    pub fn press(&mut self, agent: Entity, latch: impl FnOnce(&mut ActionInput)) {
        test_helpers::press(&mut self.app, agent, latch);
    }

    pub fn enter(&mut self, volume: Entity, body: Entity) {
        test_helpers::report_volume(&mut self.app, volume, body, VolumePhase::Enter);
    }

    pub fn exit(&mut self, volume: Entity, body: Entity) {
        test_helpers::report_volume(&mut self.app, volume, body, VolumePhase::Exit);
    }

    pub fn tick(&mut self) {
        test_helpers::tick(&mut self.app);
        let drained = test_helpers::drain_messages::<PossessionEvent>(self.app.world_mut());
        self.events.extend(drained);
    }

    pub fn tick_n(&mut self, n: u32) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Scan once so `agent` sees its candidate, then press pickup.
    pub fn pick_up(&mut self, agent: Entity) {
        self.tick();
        self.press(agent, |input| input.pickup_or_drop = true);
        self.tick();
    }

    pub fn held(&self, agent: Entity) -> Option<Entity> {
        self.app.world().get::<Agent>(agent)?.held_item()
    }

    pub fn possession(&self, item: Entity) -> Option<Possession> {
        self.app.world().get::<Item>(item).map(Item::possession)
    }

    pub fn stored(&self, container: Entity, resource_type: ResourceType) -> u32 {
        self.app
            .world()
            .get::<Container>(container)
            .map(|c| c.stored().get(&resource_type))
            .unwrap_or_default()
    }

    pub fn exists(&self, entity: Entity) -> bool {
        self.app.world().get_entity(entity).is_ok()
    }

    pub fn log(&self) -> &TransferLog {
        self.app.world().resource::<TransferLog>()
    }

    pub fn count_events(&self, matches: impl Fn(&PossessionEvent) -> bool) -> usize {
        self.events.iter().filter(|e| matches(e)).count()
    }
}
