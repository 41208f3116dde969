use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::Path;

use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Res, ResMut};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::IdGenerator;
use crate::ecs::clock::SimClock;
use crate::error::ConfigError;
use crate::model::EmphasisStyle;

/// The drop guard has to outlast one full tick of trigger-callback ordering
/// ambiguity on top of the tick the drop happened in.
pub const MIN_DROP_GUARD_TICKS: u8 = 2;

/// Session tuning. Every field has a default, so a config file only needs
/// the values it changes.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PossessionConfig {
    pub pickup_range: f32,
    pub throw_force: f32,
    /// Upward impulse applied on a plain drop.
    pub drop_impulse: f32,
    pub drop_guard_ticks: u8,
    /// Ticks an ejected item stays ineligible for pickup and deposit.
    pub eject_grace_ticks: u32,
    pub eject_force: f32,
    pub tool_reach: f32,
    pub emphasis: EmphasisStyle,
    pub seed: u64,
}

impl Default for PossessionConfig {
    fn default() -> Self {
        Self {
            pickup_range: 2.0,
            throw_force: 500.0,
            drop_impulse: 1.0,
            drop_guard_ticks: MIN_DROP_GUARD_TICKS,
            eject_grace_ticks: 30,
            eject_force: 3.0,
            tool_reach: 2.0,
            emphasis: EmphasisStyle::default(),
            seed: 42,
        }
    }
}

impl PossessionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.drop_guard_ticks < MIN_DROP_GUARD_TICKS {
            return Err(ConfigError::Invalid {
                field: "drop_guard_ticks",
                reason: format!(
                    "{} is below the minimum of {MIN_DROP_GUARD_TICKS}",
                    self.drop_guard_ticks
                ),
            });
        }
        for (field, value) in [
            ("pickup_range", self.pickup_range),
            ("throw_force", self.throw_force),
            ("drop_impulse", self.drop_impulse),
            ("eject_force", self.eject_force),
            ("tool_reach", self.tool_reach),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} must be finite and non-negative"),
                });
            }
        }
        Ok(())
    }
}

/// RNG for eject impulses. Reseeded every tick by `distribute_rng`.
#[derive(Resource)]
pub struct EjectRng(pub SmallRng);

impl Default for EjectRng {
    fn default() -> Self {
        Self(SmallRng::seed_from_u64(0))
    }
}

/// Deterministic per-tick seed from the session seed, a domain label and the tick.
fn derive_tick_seed(seed: u64, domain: &str, tick: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    domain.hash(&mut hasher);
    tick.hash(&mut hasher);
    hasher.finish()
}

/// Reseed `EjectRng` so a replay with the same seed scatters items the same way.
/// Runs in `SimPhase::PreUpdate`.
pub fn distribute_rng(
    mut rng: ResMut<EjectRng>,
    config: Res<PossessionConfig>,
    clock: Res<SimClock>,
) {
    rng.0 = SmallRng::seed_from_u64(derive_tick_seed(config.seed, "eject", clock.tick_count));
}

/// Id source for `TransferLog` records.
#[derive(Resource, Default)]
pub struct EcsIdGenerator(pub IdGenerator);
