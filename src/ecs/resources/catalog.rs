use std::collections::BTreeMap;
use std::path::Path;

use bevy_ecs::resource::Resource;
use bevy_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::ecs::components::Container;
use crate::error::ConfigError;
use crate::model::{
    CompletionMode, Recipe, Requirement, ResourceType, Signature, StoragePolicy, ToolType,
};

/// Blueprint for a container entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub mode: CompletionMode,
    #[serde(default)]
    pub policy: StoragePolicy,
    #[serde(default)]
    pub replacement: Option<String>,
    #[serde(default = "default_spawn_offset")]
    pub spawn_offset: [f32; 3],
    #[serde(default)]
    pub signature: Signature,
}

fn default_spawn_offset() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

impl ContainerSpec {
    pub fn to_container(&self) -> Container {
        let recipe = Recipe::new(
            self.requirements
                .iter()
                .map(|r| (r.resource_type.clone(), r.amount)),
        );
        let mut container = Container::new(recipe)
            .with_mode(self.mode)
            .with_policy(self.policy)
            .with_spawn_offset(Vec3::from_array(self.spawn_offset));
        container.replacement = self.replacement.clone();
        container
    }
}

/// A named thing the world can instantiate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnSpec {
    Item {
        resource_type: ResourceType,
        #[serde(default)]
        signature: Signature,
        #[serde(default)]
        tool: Option<ToolType>,
    },
    /// Inert scenery: an opened chest, a stump.
    Prop {
        #[serde(default)]
        signature: Signature,
    },
    Container(ContainerSpec),
    Harvestable {
        health: i32,
        required_tool: ToolType,
        #[serde(default)]
        replacement: Option<String>,
        #[serde(default)]
        signature: Signature,
    },
}

/// Named spawn specs: recipe results, container variants, item appearances.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpawnCatalog {
    specs: BTreeMap<String, SpawnSpec>,
}

impl SpawnCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, spec: SpawnSpec) -> Self {
        self.insert(name, spec);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: SpawnSpec) {
        self.specs.insert(name.into(), spec);
    }

    pub fn get(&self, name: &str) -> Option<&SpawnSpec> {
        self.specs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// First item spec (by name) producing `resource_type`.
    pub fn item_spec_for(&self, resource_type: &ResourceType) -> Option<(&str, &SpawnSpec)> {
        self.specs.iter().find_map(|(name, spec)| match spec {
            SpawnSpec::Item {
                resource_type: rt, ..
            } if rt == resource_type => Some((name.as_str(), spec)),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Every replacement named by a container or harvestable must exist.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for spec in self.specs.values() {
            let replacement = match spec {
                SpawnSpec::Container(c) => c.replacement.as_deref(),
                SpawnSpec::Harvestable { replacement, .. } => replacement.as_deref(),
                _ => None,
            };
            if let Some(name) = replacement
                && !self.contains(name)
            {
                return Err(ConfigError::MissingSpec(name.to_string()));
            }
        }
        Ok(())
    }
}
