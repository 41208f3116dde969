use serde::{Deserialize, Serialize};

/// What a pickupable item is made of. Containers count deposits per type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ResourceType {
    Stone,
    Wood,
    Ore,
    Fiber,
    Clay,
    Custom(String),
}

string_enum_open!(ResourceType, "resource type", {
    Stone => "stone",
    Wood => "wood",
    Ore => "ore",
    Fiber => "fiber",
    Clay => "clay",
});

/// Tool kind carried by a held item; harvestables require a matching one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ToolType {
    Axe,
    Pickaxe,
    Shovel,
    Custom(String),
}

string_enum_open!(ToolType, "tool type", {
    Axe => "axe",
    Pickaxe => "pickaxe",
    Shovel => "shovel",
});
