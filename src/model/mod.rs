#[macro_use]
mod macros;

pub mod appearance;
pub mod container;
pub mod recipe;
pub mod resource;

pub use appearance::{EmphasisStyle, Rgb, Signature};
pub use container::{CompletionMode, CompletionState, StoragePolicy};
pub use recipe::{DepositRefusal, Recipe, Requirement, StoredCounts};
pub use resource::{ResourceType, ToolType};
