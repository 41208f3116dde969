pub mod ecs;
pub mod error;
pub mod id;
pub mod model;

pub use error::{ConfigError, ErrorCategory, TransferError};
pub use id::IdGenerator;
pub use model::{
    CompletionMode, CompletionState, EmphasisStyle, Recipe, ResourceType, Signature,
    StoragePolicy, ToolType,
};
