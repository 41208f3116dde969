use serde::{Deserialize, Serialize};

/// Container lifecycle. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CompletionState {
    #[default]
    Accumulating,
    Completed,
}

string_enum!(CompletionState {
    Accumulating => "accumulating",
    Completed => "completed",
});

/// What happens when a container is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CompletionMode {
    /// Recipe satisfied → spawn the replacement and destroy self with contents.
    #[default]
    Replace,
    /// No recipe; an empty-handed interaction scatters every stored unit and
    /// destroys the container.
    EjectAll,
}

string_enum!(CompletionMode {
    Replace => "replace",
    EjectAll => "eject_all",
});

/// What a container does with the physical item on an accepted deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum StoragePolicy {
    /// Destroy the item and keep only the count.
    #[default]
    Consume,
    /// Park the item on the storage anchor as a Stored instance.
    Preserve,
}

string_enum!(StoragePolicy {
    Consume => "consume",
    Preserve => "preserve",
});
