use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::resource::ResourceType;

/// One line of a recipe. `amount == 0` means "accepted but not required".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub resource_type: ResourceType,
    pub amount: u32,
}

/// Why a recipe refused a deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositRefusal {
    NotAccepted,
    QuotaFull { required: u32 },
}

/// Ordered mapping from resource type to required amount.
///
/// A recipe with no lines is open: it accepts every type without a cap and is
/// never satisfied. Eject-all containers use that shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipe {
    requirements: Vec<Requirement>,
}

impl Recipe {
    /// Build from ordered pairs. A repeated type keeps its first position and
    /// takes the last amount.
    pub fn new<I, R>(lines: I) -> Self
    where
        I: IntoIterator<Item = (R, u32)>,
        R: Into<ResourceType>,
    {
        let mut requirements: Vec<Requirement> = Vec::new();
        for (resource_type, amount) in lines {
            let resource_type = resource_type.into();
            match requirements
                .iter_mut()
                .find(|r| r.resource_type == resource_type)
            {
                Some(existing) => existing.amount = amount,
                None => requirements.push(Requirement {
                    resource_type,
                    amount,
                }),
            }
        }
        Self { requirements }
    }

    pub fn open() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn required(&self, resource_type: &ResourceType) -> Option<u32> {
        self.requirements
            .iter()
            .find(|r| &r.resource_type == resource_type)
            .map(|r| r.amount)
    }

    pub fn has_positive_requirement(&self) -> bool {
        self.requirements.iter().any(|r| r.amount > 0)
    }

    /// Quota check for one more unit of `resource_type`.
    pub fn check_deposit(
        &self,
        stored: &StoredCounts,
        resource_type: &ResourceType,
    ) -> Result<(), DepositRefusal> {
        if self.is_open() {
            return Ok(());
        }
        match self.required(resource_type) {
            None => Err(DepositRefusal::NotAccepted),
            Some(0) => Ok(()),
            Some(required) if stored.get(resource_type) >= required => {
                Err(DepositRefusal::QuotaFull { required })
            }
            Some(_) => Ok(()),
        }
    }

    /// Every positive line is met. Open recipes are never satisfied.
    pub fn is_satisfied(&self, stored: &StoredCounts) -> bool {
        self.has_positive_requirement()
            && self
                .requirements
                .iter()
                .filter(|r| r.amount > 0)
                .all(|r| stored.get(&r.resource_type) >= r.amount)
    }

    /// First requirement-ordered type with a positive stored count. Types not
    /// listed (open recipes only) follow in key order.
    pub fn first_available<'a>(&'a self, stored: &'a StoredCounts) -> Option<&'a ResourceType> {
        self.requirements
            .iter()
            .map(|r| &r.resource_type)
            .find(|rt| stored.get(rt) > 0)
            .or_else(|| {
                stored
                    .iter()
                    .find(|(rt, count)| *count > 0 && self.required(rt).is_none())
                    .map(|(rt, _)| rt)
            })
    }

    /// Counter text, e.g. `"stone 1/2, wood 0/3"`.
    pub fn describe(&self, stored: &StoredCounts) -> String {
        if self.is_open() {
            return format!("{} stored", stored.total());
        }
        self.requirements
            .iter()
            .map(|r| {
                let have = stored.get(&r.resource_type);
                if r.amount > 0 {
                    format!("{} {have}/{}", r.resource_type, r.amount)
                } else {
                    format!("{} {have}", r.resource_type)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Per-type stored amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredCounts(BTreeMap<ResourceType, u32>);

impl StoredCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, resource_type: &ResourceType) -> u32 {
        self.0.get(resource_type).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, resource_type: &ResourceType) {
        *self.0.entry(resource_type.clone()).or_insert(0) += 1;
    }

    /// Returns false (and changes nothing) when the count is already zero.
    pub fn decrement(&mut self, resource_type: &ResourceType) -> bool {
        match self.0.get_mut(resource_type) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn has_any(&self) -> bool {
        self.0.values().any(|&c| c > 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceType, u32)> {
        self.0.iter().map(|(rt, &c)| (rt, c))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}
