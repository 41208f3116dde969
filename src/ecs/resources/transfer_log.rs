use bevy_ecs::resource::Resource;

use crate::error::TransferError;

/// One applied or rejected possession command.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRecord {
    pub id: u64,
    pub tick: u64,
    pub description: String,
    pub outcome: Result<(), TransferError>,
}

/// Audit trail of every command the applicator processed this session.
#[derive(Resource, Debug, Clone, Default)]
pub struct TransferLog {
    pub records: Vec<TransferRecord>,
}

impl TransferLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: TransferRecord) {
        self.records.push(record);
    }

    pub fn applied(&self) -> impl Iterator<Item = &TransferRecord> {
        self.records.iter().filter(|r| r.outcome.is_ok())
    }

    pub fn rejected(&self) -> impl Iterator<Item = &TransferRecord> {
        self.records.iter().filter(|r| r.outcome.is_err())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Take every record so far, leaving the log empty. Hosts that persist
    /// the audit trail call this once per flush.
    pub fn drain(&mut self) -> Vec<TransferRecord> {
        std::mem::take(&mut self.records)
    }
}
