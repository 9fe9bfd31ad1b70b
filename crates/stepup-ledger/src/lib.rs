mod file;
mod memory;

use anyhow::Result;
use chrono::{DateTime, Utc};

pub use file::FileLedger;
pub use memory::MemoryLedger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: String,
    pub applied_at: DateTime<Utc>,
}

pub trait Ledger {
    fn append(&self, id: &str, applied_at: DateTime<Utc>) -> Result<()>;

    /// Every applied upgrade, newest first.
    fn list_all(&self) -> Result<Vec<LedgerEntry>>;

    fn latest(&self, repository: &str) -> Result<Option<LedgerEntry>>;
}

fn latest_for_repository(entries: &[LedgerEntry], repository: &str) -> Option<LedgerEntry> {
    let prefix = format!("{repository}_");
    entries
        .iter()
        .find(|entry| entry.id.starts_with(&prefix))
        .cloned()
}

// Newest first; the sort is stable so entries sharing a timestamp keep
// their append order relative to each other.
fn sort_newest_first(entries: &mut [LedgerEntry]) {
    entries.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
}
