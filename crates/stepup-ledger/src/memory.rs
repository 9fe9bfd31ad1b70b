use std::sync::Mutex;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

use crate::{latest_for_repository, sort_newest_first, Ledger, LedgerEntry};

/// In-memory ledger for tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: Mutex<Vec<LedgerEntry>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Ledger for MemoryLedger {
    fn append(&self, id: &str, applied_at: DateTime<Utc>) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("upgrade ledger lock poisoned"))?;
        if entries.iter().any(|entry| entry.id == id) {
            return Err(anyhow!("upgrade '{id}' is already recorded as applied"));
        }
        entries.push(LedgerEntry {
            id: id.to_string(),
            applied_at,
        });
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<LedgerEntry>> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("upgrade ledger lock poisoned"))?
            .clone();
        sort_newest_first(&mut entries);
        Ok(entries)
    }

    fn latest(&self, repository: &str) -> Result<Option<LedgerEntry>> {
        Ok(latest_for_repository(&self.list_all()?, repository))
    }
}
