use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use crate::{latest_for_repository, sort_newest_first, Ledger, LedgerEntry};

/// Append-only ledger file: one `applied_at<TAB>id` line per applied
/// upgrade, timestamps in RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLedger {
    path: PathBuf,
}

impl FileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Vec<LedgerEntry>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read upgrade ledger: {}", self.path.display())
                });
            }
        };

        let mut entries = Vec::new();
        for line in raw.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let (applied_at, id) = line.split_once('\t').with_context(|| {
                format!(
                    "malformed ledger line in {}: {line}",
                    self.path.display()
                )
            })?;
            let applied_at = DateTime::parse_from_rfc3339(applied_at)
                .with_context(|| {
                    format!(
                        "malformed ledger timestamp in {}: {applied_at}",
                        self.path.display()
                    )
                })?
                .with_timezone(&Utc);
            entries.push(LedgerEntry {
                id: id.to_string(),
                applied_at,
            });
        }

        Ok(entries)
    }
}

impl Ledger for FileLedger {
    fn append(&self, id: &str, applied_at: DateTime<Utc>) -> Result<()> {
        if self.read_entries()?.iter().any(|entry| entry.id == id) {
            return Err(anyhow!("upgrade '{id}' is already recorded as applied"));
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open upgrade ledger: {}", self.path.display()))?;
        file.write_all(format!("{}\t{id}\n", applied_at.to_rfc3339()).as_bytes())
            .with_context(|| {
                format!("failed to append upgrade ledger: {}", self.path.display())
            })?;
        file.flush()
            .with_context(|| format!("failed to flush upgrade ledger: {}", self.path.display()))?;
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<LedgerEntry>> {
        let mut entries = self.read_entries()?;
        sort_newest_first(&mut entries);
        Ok(entries)
    }

    fn latest(&self, repository: &str) -> Result<Option<LedgerEntry>> {
        Ok(latest_for_repository(&self.list_all()?, repository))
    }
}
