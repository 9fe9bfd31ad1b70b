use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Filesystem layout of one installation's upgrade state directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateLayout {
    root: PathBuf,
}

impl StateLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.root.join("upgrade.ledger")
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join("upgrade.log")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("stepup.toml")
    }

    pub fn ensure_base_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create state directory: {}", self.root.display()))
    }
}
