use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use stepup_engine::{SchedulerGate, StateLayout};

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub scheduler: Option<SchedulerGate>,
}

impl CliConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).context("failed to parse stepup config")
    }

    /// Load an explicitly named config file (missing file is an error) or
    /// the state directory's `stepup.toml` (missing file means defaults).
    pub fn load(explicit: Option<&Path>, layout: &StateLayout) -> Result<Self> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (layout.config_path(), false),
        };

        if !path.exists() {
            if required {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }
}
