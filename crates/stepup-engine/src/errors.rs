use std::fmt;

use stepup_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("{0}")]
    Checks(CheckReport),
    #[error(
        "upgrade '{id}' failed; your installation is in an inconsistent state, \
         please manually review the upgrade and resolve inconsistencies"
    )]
    Apply { id: String },
    #[error(transparent)]
    Ledger(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckPhase {
    Pre,
    Post,
}

impl CheckPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pre => "pre-upgrade",
            Self::Post => "post-upgrade",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
    pub scope: String,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub phase: CheckPhase,
    pub failures: Vec<CheckFailure>,
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, failure) in self.failures.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{} check for '{}' failed with the following errors:",
                self.phase.as_str(),
                failure.scope
            )?;
            for message in &failure.messages {
                write!(f, "\n (-) {message}")?;
            }
        }
        Ok(())
    }
}
