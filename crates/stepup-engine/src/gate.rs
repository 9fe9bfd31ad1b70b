use std::process::Command;

use serde::Deserialize;
use stepup_core::HookError;

use crate::checks::Check;

/// Manual operational lock around an external task-scheduling subsystem:
/// upgrades must not run while the scheduler still executes tasks. The gate
/// only observes and reminds; it takes no programmatic lease.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchedulerGate {
    pub status_command: Vec<String>,
    pub stopped_markers: Vec<String>,
    pub stop_hint: String,
    pub start_hint: String,
}

impl SchedulerGate {
    pub fn pre_check(&self) -> Check {
        let gate = self.clone();
        Check::new("scheduler-stopped", move || gate.verify_stopped())
    }

    pub fn post_check(&self) -> Check {
        let start_hint = self.start_hint.clone();
        Check::new("scheduler-restart", move || {
            tracing::info!("remember to start the task scheduler again: {start_hint}");
            Ok(())
        })
    }

    fn verify_stopped(&self) -> Result<(), HookError> {
        let (program, args) = self
            .status_command
            .split_first()
            .ok_or_else(|| HookError::new("scheduler status command is not configured"))?;

        tracing::info!("checking task scheduler status: {}", self.status_command.join(" "));
        let output = Command::new(program).args(args).output().map_err(|err| {
            HookError::new(format!(
                "failed to run scheduler status command '{program}': {err}"
            ))
        })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        let missing = self
            .stopped_markers
            .iter()
            .filter(|marker| !combined.contains(marker.as_str()))
            .cloned()
            .collect::<Vec<_>>();
        if missing.is_empty() {
            return Ok(());
        }

        Err(HookError::with_messages(vec![
            format!(
                "the task scheduler does not look stopped (missing markers: {})",
                missing.join(", ")
            ),
            format!("please stop the task scheduler first: {}", self.stop_hint),
        ]))
    }
}
