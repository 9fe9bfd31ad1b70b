use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use stepup_core::UpgradeUnit;
use stepup_graph::order_upgrades;
use stepup_ledger::{Ledger, LedgerEntry};

use crate::checks::Check;
use crate::context::{unit_span, RunContext};
use crate::errors::{CheckFailure, CheckPhase, CheckReport, EngineError};

pub struct Engine<'a> {
    ledger: &'a dyn Ledger,
    pre_checks: Vec<Check>,
    post_checks: Vec<Check>,
}

impl<'a> Engine<'a> {
    pub fn new(ledger: &'a dyn Ledger) -> Self {
        Self {
            ledger,
            pre_checks: Vec::new(),
            post_checks: Vec::new(),
        }
    }

    pub fn with_pre_check(mut self, check: Check) -> Self {
        self.pre_checks.push(check);
        self
    }

    pub fn with_post_check(mut self, check: Check) -> Self {
        self.post_checks.push(check);
        self
    }

    pub fn history(&self) -> Result<Vec<LedgerEntry>, EngineError> {
        Ok(self.ledger.list_all()?)
    }

    /// Order the not-yet-applied upgrades. Ghost upgrades found while
    /// pruning the applied history are recorded as warnings, never errors.
    pub fn pending(
        &self,
        units: BTreeMap<String, UpgradeUnit>,
        ctx: &mut RunContext,
    ) -> Result<Vec<UpgradeUnit>, EngineError> {
        let history = self
            .ledger
            .list_all()?
            .into_iter()
            .map(|entry| entry.id)
            .collect::<BTreeSet<_>>();

        let (pending, ghosts) = order_upgrades(units, &history)?;
        for ghost in ghosts {
            ctx.record_warning(format!(
                "ghost upgrade detected: '{ghost}' was applied but is no longer discoverable"
            ));
        }
        Ok(pending)
    }

    /// Run every global pre-check, then every unit pre-check, in scheduled
    /// order. No failure aborts the pass; all failures come back as one
    /// aggregated report, and any failure forbids applying.
    pub fn pre_upgrade_checks(
        &self,
        upgrades: &[UpgradeUnit],
        ctx: &mut RunContext,
    ) -> Result<(), EngineError> {
        let mut failures = Vec::new();

        for check in &self.pre_checks {
            let span = unit_span(check.name());
            let _scope = span.enter();
            if let Err(error) = check.run() {
                ctx.record_error(check.name(), error.to_string());
                failures.push(CheckFailure {
                    scope: check.name().to_string(),
                    messages: error.messages().to_vec(),
                });
            }
        }

        for unit in upgrades {
            let span = unit_span(&unit.id);
            let _scope = span.enter();
            if let Some(Err(error)) = unit.pre_upgrade() {
                ctx.record_error(&unit.id, error.to_string());
                failures.push(CheckFailure {
                    scope: unit.id.clone(),
                    messages: error.messages().to_vec(),
                });
            }
        }

        finish_check_phase(CheckPhase::Pre, failures)
    }

    /// Apply one unit and record it in the ledger immediately, so an abort
    /// later in the batch leaves a correct partial history.
    pub fn apply(&self, unit: &UpgradeUnit, ctx: &mut RunContext) -> Result<(), EngineError> {
        let span = unit_span(&unit.id);
        let _scope = span.enter();

        match unit.do_upgrade() {
            Ok(()) => {
                self.ledger.append(&unit.id, Utc::now())?;
                tracing::info!("upgrade applied");
                Ok(())
            }
            Err(error) => {
                for message in error.messages() {
                    ctx.record_error(&unit.id, message);
                }
                Err(EngineError::Apply {
                    id: unit.id.clone(),
                })
            }
        }
    }

    /// Apply units in scheduled order; the first failure aborts the whole
    /// run (apply failures are never aggregated).
    pub fn apply_all(
        &self,
        upgrades: &[UpgradeUnit],
        ctx: &mut RunContext,
    ) -> Result<(), EngineError> {
        for unit in upgrades {
            tracing::info!("applying {} ({})", unit.id, unit.info());
            self.apply(unit, ctx)?;
        }
        Ok(())
    }

    /// Run every unit post-check, then every global post-check, with the
    /// same aggregation semantics as the pre-checks. Failures here do not
    /// undo anything: the upgrades stay applied.
    pub fn post_upgrade_checks(
        &self,
        upgrades: &[UpgradeUnit],
        ctx: &mut RunContext,
    ) -> Result<(), EngineError> {
        let mut failures = Vec::new();

        for unit in upgrades {
            let span = unit_span(&unit.id);
            let _scope = span.enter();
            if let Some(Err(error)) = unit.post_upgrade() {
                ctx.record_error(&unit.id, error.to_string());
                failures.push(CheckFailure {
                    scope: unit.id.clone(),
                    messages: error.messages().to_vec(),
                });
            }
        }

        for check in &self.post_checks {
            let span = unit_span(check.name());
            let _scope = span.enter();
            if let Err(error) = check.run() {
                ctx.record_error(check.name(), error.to_string());
                failures.push(CheckFailure {
                    scope: check.name().to_string(),
                    messages: error.messages().to_vec(),
                });
            }
        }

        finish_check_phase(CheckPhase::Post, failures)
    }
}

fn finish_check_phase(phase: CheckPhase, failures: Vec<CheckFailure>) -> Result<(), EngineError> {
    if failures.is_empty() {
        Ok(())
    } else {
        Err(EngineError::Checks(CheckReport { phase, failures }))
    }
}
