use tracing::Span;

/// Per-run bookkeeping threaded through every phase; there is no
/// process-global warning or error state anywhere in the engine.
#[derive(Debug, Default)]
pub struct RunContext {
    warnings: u32,
    errors: u32,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_warning(&mut self, message: impl AsRef<str>) {
        self.warnings += 1;
        tracing::warn!("{}", message.as_ref());
    }

    pub fn record_error(&mut self, scope: &str, message: impl AsRef<str>) {
        self.errors += 1;
        tracing::error!(scope, "{}", message.as_ref());
    }

    pub fn warning_count(&self) -> u32 {
        self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings != 0
    }

    pub fn error_count(&self) -> u32 {
        self.errors
    }
}

// Log lines emitted while the returned span is entered carry the unit (or
// check) id; the entry guard restores the previous scope on drop, so nested
// scopes stack correctly.
pub fn unit_span(id: &str) -> Span {
    tracing::info_span!("unit", id = %id)
}
