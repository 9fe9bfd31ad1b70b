use std::fmt;

use stepup_core::HookError;

/// A named global check run once per upgrade batch.
pub struct Check {
    name: String,
    run: Box<dyn Fn() -> Result<(), HookError>>,
}

impl Check {
    pub fn new(
        name: impl Into<String>,
        run: impl Fn() -> Result<(), HookError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            run: Box::new(run),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run(&self) -> Result<(), HookError> {
        (self.run)()
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
