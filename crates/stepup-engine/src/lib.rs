mod checks;
mod context;
mod errors;
mod estimate;
mod gate;
mod layout;
mod recipe;
mod runner;

pub use checks::Check;
pub use context::{unit_span, RunContext};
pub use errors::{CheckFailure, CheckPhase, CheckReport, EngineError};
pub use estimate::{estimate, human_estimate};
pub use gate::SchedulerGate;
pub use layout::StateLayout;
pub use recipe::{create_recipe, create_release_recipe, RecipeOptions, DEPENDS_ON_SENTINEL};
pub use runner::Engine;
