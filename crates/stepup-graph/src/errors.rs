use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("upgrade '{dependent}' depends on an unknown upgrade '{missing}'")]
    MissingDependency { dependent: String, missing: String },
    #[error("the upgrades have at least one cyclic dependency involving: {}", .ids.join(", "))]
    CyclicDependency { ids: Vec<String> },
}
