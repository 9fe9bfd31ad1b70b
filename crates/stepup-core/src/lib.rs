mod discover;
mod errors;
mod repository;
mod unit;

pub use discover::{discover, UpgradePackage};
pub use errors::{DiscoveryError, HookError};
pub use repository::parse_repository;
pub use unit::UpgradeUnit;
