use std::collections::BTreeMap;

use crate::errors::DiscoveryError;
use crate::unit::UpgradeUnit;

pub trait UpgradePackage {
    fn name(&self) -> &str;

    fn upgrades(&self) -> Result<Vec<UpgradeUnit>, DiscoveryError>;
}

// Unit ids are globally unique across packages; when two packages ship the
// same id, the later-registered package wins.
pub fn discover(
    packages: &[Box<dyn UpgradePackage>],
) -> Result<BTreeMap<String, UpgradeUnit>, DiscoveryError> {
    let mut units = BTreeMap::new();
    for package in packages {
        for unit in package.upgrades()? {
            units.insert(unit.id.clone(), unit);
        }
    }
    Ok(units)
}
