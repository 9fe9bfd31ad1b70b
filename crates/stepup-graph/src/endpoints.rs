use std::collections::{BTreeMap, BTreeSet};

use stepup_core::UpgradeUnit;

use crate::build::build_graph;

// Endpoints are computed over the unpruned graph: a release recipe must
// depend on every current leaf, applied or not.
pub fn find_endpoints(units: &BTreeMap<String, UpgradeUnit>) -> BTreeMap<String, BTreeSet<String>> {
    let graph = build_graph(units, &BTreeSet::new());

    let mut endpoints: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for (id, dependents) in &graph.outgoing {
        if !dependents.is_empty() {
            continue;
        }
        if let Some(unit) = units.get(id) {
            endpoints
                .entry(unit.repository.clone())
                .or_default()
                .insert(id.clone());
        }
    }

    endpoints
}
