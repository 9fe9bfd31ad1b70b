use std::collections::{BTreeMap, BTreeSet};

use stepup_core::UpgradeUnit;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    pub incoming: BTreeMap<String, BTreeSet<String>>,
    pub outgoing: BTreeMap<String, BTreeSet<String>>,
}

pub fn build_graph(
    units: &BTreeMap<String, UpgradeUnit>,
    history: &BTreeSet<String>,
) -> DependencyGraph {
    let mut incoming: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut outgoing: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for (id, unit) in units {
        let retained = unit
            .depends_on
            .iter()
            .filter(|dependency| !history.contains(*dependency))
            .cloned()
            .collect::<BTreeSet<_>>();

        outgoing.entry(id.clone()).or_default();
        for dependency in &retained {
            // Dependency targets that are not discovered units still get an
            // outgoing entry; the scheduler reports them as missing later.
            outgoing
                .entry(dependency.clone())
                .or_default()
                .insert(id.clone());
        }
        incoming.insert(id.clone(), retained);
    }

    DependencyGraph { incoming, outgoing }
}
