use std::collections::{BTreeMap, BTreeSet};

use stepup_core::UpgradeUnit;

use crate::build::build_graph;
use crate::errors::GraphError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub order: Vec<String>,
    pub ghost_upgrades: Vec<String>,
}

pub fn order_upgrades(
    mut units: BTreeMap<String, UpgradeUnit>,
    history: &BTreeSet<String>,
) -> Result<(Vec<UpgradeUnit>, Vec<String>), GraphError> {
    let schedule = order_ids(&units, history)?;
    let ordered = schedule
        .order
        .iter()
        .filter_map(|id| units.remove(id))
        .collect();
    Ok((ordered, schedule.ghost_upgrades))
}

pub fn order_ids(
    units: &BTreeMap<String, UpgradeUnit>,
    history: &BTreeSet<String>,
) -> Result<Schedule, GraphError> {
    let graph = build_graph(units, history);
    let mut incoming = graph.incoming;
    let mut outgoing = graph.outgoing;
    let mut ghost_upgrades = Vec::new();

    // An applied upgrade vouches for its whole dependency closure: remove it
    // from the graph entirely and keep pruning from the dependencies it
    // orphans. A historical id with no outgoing entry is a ghost upgrade
    // (applied once, no longer discoverable) and is harmless.
    for applied in history {
        let mut stack = vec![applied.clone()];
        while let Some(node) = stack.pop() {
            match outgoing.get(&node) {
                Some(dependents) => {
                    for dependent in dependents {
                        if let Some(edges) = incoming.get_mut(dependent) {
                            edges.remove(&node);
                        }
                    }
                }
                None => ghost_upgrades.push(node.clone()),
            }

            if let Some(dependencies) = incoming.remove(&node) {
                for dependency in dependencies {
                    if let Some(edges) = outgoing.get_mut(&dependency) {
                        edges.remove(&node);
                    }
                    stack.push(dependency);
                }
            }
        }
    }

    for (dependent, dependencies) in &incoming {
        for dependency in dependencies {
            if !incoming.contains_key(dependency) {
                return Err(GraphError::MissingDependency {
                    dependent: dependent.clone(),
                    missing: dependency.clone(),
                });
            }
        }
    }

    // Kahn's algorithm; the BTreeSet work-set makes the tie-break between
    // simultaneously-ready nodes lexicographic by id.
    let mut ready = incoming
        .iter()
        .filter_map(|(id, edges)| edges.is_empty().then(|| id.clone()))
        .collect::<BTreeSet<_>>();
    let mut order = Vec::new();

    while let Some(next) = ready.pop_first() {
        if let Some(dependents) = outgoing.get(&next) {
            for dependent in dependents {
                if let Some(edges) = incoming.get_mut(dependent) {
                    edges.remove(&next);
                    if edges.is_empty() {
                        ready.insert(dependent.clone());
                    }
                }
            }
        }
        order.push(next);
    }

    let leftover = incoming
        .iter()
        .filter_map(|(id, edges)| (!edges.is_empty()).then(|| id.clone()))
        .collect::<Vec<_>>();
    if !leftover.is_empty() {
        return Err(GraphError::CyclicDependency { ids: leftover });
    }

    Ok(Schedule {
        order,
        ghost_upgrades,
    })
}
