//! Solved output object model, built by the [`crate::lp::mapper::OutputMapper`] from a merged
//! `id -> value` table (§4.8).
use crate::domain::ScenarioTimeMatrix;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Solved state of one consumption, for one `(scn, t)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputConsumption {
    /// Element name.
    pub name: Arc<str>,
    /// `quantity - used`: the portion of demand that went unserved.
    pub given: f64,
}

/// Solved state of one production, for one `(scn, t)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputProduction {
    /// Element name.
    pub name: Arc<str>,
    /// The quantity actually used.
    pub used: f64,
}

/// Solved state of one storage, for one `(scn, t)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputStorage {
    /// Element name.
    pub name: Arc<str>,
    /// Solved charge rate.
    pub flow_in: f64,
    /// Solved discharge rate.
    pub flow_out: f64,
    /// Solved stored capacity at this timestep.
    pub capacity: f64,
}

/// Solved state of one outgoing link, for one `(scn, t)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputLink {
    /// Destination node name.
    pub dest: Arc<str>,
    /// The quantity transmitted.
    pub used: f64,
}

/// Solved state of one node, for one `(scn, t)`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputNode {
    /// Per-consumption solved state.
    pub consumptions: Vec<OutputConsumption>,
    /// Per-production solved state.
    pub productions: Vec<OutputProduction>,
    /// Per-storage solved state.
    pub storages: Vec<OutputStorage>,
    /// Per-outgoing-link solved state.
    pub links: Vec<OutputLink>,
}

/// Solved state of one network, for one `(scn, t)`: nodes keyed by name, in the study's insertion
/// order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputNetwork {
    /// Solved nodes, keyed by name.
    pub nodes: IndexMap<Arc<str>, OutputNode>,
}

/// The solved state of an entire study, for every `(scn, t)`: `result.networks[net].nodes[node]`
/// indexed by `(scn, t)` via [`Result::at`].
///
/// Flattened as `scenarios[scn][t] -> { network -> OutputNetwork }`, which keeps the per-timestep
/// structure the output mapper naturally produces while matching §4.8's nested assembly
/// (`Result{ networks: { name -> OutputNetwork{ nodes: { name -> OutputNode{...} } } } }`) at each
/// individual time slice.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Result {
    /// `scenarios[scn][t]` is the per-network breakdown solved for that scenario and timestep.
    pub scenarios: Vec<Vec<IndexMap<Arc<str>, OutputNetwork>>>,
}

impl Result {
    /// The solved networks for one `(scn, t)`, if both indices are in range.
    pub fn at(&self, scn: usize, t: usize) -> Option<&IndexMap<Arc<str>, OutputNetwork>> {
        self.scenarios.get(scn).and_then(|per_t| per_t.get(t))
    }

    /// Walk `study` and `values` (a merged `id -> solved value` table, built from every solve
    /// batch's [`crate::lp::mapper::InputMapper::into_ids`] zipped against its solution columns)
    /// to assemble the full solved [`Result`] (§4.8).
    pub fn assemble(study: &crate::domain::Study, values: &std::collections::HashMap<String, f64>) -> Self {
        use crate::lp::mapper::OutputMapper;

        let mapper = OutputMapper::new(values);
        let mut scenarios = Vec::with_capacity(study.nb_scn);

        for scn in 0..study.nb_scn {
            let mut per_t = Vec::with_capacity(study.horizon);
            for t in 0..study.horizon {
                let mut networks = IndexMap::with_capacity(study.networks.len());
                for network in study.networks.values() {
                    let mut output_network = OutputNetwork::default();
                    for node in network.nodes.values() {
                        let node_key = format!("{}/{}", network.name, node.name);
                        let mut output_node = OutputNode::default();

                        for cons in &node.consumptions {
                            let quantity = cons.quantity.get(scn, t);
                            output_node.consumptions.push(OutputConsumption {
                                name: cons.name.clone(),
                                given: mapper.consumption_given(scn, t, &node_key, &cons.name, quantity),
                            });
                        }
                        for prod in &node.productions {
                            output_node.productions.push(OutputProduction {
                                name: prod.name.clone(),
                                used: mapper.production_used(scn, t, &node_key, &prod.name),
                            });
                        }
                        for storage in &node.storages {
                            output_node.storages.push(OutputStorage {
                                name: storage.name.clone(),
                                flow_in: mapper.storage_flow_in(scn, t, &node_key, &storage.name),
                                flow_out: mapper.storage_flow_out(scn, t, &node_key, &storage.name),
                                capacity: mapper.storage_capacity(scn, t, &node_key, &storage.name),
                            });
                        }
                        for link in &node.links {
                            output_node.links.push(OutputLink {
                                dest: link.dest.clone(),
                                used: mapper.link_used(scn, t, &node_key, &link.src, &link.dest),
                            });
                        }

                        output_network.nodes.insert(node.name.clone(), output_node);
                    }
                    networks.insert(network.name.clone(), output_network);
                }
                per_t.push(networks);
            }
            scenarios.push(per_t);
        }

        Self { scenarios }
    }
}

/// `get_balance(node)` = `Σ incoming − Σ outgoing` link flows for `node`, over every `(scn, t)`
/// (§6.3), shape `(nb_scn, horizon)`.
///
/// "Incoming" sums the solved flow of every other node's outgoing link that targets `node`;
/// "outgoing" sums the solved flow of `node`'s own links. Missing `(scn, t)` entries (a node or
/// network absent from `result`) contribute `0`.
pub fn get_balance(result: &Result, network: &str, node: &str) -> Vec<Vec<f64>> {
    result
        .scenarios
        .iter()
        .map(|per_t| {
            per_t
                .iter()
                .map(|networks| {
                    let Some(net) = networks.get(network) else {
                        return 0.0;
                    };
                    let outgoing: f64 = net
                        .nodes
                        .get(node)
                        .map(|n| n.links.iter().map(|l| l.used).sum())
                        .unwrap_or(0.0);
                    let incoming: f64 = net
                        .nodes
                        .iter()
                        .filter(|(name, _)| name.as_ref() != node)
                        .flat_map(|(_, other)| other.links.iter())
                        .filter(|l| l.dest.as_ref() == node)
                        .map(|l| l.used)
                        .sum();
                    incoming - outgoing
                })
                .collect()
        })
        .collect()
}

/// `get_rac()` (Remaining Available Capacity) = `Σ availability − Σ asked`, aggregated across
/// every node of `network`, over every `(scn, t)` (§6.3), shape `(nb_scn, horizon)`.
///
/// This is a read on the study's *inputs* (production availability, forced consumption), not on
/// the solved dispatch: it measures whether the network has enough raw capacity to meet demand,
/// independently of how the optimiser actually routes it. A negative value means the network is,
/// in aggregate, short.
///
/// # Errors
///
/// Returns [`Error::UnknownNode`] if `network` is not one of `study`'s networks.
pub fn get_rac(study: &crate::domain::Study, network: &str) -> crate::error::Result<ScenarioTimeMatrix> {
    let net = study
        .networks
        .get(network)
        .ok_or_else(|| crate::error::Error::UnknownNode(network.to_string()))?;

    let mut grid = vec![vec![0.0; study.horizon]; study.nb_scn];
    for node in net.nodes.values() {
        for (scn, row) in grid.iter_mut().enumerate() {
            for (t, cell) in row.iter_mut().enumerate() {
                let availability: f64 = node.productions.iter().map(|p| p.quantity.get(scn, t)).sum();
                let asked: f64 = node.consumptions.iter().map(|c| c.quantity.get(scn, t)).sum();
                *cell += availability - asked;
            }
        }
    }

    ScenarioTimeMatrix::from_grid(grid, study.nb_scn, study.horizon)
}
