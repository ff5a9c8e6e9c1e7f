//! The top-level study object model.
use crate::domain::network::Network;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name of the network that every study must contain (§3).
pub const DEFAULT_NETWORK: &str = "default";

/// A fully built, immutable study: a network of nodes with consumptions, productions, storages
/// and links, over `horizon` time steps and `nb_scn` scenarios.
///
/// Built once via [`crate::builder::StudyBuilder`], then read-only for the duration of a solve
/// (§3 Ownership and lifecycle). `Study` is `Send + Sync` so the batch solver driver (§4.7) can
/// share it by reference across worker threads.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Study {
    /// Number of time steps in the study.
    pub horizon: usize,
    /// Number of stochastic scenarios in the study.
    pub nb_scn: usize,
    /// Networks in this study, keyed by name, in insertion order. Always contains `"default"`.
    pub networks: IndexMap<Arc<str>, Network>,
}

impl Study {
    /// Iterate over every node in every network, in deterministic (insertion) order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = (&Network, &crate::domain::node::Node)> {
        self.networks
            .values()
            .flat_map(|network| network.nodes.values().map(move |node| (network, node)))
    }
}
