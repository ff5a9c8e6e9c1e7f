//! Study networks.
use crate::domain::node::Node;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A named collection of [`Node`]s.
///
/// Nodes are kept in an [`IndexMap`] so that iteration order matches insertion order — the
/// ordering the adequacy builder (§4.6) and the batch solver driver (§5) rely on for determinism
/// across runs (Property P4).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Network {
    /// Network name.
    pub name: Arc<str>,
    /// Nodes in this network, keyed by name, in insertion order.
    pub nodes: IndexMap<Arc<str>, Node>,
}

impl Network {
    /// Create an empty network with the given name.
    pub fn new(name: Arc<str>) -> Self {
        Self {
            name,
            nodes: IndexMap::new(),
        }
    }
}
