//! Study nodes.
use crate::domain::consumption::Consumption;
use crate::domain::link::Link;
use crate::domain::production::Production;
use crate::domain::storage::Storage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A node in the study's network: a point where consumptions, productions and storages balance,
/// connected to other nodes by outgoing [`Link`]s.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    /// Node name, unique within its network.
    pub name: Arc<str>,
    /// Consumptions attached to this node.
    pub consumptions: Vec<Consumption>,
    /// Productions attached to this node.
    pub productions: Vec<Production>,
    /// Storages attached to this node.
    pub storages: Vec<Storage>,
    /// Links outgoing from this node to other nodes in the same network.
    pub links: Vec<Link>,
}

impl Node {
    /// Create an empty node with the given name.
    pub fn new(name: Arc<str>) -> Self {
        Self {
            name,
            consumptions: Vec::new(),
            productions: Vec::new(),
            storages: Vec::new(),
            links: Vec::new(),
        }
    }
}
