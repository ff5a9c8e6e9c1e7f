//! A fluent constructor for [`Study`] that validates shapes and structural invariants as it goes
//! (§4.2).
use crate::domain::{Consumption, IntoMatrix, Link, Network, Node, Production, Storage, Study};
use crate::domain::storage::{DEFAULT_EFFICIENCY, DEFAULT_INIT_CAPACITY};
use crate::domain::study::DEFAULT_NETWORK;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::sync::Arc;

/// Element category, used only to scope the per-node duplicate-name check (§3: "names unique per
/// node" is checked within each of consumption/production/storage).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Kind {
    Consumption,
    Production,
    Storage,
}

/// Fluent builder for a [`Study`].
///
/// ```
/// use hadar::builder::StudyBuilder;
///
/// let study = StudyBuilder::new(3, 1)
///     .network("default").unwrap()
///     .node("a").unwrap()
///     .consumption("load", 1.0e6, vec![100.0, 100.0, 100.0]).unwrap()
///     .production("prod", 10.0, vec![200.0, 200.0, 200.0]).unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(study.horizon, 3);
/// ```
pub struct StudyBuilder {
    horizon: usize,
    nb_scn: usize,
    networks: IndexMap<Arc<str>, Network>,
    current_network: Option<Arc<str>>,
    current_node: Option<Arc<str>>,
}

impl StudyBuilder {
    /// Start building a study with the given horizon and scenario count.
    pub fn new(horizon: usize, nb_scn: usize) -> Self {
        Self {
            horizon,
            nb_scn,
            networks: IndexMap::new(),
            current_network: None,
            current_node: None,
        }
    }

    /// Select (creating if necessary) the network that subsequent `node`/`link` calls apply to.
    pub fn network(mut self, name: &str) -> Result<Self> {
        let name: Arc<str> = name.into();
        self.networks
            .entry(Arc::clone(&name))
            .or_insert_with(|| Network::new(Arc::clone(&name)));
        self.current_network = Some(name);
        Ok(self)
    }

    /// Select (creating if necessary) the node that subsequent `consumption`/`production`/
    /// `storage` calls apply to, within the current network.
    ///
    /// # Errors
    ///
    /// Returns an error if no network has been selected yet.
    pub fn node(mut self, name: &str) -> Result<Self> {
        let network = self.current_network_mut()?;
        let name: Arc<str> = name.into();
        network
            .nodes
            .entry(Arc::clone(&name))
            .or_insert_with(|| Node::new(Arc::clone(&name)));
        self.current_node = Some(name);
        Ok(self)
    }

    /// Attach a consumption to the current node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shape`] if `cost` or `quantity` cannot be broadcast to
    /// `(nb_scn, horizon)`, or [`Error::DuplicateName`] if the current node already has a
    /// consumption with this name.
    pub fn consumption(
        mut self,
        name: &str,
        cost: impl IntoMatrix,
        quantity: impl IntoMatrix,
    ) -> Result<Self> {
        let (nb_scn, horizon) = (self.nb_scn, self.horizon);
        let cost = cost.into_matrix(nb_scn, horizon)?;
        let quantity = quantity.into_matrix(nb_scn, horizon)?;
        let node = self.current_node_mut()?;
        check_unique(node, Kind::Consumption, name)?;
        node.consumptions.push(Consumption {
            name: name.into(),
            cost,
            quantity,
        });
        Ok(self)
    }

    /// Attach a production to the current node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shape`] if `cost` or `quantity` cannot be broadcast to
    /// `(nb_scn, horizon)`, or [`Error::DuplicateName`] if the current node already has a
    /// production with this name.
    pub fn production(
        mut self,
        name: &str,
        cost: impl IntoMatrix,
        quantity: impl IntoMatrix,
    ) -> Result<Self> {
        let (nb_scn, horizon) = (self.nb_scn, self.horizon);
        let cost = cost.into_matrix(nb_scn, horizon)?;
        let quantity = quantity.into_matrix(nb_scn, horizon)?;
        let node = self.current_node_mut()?;
        check_unique(node, Kind::Production, name)?;
        node.productions.push(Production {
            name: name.into(),
            cost,
            quantity,
        });
        Ok(self)
    }

    /// Attach a storage to the current node.
    ///
    /// `init_capacity` and `efficiency` default to `0.0` and `1.0` respectively when omitted
    /// (§9 Open Question); use [`Self::storage_with_defaults`] to fall back explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shape`] if any quantity cannot be broadcast to `(nb_scn, horizon)`, or
    /// [`Error::DuplicateName`] if the current node already has a storage with this name.
    #[allow(clippy::too_many_arguments)]
    pub fn storage(
        self,
        name: &str,
        capacity: impl IntoMatrix,
        flow_in: impl IntoMatrix,
        flow_out: impl IntoMatrix,
        cost_in: impl IntoMatrix,
        cost_out: impl IntoMatrix,
        init_capacity: f64,
        efficiency: f64,
    ) -> Result<Self> {
        self.storage_impl(
            name,
            capacity,
            flow_in,
            flow_out,
            cost_in,
            cost_out,
            init_capacity,
            efficiency,
        )
    }

    /// Like [`Self::storage`], but with `init_capacity = 0.0` and `efficiency = 1.0`.
    #[allow(clippy::too_many_arguments)]
    pub fn storage_with_defaults(
        self,
        name: &str,
        capacity: impl IntoMatrix,
        flow_in: impl IntoMatrix,
        flow_out: impl IntoMatrix,
        cost_in: impl IntoMatrix,
        cost_out: impl IntoMatrix,
    ) -> Result<Self> {
        self.storage_impl(
            name,
            capacity,
            flow_in,
            flow_out,
            cost_in,
            cost_out,
            DEFAULT_INIT_CAPACITY,
            DEFAULT_EFFICIENCY,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn storage_impl(
        mut self,
        name: &str,
        capacity: impl IntoMatrix,
        flow_in: impl IntoMatrix,
        flow_out: impl IntoMatrix,
        cost_in: impl IntoMatrix,
        cost_out: impl IntoMatrix,
        init_capacity: f64,
        efficiency: f64,
    ) -> Result<Self> {
        let (nb_scn, horizon) = (self.nb_scn, self.horizon);
        let capacity = capacity.into_matrix(nb_scn, horizon)?;
        let flow_in = flow_in.into_matrix(nb_scn, horizon)?;
        let flow_out = flow_out.into_matrix(nb_scn, horizon)?;
        let cost_in = cost_in.into_matrix(nb_scn, horizon)?;
        let cost_out = cost_out.into_matrix(nb_scn, horizon)?;

        if efficiency <= 0.0 || efficiency > 1.0 {
            return Err(Error::Shape(format!(
                "storage efficiency must be in (0, 1], got {efficiency}"
            )));
        }

        let node = self.current_node_mut()?;
        check_unique(node, Kind::Storage, name)?;
        if init_capacity < 0.0 || init_capacity > capacity.get(0, 0) {
            return Err(Error::Shape(format!(
                "storage init_capacity {init_capacity} must be in [0, capacity(0, 0)={}]",
                capacity.get(0, 0)
            )));
        }
        node.storages.push(Storage {
            name: name.into(),
            capacity,
            flow_in,
            flow_out,
            cost_in,
            cost_out,
            init_capacity,
            efficiency,
        });
        Ok(self)
    }

    /// Add a directed link from `src` to `dest` within the current network.
    ///
    /// Unlike `node`, `link` does not move the node cursor and does not require `src`/`dest` to
    /// have been visited with `.node(...)` yet; they are created on demand, consistent with link
    /// endpoints being validated only at [`Self::build`] (§4.2: `UnknownNodeError` at `build()`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shape`] if `src == dest`, or [`Error::DuplicateName`] if a link from `src`
    /// to `dest` already exists.
    pub fn link(
        mut self,
        src: &str,
        dest: &str,
        quantity: impl IntoMatrix,
        cost: impl IntoMatrix,
    ) -> Result<Self> {
        if src == dest {
            return Err(Error::Shape(format!(
                "link source and destination must differ, both were '{src}'"
            )));
        }
        let (nb_scn, horizon) = (self.nb_scn, self.horizon);
        let quantity = quantity.into_matrix(nb_scn, horizon)?;
        let cost = cost.into_matrix(nb_scn, horizon)?;

        let network = self.current_network_mut()?;
        let src_name: Arc<str> = src.into();
        let dest_name: Arc<str> = dest.into();
        let node = network
            .nodes
            .entry(Arc::clone(&src_name))
            .or_insert_with(|| Node::new(Arc::clone(&src_name)));

        if node.links.iter().any(|link| *link.dest == *dest_name) {
            return Err(Error::DuplicateName {
                node: src.to_string(),
                name: format!("link to {dest}"),
            });
        }
        node.links.push(Link {
            src: src_name,
            dest: dest_name,
            quantity,
            cost,
        });
        Ok(self)
    }

    /// Finish building, validating that every link endpoint is a declared node and that a
    /// `"default"` network exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNode`] if a link refers to a destination node never declared (via
    /// `.node(...)` or as another link's source) within its network.
    pub fn build(self) -> Result<Study> {
        if !self.networks.contains_key(DEFAULT_NETWORK) {
            return Err(Error::UnknownNode(format!(
                "study must contain a network named '{DEFAULT_NETWORK}'"
            )));
        }

        for network in self.networks.values() {
            for node in network.nodes.values() {
                for link in &node.links {
                    if !network.nodes.contains_key(&link.dest) {
                        return Err(Error::UnknownNode(link.dest.to_string()));
                    }
                }
            }
        }

        Ok(Study {
            horizon: self.horizon,
            nb_scn: self.nb_scn,
            networks: self.networks,
        })
    }

    fn current_network_mut(&mut self) -> Result<&mut Network> {
        let name = self
            .current_network
            .clone()
            .ok_or_else(|| Error::Shape("no network selected; call .network(..) first".into()))?;
        Ok(self.networks.get_mut(&name).expect("cursor always valid"))
    }

    fn current_node_mut(&mut self) -> Result<&mut Node> {
        let node_name = self
            .current_node
            .clone()
            .ok_or_else(|| Error::Shape("no node selected; call .node(..) first".into()))?;
        let network = self.current_network_mut()?;
        Ok(network.nodes.get_mut(&node_name).expect("cursor always valid"))
    }
}

fn check_unique(node: &Node, kind: Kind, name: &str) -> Result<()> {
    let exists = match kind {
        Kind::Consumption => node.consumptions.iter().any(|c| &*c.name == name),
        Kind::Production => node.productions.iter().any(|p| &*p.name == name),
        Kind::Storage => node.storages.iter().any(|s| &*s.name == name),
    };
    if exists {
        return Err(Error::DuplicateName {
            node: node.name.to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}
