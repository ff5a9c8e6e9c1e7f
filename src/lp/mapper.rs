//! Input and output mappers bridging the domain model and the LP layer (§4.4, §4.8).
use crate::domain::node::Node;
use crate::lp::domain::{LPConsumption, LPLink, LPNode, LPProduction, LPStorage};
use crate::lp::objective;
use highs::{Col, RowProblem};
use std::collections::HashMap;
use std::sync::Arc;

/// Build the deterministic variable identifier used by [`InputMapper`] and [`OutputMapper`]
/// (§4.4): `"{scn}:{t}:{node}:{kind}:{name}"`.
pub fn var_id(scn: usize, t: usize, node: &str, kind: &str, name: &str) -> String {
    format!("{scn}:{t}:{node}:{kind}:{name}")
}

/// Allocates decision variables for one batch's worth of `(scn, t, node)` triples.
///
/// HiGHS bakes a column's objective coefficient into [`RowProblem::add_column`] itself, so unlike
/// the `ObjectiveBuilder`/`InputMapper` split in the source this mapper also plays the objective
/// builder's role: each `add_*` call is handed the already-computed coefficient (see
/// [`crate::lp::objective`]) and creates the column with it directly.
///
/// Tracks the id assigned to each column, in creation order, so that solved values can be read
/// back by [`OutputMapper`] without needing to retain `highs::Col` handles across threads.
#[derive(Default)]
pub struct InputMapper {
    ids: Vec<String>,
}

impl InputMapper {
    /// A fresh mapper with no columns yet allocated.
    pub fn new() -> Self {
        Self::default()
    }

    fn add_column(&mut self, problem: &mut RowProblem, coeff: f64, lb: f64, ub: f64, id: String) -> Col {
        let col = problem.add_column(coeff, lb..=ub);
        self.ids.push(id);
        col
    }

    /// Allocate every LP variable for `node` at `(scn, t)`.
    ///
    /// `node_key` disambiguates nodes with the same name in different networks
    /// (`"{network}/{node}"`). `network_name` is used to resolve a link's bare `dest` node name
    /// into the same `"{network}/{node}"` key space (links only ever target a node in the same
    /// network, per the study builder's invariants).
    pub fn map_node(
        &mut self,
        problem: &mut RowProblem,
        scn: usize,
        t: usize,
        network_name: &str,
        node_key: &str,
        node: &Node,
    ) -> LPNode {
        let mut lp_node = LPNode::default();

        for cons in &node.consumptions {
            let quantity = cons.quantity.get(scn, t);
            let cost = objective::consumption_coefficient(cons.cost.get(scn, t));
            let id = var_id(scn, t, node_key, "consumption", &cons.name);
            let var = self.add_column(problem, cost, 0.0, quantity, id);
            lp_node.consumptions.push(LPConsumption {
                name: cons.name.clone(),
                cost,
                quantity,
                var,
            });
        }

        for prod in &node.productions {
            let quantity = prod.quantity.get(scn, t);
            let cost = objective::production_coefficient(prod.cost.get(scn, t));
            let id = var_id(scn, t, node_key, "production", &prod.name);
            let var = self.add_column(problem, cost, 0.0, quantity, id);
            lp_node.productions.push(LPProduction {
                name: prod.name.clone(),
                cost,
                var,
            });
        }

        for storage in &node.storages {
            let flow_in = storage.flow_in.get(scn, t);
            let flow_out = storage.flow_out.get(scn, t);
            let capacity = storage.capacity.get(scn, t);
            let (cost_in, cost_out) =
                objective::storage_coefficients(storage.cost_in.get(scn, t), storage.cost_out.get(scn, t));

            let var_in = self.add_column(
                problem,
                cost_in,
                0.0,
                flow_in,
                var_id(scn, t, node_key, "storage_in", &storage.name),
            );
            let var_out = self.add_column(
                problem,
                cost_out,
                0.0,
                flow_out,
                var_id(scn, t, node_key, "storage_out", &storage.name),
            );
            let var_capacity = self.add_column(
                problem,
                0.0,
                0.0,
                capacity,
                var_id(scn, t, node_key, "storage_capacity", &storage.name),
            );

            lp_node.storages.push(LPStorage {
                name: storage.name.clone(),
                cost_in,
                cost_out,
                var_in,
                var_out,
                var_capacity,
                efficiency: storage.efficiency,
                init_capacity: storage.init_capacity,
            });
        }

        for link in &node.links {
            let quantity = link.quantity.get(scn, t);
            let cost = objective::link_coefficient(link.cost.get(scn, t));
            let dest_key: Arc<str> = format!("{network_name}/{}", link.dest).into();
            let id = var_id(scn, t, node_key, "link", &format!("{}->{}", link.src, link.dest));
            let var = self.add_column(problem, cost, 0.0, quantity, id);
            lp_node.links.push(LPLink {
                src: node_key.into(),
                dest: dest_key,
                cost,
                var,
            });
        }

        lp_node
    }

    /// Consume the mapper, returning the id assigned to each column in creation order (so that
    /// `index` matches the corresponding entry of `highs::Solution::columns()`).
    pub fn into_ids(self) -> Vec<String> {
        self.ids
    }
}

/// Reads solved variable values back against the original `Study` structure (§4.8).
///
/// Given a merged `id -> value` map (built by zipping [`InputMapper::into_ids`] against a
/// solution's columns, across every batch), recomputes the same deterministic ids while walking
/// the study to produce [`crate::result::Result`].
pub struct OutputMapper<'a> {
    values: &'a HashMap<String, f64>,
}

impl<'a> OutputMapper<'a> {
    /// Build a mapper over a merged `id -> solved value` table.
    pub fn new(values: &'a HashMap<String, f64>) -> Self {
        Self { values }
    }

    fn get(&self, id: &str) -> f64 {
        *self.values.get(id).unwrap_or_else(|| {
            panic!("no solved value recorded for variable '{id}' (internal mapper bug)")
        })
    }

    /// Solved lost-load quantity (`quantity - var`) for a consumption.
    pub fn consumption_given(&self, scn: usize, t: usize, node_key: &str, name: &str, quantity: f64) -> f64 {
        let lost = self.get(&var_id(scn, t, node_key, "consumption", name));
        quantity - lost
    }

    /// Solved used quantity for a production.
    pub fn production_used(&self, scn: usize, t: usize, node_key: &str, name: &str) -> f64 {
        self.get(&var_id(scn, t, node_key, "production", name))
    }

    /// Solved charge rate for a storage.
    pub fn storage_flow_in(&self, scn: usize, t: usize, node_key: &str, name: &str) -> f64 {
        self.get(&var_id(scn, t, node_key, "storage_in", name))
    }

    /// Solved discharge rate for a storage.
    pub fn storage_flow_out(&self, scn: usize, t: usize, node_key: &str, name: &str) -> f64 {
        self.get(&var_id(scn, t, node_key, "storage_out", name))
    }

    /// Solved stored capacity for a storage.
    pub fn storage_capacity(&self, scn: usize, t: usize, node_key: &str, name: &str) -> f64 {
        self.get(&var_id(scn, t, node_key, "storage_capacity", name))
    }

    /// Solved transmitted flow for a link.
    pub fn link_used(&self, scn: usize, t: usize, node_key: &str, src: &str, dest: &str) -> f64 {
        self.get(&var_id(scn, t, node_key, "link", &format!("{src}->{dest}")))
    }
}
