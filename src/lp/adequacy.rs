//! Adequacy (node balance) and storage recurrence constraints (§4.6).
use crate::lp::domain::LPNode;
use highs::{Col, RowProblem};
use indexmap::IndexMap;
use std::sync::Arc;

/// One node's balance-constraint terms, accumulated across the first pass and finalised by
/// [`AdequacyBuilder::build`].
struct AdequacyRow {
    rhs: f64,
    terms: Vec<(Col, f64)>,
}

/// Builds the per-`(scn, t, node)` adequacy (flow balance) constraints and the per-storage
/// capacity recurrence constraints.
///
/// Link coefficients are wired in two passes, as in the source: the `-1` export coefficient is
/// added when a node's own row is created, and the `+1` import coefficient is added to the
/// destination node's row in a second pass once every node for the batch has been registered
/// (§4.6) — a link's destination row may not exist yet the first time its node is visited, since
/// nodes are walked in a single insertion-order pass.
#[derive(Default)]
pub struct AdequacyBuilder {
    rows: IndexMap<(usize, usize, Arc<str>), AdequacyRow>,
    // Deferred (scn, t, dest_key, link_column) import terms, applied by `build`.
    imports: Vec<(usize, usize, Arc<str>, Col)>,
}

impl AdequacyBuilder {
    /// A builder with no constraints yet registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one node's balance constraint terms for `(scn, t)`.
    ///
    /// Right-hand side is the node's total forced consumption; coefficients are `+1` per
    /// lost-load variable, `+1` per production variable, `-1` per outgoing link variable (export),
    /// `-1` per storage charge variable and `+1` per storage discharge variable.
    pub fn add_node(&mut self, scn: usize, t: usize, node_key: Arc<str>, node: &LPNode) {
        let rhs = node.consumptions.iter().map(|c| c.quantity).sum();
        let mut terms = Vec::with_capacity(
            node.consumptions.len() + node.productions.len() + 2 * node.storages.len() + node.links.len(),
        );

        for cons in &node.consumptions {
            terms.push((cons.var, 1.0));
        }
        for prod in &node.productions {
            terms.push((prod.var, 1.0));
        }
        for storage in &node.storages {
            terms.push((storage.var_in, -1.0));
            terms.push((storage.var_out, 1.0));
        }
        for link in &node.links {
            terms.push((link.var, -1.0));
            self.imports.push((scn, t, link.dest.clone(), link.var));
        }

        self.rows.insert((scn, t, node_key), AdequacyRow { rhs, terms });
    }

    /// Add a storage's capacity recurrence row for `(scn, t)` directly: `C_t - eta*C_{t-1} -
    /// flow_in_t + flow_out_t = 0` (or, at `t = 0`, with the constant `C_{-1} = init_capacity`
    /// folded into the right-hand side).
    ///
    /// Unlike the node balance row, this never needs a second pass: every column it references
    /// (`var_capacity`, `var_in`, `var_out`, and the previous timestep's `var_capacity`) already
    /// exists by the time a storage is visited.
    pub fn add_storage_recurrence(
        &mut self,
        problem: &mut RowProblem,
        var_capacity: Col,
        var_in: Col,
        var_out: Col,
        efficiency: f64,
        init_capacity: f64,
        prev_capacity: Option<Col>,
    ) {
        let terms = match prev_capacity {
            Some(prev) => vec![(var_capacity, 1.0), (prev, -efficiency), (var_in, -1.0), (var_out, 1.0)],
            None => vec![(var_capacity, 1.0), (var_in, -1.0), (var_out, 1.0)],
        };
        let rhs = if prev_capacity.is_some() { 0.0 } else { efficiency * init_capacity };
        problem.add_row(rhs..=rhs, terms);
    }

    /// Apply the deferred link import terms, then add every accumulated row to `problem`, in
    /// ascending `(scn, t, node)` order (the `IndexMap`'s insertion order, per §5's determinism
    /// requirement).
    pub fn build(mut self, problem: &mut RowProblem) {
        for (scn, t, dest_key, var) in self.imports.drain(..) {
            if let Some(row) = self.rows.get_mut(&(scn, t, dest_key)) {
                row.terms.push((var, 1.0));
            }
        }
        for (_, row) in self.rows {
            problem.add_row(row.rhs..=row.rhs, row.terms);
        }
    }
}
