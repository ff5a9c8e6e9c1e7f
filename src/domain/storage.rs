//! Storage elements.
use crate::domain::tensor::ScenarioTimeMatrix;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default round-trip efficiency when a study builder doesn't specify one (§9 Open Question).
pub const DEFAULT_EFFICIENCY: f64 = 1.0;

/// Default initial capacity when a study builder doesn't specify one (§9 Open Question).
pub const DEFAULT_INIT_CAPACITY: f64 = 0.0;

/// A storage attached to a node.
///
/// Three decision variables are allocated per `(scn, t)` in the LP domain (§4.3): `flow_in`,
/// `flow_out` and the stored `capacity`, linked by the recurrence in §4.6.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Storage {
    /// Name, unique among consumptions/productions/storages on the same node.
    pub name: Arc<str>,
    /// Maximum stored capacity, shape `(nb_scn, horizon)`.
    pub capacity: ScenarioTimeMatrix,
    /// Maximum charge rate, shape `(nb_scn, horizon)`.
    pub flow_in: ScenarioTimeMatrix,
    /// Maximum discharge rate, shape `(nb_scn, horizon)`.
    pub flow_out: ScenarioTimeMatrix,
    /// Cost per unit charged.
    pub cost_in: ScenarioTimeMatrix,
    /// Cost per unit discharged.
    pub cost_out: ScenarioTimeMatrix,
    /// Stored quantity at `t = -1`, i.e. before the first time step. Must lie in
    /// `[0, capacity(scn, 0)]` for every scenario.
    pub init_capacity: f64,
    /// Round-trip efficiency `η` applied to the carried-over capacity each time step, in `(0, 1]`.
    pub efficiency: f64,
}
