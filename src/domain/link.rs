//! Inter-node links.
use crate::domain::tensor::ScenarioTimeMatrix;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A directed transmission link between two nodes in the same network.
///
/// A link is an outflow on `src` and an inflow on `dest` (§4.6); `quantity` is its transmission
/// capacity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Link {
    /// Source node name.
    pub src: Arc<str>,
    /// Destination node name.
    pub dest: Arc<str>,
    /// Transmission capacity, shape `(nb_scn, horizon)`.
    pub quantity: ScenarioTimeMatrix,
    /// Cost per unit transmitted.
    pub cost: ScenarioTimeMatrix,
}
