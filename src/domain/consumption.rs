//! Consumption elements.
use crate::domain::tensor::ScenarioTimeMatrix;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A consumption attached to a node.
///
/// `quantity` is the forced demand (§3); any of it that cannot be served becomes lost load in the
/// LP solution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Consumption {
    /// Name, unique among consumptions/productions/storages on the same node.
    pub name: Arc<str>,
    /// Cost per unit of lost load. Typically a very high value (§4.5: ~10⁶) so the optimiser only
    /// sheds load when there is genuinely no cheaper way to balance the node.
    pub cost: ScenarioTimeMatrix,
    /// The demand to serve, shape `(nb_scn, horizon)`.
    pub quantity: ScenarioTimeMatrix,
}
