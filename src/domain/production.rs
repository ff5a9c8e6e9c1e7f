//! Production elements.
use crate::domain::tensor::ScenarioTimeMatrix;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A production attached to a node.
///
/// `quantity` is the availability upper bound (§3); the LP decides how much of it is actually
/// used.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Production {
    /// Name, unique among consumptions/productions/storages on the same node.
    pub name: Arc<str>,
    /// Cost per unit used.
    pub cost: ScenarioTimeMatrix,
    /// Availability upper bound, shape `(nb_scn, horizon)`.
    pub quantity: ScenarioTimeMatrix,
}
