//! LP-layer records: one instance per `(scn, t, node)` element, materialised by the
//! [`crate::lp::mapper::InputMapper`] (§4.3).
use highs::Col;
use std::sync::Arc;

/// A consumption's decision variable represents **lost load**, bounded `[0, quantity]`.
pub struct LPConsumption {
    /// Element name.
    pub name: Arc<str>,
    /// Objective coefficient (cost of a unit of lost load).
    pub cost: f64,
    /// Upper bound: the forced demand for this `(scn, t)`.
    pub quantity: f64,
    /// The lost-load column.
    pub var: Col,
}

/// A production's decision variable is the **quantity used**, bounded `[0, availability]`.
pub struct LPProduction {
    /// Element name.
    pub name: Arc<str>,
    /// Objective coefficient (cost per unit used).
    pub cost: f64,
    /// The used-quantity column.
    pub var: Col,
}

/// A storage's three decision variables for one `(scn, t)`, plus the inter-temporal recurrence
/// parameters needed to wire `C_t = eta * C_{t-1} + flow_in_t - flow_out_t` (§4.6).
pub struct LPStorage {
    /// Element name.
    pub name: Arc<str>,
    /// Objective coefficient for charging.
    pub cost_in: f64,
    /// Objective coefficient for discharging.
    pub cost_out: f64,
    /// Charge-rate column, bounded `[0, flow_in]`.
    pub var_in: Col,
    /// Discharge-rate column, bounded `[0, flow_out]`.
    pub var_out: Col,
    /// Stored-capacity column at this `t`, bounded `[0, capacity]`.
    pub var_capacity: Col,
    /// Round-trip efficiency `eta` applied to the carried-over capacity.
    pub efficiency: f64,
    /// `init_capacity`, used only for the `t = 0` recurrence row.
    pub init_capacity: f64,
}

/// A link's decision variable is the **transmitted flow**, bounded `[0, link capacity]`.
pub struct LPLink {
    /// Source node key (`"{network}/{node}"`).
    pub src: Arc<str>,
    /// Destination node key (`"{network}/{node}"`).
    pub dest: Arc<str>,
    /// Objective coefficient (cost per unit transmitted).
    pub cost: f64,
    /// The transmitted-flow column.
    pub var: Col,
}

/// All LP elements materialised for one node at one `(scn, t)`.
#[derive(Default)]
pub struct LPNode {
    /// Lost-load variables for this node's consumptions.
    pub consumptions: Vec<LPConsumption>,
    /// Used-quantity variables for this node's productions.
    pub productions: Vec<LPProduction>,
    /// Charge/discharge/capacity variables for this node's storages.
    pub storages: Vec<LPStorage>,
    /// Transmitted-flow variables for this node's outgoing links.
    pub links: Vec<LPLink>,
}
