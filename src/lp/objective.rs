//! Objective-coefficient computation (§4.5).
//!
//! HiGHS sets a column's objective coefficient at creation time
//! (`RowProblem::add_column(coefficient, bounds)`), the way `muse2`'s
//! `dispatch_optimisation::calculate_cost_coefficient` computes a coefficient just before
//! `add_column` rather than setting it on the column afterwards. Accordingly this module is a
//! set of small, independently named functions rather than a stateful builder: the solver's sense
//! (always minimise, §4.5) is fixed once by [`crate::lp::driver`] when it creates the batch's
//! `RowProblem`.

/// Coefficient for a consumption's lost-load variable: its configured cost (typically a very
/// large number, so the optimiser only sheds load when there is no cheaper way to balance the
/// node).
pub fn consumption_coefficient(cost: f64) -> f64 {
    cost
}

/// Coefficient for a production's used-quantity variable.
pub fn production_coefficient(cost: f64) -> f64 {
    cost
}

/// Coefficient for a link's transmitted-flow variable.
pub fn link_coefficient(cost: f64) -> f64 {
    cost
}

/// Coefficients for a storage's charge (`flow_in`) and discharge (`flow_out`) variables.
pub fn storage_coefficients(cost_in: f64, cost_out: f64) -> (f64, f64) {
    (cost_in, cost_out)
}
