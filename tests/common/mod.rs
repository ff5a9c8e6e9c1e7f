//! Shared helpers for the scenario and property integration tests.
use hadar::domain::Study;
use hadar::result::Result as HadarResult;

/// Recompute the LP objective from a solved [`HadarResult`] and the [`Study`] it was solved from:
/// `Σ cost * lost_load` for consumptions, `Σ cost * used` for productions and links, and
/// `Σ cost_in * flow_in + cost_out * flow_out` for storages.
///
/// The solve API does not expose the raw objective scalar (HiGHS's `Solution` only carries
/// variable values, per §4.8), so tests recompute it from the same cost coefficients the input
/// mapper attaches (§4.5) and the solved result.
pub fn objective(study: &Study, result: &HadarResult) -> f64 {
    let mut total = 0.0;
    for scn in 0..study.nb_scn {
        for t in 0..study.horizon {
            let Some(networks) = result.at(scn, t) else {
                continue;
            };
            for network in study.networks.values() {
                let Some(output_network) = networks.get(network.name.as_ref()) else {
                    continue;
                };
                for node in network.nodes.values() {
                    let Some(output_node) = output_network.nodes.get(node.name.as_ref()) else {
                        continue;
                    };
                    for cons in &node.consumptions {
                        let given = output_node
                            .consumptions
                            .iter()
                            .find(|c| c.name == cons.name)
                            .expect("every study consumption has a solved counterpart")
                            .given;
                        let lost = cons.quantity.get(scn, t) - given;
                        total += cons.cost.get(scn, t) * lost;
                    }
                    for prod in &node.productions {
                        let used = output_node
                            .productions
                            .iter()
                            .find(|p| p.name == prod.name)
                            .expect("every study production has a solved counterpart")
                            .used;
                        total += prod.cost.get(scn, t) * used;
                    }
                    for storage in &node.storages {
                        let solved = output_node
                            .storages
                            .iter()
                            .find(|s| s.name == storage.name)
                            .expect("every study storage has a solved counterpart");
                        total += storage.cost_in.get(scn, t) * solved.flow_in;
                        total += storage.cost_out.get(scn, t) * solved.flow_out;
                    }
                    for link in &node.links {
                        let used = output_node
                            .links
                            .iter()
                            .find(|l| l.dest == link.dest)
                            .expect("every study link has a solved counterpart")
                            .used;
                        total += link.cost.get(scn, t) * used;
                    }
                }
            }
        }
    }
    total
}

/// The largest flow-balance residual (`LHS - RHS` of the adequacy equation in §3) across every
/// solved `(scn, t, node)`, or `0.0` if `result` has no entries.
///
/// `LHS = Σ used_production + Σ stored_out + Σ incoming_link + Σ lost_consumption`,
/// `RHS = Σ asked_consumption + Σ stored_in + Σ outgoing_link`. Property P1 requires this to be
/// within `1e-6` of zero for every node.
pub fn max_balance_residual(study: &Study, result: &HadarResult) -> f64 {
    let mut worst: f64 = 0.0;
    for scn in 0..study.nb_scn {
        for t in 0..study.horizon {
            let Some(networks) = result.at(scn, t) else {
                continue;
            };
            for network in study.networks.values() {
                let Some(output_network) = networks.get(network.name.as_ref()) else {
                    continue;
                };
                for node in network.nodes.values() {
                    let Some(output_node) = output_network.nodes.get(node.name.as_ref()) else {
                        continue;
                    };

                    let mut lhs = 0.0;
                    let mut rhs = 0.0;

                    for cons in &node.consumptions {
                        let given = output_node
                            .consumptions
                            .iter()
                            .find(|c| c.name == cons.name)
                            .expect("every study consumption has a solved counterpart")
                            .given;
                        lhs += cons.quantity.get(scn, t) - given;
                        rhs += cons.quantity.get(scn, t);
                    }
                    for prod in &node.productions {
                        lhs += output_node
                            .productions
                            .iter()
                            .find(|p| p.name == prod.name)
                            .expect("every study production has a solved counterpart")
                            .used;
                    }
                    for storage in &node.storages {
                        let solved = output_node
                            .storages
                            .iter()
                            .find(|s| s.name == storage.name)
                            .expect("every study storage has a solved counterpart");
                        lhs += solved.flow_out;
                        rhs += solved.flow_in;
                    }
                    for link in &node.links {
                        rhs += output_node
                            .links
                            .iter()
                            .find(|l| l.dest == link.dest)
                            .expect("every study link has a solved counterpart")
                            .used;
                    }
                    // Incoming: every other node's outgoing link targeting this node.
                    for other in network.nodes.values() {
                        if other.name == node.name {
                            continue;
                        }
                        let Some(other_output) = output_network.nodes.get(other.name.as_ref()) else {
                            continue;
                        };
                        for link in &other.links {
                            if link.dest == node.name {
                                lhs += other_output
                                    .links
                                    .iter()
                                    .find(|l| l.dest == link.dest)
                                    .expect("every study link has a solved counterpart")
                                    .used;
                            }
                        }
                    }

                    worst = worst.max((lhs - rhs).abs());
                }
            }
        }
    }
    worst
}
