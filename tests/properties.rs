//! Properties P1–P6 from spec.md §8.
mod common;

use common::{max_balance_residual, objective};
use hadar::lp::SolveOptions;
use hadar::pipeline::stages::{Clip, Drop, Rename};
use hadar::pipeline::{Pipeline, ScenarioTable, Stage};
use hadar::solve::SolveKind;
use hadar::StudyBuilder;
use indexmap::IndexMap;

fn multi_node_study() -> hadar::Study {
    StudyBuilder::new(2, 1)
        .network("default")
        .unwrap()
        .node("a")
        .unwrap()
        .consumption("load", 1.0e6, vec![80.0, 120.0])
        .unwrap()
        .production("prod_a", 50.0, vec![30.0, 30.0])
        .unwrap()
        .storage_with_defaults("battery", 50.0, 20.0, 20.0, 1.0, 1.0)
        .unwrap()
        .node("b")
        .unwrap()
        .production("prod_b", 10.0, vec![100.0, 100.0])
        .unwrap()
        .link("b", "a", 100.0, 2.0)
        .unwrap()
        .build()
        .unwrap()
}

/// P1 — Flow balance: the adequacy equation holds for every solved `(scn, t, node)`.
#[test]
fn p1_flow_balance() {
    let study = multi_node_study();
    let result = hadar::solve(&study, &SolveKind::Lp, &SolveOptions::default()).unwrap();
    assert!(max_balance_residual(&study, &result) < 1e-6);
}

/// P2 — Bound compliance: every solved variable lies within its declared bounds.
#[test]
fn p2_bound_compliance() {
    let study = multi_node_study();
    let result = hadar::solve(&study, &SolveKind::Lp, &SolveOptions::default()).unwrap();

    for scn in 0..study.nb_scn {
        for t in 0..study.horizon {
            let networks = result.at(scn, t).unwrap();
            for network in study.networks.values() {
                let output_network = &networks[network.name.as_ref()];
                for node in network.nodes.values() {
                    let output_node = &output_network.nodes[node.name.as_ref()];

                    for cons in &node.consumptions {
                        let given = output_node.consumptions.iter().find(|c| c.name == cons.name).unwrap().given;
                        assert!((-1e-9..=cons.quantity.get(scn, t) + 1e-9).contains(&given));
                    }
                    for prod in &node.productions {
                        let used = output_node.productions.iter().find(|p| p.name == prod.name).unwrap().used;
                        assert!((-1e-9..=prod.quantity.get(scn, t) + 1e-9).contains(&used));
                    }
                    for storage in &node.storages {
                        let solved = output_node.storages.iter().find(|s| s.name == storage.name).unwrap();
                        assert!((-1e-9..=storage.flow_in.get(scn, t) + 1e-9).contains(&solved.flow_in));
                        assert!((-1e-9..=storage.flow_out.get(scn, t) + 1e-9).contains(&solved.flow_out));
                        assert!((-1e-9..=storage.capacity.get(scn, t) + 1e-9).contains(&solved.capacity));
                    }
                    for link in &node.links {
                        let used = output_node.links.iter().find(|l| l.dest == link.dest).unwrap().used;
                        assert!((-1e-9..=link.quantity.get(scn, t) + 1e-9).contains(&used));
                    }
                }
            }
        }
    }
}

/// P3 — Optimality monotonicity: adding a cheaper production cannot raise the objective.
#[test]
fn p3_optimality_monotonicity() {
    let before = StudyBuilder::new(1, 1)
        .network("default")
        .unwrap()
        .node("a")
        .unwrap()
        .consumption("load", 1.0e6, 100.0)
        .unwrap()
        .production("expensive", 50.0, 100.0)
        .unwrap()
        .build()
        .unwrap();
    let after = StudyBuilder::new(1, 1)
        .network("default")
        .unwrap()
        .node("a")
        .unwrap()
        .consumption("load", 1.0e6, 100.0)
        .unwrap()
        .production("expensive", 50.0, 100.0)
        .unwrap()
        .production("cheap", 10.0, 100.0)
        .unwrap()
        .build()
        .unwrap();

    let options = SolveOptions::default();
    let before_result = hadar::solve(&before, &SolveKind::Lp, &options).unwrap();
    let after_result = hadar::solve(&after, &SolveKind::Lp, &options).unwrap();

    assert!(objective(&after, &after_result) <= objective(&before, &before_result) + 1e-6);
}

/// P4 — Determinism: repeated solves of the same study with the same worker count produce
/// bit-identical objective values.
#[test]
fn p4_determinism() {
    let study = multi_node_study();
    let options = SolveOptions {
        workers: Some(2),
        deadline: None,
    };

    let first = hadar::solve(&study, &SolveKind::Lp, &options).unwrap();
    let second = hadar::solve(&study, &SolveKind::Lp, &options).unwrap();

    assert_eq!(objective(&study, &first), objective(&study, &second));
}

/// P5 — Pipeline round-trip: a rename followed by its inverse is the identity, and repeating
/// scenarios then keeping only the first `nb_scn` reproduces the original table.
#[test]
fn p5_pipeline_round_trip() {
    let mut signals = IndexMap::new();
    signals.insert("a".to_string(), vec![1.0, 2.0, 3.0]);
    let table = ScenarioTable::single_scenario(signals);

    let round_trip = Pipeline::new(Rename::new([("a".to_string(), "b".to_string())]))
        .then(Rename::new([("b".to_string(), "a".to_string())]))
        .unwrap()
        .compute(table.clone())
        .unwrap();
    assert_eq!(round_trip, table);

    let repeated = hadar::pipeline::stages::RepeatScenario::new(3).transform(&table).unwrap();
    assert_eq!(repeated.get(0, "a").unwrap(), table.get(0, "a").unwrap());
}

/// P6 — Pipeline composition algebra: `(A+B)+C` and `A+(B+C)` accept the same inputs and produce
/// the same outputs, for real stages (not just plugs in isolation).
#[test]
fn p6_pipeline_composition_algebra() {
    let mut signals = IndexMap::new();
    signals.insert("raw".to_string(), vec![-5.0, 50.0, 150.0]);
    let table = ScenarioTable::single_scenario(signals);

    // A is Free (Clip passes any signal set through); B and C are Restricted and chain
    // inputs/outputs exactly: raw -[B]-> clamped -[C]-> dropped.
    let a_plug = Clip::new(0.0, 100.0).plug();
    let b_plug = Rename::new([("raw".to_string(), "clamped".to_string())]).plug();
    let c_plug = Drop::new(["clamped".to_string()]).plug();

    let left_assoc = a_plug.compose(&b_plug).unwrap().compose(&c_plug).unwrap();
    let right_assoc = a_plug.compose(&b_plug.compose(&c_plug).unwrap()).unwrap();
    assert_eq!(left_assoc, right_assoc);

    let pipeline = Pipeline::new(Clip::new(0.0, 100.0))
        .then(Rename::new([("raw".to_string(), "clamped".to_string())]))
        .unwrap()
        .then(Drop::new(["clamped".to_string()]))
        .unwrap();
    assert_eq!(*pipeline.plug(), left_assoc);

    let expected = {
        let clipped = Clip::new(0.0, 100.0).transform(&table).unwrap();
        let renamed = Rename::new([("raw".to_string(), "clamped".to_string())])
            .transform(&clipped)
            .unwrap();
        Drop::new(["clamped".to_string()]).transform(&renamed).unwrap()
    };
    assert_eq!(pipeline.compute(table).unwrap(), expected);
}
