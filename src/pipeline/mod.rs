//! Composable preprocessing stages connected via typed plugs (§4.1).
//!
//! A [`Stage`] transforms a [`ScenarioTable`]: a `(scenario, signal)`-indexed set of per-time
//! vectors. Stages are chained into a [`Pipeline`] with [`Pipeline::then`]; the `+` operator the
//! Python original overloads is re-expressed as this explicit builder method, per the design note
//! in spec.md §9.
pub mod stages;

use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// A `(scenario, signal) -> time series` table.
///
/// Scenarios are kept in a [`BTreeMap`] (canonical ascending order) and signals within a scenario
/// in an [`IndexMap`] (canonical insertion order), matching the Design Note in spec.md §9 that
/// re-expresses the source's hierarchical `(scenario, signal)` column index as an explicit
/// structure rather than a `pandas` `MultiIndex`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScenarioTable {
    scenarios: BTreeMap<usize, IndexMap<String, Vec<f64>>>,
}

impl ScenarioTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table with a single scenario (index `0`) from `signals`.
    ///
    /// This mirrors `compute`'s behaviour in the Python original of inserting scenario `0` when
    /// the caller hands over a plain, scenario-less timeline.
    pub fn single_scenario(signals: IndexMap<String, Vec<f64>>) -> Self {
        let mut scenarios = BTreeMap::new();
        scenarios.insert(0, signals);
        Self { scenarios }
    }

    /// Insert (or replace) the signals for one scenario.
    pub fn insert_scenario(&mut self, scenario: usize, signals: IndexMap<String, Vec<f64>>) {
        self.scenarios.insert(scenario, signals);
    }

    /// Number of scenarios in the table.
    pub fn nb_scn(&self) -> usize {
        self.scenarios.len()
    }

    /// Iterate over scenario indices in ascending order.
    pub fn scenario_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.scenarios.keys().copied()
    }

    /// The signals for a given scenario, if present.
    pub fn scenario(&self, scn: usize) -> Option<&IndexMap<String, Vec<f64>>> {
        self.scenarios.get(&scn)
    }

    /// Whether `signal` is present for scenario `scn`.
    pub fn has_signal(&self, scn: usize, signal: &str) -> bool {
        self.scenarios
            .get(&scn)
            .is_some_and(|signals| signals.contains_key(signal))
    }

    /// Read a single time series, if present.
    pub fn get(&self, scn: usize, signal: &str) -> Option<&[f64]> {
        self.scenarios
            .get(&scn)
            .and_then(|signals| signals.get(signal))
            .map(Vec::as_slice)
    }

    /// Mutably access a scenario's signal map, creating an empty scenario entry if absent.
    pub fn scenario_mut(&mut self, scn: usize) -> &mut IndexMap<String, Vec<f64>> {
        self.scenarios.entry(scn).or_default()
    }
}

/// The input/output signal contract of a [`Stage`] (§4.1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Plug {
    /// Accepts any input signal set and passes all signals through unchanged (by name).
    Free,
    /// Requires `inputs` to be a subset of the incoming signal names; replaces them with
    /// `outputs`, leaving any untouched signal in place.
    Restricted {
        /// Signal names this stage requires on input.
        inputs: Vec<String>,
        /// Signal names this stage produces, replacing `inputs`.
        outputs: Vec<String>,
    },
}

impl Plug {
    /// Compose `self` (running first) with `next` (running second), per the composition rule in
    /// §4.1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PipelineLink`] if both plugs are restricted and `next.inputs` is not a
    /// subset of `self.outputs`.
    pub fn compose(&self, next: &Plug) -> Result<Plug> {
        match (self, next) {
            (Plug::Free, Plug::Free) => Ok(Plug::Free),
            (Plug::Free, Plug::Restricted { inputs, outputs }) => Ok(Plug::Restricted {
                inputs: inputs.clone(),
                outputs: outputs.clone(),
            }),
            (Plug::Restricted { inputs, outputs }, Plug::Free) => Ok(Plug::Restricted {
                inputs: inputs.clone(),
                outputs: outputs.clone(),
            }),
            (
                Plug::Restricted {
                    inputs: a_inputs,
                    outputs: a_outputs,
                },
                Plug::Restricted {
                    inputs: b_inputs,
                    outputs: b_outputs,
                },
            ) => {
                let missing: Vec<String> = b_inputs
                    .iter()
                    .filter(|i| !a_outputs.contains(i))
                    .cloned()
                    .collect();
                if !missing.is_empty() {
                    return Err(Error::PipelineLink {
                        missing,
                        available: a_outputs.clone(),
                    });
                }
                let mut outputs = b_outputs.clone();
                outputs.extend(a_outputs.iter().filter(|o| !b_inputs.contains(o)).cloned());
                Ok(Plug::Restricted {
                    inputs: a_inputs.clone(),
                    outputs,
                })
            }
        }
    }
}

/// A unit transformation on a [`ScenarioTable`] (§4.1).
pub trait Stage: Send + Sync {
    /// This stage's I/O contract.
    fn plug(&self) -> Plug;

    /// Transform `table`, returning a new table (stages never mutate their input in place).
    fn transform(&self, table: &ScenarioTable) -> Result<ScenarioTable>;
}

/// A chain of [`Stage`]s with a validated, composed [`Plug`].
pub struct Pipeline {
    plug: Plug,
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Start a pipeline with a single stage.
    pub fn new(stage: impl Stage + 'static) -> Self {
        Self {
            plug: stage.plug(),
            stages: vec![Box::new(stage)],
        }
    }

    /// Chain `stage` after the current pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PipelineLink`] if `stage`'s inputs are not satisfied by the pipeline's
    /// current outputs (§4.1 composition rule).
    pub fn then(mut self, stage: impl Stage + 'static) -> Result<Self> {
        self.plug = self.plug.compose(&stage.plug())?;
        self.stages.push(Box::new(stage));
        Ok(self)
    }

    /// This pipeline's composed I/O contract.
    pub fn plug(&self) -> &Plug {
        &self.plug
    }

    /// Run every stage in order against `table`.
    ///
    /// Verifies the pipeline's required input signals are present for every scenario, then
    /// applies each stage in turn; the table is copied between stages (no stage mutates its
    /// input), per §4.1 Execution.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shape`] if a required input signal is missing for some scenario, or
    /// whatever a stage's `transform` returns.
    pub fn compute(&self, table: ScenarioTable) -> Result<ScenarioTable> {
        if let Plug::Restricted { inputs, .. } = &self.plug {
            for scn in table.scenario_indices() {
                for input in inputs {
                    if !table.has_signal(scn, input) {
                        return Err(crate::error::Error::Shape(format!(
                            "scenario {scn} is missing required input signal '{input}'"
                        )));
                    }
                }
            }
        }

        let mut current = table;
        for stage in &self.stages {
            current = stage.transform(&current)?;
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restricted(inputs: &[&str], outputs: &[&str]) -> Plug {
        Plug::Restricted {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_compose_free_free() {
        assert_eq!(Plug::Free.compose(&Plug::Free).unwrap(), Plug::Free);
    }

    #[test]
    fn test_compose_free_restricted() {
        let b = restricted(&["x"], &["y"]);
        assert_eq!(Plug::Free.compose(&b).unwrap(), b);
    }

    #[test]
    fn test_compose_restricted_free() {
        let a = restricted(&["x"], &["y"]);
        assert_eq!(a.compose(&Plug::Free).unwrap(), a);
    }

    #[test]
    fn test_compose_restricted_restricted_ok() {
        let a = restricted(&["a"], &["b", "c"]);
        let b = restricted(&["b"], &["d"]);
        let composed = a.compose(&b).unwrap();
        assert_eq!(
            composed,
            Plug::Restricted {
                inputs: vec!["a".to_string()],
                outputs: vec!["d".to_string(), "c".to_string()],
            }
        );
    }

    #[test]
    fn test_compose_restricted_restricted_fails_when_not_subset() {
        let a = restricted(&["a"], &["b"]);
        let b = restricted(&["c"], &["d"]);
        let err = a.compose(&b).unwrap_err();
        assert!(matches!(err, Error::PipelineLink { .. }));
    }

    #[test]
    fn test_composition_algebra_associative() {
        // Property P6: (A+B)+C and A+(B+C) accept the same inputs and produce the same outputs.
        let a = restricted(&["a"], &["b"]);
        let b = restricted(&["b"], &["c"]);
        let c = restricted(&["c"], &["d"]);

        let left = a.compose(&b).unwrap().compose(&c).unwrap();
        let right = a.compose(&b.compose(&c).unwrap()).unwrap();
        assert_eq!(left, right);
    }
}
