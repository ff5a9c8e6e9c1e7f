//! Built-in [`Stage`] implementations (§4.1).
use crate::error::{Error, Result};
use crate::pipeline::{Plug, ScenarioTable, Stage};
use indexmap::IndexMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

/// Clamp every value of every signal into `[lower, upper]`. Bounds are optional and independent.
///
/// Free plug: accepts and passes through any signal set unchanged by name.
pub struct Clip {
    lower: Option<f64>,
    upper: Option<f64>,
}

impl Clip {
    /// A clip stage with both a lower and upper bound.
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// A clip stage with only a lower bound.
    pub fn lower(lower: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: None,
        }
    }

    /// A clip stage with only an upper bound.
    pub fn upper(upper: f64) -> Self {
        Self {
            lower: None,
            upper: Some(upper),
        }
    }
}

impl Stage for Clip {
    fn plug(&self) -> Plug {
        Plug::Free
    }

    fn transform(&self, table: &ScenarioTable) -> Result<ScenarioTable> {
        let mut out = ScenarioTable::new();
        for scn in table.scenario_indices() {
            let signals = table.scenario(scn).expect("scn came from scenario_indices");
            let mut new_signals = IndexMap::with_capacity(signals.len());
            for (name, values) in signals {
                let clamped = values
                    .iter()
                    .map(|&v| {
                        let v = self.lower.map_or(v, |lo| v.max(lo));
                        self.upper.map_or(v, |hi| v.min(hi))
                    })
                    .collect();
                new_signals.insert(name.clone(), clamped);
            }
            out.insert_scenario(scn, new_signals);
        }
        Ok(out)
    }
}

/// Rename signals according to a fixed mapping, leaving unmapped signals untouched.
///
/// Restricted plug: `inputs` are the mapping's keys, `outputs` its values.
pub struct Rename {
    mapping: HashMap<String, String>,
}

impl Rename {
    /// Build a rename stage from an iterable of `(old, new)` pairs.
    pub fn new(mapping: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            mapping: mapping.into_iter().collect(),
        }
    }
}

impl Stage for Rename {
    fn plug(&self) -> Plug {
        Plug::Restricted {
            inputs: self.mapping.keys().cloned().collect(),
            outputs: self.mapping.values().cloned().collect(),
        }
    }

    fn transform(&self, table: &ScenarioTable) -> Result<ScenarioTable> {
        let mut out = ScenarioTable::new();
        for scn in table.scenario_indices() {
            let signals = table.scenario(scn).expect("scn came from scenario_indices");
            let mut new_signals = IndexMap::with_capacity(signals.len());
            for (name, values) in signals {
                let new_name = self.mapping.get(name).cloned().unwrap_or_else(|| name.clone());
                new_signals.insert(new_name, values.clone());
            }
            out.insert_scenario(scn, new_signals);
        }
        Ok(out)
    }
}

/// Remove the named signals from the table.
///
/// Restricted plug: `inputs` are the dropped names, `outputs` is empty.
pub struct Drop {
    names: Vec<String>,
}

impl Drop {
    /// Drop the given signal names.
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }
}

impl Stage for Drop {
    fn plug(&self) -> Plug {
        Plug::Restricted {
            inputs: self.names.clone(),
            outputs: Vec::new(),
        }
    }

    fn transform(&self, table: &ScenarioTable) -> Result<ScenarioTable> {
        let mut out = ScenarioTable::new();
        for scn in table.scenario_indices() {
            let signals = table.scenario(scn).expect("scn came from scenario_indices");
            let new_signals = signals
                .iter()
                .filter(|(name, _)| !self.names.contains(name))
                .map(|(name, values)| (name.clone(), values.clone()))
                .collect();
            out.insert_scenario(scn, new_signals);
        }
        Ok(out)
    }
}

/// Tile the scenario axis `n` times: output scenario `c * nb_scn + o` is a copy of input
/// scenario `o`, for `c in 0..n`.
///
/// The first `nb_scn` output scenarios are therefore identical to the input, satisfying Property
/// P5 (repeating with `n = 1` is a no-op up to scenario re-indexing).
///
/// Free plug: passes through whatever signals are present.
pub struct RepeatScenario {
    n: usize,
}

impl RepeatScenario {
    /// Repeat each scenario `n` times.
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

impl Stage for RepeatScenario {
    fn plug(&self) -> Plug {
        Plug::Free
    }

    fn transform(&self, table: &ScenarioTable) -> Result<ScenarioTable> {
        let nb_scn = table.nb_scn();
        let mut out = ScenarioTable::new();
        for c in 0..self.n {
            for o in table.scenario_indices() {
                let signals = table.scenario(o).expect("o came from scenario_indices").clone();
                out.insert_scenario(c * nb_scn + o, signals);
            }
        }
        Ok(out)
    }
}

/// Inject random unavailability on the `"quantity"` signal (§4.1).
///
/// For every timestep, deterministically (from `seed`) samples a Bernoulli(`freq`) fault
/// indicator; on a fault, zeroes `quantity` for a duration drawn uniformly in
/// `[dt_min, dt_max]` timesteps, scaled by `loss` (the fraction of capacity lost, `1.0` = total
/// loss).
///
/// Restricted plug: requires and produces `"quantity"`.
pub struct Fault {
    loss: f64,
    freq: f64,
    dt_min: usize,
    dt_max: usize,
    seed: u64,
}

impl Fault {
    /// Build a fault-injection stage.
    ///
    /// `loss` is the quantity subtracted from `quantity` at each faulted timestep (same units as
    /// `quantity`; overlapping fault intervals sum), `freq` the per-step probability of a fault
    /// starting, `dt_min`/`dt_max` the inclusive range of fault durations in timesteps, and `seed`
    /// the seed for the deterministic RNG (§4.1, §5 determinism).
    pub fn new(loss: f64, freq: f64, dt_min: usize, dt_max: usize, seed: u64) -> Self {
        Self {
            loss,
            freq,
            dt_min,
            dt_max,
            seed,
        }
    }
}

impl Stage for Fault {
    fn plug(&self) -> Plug {
        Plug::Restricted {
            inputs: vec!["quantity".to_string()],
            outputs: vec!["quantity".to_string()],
        }
    }

    fn transform(&self, table: &ScenarioTable) -> Result<ScenarioTable> {
        let mut out = ScenarioTable::new();
        // One stream per scenario so inserting/removing scenarios elsewhere in a pipeline
        // doesn't perturb other scenarios' fault draws.
        for scn in table.scenario_indices() {
            let mut rng = ChaCha8Rng::seed_from_u64(self.seed ^ (scn as u64));
            let signals = table.scenario(scn).expect("scn came from scenario_indices");
            let quantity = signals.get("quantity").ok_or_else(|| {
                Error::Shape(format!("scenario {scn} is missing required input signal 'quantity'"))
            })?;
            let mut values = quantity.clone();

            // Sample a fault start independently at every timestep (not just after the previous
            // fault ends), so intervals can overlap; overlapping losses sum additively.
            let mut deductions = vec![0.0; values.len()];
            for t in 0..values.len() {
                if rng.gen_bool(self.freq) {
                    let span = if self.dt_max > self.dt_min {
                        rng.gen_range(self.dt_min..=self.dt_max)
                    } else {
                        self.dt_min
                    };
                    let end = (t + span).min(values.len());
                    for d in &mut deductions[t..end] {
                        *d += self.loss;
                    }
                }
            }
            for (v, d) in values.iter_mut().zip(deductions) {
                *v -= d;
            }

            let mut new_signals = signals.clone();
            new_signals.insert("quantity".to_string(), values);
            out.insert_scenario(scn, new_signals);
        }
        Ok(out)
    }
}

/// Apply a user-supplied per-scenario transformation to one signal.
///
/// Restricted plug: requires and produces the named signal.
pub struct FocusStage<F>
where
    F: Fn(usize, &[f64]) -> Vec<f64> + Send + Sync,
{
    signal: String,
    f: F,
}

impl<F> FocusStage<F>
where
    F: Fn(usize, &[f64]) -> Vec<f64> + Send + Sync,
{
    /// Build a stage that rewrites `signal` via `f(scenario_index, values)`.
    pub fn new(signal: impl Into<String>, f: F) -> Self {
        Self {
            signal: signal.into(),
            f,
        }
    }
}

impl<F> Stage for FocusStage<F>
where
    F: Fn(usize, &[f64]) -> Vec<f64> + Send + Sync,
{
    fn plug(&self) -> Plug {
        Plug::Restricted {
            inputs: vec![self.signal.clone()],
            outputs: vec![self.signal.clone()],
        }
    }

    fn transform(&self, table: &ScenarioTable) -> Result<ScenarioTable> {
        let mut out = ScenarioTable::new();
        for scn in table.scenario_indices() {
            let signals = table.scenario(scn).expect("scn came from scenario_indices");
            let values = signals.get(&self.signal).ok_or_else(|| {
                Error::Shape(format!(
                    "scenario {scn} is missing required input signal '{}'",
                    self.signal
                ))
            })?;
            let mut new_signals = signals.clone();
            new_signals.insert(self.signal.clone(), (self.f)(scn, values));
            out.insert_scenario(scn, new_signals);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use rstest::rstest;

    fn table_with(values: Vec<f64>) -> ScenarioTable {
        let mut signals = IndexMap::new();
        signals.insert("quantity".to_string(), values);
        ScenarioTable::single_scenario(signals)
    }

    #[rstest]
    #[case(-5.0, 0.0)]
    #[case(0.5, 0.5)]
    #[case(10.0, 1.0)]
    fn test_clip_clamps_both_bounds(#[case] input: f64, #[case] expected: f64) {
        let table = table_with(vec![input]);
        let clipped = Clip::new(0.0, 1.0).transform(&table).unwrap();
        assert_eq!(clipped.get(0, "quantity").unwrap(), &[expected]);
    }

    #[test]
    fn test_rename_renames_mapped_and_keeps_rest() {
        let mut signals = IndexMap::new();
        signals.insert("cost".to_string(), vec![1.0]);
        signals.insert("quantity".to_string(), vec![2.0]);
        let table = ScenarioTable::single_scenario(signals);

        let renamed = Rename::new([("cost".to_string(), "price".to_string())])
            .transform(&table)
            .unwrap();
        assert_eq!(renamed.get(0, "price").unwrap(), &[1.0]);
        assert_eq!(renamed.get(0, "quantity").unwrap(), &[2.0]);
        assert!(renamed.get(0, "cost").is_none());
    }

    #[test]
    fn test_drop_removes_named_signal() {
        let table = table_with(vec![1.0]);
        let dropped = Drop::new(["quantity".to_string()]).transform(&table).unwrap();
        assert!(dropped.get(0, "quantity").is_none());
    }

    #[test]
    fn test_repeat_scenario_identity_for_n_1() {
        let table = table_with(vec![1.0, 2.0]);
        let repeated = RepeatScenario::new(1).transform(&table).unwrap();
        assert_eq!(repeated.nb_scn(), 1);
        assert_eq!(repeated.get(0, "quantity").unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn test_repeat_scenario_tiles_and_preserves_prefix() {
        let mut signals_a = IndexMap::new();
        signals_a.insert("quantity".to_string(), vec![1.0]);
        let mut table = ScenarioTable::new();
        table.insert_scenario(0, signals_a);
        let mut signals_b = IndexMap::new();
        signals_b.insert("quantity".to_string(), vec![2.0]);
        table.insert_scenario(1, signals_b);

        let repeated = RepeatScenario::new(3).transform(&table).unwrap();
        assert_eq!(repeated.nb_scn(), 6);
        // First nb_scn (=2) scenarios match the original (Property P5).
        assert_eq!(repeated.get(0, "quantity").unwrap(), &[1.0]);
        assert_eq!(repeated.get(1, "quantity").unwrap(), &[2.0]);
        assert_eq!(repeated.get(2, "quantity").unwrap(), &[1.0]);
        assert_eq!(repeated.get(3, "quantity").unwrap(), &[2.0]);
    }

    #[test]
    fn test_fault_is_deterministic_for_fixed_seed() {
        let table = table_with(vec![1.0; 20]);
        let stage = Fault::new(1.0, 0.3, 1, 3, 42);
        let a = stage.transform(&table).unwrap();
        let b = stage.transform(&table).unwrap();
        assert_eq!(a.get(0, "quantity").unwrap(), b.get(0, "quantity").unwrap());
    }

    #[test]
    fn test_fault_subtracts_loss_additively() {
        let table = table_with(vec![1.0; 50]);
        let stage = Fault::new(0.5, 1.0, 1, 1, 7);
        let out = stage.transform(&table).unwrap();
        let values = out.get(0, "quantity").unwrap();
        assert!(values.iter().all(|&v| approx_eq!(f64, v, 0.5, epsilon = 1e-9)));
    }

    #[test]
    fn test_fault_overlapping_intervals_sum() {
        // freq = 1.0 and dt_min = dt_max = 2 means every timestep starts a 2-long fault, so every
        // interior timestep is covered by two overlapping faults and loses `loss` twice.
        let table = table_with(vec![10.0; 5]);
        let stage = Fault::new(1.0, 1.0, 2, 2, 7);
        let out = stage.transform(&table).unwrap();
        let values = out.get(0, "quantity").unwrap();
        assert!(approx_eq!(f64, values[0], 9.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, values[1], 8.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, values[2], 8.0, epsilon = 1e-9));
    }

    #[test]
    fn test_focus_stage_applies_closure_per_scenario() {
        let table = table_with(vec![1.0, 2.0, 3.0]);
        let stage = FocusStage::new("quantity", |scn, values| {
            values.iter().map(|v| v * (scn as f64 + 2.0)).collect()
        });
        let out = stage.transform(&table).unwrap();
        assert_eq!(out.get(0, "quantity").unwrap(), &[2.0, 4.0, 6.0]);
    }
}
