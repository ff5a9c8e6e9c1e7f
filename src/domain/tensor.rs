//! The `(scenario, time)` quantity/cost tensor shared by every study element.
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A quantity or cost attached to a study element.
///
/// Conceptually a dense matrix of shape `(nb_scn, horizon)`. Scalars and per-time vectors are
/// broadcast to this shape when the element is attached to the study (§3), so that every
/// downstream consumer (the input mapper, the pipeline) can index it uniformly by `(scn, t)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioTimeMatrix {
    nb_scn: usize,
    horizon: usize,
    values: Vec<Vec<f64>>,
}

impl ScenarioTimeMatrix {
    /// Build a matrix from an already-shaped `(nb_scn, horizon)` grid of values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shape`] if `values` does not have exactly `nb_scn` rows, each of length
    /// `horizon`.
    pub fn from_grid(values: Vec<Vec<f64>>, nb_scn: usize, horizon: usize) -> Result<Self> {
        if values.len() != nb_scn {
            return Err(Error::Shape(format!(
                "expected {nb_scn} scenario row(s), got {}",
                values.len()
            )));
        }
        if let Some(bad) = values.iter().find(|row| row.len() != horizon) {
            return Err(Error::Shape(format!(
                "expected each row to have {horizon} value(s), got {}",
                bad.len()
            )));
        }
        Ok(Self {
            nb_scn,
            horizon,
            values,
        })
    }

    /// Broadcast a scalar to the full `(nb_scn, horizon)` shape.
    pub fn from_scalar(value: f64, nb_scn: usize, horizon: usize) -> Self {
        Self {
            nb_scn,
            horizon,
            values: vec![vec![value; horizon]; nb_scn],
        }
    }

    /// Broadcast a per-time vector of length `horizon` across `nb_scn` scenarios.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shape`] if `values.len() != horizon`.
    pub fn from_time_vec(values: &[f64], nb_scn: usize, horizon: usize) -> Result<Self> {
        if values.len() != horizon {
            return Err(Error::Shape(format!(
                "expected a vector of length {horizon}, got {}",
                values.len()
            )));
        }
        Ok(Self {
            nb_scn,
            horizon,
            values: vec![values.to_vec(); nb_scn],
        })
    }

    /// The number of scenarios this matrix covers.
    pub fn nb_scn(&self) -> usize {
        self.nb_scn
    }

    /// The number of time steps this matrix covers.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Read the value at `(scn, t)`.
    ///
    /// # Panics
    ///
    /// Panics if `scn >= nb_scn` or `t >= horizon`; callers are expected to iterate within the
    /// bounds established when the owning [`crate::domain::Study`] was built.
    pub fn get(&self, scn: usize, t: usize) -> f64 {
        self.values[scn][t]
    }

    /// Iterate over the values for a given scenario, in time order.
    pub fn scenario(&self, scn: usize) -> &[f64] {
        &self.values[scn]
    }
}

/// Anything that can be broadcast into a [`ScenarioTimeMatrix`] of a given `(nb_scn, horizon)`
/// shape: a scalar, a per-time vector, or an already-shaped grid.
pub trait IntoMatrix {
    /// Broadcast `self` to the given shape.
    fn into_matrix(self, nb_scn: usize, horizon: usize) -> Result<ScenarioTimeMatrix>;
}

impl IntoMatrix for f64 {
    fn into_matrix(self, nb_scn: usize, horizon: usize) -> Result<ScenarioTimeMatrix> {
        Ok(ScenarioTimeMatrix::from_scalar(self, nb_scn, horizon))
    }
}

impl IntoMatrix for &[f64] {
    fn into_matrix(self, nb_scn: usize, horizon: usize) -> Result<ScenarioTimeMatrix> {
        ScenarioTimeMatrix::from_time_vec(self, nb_scn, horizon)
    }
}

impl IntoMatrix for Vec<f64> {
    fn into_matrix(self, nb_scn: usize, horizon: usize) -> Result<ScenarioTimeMatrix> {
        ScenarioTimeMatrix::from_time_vec(&self, nb_scn, horizon)
    }
}

impl IntoMatrix for Vec<Vec<f64>> {
    fn into_matrix(self, nb_scn: usize, horizon: usize) -> Result<ScenarioTimeMatrix> {
        ScenarioTimeMatrix::from_grid(self, nb_scn, horizon)
    }
}

impl IntoMatrix for ScenarioTimeMatrix {
    fn into_matrix(self, nb_scn: usize, horizon: usize) -> Result<ScenarioTimeMatrix> {
        if self.nb_scn != nb_scn || self.horizon != horizon {
            return Err(Error::Shape(format!(
                "expected shape ({nb_scn}, {horizon}), got ({}, {})",
                self.nb_scn, self.horizon
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_scalar_broadcasts() {
        let m = ScenarioTimeMatrix::from_scalar(5.0, 2, 3);
        assert_eq!(m.nb_scn(), 2);
        assert_eq!(m.horizon(), 3);
        for scn in 0..2 {
            for t in 0..3 {
                assert_eq!(m.get(scn, t), 5.0);
            }
        }
    }

    #[test]
    fn test_from_time_vec_broadcasts_across_scenarios() {
        let m = ScenarioTimeMatrix::from_time_vec(&[1.0, 2.0, 3.0], 2, 3).unwrap();
        assert_eq!(m.scenario(0), &[1.0, 2.0, 3.0]);
        assert_eq!(m.scenario(1), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_from_time_vec_wrong_length_is_shape_error() {
        let err = ScenarioTimeMatrix::from_time_vec(&[1.0, 2.0], 2, 3).unwrap_err();
        assert!(matches!(err, Error::Shape(_)));
    }

    #[test]
    fn test_from_grid_wrong_rows_is_shape_error() {
        let err = ScenarioTimeMatrix::from_grid(vec![vec![1.0; 3]], 2, 3).unwrap_err();
        assert!(matches!(err, Error::Shape(_)));
    }

    #[test]
    fn test_from_grid_wrong_cols_is_shape_error() {
        let err = ScenarioTimeMatrix::from_grid(vec![vec![1.0; 2]; 2], 2, 3).unwrap_err();
        assert!(matches!(err, Error::Shape(_)));
    }
}
