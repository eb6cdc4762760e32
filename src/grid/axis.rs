//! Single-parameter axes.

use crate::error::GridError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which physical parameter an axis carries.
///
/// The declaration order is the chromosome concatenation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisKind {
    Metallicity,
    Age,
    Extinction,
    DistanceModulus,
    Mass,
    BinaryFraction,
}

impl AxisKind {
    /// Short name used in logs and reports.
    pub fn name(self) -> &'static str {
        match self {
            AxisKind::Metallicity => "metallicity",
            AxisKind::Age => "age",
            AxisKind::Extinction => "extinction",
            AxisKind::DistanceModulus => "distance modulus",
            AxisKind::Mass => "mass",
            AxisKind::BinaryFraction => "binary fraction",
        }
    }
}

impl fmt::Display for AxisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Finite, strictly increasing list of allowed values for one parameter.
///
/// # Examples
///
/// ```
/// use u_isofit::grid::{Axis, AxisKind};
///
/// let ext = Axis::from_range(AxisKind::Extinction, 0.0, 0.5, 0.1).unwrap();
/// assert_eq!(ext.len(), 6);
/// assert_eq!(ext.nearest_index(0.26), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    kind: AxisKind,
    values: Vec<f64>,
}

impl Axis {
    /// Builds an axis from explicit values.
    ///
    /// Values must be finite and strictly increasing.
    pub fn new(kind: AxisKind, values: Vec<f64>) -> Result<Self, GridError> {
        if values.is_empty() {
            return Err(GridError::EmptyAxis(kind));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GridError::NonFinite(kind));
        }
        if values.windows(2).any(|w| w[1] <= w[0]) {
            return Err(GridError::Unsorted(kind));
        }
        Ok(Self { kind, values })
    }

    /// Builds an axis `min, min + step, ...` up to `max` inclusive.
    ///
    /// `min == max` yields a constant (single-value) axis regardless of
    /// `step`.
    pub fn from_range(kind: AxisKind, min: f64, max: f64, step: f64) -> Result<Self, GridError> {
        let invalid = GridError::InvalidRange {
            kind,
            min,
            max,
            step,
        };
        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(invalid);
        }
        if min == max {
            return Ok(Self::constant(kind, min));
        }
        if !(step.is_finite() && step > 0.0) {
            return Err(invalid);
        }

        // Tolerate float drift in (max - min) / step.
        let count = ((max - min) / step + 1e-9).floor() as usize + 1;
        let values = (0..count).map(|i| min + i as f64 * step).collect();
        Self::new(kind, values)
    }

    /// Builds a single-value axis.
    pub fn constant(kind: AxisKind, value: f64) -> Self {
        Self {
            kind,
            values: vec![value],
        }
    }

    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; axes are validated non-empty on construction.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `true` for a single-value axis, which is never searched.
    pub fn is_constant(&self) -> bool {
        self.values.len() == 1
    }

    pub fn min(&self) -> f64 {
        self.values[0]
    }

    pub fn max(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    pub fn span(&self) -> f64 {
        self.max() - self.min()
    }

    /// Value at `index`, or an error when the index is outside the axis.
    pub fn value(&self, index: usize) -> Result<f64, GridError> {
        self.values
            .get(index)
            .copied()
            .ok_or(GridError::IndexOutOfRange {
                kind: self.kind,
                index,
                len: self.values.len(),
            })
    }

    /// Smallest gap between consecutive values; `None` for a constant axis.
    pub fn min_step(&self) -> Option<f64> {
        self.values
            .windows(2)
            .map(|w| w[1] - w[0])
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Index of the value closest to `x`.
    ///
    /// Ties (equal absolute difference) resolve to the smaller index.
    /// Values outside the axis clamp to the nearest end.
    pub fn nearest_index(&self, x: f64) -> usize {
        let upper = self.values.partition_point(|&v| v < x);
        if upper == 0 {
            return 0;
        }
        if upper == self.values.len() {
            return self.values.len() - 1;
        }
        let lower = upper - 1;
        if (x - self.values[lower]).abs() <= (self.values[upper] - x).abs() {
            lower
        } else {
            upper
        }
    }

    /// Index of a value that must be on the grid exactly.
    ///
    /// A miss is reported as [`GridError::NotOnGrid`]; it is never mapped
    /// to a fallback index.
    pub fn index_of(&self, x: f64) -> Result<usize, GridError> {
        let idx = self.nearest_index(x);
        if self.values[idx] == x {
            Ok(idx)
        } else {
            Err(GridError::NotOnGrid {
                kind: self.kind,
                value: x,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_range_inclusive() {
        let dist = Axis::from_range(AxisKind::DistanceModulus, 10.0, 12.0, 0.5).unwrap();
        assert_eq!(dist.values(), &[10.0, 10.5, 11.0, 11.5, 12.0]);
        assert!((dist.span() - 2.0).abs() < 1e-12);
        assert_eq!(dist.min_step(), Some(0.5));
    }

    #[test]
    fn test_from_range_float_drift() {
        // 0.5 / 0.1 is 4.999... in binary floating point.
        let ext = Axis::from_range(AxisKind::Extinction, 0.0, 0.5, 0.1).unwrap();
        assert_eq!(ext.len(), 6);
    }

    #[test]
    fn test_constant_axis() {
        let mass = Axis::from_range(AxisKind::Mass, 5000.0, 5000.0, 0.0).unwrap();
        assert!(mass.is_constant());
        assert_eq!(mass.min_step(), None);
        assert_eq!(mass.nearest_index(1.0e9), 0);
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(Axis::from_range(AxisKind::Age, 9.0, 8.0, 0.1).is_err());
        assert!(Axis::from_range(AxisKind::Age, 8.0, 9.0, 0.0).is_err());
        assert!(Axis::from_range(AxisKind::Age, 8.0, f64::NAN, 0.1).is_err());
    }

    #[test]
    fn test_new_rejects_unsorted_and_empty() {
        assert_eq!(
            Axis::new(AxisKind::Metallicity, vec![]),
            Err(GridError::EmptyAxis(AxisKind::Metallicity))
        );
        assert_eq!(
            Axis::new(AxisKind::Metallicity, vec![0.02, 0.01]),
            Err(GridError::Unsorted(AxisKind::Metallicity))
        );
        assert_eq!(
            Axis::new(AxisKind::Metallicity, vec![0.01, 0.01]),
            Err(GridError::Unsorted(AxisKind::Metallicity))
        );
    }

    #[test]
    fn test_nearest_index_tie_prefers_smaller() {
        let axis = Axis::new(AxisKind::Age, vec![8.0, 9.0, 10.0]).unwrap();
        assert_eq!(axis.nearest_index(8.5), 0);
        assert_eq!(axis.nearest_index(9.5), 1);
        assert_eq!(axis.nearest_index(8.51), 1);
        assert_eq!(axis.nearest_index(-3.0), 0);
        assert_eq!(axis.nearest_index(42.0), 2);
    }

    #[test]
    fn test_index_of_exact_or_error() {
        let axis = Axis::new(AxisKind::Age, vec![8.0, 9.0]).unwrap();
        assert_eq!(axis.index_of(9.0), Ok(1));
        assert_eq!(
            axis.index_of(8.9),
            Err(GridError::NotOnGrid {
                kind: AxisKind::Age,
                value: 8.9
            })
        );
    }

    #[test]
    fn test_value_out_of_range() {
        let axis = Axis::constant(AxisKind::BinaryFraction, 0.3);
        assert_eq!(axis.value(0), Ok(0.3));
        assert!(axis.value(1).is_err());
    }
}
