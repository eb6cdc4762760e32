//! Parameter space, parameter vectors, and resolved model points.

use super::axis::{Axis, AxisKind};
use crate::error::GridError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Metallicity × age coordinates of the isochrone table.
///
/// The table is rectangular: every metallicity carries the same ordered
/// list of ages. Isochrone photometry itself stays with the external
/// store; the engine only needs the coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsochroneGrid {
    metallicity: Axis,
    age: Axis,
}

impl IsochroneGrid {
    pub fn new(metallicities: Vec<f64>, ages: Vec<f64>) -> Result<Self, GridError> {
        Ok(Self {
            metallicity: Axis::new(AxisKind::Metallicity, metallicities)?,
            age: Axis::new(AxisKind::Age, ages)?,
        })
    }

    pub fn metallicity(&self) -> &Axis {
        &self.metallicity
    }

    pub fn age(&self) -> &Axis {
        &self.age
    }

    /// Number of (metallicity, age) isochrones.
    pub fn len(&self) -> usize {
        self.metallicity.len() * self.age.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Splits a flattened isochrone index into `(metallicity, age)` indices.
    pub fn coords(&self, flat: usize) -> (usize, usize) {
        (flat / self.age.len(), flat % self.age.len())
    }
}

/// A candidate solution: one grid index per axis of a [`ParameterSpace`].
///
/// Equality is exact index equality, which is the quantized-grid equality
/// used for stagnation detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ParameterVector {
    indices: Vec<usize>,
}

impl ParameterVector {
    pub(crate) fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn index(&self, dim: usize) -> usize {
        self.indices[dim]
    }

    pub fn metallicity_index(&self) -> usize {
        self.indices[0]
    }

    pub fn age_index(&self) -> usize {
        self.indices[1]
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// A parameter vector resolved to full physical coordinates.
///
/// This is what likelihoods and synthetic-cluster generators receive, and
/// what is handed to plotting collaborators for the best fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPoint {
    pub metallicity_index: usize,
    pub age_index: usize,
    pub metallicity: f64,
    pub age: f64,
    pub extinction: f64,
    pub distance_modulus: f64,
    pub mass: Option<f64>,
    pub binary_fraction: Option<f64>,
}

/// Ordered axes searched by the optimizer.
///
/// Axis order is fixed: metallicity, age, extinction, distance modulus,
/// then optionally mass and binary fraction.
///
/// # Examples
///
/// ```
/// use u_isofit::grid::{Axis, AxisKind, IsochroneGrid, ParameterSpace};
///
/// let isochrones = IsochroneGrid::new(vec![0.01, 0.02], vec![8.0, 9.0]).unwrap();
/// let space = ParameterSpace::new(
///     &isochrones,
///     Axis::from_range(AxisKind::Extinction, 0.0, 0.5, 0.1).unwrap(),
///     Axis::from_range(AxisKind::DistanceModulus, 10.0, 12.0, 0.5).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(space.dimensions(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSpace {
    axes: Vec<Axis>,
}

impl ParameterSpace {
    pub fn new(
        isochrones: &IsochroneGrid,
        extinction: Axis,
        distance: Axis,
    ) -> Result<Self, GridError> {
        expect_kind(&extinction, AxisKind::Extinction)?;
        expect_kind(&distance, AxisKind::DistanceModulus)?;
        Ok(Self {
            axes: vec![
                isochrones.metallicity.clone(),
                isochrones.age.clone(),
                extinction,
                distance,
            ],
        })
    }

    /// Appends the total-mass axis.
    pub fn with_mass(mut self, mass: Axis) -> Result<Self, GridError> {
        expect_kind(&mass, AxisKind::Mass)?;
        if self.axes.len() != 4 {
            return Err(GridError::WrongAxis {
                expected: AxisKind::BinaryFraction,
                found: AxisKind::Mass,
            });
        }
        self.axes.push(mass);
        Ok(self)
    }

    /// Appends the binary-fraction axis. Requires the mass axis first.
    pub fn with_binary_fraction(mut self, binary: Axis) -> Result<Self, GridError> {
        expect_kind(&binary, AxisKind::BinaryFraction)?;
        if self.axes.len() != 5 {
            return Err(GridError::WrongAxis {
                expected: AxisKind::Mass,
                found: AxisKind::BinaryFraction,
            });
        }
        self.axes.push(binary);
        Ok(self)
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn axis(&self, dim: usize) -> &Axis {
        &self.axes[dim]
    }

    pub fn dimensions(&self) -> usize {
        self.axes.len()
    }

    /// Number of distinct grid points in the space.
    pub fn cardinality(&self) -> usize {
        self.axes.iter().map(Axis::len).product()
    }

    /// Draws a uniformly random vector.
    ///
    /// Metallicity and age are drawn from the flattened isochrone index
    /// space so that every combination is equally likely.
    pub fn random_vector<R: Rng + ?Sized>(&self, rng: &mut R) -> ParameterVector {
        let n_age = self.axes[1].len();
        let flat = rng.random_range(0..self.axes[0].len() * n_age);
        let mut indices = Vec::with_capacity(self.axes.len());
        indices.push(flat / n_age);
        indices.push(flat % n_age);
        for axis in &self.axes[2..] {
            indices.push(rng.random_range(0..axis.len()));
        }
        ParameterVector::from_indices(indices)
    }

    /// Builds a vector from explicit indices.
    pub fn vector(&self, indices: Vec<usize>) -> Result<ParameterVector, GridError> {
        if indices.len() != self.axes.len() {
            return Err(GridError::DimensionMismatch {
                expected: self.axes.len(),
                found: indices.len(),
            });
        }
        for (axis, &index) in self.axes.iter().zip(&indices) {
            axis.value(index)?;
        }
        Ok(ParameterVector::from_indices(indices))
    }

    /// Builds a vector from grid values; every value must be on its axis.
    pub fn vector_from_values(&self, values: &[f64]) -> Result<ParameterVector, GridError> {
        if values.len() != self.axes.len() {
            return Err(GridError::DimensionMismatch {
                expected: self.axes.len(),
                found: values.len(),
            });
        }
        let indices = self
            .axes
            .iter()
            .zip(values)
            .map(|(axis, &v)| axis.index_of(v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ParameterVector::from_indices(indices))
    }

    /// Grid values of a vector, in axis order.
    ///
    /// # Panics
    /// Panics if `vector` was built for a different space.
    pub fn values(&self, vector: &ParameterVector) -> Vec<f64> {
        self.axes
            .iter()
            .zip(vector.indices())
            .map(|(axis, &i)| axis.values()[i])
            .collect()
    }

    /// Resolves a vector to physical coordinates.
    ///
    /// # Panics
    /// Panics if `vector` was built for a different space.
    pub fn model_point(&self, vector: &ParameterVector) -> ModelPoint {
        let v = self.values(vector);
        ModelPoint {
            metallicity_index: vector.metallicity_index(),
            age_index: vector.age_index(),
            metallicity: v[0],
            age: v[1],
            extinction: v[2],
            distance_modulus: v[3],
            mass: v.get(4).copied(),
            binary_fraction: v.get(5).copied(),
        }
    }
}

fn expect_kind(axis: &Axis, expected: AxisKind) -> Result<(), GridError> {
    if axis.kind() == expected {
        Ok(())
    } else {
        Err(GridError::WrongAxis {
            expected,
            found: axis.kind(),
        })
    }
}
