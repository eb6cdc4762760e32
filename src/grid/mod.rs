//! Discretized parameter space.
//!
//! Every fitted parameter lives on a finite, strictly increasing list of
//! allowed values (an [`Axis`]). Metallicity and age come from the
//! isochrone store; extinction, distance modulus, and the optional mass
//! and binary-fraction axes are built from `[min, max]` ranges and a step.
//!
//! A [`ParameterVector`] stores one index per axis, so equality between
//! two vectors is exact quantized-grid equality.
//!
//! # Key Types
//!
//! - [`Axis`]: allowed values for one parameter, with nearest-value lookup
//! - [`IsochroneGrid`]: metallicity × age coordinates of the isochrone table
//! - [`ParameterSpace`]: the ordered set of axes searched by the optimizer
//! - [`ModelPoint`]: a vector resolved to physical coordinates

mod axis;
mod space;

pub use axis::{Axis, AxisKind};
pub use space::{IsochroneGrid, ModelPoint, ParameterSpace, ParameterVector};
