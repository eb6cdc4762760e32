//! Binary chromosome encoding of parameter vectors.
//!
//! A [`Chromosome`] is a fixed-width bit vector. The [`ChromosomeCodec`]
//! lays one `n`-bit gene per searchable axis end to end, in axis order
//! (metallicity ‖ age ‖ extinction ‖ distance ‖ mass ‖ binary fraction),
//! where `n = floor(log2(max_i(span_i / step_i))) + 1` is the number of bits
//! needed to resolve the finest step of any axis (and never fewer than an
//! axis needs to number its values).
//!
//! A gene holds the position of the axis *index*, not of the axis value,
//! so unevenly spaced axes such as real metallicity grids encode and
//! decode without loss.
//!
//! Constant (single-value) axes get no gene at all, so crossover and
//! mutation can never touch them.

mod chromosome;

pub use chromosome::Chromosome;

use crate::error::GridError;
use crate::grid::{ParameterSpace, ParameterVector};

/// Widest gene the codec will lay out.
pub const MAX_GENE_BITS: u32 = 32;

/// Bit range of one axis inside a chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gene {
    /// Axis index in the parameter space.
    pub dim: usize,
    /// First bit of the gene.
    pub offset: usize,
}

/// Maps parameter vectors to and from chromosomes for one parameter space.
///
/// # Examples
///
/// ```
/// use u_isofit::codec::ChromosomeCodec;
/// use u_isofit::grid::{Axis, AxisKind, IsochroneGrid, ParameterSpace};
///
/// let iso = IsochroneGrid::new(vec![0.01, 0.02], vec![8.0, 9.0]).unwrap();
/// let space = ParameterSpace::new(
///     &iso,
///     Axis::from_range(AxisKind::Extinction, 0.0, 0.5, 0.1).unwrap(),
///     Axis::from_range(AxisKind::DistanceModulus, 10.0, 12.0, 0.5).unwrap(),
/// )
/// .unwrap();
/// let codec = ChromosomeCodec::new(&space).unwrap();
/// assert_eq!(codec.bits_per_gene(), 3);
///
/// let v = space.vector(vec![1, 1, 3, 3]).unwrap();
/// assert_eq!(codec.decode(&codec.encode(&v)), v);
/// ```
#[derive(Debug, Clone)]
pub struct ChromosomeCodec<'a> {
    space: &'a ParameterSpace,
    bits: u32,
    genes: Vec<Gene>,
}

impl<'a> ChromosomeCodec<'a> {
    /// Derives the gene width and layout from the space's axes.
    ///
    /// Fails when an axis is so finely stepped relative to its span that
    /// a gene would need more than [`MAX_GENE_BITS`] bits.
    pub fn new(space: &'a ParameterSpace) -> Result<Self, GridError> {
        let max_ratio = space
            .axes()
            .iter()
            .filter_map(|axis| axis.min_step().map(|step| axis.span() / step))
            .fold(0.0_f64, f64::max);

        let resolution_bits = if max_ratio > 0.0 {
            // A ratio a hair under a power of two must not lose a bit.
            (max_ratio * (1.0 + 1e-12)).log2().floor().max(0.0) as u32 + 1
        } else {
            0
        };
        // Every axis needs at least `len - 1` gene levels to keep its
        // indices distinct.
        let index_bits = space
            .axes()
            .iter()
            .map(|axis| u64::BITS - (axis.len() as u64 - 1).leading_zeros())
            .max()
            .unwrap_or(0);
        let bits = resolution_bits.max(index_bits);
        if bits > MAX_GENE_BITS {
            return Err(GridError::ResolutionTooFine(bits));
        }

        let mut genes = Vec::new();
        for (dim, axis) in space.axes().iter().enumerate() {
            if !axis.is_constant() {
                genes.push(Gene {
                    dim,
                    offset: genes.len() * bits as usize,
                });
            }
        }

        Ok(Self { space, bits, genes })
    }

    pub fn space(&self) -> &'a ParameterSpace {
        self.space
    }

    /// Bits per gene (`n`).
    pub fn bits_per_gene(&self) -> u32 {
        self.bits
    }

    /// Gene layout of the searchable axes.
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Total chromosome length in bits.
    pub fn chromosome_len(&self) -> usize {
        self.genes.len() * self.bits as usize
    }

    /// Highest integer a gene can hold; positions map onto `0..=levels`.
    fn levels(&self) -> u64 {
        (1u64 << self.bits) - 1
    }

    /// Encodes a vector into a chromosome.
    ///
    /// Each axis index is normalized to `[0, 1]` over the axis length and
    /// scaled to the nearest of the `2^n` gene levels. Since every axis has
    /// at least `len - 1` levels, distinct indices land on distinct levels
    /// and always decode back to themselves, however unevenly the axis
    /// values are spaced.
    pub fn encode(&self, vector: &ParameterVector) -> Chromosome {
        let mut chrom = Chromosome::zeros(self.chromosome_len());
        let levels = self.levels() as f64;
        for gene in &self.genes {
            let last = (self.space.axis(gene.dim).len() - 1) as f64;
            let position = vector.index(gene.dim) as f64 / last;
            let k = (position * levels).round().clamp(0.0, levels) as u64;
            chrom.write_uint(gene.offset, self.bits as usize, k);
        }
        chrom
    }

    /// Decodes a chromosome into the nearest grid vector.
    ///
    /// Every gene integer maps back onto the axis length and is rounded to
    /// the closest index. Constant axes always decode to index 0.
    ///
    /// # Panics
    /// Panics if `chrom` is shorter than [`chromosome_len`](Self::chromosome_len).
    pub fn decode(&self, chrom: &Chromosome) -> ParameterVector {
        let mut indices = vec![0usize; self.space.dimensions()];
        let levels = self.levels() as f64;
        for gene in &self.genes {
            let last = self.space.axis(gene.dim).len() - 1;
            let k = chrom.read_uint(gene.offset, self.bits as usize);
            let index = (k as f64 / levels * last as f64).round() as usize;
            indices[gene.dim] = index.min(last);
        }
        ParameterVector::from_indices(indices)
    }
}
