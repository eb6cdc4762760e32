//! Bin-edge construction and N-dimensional histograms.

use crate::error::ConfigError;
use crate::stats::percentile;
use serde::{Deserialize, Serialize};

/// Rule for building histogram bin edges over each photometric dimension.
///
/// Count-based rules produce equal-width bins spanning the observed
/// `[min, max]` of the dimension; `Width` starts at the minimum and adds
/// bins until the maximum is covered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum BinningRule {
    /// A fixed number of bins per dimension.
    Fixed { bins: usize },

    /// Bins of a fixed width per dimension.
    Width { width: f64 },

    /// `ceil(sqrt(N))` bins per dimension.
    Sqrt,

    /// The larger of the Sturges and Freedman-Diaconis bin counts.
    #[default]
    Auto,

    /// Explicit edges, one strictly increasing list per dimension.
    Manual { edges: Vec<Vec<f64>> },
}

impl BinningRule {
    /// Checks the rule's own parameters (independent of any data).
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            BinningRule::Fixed { bins } if *bins == 0 => {
                Err(ConfigError::Binning("fixed bin count must be positive".into()))
            }
            BinningRule::Width { width } if !(width.is_finite() && *width > 0.0) => {
                Err(ConfigError::Binning(format!("bin width must be positive, got {width}")))
            }
            BinningRule::Manual { edges } => {
                for (d, e) in edges.iter().enumerate() {
                    if e.len() < 2 || e.windows(2).any(|w| !(w[1] > w[0])) {
                        return Err(ConfigError::Binning(format!(
                            "manual edges for dimension {d} must hold at least two strictly increasing values"
                        )));
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Builds bin edges for each column of observed values.
    pub fn edges(&self, columns: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ConfigError> {
        self.validate()?;
        if let BinningRule::Manual { edges } = self {
            if edges.len() != columns.len() {
                return Err(ConfigError::Binning(format!(
                    "manual edges cover {} dimensions, photometry has {}",
                    edges.len(),
                    columns.len()
                )));
            }
            return Ok(edges.clone());
        }

        Ok(columns
            .iter()
            .map(|col| {
                let (lo, hi) = padded_range(col);
                let n = self.bin_count(col, lo, hi);
                match self {
                    BinningRule::Width { width } => {
                        (0..=n).map(|i| lo + i as f64 * width).collect()
                    }
                    _ => linspace(lo, hi, n + 1),
                }
            })
            .collect())
    }

    fn bin_count(&self, col: &[f64], lo: f64, hi: f64) -> usize {
        let n = col.len().max(1) as f64;
        match self {
            BinningRule::Fixed { bins } => *bins,
            BinningRule::Width { width } => ((hi - lo) / width).ceil().max(1.0) as usize,
            BinningRule::Sqrt => n.sqrt().ceil().max(1.0) as usize,
            BinningRule::Auto => {
                let sturges = n.log2().ceil() as usize + 1;
                let iqr = percentile(col, 75.0) - percentile(col, 25.0);
                let fd_width = 2.0 * iqr / n.cbrt();
                let fd = if fd_width > 0.0 {
                    ((hi - lo) / fd_width).ceil() as usize
                } else {
                    0
                };
                sturges.max(fd).max(1)
            }
            BinningRule::Manual { edges } => edges.first().map_or(1, |e| e.len() - 1),
        }
    }
}

/// `[min, max]` of the column, widened by 0.5 on each side when degenerate.
fn padded_range(col: &[f64]) -> (f64, f64) {
    let lo = col.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = col.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        (0.0, 1.0)
    } else if lo == hi {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}

fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    let step = (hi - lo) / (n - 1) as f64;
    (0..n)
        .map(|i| if i == n - 1 { hi } else { lo + i as f64 * step })
        .collect()
}

/// Bin of `v` along one dimension.
///
/// Bins are half-open `[e_i, e_{i+1})` except the last, which also includes
/// its right edge. Values outside the edges fall in no bin.
pub fn bin_index(edges: &[f64], v: f64) -> Option<usize> {
    let last = *edges.last()?;
    if !(v >= edges[0] && v <= last) {
        return None;
    }
    if v == last {
        return Some(edges.len() - 2);
    }
    Some(edges.partition_point(|&e| e <= v) - 1)
}

/// Flattened (row-major, last dimension fastest) histogram of points.
///
/// Points falling outside any dimension's edges are not counted.
pub fn histogram<'a, I>(points: I, edges: &[Vec<f64>]) -> Vec<f64>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let shape: Vec<usize> = edges.iter().map(|e| e.len() - 1).collect();
    let mut counts = vec![0.0; shape.iter().product()];
    'points: for p in points {
        let mut flat = 0usize;
        for ((e, &n), &v) in edges.iter().zip(&shape).zip(p) {
            match bin_index(e, v) {
                Some(b) => flat = flat * n + b,
                None => continue 'points,
            }
        }
        counts[flat] += 1.0;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_index_edges() {
        let e = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(bin_index(&e, 0.0), Some(0));
        assert_eq!(bin_index(&e, 0.999), Some(0));
        assert_eq!(bin_index(&e, 1.0), Some(1));
        assert_eq!(bin_index(&e, 3.0), Some(2));
        assert_eq!(bin_index(&e, -0.1), None);
        assert_eq!(bin_index(&e, 3.1), None);
        assert_eq!(bin_index(&e, f64::NAN), None);
    }

    #[test]
    fn test_histogram_2d_row_major() {
        let edges = vec![vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0, 3.0]];
        let pts: Vec<Vec<f64>> = vec![
            vec![0.5, 0.5],
            vec![0.5, 2.5],
            vec![1.5, 1.5],
            vec![1.5, 1.5],
            vec![5.0, 1.0],
        ];
        let h = histogram(pts.iter().map(|p| p.as_slice()), &edges);
        assert_eq!(h, vec![1.0, 0.0, 1.0, 0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_fixed_and_width_edges() {
        let cols = vec![vec![0.0, 1.0, 4.0]];
        let e = BinningRule::Fixed { bins: 4 }.edges(&cols).unwrap();
        assert_eq!(e[0], vec![0.0, 1.0, 2.0, 3.0, 4.0]);

        let e = BinningRule::Width { width: 1.5 }.edges(&cols).unwrap();
        assert_eq!(e[0], vec![0.0, 1.5, 3.0, 4.5]);
    }

    #[test]
    fn test_degenerate_column_is_padded() {
        let cols = vec![vec![2.0, 2.0, 2.0]];
        let e = BinningRule::Sqrt.edges(&cols).unwrap();
        assert_eq!(e[0].first(), Some(&1.5));
        assert_eq!(e[0].last(), Some(&2.5));
        assert_eq!(e[0].len(), 3); // ceil(sqrt 3) = 2 bins
    }

    #[test]
    fn test_auto_at_least_sturges() {
        let col: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let e = BinningRule::Auto.edges(&[col]).unwrap();
        // Sturges: ceil(log2 100) + 1 = 8; FD: 2 * 49.5 / 4.64 -> ~21.3 width -> 5 bins
        assert_eq!(e[0].len() - 1, 8);
    }

    #[test]
    fn test_manual_validation() {
        let rule = BinningRule::Manual {
            edges: vec![vec![0.0, 1.0], vec![1.0, 0.5]],
        };
        assert!(rule.validate().is_err());

        let rule = BinningRule::Manual {
            edges: vec![vec![0.0, 1.0]],
        };
        assert!(rule.edges(&[vec![0.5], vec![0.5]]).is_err());
        assert_eq!(rule.edges(&[vec![0.5]]).unwrap(), vec![vec![0.0, 1.0]]);
    }

    #[test]
    fn test_invalid_rules() {
        assert!(BinningRule::Fixed { bins: 0 }.validate().is_err());
        assert!(BinningRule::Width { width: -1.0 }.validate().is_err());
        assert!(BinningRule::Auto.validate().is_ok());
    }
}
