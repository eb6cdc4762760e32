//! Observation preprocessing.
//!
//! Converts accepted cluster members into the fixed structure a likelihood
//! consumes, once, before the search starts:
//!
//! - [`LikelihoodMethod::Tolstoy`]: per-star photometry with precomputed
//!   squared errors and a parallel membership array
//! - [`LikelihoodMethod::Dolphin`]: an N-dimensional histogram over
//!   magnitude/color space with empty bins pruned from the comparison set

mod binning;
mod types;

pub use binning::{bin_index, histogram, BinningRule};
pub use types::{BinnedCluster, Member, ObservedCluster, PointCluster, MIN_SQUARED_ERROR};

use crate::error::{DataError, FitResult};
use crate::likelihood::LikelihoodMethod;

/// Builds the observed-cluster structure for `method`.
///
/// The binned histogram is not membership-weighted.
pub fn prepare(
    members: &[Member],
    method: LikelihoodMethod,
    binning: &BinningRule,
) -> FitResult<ObservedCluster> {
    validate_members(members)?;

    let observed = match method {
        LikelihoodMethod::Tolstoy => ObservedCluster::Points(PointCluster::new(
            members.iter().map(Member::photometry).collect(),
            members.iter().map(Member::squared_errors).collect(),
            members.iter().map(|m| m.membership).collect(),
        )),
        LikelihoodMethod::Dolphin => {
            let photometry: Vec<Vec<f64>> = members.iter().map(Member::photometry).collect();
            let dims = members[0].dimensions();
            let columns: Vec<Vec<f64>> = (0..dims)
                .map(|d| photometry.iter().map(|p| p[d]).collect())
                .collect();
            let edges = binning.edges(&columns)?;
            let hist = histogram(photometry.iter().map(Vec::as_slice), &edges);
            let (occupied, counts) = hist
                .iter()
                .enumerate()
                .filter(|(_, &c)| c > 0.0)
                .map(|(i, &c)| (i, c))
                .unzip();
            ObservedCluster::Binned(BinnedCluster {
                edges,
                histogram: hist,
                occupied,
                counts,
            })
        }
    };

    log::debug!(
        "prepared {:?} observed cluster: {} stars, {} dimensions",
        method,
        observed.star_count(),
        observed.dimensions()
    );
    Ok(observed)
}

fn validate_members(members: &[Member]) -> Result<(), DataError> {
    let first = members.first().ok_or(DataError::NoMembers)?;
    let (n_mag, n_col) = (first.magnitudes.len(), first.colors.len());
    for m in members {
        let consistent = m.magnitudes.len() == n_mag
            && m.magnitude_errors.len() == n_mag
            && m.colors.len() == n_col
            && m.color_errors.len() == n_col;
        if !consistent {
            return Err(DataError::Dimensions {
                id: m.id.clone(),
                expected: n_mag + n_col,
                found: m.dimensions(),
            });
        }
        if m.photometry().iter().any(|v| !v.is_finite()) {
            return Err(DataError::NonFinite {
                id: m.id.clone(),
                field: "photometry",
            });
        }
        if m.squared_errors().iter().any(|v| !v.is_finite()) {
            return Err(DataError::NonFinite {
                id: m.id.clone(),
                field: "photometric error",
            });
        }
        if !m.membership.is_finite() {
            return Err(DataError::NonFinite {
                id: m.id.clone(),
                field: "membership probability",
            });
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::member;
    use super::*;
    use crate::error::FitError;

    #[test]
    fn test_points_precompute_squared_errors() {
        let members = vec![member(0, 15.0, 0.5, 0.9), member(1, 16.0, 0.7, 0.4)];
        let obs = prepare(&members, LikelihoodMethod::Tolstoy, &BinningRule::Auto).unwrap();
        let ObservedCluster::Points(p) = obs else {
            panic!("expected point representation");
        };
        assert_eq!(p.photometry[1], vec![16.0, 0.7]);
        assert!((p.squared_errors[0][0] - 0.0025).abs() < 1e-15);
        assert!((p.squared_errors[0][1] - 0.0004).abs() < 1e-15);
        assert_eq!(p.membership, vec![0.9, 0.4]);
        // 1 / sqrt(0.0025 * 0.0004) = 1 / 0.001
        assert!((p.norms[0] - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_points_floor_zero_errors() {
        let mut m = member(0, 15.0, 0.5, 1.0);
        m.color_errors = vec![0.0];
        let obs = prepare(&[m], LikelihoodMethod::Tolstoy, &BinningRule::Auto).unwrap();
        let ObservedCluster::Points(p) = obs else {
            panic!("expected point representation");
        };
        assert_eq!(p.squared_errors[0][1], MIN_SQUARED_ERROR);
        let expected = (0.0025 * MIN_SQUARED_ERROR).sqrt().recip();
        assert!((p.norms[0] / expected - 1.0).abs() < 1e-12);
        assert!(p.norms[0].is_finite());
    }

    #[test]
    fn test_binned_prunes_empty_bins() {
        let members = vec![
            member(0, 15.0, 0.5, 1.0),
            member(1, 15.1, 0.5, 1.0),
            member(2, 18.0, 1.5, 1.0),
        ];
        let obs = prepare(
            &members,
            LikelihoodMethod::Dolphin,
            &BinningRule::Fixed { bins: 3 },
        )
        .unwrap();
        let ObservedCluster::Binned(b) = obs else {
            panic!("expected binned representation");
        };
        assert_eq!(b.histogram.len(), 9);
        assert_eq!(b.occupied, vec![0, 8]);
        assert_eq!(b.counts, vec![2.0, 1.0]);
        assert_eq!(b.histogram.iter().sum::<f64>(), 3.0);
    }

    #[test]
    fn test_empty_members_rejected() {
        let err = prepare(&[], LikelihoodMethod::Tolstoy, &BinningRule::Auto).unwrap_err();
        assert_eq!(err, FitError::Data(DataError::NoMembers));
    }

    #[test]
    fn test_inconsistent_dimensions_rejected() {
        let mut bad = member(1, 16.0, 0.7, 0.4);
        bad.colors.push(0.1);
        let err = prepare(
            &[member(0, 15.0, 0.5, 0.9), bad],
            LikelihoodMethod::Tolstoy,
            &BinningRule::Auto,
        )
        .unwrap_err();
        assert!(matches!(err, FitError::Data(DataError::Dimensions { .. })));
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut bad = member(0, f64::NAN, 0.5, 0.9);
        let err = prepare(&[bad.clone()], LikelihoodMethod::Tolstoy, &BinningRule::Auto)
            .unwrap_err();
        assert!(matches!(err, FitError::Data(DataError::NonFinite { .. })));

        bad.magnitudes[0] = 15.0;
        bad.membership = f64::INFINITY;
        assert!(prepare(&[bad], LikelihoodMethod::Tolstoy, &BinningRule::Auto).is_err());
    }

    #[test]
    fn test_bad_binning_is_config_error() {
        let err = prepare(
            &[member(0, 15.0, 0.5, 0.9)],
            LikelihoodMethod::Dolphin,
            &BinningRule::Fixed { bins: 0 },
        )
        .unwrap_err();
        assert!(matches!(err, FitError::Config(_)));
    }
}
