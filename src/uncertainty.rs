//! # View Uncertainty
//!
//! $$
//! \Omega_{ii} = \tau \, \frac{1 - c_i}{c_i} \, p_i \Sigma p_i^\top
//! $$
//!
//! Diagonal uncertainty matrix construction: Idzorek's confidence mapping
//! and the prior-proportional default. Views are modeled as mutually
//! independent, so off-diagonal entries stay zero.

use nalgebra::DMatrix;
use nalgebra::DVector;

use crate::error::BlackLittermanError;
use crate::error::Result;

/// Variance assigned to a zero-confidence view so it contributes negligibly.
pub const ZERO_CONFIDENCE_VARIANCE: f64 = 1e6;

fn check_shapes(cov: &DMatrix<f64>, p: &DMatrix<f64>) -> Result<()> {
  if cov.nrows() != cov.ncols() {
    return Err(BlackLittermanError::DimensionMismatch {
      context: "covariance matrix",
      expected: cov.nrows(),
      actual: cov.ncols(),
    });
  }

  if p.ncols() != cov.nrows() {
    return Err(BlackLittermanError::DimensionMismatch {
      context: "picking matrix columns",
      expected: cov.nrows(),
      actual: p.ncols(),
    });
  }

  Ok(())
}

/// Map 0-1 view confidences to view variances with Idzorek's method.
///
/// Confidence 0 yields [`ZERO_CONFIDENCE_VARIANCE`]; confidence 1 yields a
/// variance of zero, a fully trusted view.
pub fn idzorek_omega(
  confidences: &DVector<f64>,
  cov: &DMatrix<f64>,
  p: &DMatrix<f64>,
  tau: f64,
) -> Result<DMatrix<f64>> {
  check_shapes(cov, p)?;

  if confidences.len() != p.nrows() {
    return Err(BlackLittermanError::DimensionMismatch {
      context: "view confidences",
      expected: p.nrows(),
      actual: confidences.len(),
    });
  }

  let k = p.nrows();
  let mut omega = DMatrix::zeros(k, k);

  for i in 0..k {
    let confidence = confidences[i];
    if !(0.0..=1.0).contains(&confidence) {
      return Err(BlackLittermanError::InvalidConfidence(confidence));
    }

    if confidence == 0.0 {
      omega[(i, i)] = ZERO_CONFIDENCE_VARIANCE;
      continue;
    }

    let p_i = p.row(i);
    let view_variance = (p_i * cov * p_i.transpose())[(0, 0)];
    let alpha = (1.0 - confidence) / confidence;
    omega[(i, i)] = tau * alpha * view_variance;
  }

  Ok(omega)
}

/// Prior-proportional uncertainty: the diagonal of tau P Sigma P^T.
///
/// Ignores per-view confidences; used when the caller has no basis for
/// weighting one view over another.
pub fn proportional_omega(cov: &DMatrix<f64>, p: &DMatrix<f64>, tau: f64) -> Result<DMatrix<f64>> {
  check_shapes(cov, p)?;

  let view_cov = (p * cov * p.transpose()).scale(tau);
  Ok(DMatrix::from_diagonal(&view_cov.diagonal()))
}
