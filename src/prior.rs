//! # Prior Estimator
//!
//! $$
//! \Pi = \delta \, \Sigma \, \frac{\mathbf{w}}{\mathbf{1}^\top \mathbf{w}} + r_f
//! $$
//!
//! Market-implied equilibrium returns from capitalization weights, risk
//! aversion and the return covariance matrix.

use nalgebra::DMatrix;
use nalgebra::DVector;

use crate::error::BlackLittermanError;
use crate::error::Result;

/// Compute the equilibrium return vector implied by market weights.
///
/// Weights are normalized to sum to one before the matrix product, so raw
/// market capitalizations are accepted directly. `Pi` is an excess return,
/// so `risk_free_rate` is added back to obtain a total return. The output
/// follows the asset order of `cov`.
pub fn market_implied_prior_returns(
  market_weights: &DVector<f64>,
  risk_aversion: f64,
  cov: &DMatrix<f64>,
  risk_free_rate: f64,
) -> Result<DVector<f64>> {
  if cov.nrows() != cov.ncols() {
    return Err(BlackLittermanError::DimensionMismatch {
      context: "covariance matrix",
      expected: cov.nrows(),
      actual: cov.ncols(),
    });
  }

  if market_weights.len() != cov.nrows() {
    return Err(BlackLittermanError::DimensionMismatch {
      context: "market weights",
      expected: cov.nrows(),
      actual: market_weights.len(),
    });
  }

  let normalized = market_weights.unscale(market_weights.sum());
  Ok((cov * normalized).scale(risk_aversion).add_scalar(risk_free_rate))
}
