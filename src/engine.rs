//! # Black-Litterman Engine
//!
//! $$
//! \Pi \;\oplus\; \{(P, Q, c)\} \;\longrightarrow\; \mu_{\text{post}}
//! $$
//!
//! High-level orchestration: weight alignment, prior estimation, view
//! encoding, uncertainty construction and the posterior solve in one call.

use std::collections::HashMap;

use nalgebra::DMatrix;
use nalgebra::DVector;

use crate::error::BlackLittermanError;
use crate::error::Result;
use crate::posterior::PosteriorSolver;
use crate::posterior::SolveDiagnostics;
use crate::prior::market_implied_prior_returns;
use crate::uncertainty::idzorek_omega;
use crate::uncertainty::proportional_omega;
use crate::universe::AssetUniverse;
use crate::views::encode_views;
use crate::views::View;
use crate::RISK_AVERSION;
use crate::RISK_FREE_RATE;
use crate::TAU;

/// Omega construction policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UncertaintyMethod {
  /// Idzorek's mapping of per-view 0-1 confidences to variances.
  #[default]
  Idzorek,
  /// Variance proportional to each view's prior variance, ignoring
  /// confidences.
  PriorProportional,
}

/// Runtime configuration for [`BlackLitterman`].
#[derive(Clone, Copy, Debug)]
pub struct BlackLittermanConfig {
  /// Prior-uncertainty scalar tau.
  pub tau: f64,
  /// Risk-free rate added back onto implied excess returns.
  pub risk_free_rate: f64,
  /// Market risk-aversion coefficient delta.
  pub risk_aversion: f64,
  /// Omega construction policy.
  pub uncertainty: UncertaintyMethod,
}

impl Default for BlackLittermanConfig {
  fn default() -> Self {
    Self {
      tau: TAU,
      risk_free_rate: RISK_FREE_RATE,
      risk_aversion: RISK_AVERSION,
      uncertainty: UncertaintyMethod::Idzorek,
    }
  }
}

/// Posterior estimate keyed back to tickers through the universe order.
#[derive(Clone, Debug)]
pub struct BlackLittermanEstimate {
  tickers: Vec<String>,
  /// Market-implied prior returns in universe order.
  pub prior: DVector<f64>,
  /// Posterior blended returns in universe order.
  pub posterior: DVector<f64>,
  /// Diagnostics of the posterior solve.
  pub diagnostics: SolveDiagnostics,
}

impl BlackLittermanEstimate {
  /// Tickers in index order.
  pub fn tickers(&self) -> &[String] {
    &self.tickers
  }

  /// Posterior return for `ticker`.
  pub fn get(&self, ticker: &str) -> Option<f64> {
    let idx = self.tickers.iter().position(|t| t == ticker)?;
    Some(self.posterior[idx])
  }

  /// Iterate `(ticker, posterior return)` pairs in universe order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
    self
      .tickers
      .iter()
      .zip(self.posterior.iter())
      .map(|(t, r)| (t.as_str(), *r))
  }

  /// Collect posterior returns into a ticker-keyed map.
  pub fn to_map(&self) -> HashMap<String, f64> {
    self.iter().map(|(t, r)| (t.to_string(), r)).collect()
  }
}

/// Single entry-point estimator for Black-Litterman posterior returns.
#[derive(Clone, Debug, Default)]
pub struct BlackLitterman {
  config: BlackLittermanConfig,
}

impl BlackLitterman {
  /// Construct an estimator with explicit configuration.
  pub fn new(config: BlackLittermanConfig) -> Self {
    Self { config }
  }

  /// Borrow estimator configuration.
  pub fn config(&self) -> &BlackLittermanConfig {
    &self.config
  }

  /// Blend market-implied prior returns with `views`.
  ///
  /// `market_caps` defaults to equal weights when absent; raw
  /// capitalizations are accepted and normalized inside the prior stage.
  /// `cov` is indexed by `universe` order and is never mutated. Structural
  /// validation runs before any arithmetic.
  pub fn posterior(
    &self,
    universe: &AssetUniverse,
    market_caps: Option<&HashMap<String, f64>>,
    cov: &DMatrix<f64>,
    views: &[View],
  ) -> Result<BlackLittermanEstimate> {
    if cov.nrows() != cov.ncols() {
      return Err(BlackLittermanError::DimensionMismatch {
        context: "covariance matrix",
        expected: cov.nrows(),
        actual: cov.ncols(),
      });
    }

    if cov.nrows() != universe.len() {
      return Err(BlackLittermanError::DimensionMismatch {
        context: "covariance matrix",
        expected: universe.len(),
        actual: cov.nrows(),
      });
    }

    let weights = match market_caps {
      Some(caps) => universe.aligned_weights(caps)?,
      None => universe.equal_weights(),
    };

    let encoded = encode_views(universe, views)?;

    let pi = market_implied_prior_returns(
      &weights,
      self.config.risk_aversion,
      cov,
      self.config.risk_free_rate,
    )?;

    let omega = match self.config.uncertainty {
      UncertaintyMethod::Idzorek => {
        idzorek_omega(&encoded.confidences, cov, &encoded.p, self.config.tau)?
      }
      UncertaintyMethod::PriorProportional => {
        proportional_omega(cov, &encoded.p, self.config.tau)?
      }
    };

    let solution = PosteriorSolver::new(
      pi.clone(),
      encoded.p,
      encoded.q,
      omega,
      cov.clone(),
      self.config.tau,
    )
    .solve()?;

    Ok(BlackLittermanEstimate {
      tickers: universe.tickers().to_vec(),
      prior: pi,
      posterior: solution.returns,
      diagnostics: solution.diagnostics,
    })
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;

  fn universe() -> AssetUniverse {
    AssetUniverse::new(["A", "B", "C"])
  }

  fn diag_cov() -> DMatrix<f64> {
    DMatrix::from_diagonal(&DVector::from_vec(vec![0.04, 0.09, 0.01]))
  }

  fn engine(risk_aversion: f64) -> BlackLitterman {
    BlackLitterman::new(BlackLittermanConfig {
      risk_aversion,
      ..BlackLittermanConfig::default()
    })
  }

  #[test]
  fn no_views_return_the_prior_unchanged() {
    let estimate = engine(2.5)
      .posterior(&universe(), None, &diag_cov(), &[])
      .unwrap();

    assert_eq!(estimate.prior, estimate.posterior);
    assert_eq!(estimate.diagnostics.view_count, 0);
  }

  #[test]
  fn high_confidence_view_dominates_the_prior() {
    let views = vec![View::absolute("A", 0.10, 0.8)];
    let estimate = engine(2.5)
      .posterior(&universe(), None, &diag_cov(), &views)
      .unwrap();

    let pi_a = 2.5 * 0.04 / 3.0;
    let post_a = estimate.get("A").unwrap();

    // Strictly between the prior and the view, closer to the view.
    assert!(post_a > pi_a && post_a < 0.10);
    assert!((0.10 - post_a).abs() < (post_a - pi_a).abs());

    // Independent assets are untouched by the view.
    assert_abs_diff_eq!(estimate.get("B").unwrap(), estimate.prior[1], epsilon = 1e-12);
    assert_abs_diff_eq!(estimate.get("C").unwrap(), estimate.prior[2], epsilon = 1e-12);
  }

  #[test]
  fn near_certain_view_pins_the_posterior_to_the_view() {
    let views = vec![View::absolute("A", 0.10, 0.999999)];
    let estimate = engine(2.5)
      .posterior(&universe(), None, &diag_cov(), &views)
      .unwrap();

    assert_abs_diff_eq!(estimate.get("A").unwrap(), 0.10, epsilon = 1e-4);
  }

  #[test]
  fn zero_confidence_views_leave_the_prior_intact() {
    let views = vec![
      View::absolute("A", 0.10, 0.0),
      View::absolute("B", -0.05, 0.0),
    ];
    let estimate = engine(2.5)
      .posterior(&universe(), None, &diag_cov(), &views)
      .unwrap();

    for i in 0..3 {
      assert_abs_diff_eq!(estimate.posterior[i], estimate.prior[i], epsilon = 1e-6);
    }
  }

  #[test]
  fn confidence_moves_the_posterior_monotonically_toward_the_view() {
    let mut last_distance = f64::INFINITY;
    for confidence in [0.2, 0.4, 0.6, 0.8, 0.95] {
      let views = vec![View::absolute("A", 0.10, confidence)];
      let estimate = engine(2.5)
        .posterior(&universe(), None, &diag_cov(), &views)
        .unwrap();

      let distance = (0.10 - estimate.get("A").unwrap()).abs();
      assert!(distance < last_distance);
      last_distance = distance;
    }
  }

  #[test]
  fn posterior_is_invariant_under_universe_permutation() {
    let caps = HashMap::from([
      ("A".to_string(), 2.0),
      ("B".to_string(), 3.0),
      ("C".to_string(), 5.0),
    ]);
    let views = vec![View::absolute("B", 0.07, 0.6)];

    let cov = DMatrix::from_row_slice(
      3,
      3,
      &[
        0.04, 0.006, 0.0, //
        0.006, 0.09, 0.0, //
        0.0, 0.0, 0.01,
      ],
    );

    // Same inputs with the universe permuted to [C, A, B].
    let permuted_universe = AssetUniverse::new(["C", "A", "B"]);
    let permuted_cov = DMatrix::from_row_slice(
      3,
      3,
      &[
        0.01, 0.0, 0.0, //
        0.0, 0.04, 0.006, //
        0.0, 0.006, 0.09,
      ],
    );

    let original = engine(2.5)
      .posterior(&universe(), Some(&caps), &cov, &views)
      .unwrap();
    let permuted = engine(2.5)
      .posterior(&permuted_universe, Some(&caps), &permuted_cov, &views)
      .unwrap();

    for ticker in ["A", "B", "C"] {
      assert_abs_diff_eq!(
        original.get(ticker).unwrap(),
        permuted.get(ticker).unwrap(),
        epsilon = 1e-12
      );
    }
  }

  #[test]
  fn prior_proportional_omega_is_supported() {
    let bl = BlackLitterman::new(BlackLittermanConfig {
      risk_aversion: 2.5,
      uncertainty: UncertaintyMethod::PriorProportional,
      ..BlackLittermanConfig::default()
    });

    let views = vec![View::absolute("A", 0.10, 0.8)];
    let estimate = bl.posterior(&universe(), None, &diag_cov(), &views).unwrap();

    // Proportional omega equals the prior view variance, a 50/50 blend.
    let pi_a = estimate.prior[0];
    assert_abs_diff_eq!(estimate.get("A").unwrap(), pi_a + 0.5 * (0.10 - pi_a), epsilon = 1e-10);
  }

  #[test]
  fn unknown_view_ticker_aborts_with_no_result() {
    let views = vec![View::absolute("ZZZZ", 0.10, 0.8)];
    let err = engine(2.5)
      .posterior(&universe(), None, &diag_cov(), &views)
      .unwrap_err();

    assert_eq!(err, BlackLittermanError::UnknownAsset("ZZZZ".to_string()));
  }

  #[test]
  fn out_of_range_confidence_aborts_with_no_result() {
    let views = vec![View::absolute("A", 0.10, 1.5)];
    let err = engine(2.5)
      .posterior(&universe(), None, &diag_cov(), &views)
      .unwrap_err();

    assert_eq!(err, BlackLittermanError::InvalidConfidence(1.5));
  }

  #[test]
  fn covariance_must_match_the_universe() {
    let cov = DMatrix::from_diagonal(&DVector::from_vec(vec![0.04, 0.09]));
    let err = engine(1.0).posterior(&universe(), None, &cov, &[]).unwrap_err();

    assert!(matches!(
      err,
      BlackLittermanError::DimensionMismatch {
        context: "covariance matrix",
        expected: 3,
        actual: 2,
      }
    ));
  }

  #[test]
  fn estimate_decodes_back_to_ticker_keys() {
    let estimate = engine(2.5)
      .posterior(&universe(), None, &diag_cov(), &[])
      .unwrap();

    let map = estimate.to_map();
    assert_eq!(map.len(), 3);
    assert_abs_diff_eq!(map["B"], 2.5 * 0.09 / 3.0, epsilon = 1e-12);

    let order: Vec<&str> = estimate.iter().map(|(t, _)| t).collect();
    assert_eq!(order, ["A", "B", "C"]);
  }
}
