//! # Posterior Solver
//!
//! $$
//! \mu_{\text{post}} = \Pi + \tau\Sigma P^\top \left(P \tau\Sigma P^\top + \Omega\right)^{-1} (Q - P\Pi)
//! $$
//!
//! Bayesian blend of prior returns and encoded views. The K x K view system
//! is solved exactly; a numerically singular system falls back to the
//! minimum-norm least-squares solution and flags the result instead of
//! failing.

use impl_new_derive::ImplNew;
use nalgebra::DMatrix;
use nalgebra::DVector;
use tracing::warn;

use crate::error::BlackLittermanError;
use crate::error::Result;

/// How the view system was solved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveMethod {
  /// Exact LU solve.
  Exact,
  /// Minimum-norm least squares after the exact solve met a singular system.
  LeastSquares,
}

/// Per-solve diagnostics returned alongside the posterior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolveDiagnostics {
  /// Number of views blended into the posterior.
  pub view_count: usize,
  /// Method that produced the solution of the view system.
  pub method: SolveMethod,
}

impl SolveDiagnostics {
  /// True when the least-squares fallback produced the result.
  pub fn is_degenerate(&self) -> bool {
    self.method == SolveMethod::LeastSquares
  }
}

/// Posterior returns with the diagnostics of the solve that produced them.
#[derive(Clone, Debug, PartialEq)]
pub struct PosteriorSolution {
  /// Blended expected returns in universe order.
  pub returns: DVector<f64>,
  /// Diagnostics of the solve.
  pub diagnostics: SolveDiagnostics,
}

/// Inputs of one posterior solve over a fixed universe.
#[derive(ImplNew, Clone, Debug)]
pub struct PosteriorSolver {
  /// Prior equilibrium returns, length N.
  pub pi: DVector<f64>,
  /// K x N picking matrix.
  pub p: DMatrix<f64>,
  /// K view return magnitudes.
  pub q: DVector<f64>,
  /// K x K diagonal view uncertainty.
  pub omega: DMatrix<f64>,
  /// N x N return covariance.
  pub cov: DMatrix<f64>,
  /// Prior uncertainty scalar.
  pub tau: f64,
}

impl PosteriorSolver {
  fn check_shapes(&self) -> Result<()> {
    let n = self.cov.nrows();
    let k = self.p.nrows();

    if self.cov.ncols() != n {
      return Err(BlackLittermanError::DimensionMismatch {
        context: "covariance matrix",
        expected: n,
        actual: self.cov.ncols(),
      });
    }

    if self.pi.len() != n {
      return Err(BlackLittermanError::DimensionMismatch {
        context: "prior returns",
        expected: n,
        actual: self.pi.len(),
      });
    }

    if self.p.ncols() != n {
      return Err(BlackLittermanError::DimensionMismatch {
        context: "picking matrix columns",
        expected: n,
        actual: self.p.ncols(),
      });
    }

    if self.q.len() != k {
      return Err(BlackLittermanError::DimensionMismatch {
        context: "view returns",
        expected: k,
        actual: self.q.len(),
      });
    }

    if self.omega.nrows() != k || self.omega.ncols() != k {
      return Err(BlackLittermanError::DimensionMismatch {
        context: "uncertainty matrix",
        expected: k,
        actual: self.omega.nrows().max(self.omega.ncols()),
      });
    }

    Ok(())
  }

  /// Solve for posterior returns.
  ///
  /// With no views the prior passes through untouched and no linear system
  /// is formed.
  pub fn solve(&self) -> Result<PosteriorSolution> {
    self.check_shapes()?;

    let k = self.p.nrows();
    if k == 0 {
      return Ok(PosteriorSolution {
        returns: self.pi.clone(),
        diagnostics: SolveDiagnostics {
          view_count: 0,
          method: SolveMethod::Exact,
        },
      });
    }

    let tau_cov_pt = (&self.cov * self.p.transpose()).scale(self.tau);
    let m = &self.p * &tau_cov_pt + &self.omega;
    let b = &self.q - &self.p * &self.pi;

    let (x, method) = match m.clone().lu().solve(&b) {
      Some(x) => (x, SolveMethod::Exact),
      None => {
        warn!(views = k, "view system is singular, using least-squares fallback");
        let svd = m.svd(true, true);
        let eps = f64::EPSILON * k as f64 * svd.singular_values.max();
        let x = svd.solve(&b, eps).expect("SVD computed with both factors");
        (x, SolveMethod::LeastSquares)
      }
    };

    Ok(PosteriorSolution {
      returns: &self.pi + tau_cov_pt * x,
      diagnostics: SolveDiagnostics {
        view_count: k,
        method,
      },
    })
  }
}
