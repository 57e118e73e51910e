//! # View Encoder
//!
//! $$
//! P \in \mathbb{R}^{K \times N}, \quad Q \in \mathbb{R}^{K}, \quad c \in [0,1]^K
//! $$
//!
//! Converts investor views into the picking matrix, view-return vector and
//! confidence vector consumed by the uncertainty and posterior stages.

use nalgebra::DMatrix;
use nalgebra::DVector;

use crate::error::BlackLittermanError;
use crate::error::Result;
use crate::universe::AssetUniverse;

/// One investor belief about expected returns.
///
/// Variants form a closed set; each knows how to contribute its own row of
/// the picking matrix, so downstream stages stay agnostic to view kind.
/// Relative and sector views are future variants.
#[derive(Clone, Debug, PartialEq)]
pub enum View {
  /// Belief about a single asset's absolute expected return.
  Absolute {
    /// Ticker the view addresses.
    asset: String,
    /// Expected return stated by the view.
    expected_return: f64,
    /// Confidence in the view, in [0, 1].
    confidence: f64,
  },
}

impl View {
  /// Convenience constructor for an absolute view.
  pub fn absolute(asset: impl Into<String>, expected_return: f64, confidence: f64) -> Self {
    Self::Absolute {
      asset: asset.into(),
      expected_return,
      confidence,
    }
  }

  /// Stated confidence of the view.
  pub fn confidence(&self) -> f64 {
    match self {
      Self::Absolute { confidence, .. } => *confidence,
    }
  }

  /// Write this view's row of `p`, entry of `q` and confidence at `row`.
  fn contribute_row(
    &self,
    universe: &AssetUniverse,
    p: &mut DMatrix<f64>,
    q: &mut DVector<f64>,
    confidences: &mut DVector<f64>,
    row: usize,
  ) -> Result<()> {
    match self {
      Self::Absolute {
        asset,
        expected_return,
        confidence,
      } => {
        if !(0.0..=1.0).contains(confidence) {
          return Err(BlackLittermanError::InvalidConfidence(*confidence));
        }

        let idx = universe
          .index_of(asset)
          .ok_or_else(|| BlackLittermanError::UnknownAsset(asset.clone()))?;

        p[(row, idx)] = 1.0;
        q[row] = *expected_return;
        confidences[row] = *confidence;
        Ok(())
      }
    }
  }
}

/// Picking matrix, view returns and confidences in view order.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedViews {
  /// K x N picking matrix, one row per view.
  pub p: DMatrix<f64>,
  /// K view return magnitudes.
  pub q: DVector<f64>,
  /// K view confidences, each in [0, 1].
  pub confidences: DVector<f64>,
}

/// Encode `views` against `universe`.
///
/// Validation is eager: an unknown ticker or out-of-range confidence fails
/// before any matrix is handed downstream. K = 0 yields empty matrices.
pub fn encode_views(universe: &AssetUniverse, views: &[View]) -> Result<EncodedViews> {
  let k = views.len();
  let n = universe.len();

  let mut p = DMatrix::zeros(k, n);
  let mut q = DVector::zeros(k);
  let mut confidences = DVector::zeros(k);

  for (row, view) in views.iter().enumerate() {
    view.contribute_row(universe, &mut p, &mut q, &mut confidences, row)?;
  }

  Ok(EncodedViews { p, q, confidences })
}
