//! # Error Taxonomy
//!
//! Structural input failures for Black-Litterman estimation. All variants
//! are detected before any matrix arithmetic runs, so a failed call produces
//! no partial result.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, BlackLittermanError>;

/// Typed failures surfaced by every estimation stage.
///
/// A numerically singular view system is not an error: the posterior solver
/// falls back to least squares and reports it through
/// [`SolveDiagnostics`](crate::posterior::SolveDiagnostics).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlackLittermanError {
  /// Shape inconsistency among the supplied vectors and matrices.
  #[error("Dimension mismatch: {context} expected {expected}, got {actual}")]
  DimensionMismatch {
    /// Which input failed the shape check.
    context: &'static str,
    /// Expected length or dimension.
    expected: usize,
    /// Observed length or dimension.
    actual: usize,
  },

  /// A view references a ticker outside the asset universe.
  #[error("Unknown asset: {0}")]
  UnknownAsset(String),

  /// A view confidence lies outside the closed interval [0, 1].
  #[error("Invalid confidence: {0} is outside [0, 1]")]
  InvalidConfidence(f64),
}
