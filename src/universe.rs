//! # Asset Universe
//!
//! $$
//! \mathcal{U} = (t_1, \dots, t_N)
//! $$
//!
//! Ordered ticker universe defining the index layout of every vector and
//! matrix in the model, plus market-cap weight alignment.

use std::collections::HashMap;

use nalgebra::DVector;

use crate::error::BlackLittermanError;
use crate::error::Result;

/// Ordered set of unique tickers.
///
/// Position in the universe is the row/column index used by every vector and
/// matrix downstream, and the key order used to decode results back into
/// ticker-keyed output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetUniverse {
  tickers: Vec<String>,
}

impl AssetUniverse {
  /// Build a universe from tickers in caller order.
  ///
  /// Duplicates collapse to their first occurrence.
  pub fn new<I, S>(tickers: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let mut unique: Vec<String> = Vec::new();
    for ticker in tickers {
      let ticker = ticker.into();
      if !unique.contains(&ticker) {
        unique.push(ticker);
      }
    }
    Self { tickers: unique }
  }

  /// Number of assets.
  pub fn len(&self) -> usize {
    self.tickers.len()
  }

  /// True when the universe holds no assets.
  pub fn is_empty(&self) -> bool {
    self.tickers.is_empty()
  }

  /// Tickers in index order.
  pub fn tickers(&self) -> &[String] {
    &self.tickers
  }

  /// Index of `ticker`, if it is a member.
  pub fn index_of(&self, ticker: &str) -> Option<usize> {
    self.tickers.iter().position(|t| t == ticker)
  }

  /// Equal 1/N weight vector in universe order.
  pub fn equal_weights(&self) -> DVector<f64> {
    DVector::from_element(self.tickers.len(), 1.0 / self.tickers.len() as f64)
  }

  /// Align a ticker-keyed market-cap map to universe order.
  ///
  /// Every key must be a member of the universe and every member must be
  /// covered by the map.
  pub fn aligned_weights(&self, market_caps: &HashMap<String, f64>) -> Result<DVector<f64>> {
    for ticker in market_caps.keys() {
      if self.index_of(ticker).is_none() {
        return Err(BlackLittermanError::UnknownAsset(ticker.clone()));
      }
    }

    if market_caps.len() != self.tickers.len() {
      return Err(BlackLittermanError::DimensionMismatch {
        context: "market-cap weights",
        expected: self.tickers.len(),
        actual: market_caps.len(),
      });
    }

    Ok(DVector::from_iterator(
      self.tickers.len(),
      self.tickers.iter().map(|t| market_caps[t]),
    ))
  }
}
