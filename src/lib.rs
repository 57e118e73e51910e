//! # litterman-rs
//!
//! Posterior expected-return estimation under the Black-Litterman model:
//! a market-implied equilibrium prior blended with confidence-weighted
//! investor views, producing the return vector consumed by a downstream
//! mean-variance optimizer.
//!
//! ## Modules
//!
//! | Module          | Description                                                       |
//! |-----------------|-------------------------------------------------------------------|
//! | [`universe`]    | Ordered ticker universe and market-cap weight alignment.          |
//! | [`prior`]       | Market-implied equilibrium prior returns.                         |
//! | [`views`]       | Investor views and picking-matrix encoding.                       |
//! | [`uncertainty`] | View uncertainty matrices (Idzorek and prior-proportional).       |
//! | [`posterior`]   | Posterior linear solve with degeneracy diagnostics.               |
//! | [`engine`]      | One-call orchestration over all stages.                           |
//! | [`error`]       | Typed error taxonomy.                                             |
//!
//! ## Example Usage
//!
//! ```rust
//! use litterman_rs::{AssetUniverse, BlackLitterman, View};
//! use nalgebra::{DMatrix, DVector};
//!
//! let universe = AssetUniverse::new(["AAPL", "MSFT", "XOM"]);
//! let cov = DMatrix::from_diagonal(&DVector::from_vec(vec![0.04, 0.09, 0.01]));
//! let views = vec![View::absolute("AAPL", 0.10, 0.8)];
//!
//! let estimate = BlackLitterman::default()
//!   .posterior(&universe, None, &cov, &views)
//!   .unwrap();
//!
//! for (ticker, ret) in estimate.iter() {
//!   println!("{ticker}: {ret:.4}");
//! }
//! ```
//!
//! ## Degenerate view systems
//!
//! A numerically singular view system does not fail: the solver falls back
//! to a minimum-norm least-squares solution, emits a `tracing` warning and
//! flags the returned [`SolveDiagnostics`] so callers can distinguish the
//! two paths.

pub mod engine;
pub mod error;
pub mod posterior;
pub mod prior;
pub mod uncertainty;
pub mod universe;
pub mod views;

pub use engine::BlackLitterman;
pub use engine::BlackLittermanConfig;
pub use engine::BlackLittermanEstimate;
pub use engine::UncertaintyMethod;
pub use error::BlackLittermanError;
pub use error::Result;
pub use posterior::PosteriorSolution;
pub use posterior::PosteriorSolver;
pub use posterior::SolveDiagnostics;
pub use posterior::SolveMethod;
pub use prior::market_implied_prior_returns;
pub use uncertainty::idzorek_omega;
pub use uncertainty::proportional_omega;
pub use uncertainty::ZERO_CONFIDENCE_VARIANCE;
pub use universe::AssetUniverse;
pub use views::encode_views;
pub use views::EncodedViews;
pub use views::View;

/// Default prior-uncertainty scalar.
pub const TAU: f64 = 0.05;
/// Default market risk-aversion coefficient.
pub const RISK_AVERSION: f64 = 1.0;
/// Default risk-free rate.
pub const RISK_FREE_RATE: f64 = 0.0;
