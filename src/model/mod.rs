//! Learned models: the ridge solver, the dual-head scoring bundle, and
//! the linear decision classifier, plus the deterministic risk /
//! recommendation rules applied on top of predictions.

pub mod bundle;
pub mod classifier;
pub mod ridge;
pub mod rules;

pub use bundle::ModelBundle;
pub use ridge::{fit_ridge, RidgeModel};
pub use rules::{estimate_risk, recommend};
