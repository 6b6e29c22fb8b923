//! Model Inference Module
//!
//! Pure-Rust inference for the fitted scikit-learn objects the recommender
//! ships with. Training happens elsewhere; artifacts arrive as JSON exports
//! of the fitted attributes.
//!
//! - `scaler`: MinMaxScaler / StandardScaler transforms
//! - `decision_tree`: array-based tree traversal with leaf class distributions
//! - `random_forest`: probability averaging across trees
//! - `artifact`: JSON loading and capability resolution
//! - `stage`: the normalization chain applied before the classifier

pub mod artifact;
pub mod decision_tree;
pub mod random_forest;
pub mod scaler;
pub mod stage;

pub use artifact::{Artifact, Classifier};
pub use decision_tree::DecisionTree;
pub use random_forest::{Prediction, RandomForest};
pub use scaler::{MinMaxScaler, Scaler, StandardScaler};
pub use stage::NormalizationStage;

use thiserror::Error;

/// Errors raised while loading or evaluating a model artifact
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse artifact: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid artifact: {0}")]
    Invalid(String),

    #[error("{kind} is not a {expected}")]
    WrongKind {
        kind: &'static str,
        expected: &'static str,
    },

    #[error("X has {actual} features, but {model} is expecting {expected} features as input")]
    DimensionMismatch {
        model: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("input contains NaN or infinity")]
    NonFinite,
}

/// Result alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Shared input-width check used by every estimator
pub(crate) fn check_width(model: &'static str, expected: usize, x: &[f64]) -> Result<()> {
    if x.len() != expected {
        return Err(ModelError::DimensionMismatch {
            model,
            expected,
            actual: x.len(),
        });
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::NonFinite);
    }
    Ok(())
}
