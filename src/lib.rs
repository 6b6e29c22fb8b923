//! Crop Recommender
//!
//! Recommends a crop from seven soil and climate readings using a
//! pre-trained random forest and its feature scalers.
//!
//! - `features/`: the input row, slider metadata and presets
//! - `model/`: scaler, decision tree and forest inference over JSON artifacts
//! - `catalog/`: label → crop lookup table
//! - `recommend/`: immutable model context and the recommendation function
//! - `report/`: markdown report and HTML rendering
//! - `config/`: environment configuration
//! - `api_server/`, `web/`: axum server and askama pages (feature `api`)

pub mod catalog;
pub mod config;
pub mod features;
pub mod model;
pub mod recommend;
pub mod report;

#[cfg(feature = "api")]
pub mod api_server;
#[cfg(feature = "api")]
pub mod web;

// Re-export commonly used types
pub use catalog::{Crop, CROPS, UNKNOWN_CROP};
pub use config::{Config, ModelPaths};
pub use features::{FeatureVector, FEATURES, PRESETS};
pub use model::{ModelError, NormalizationStage};
pub use recommend::{ModelContext, Recommendation, RecommendError};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
