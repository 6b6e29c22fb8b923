//! Crop Recommendation
//!
//! Ties the loaded artifacts together. A [`ModelContext`] is built once at
//! start-up and is read-only afterwards, so it can be shared across any
//! number of concurrent requests.
//!
//! Per request: raw row → normalization stage → classifier → crop table →
//! report.

use anyhow::Context;
use thiserror::Error;

use crate::catalog::{self, Crop, UNKNOWN_CROP};
use crate::config::ModelPaths;
use crate::features::{FeatureError, FeatureVector, FEATURES, N_FEATURES};
use crate::model::{Artifact, Classifier, ModelError, NormalizationStage};
use crate::report::ReportFormatter;

/// Request-level failure
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error(transparent)]
    Features(#[from] FeatureError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Immutable models shared by every request
#[derive(Debug, Clone)]
pub struct ModelContext {
    stage: NormalizationStage,
    classifier: Classifier,
}

/// Outcome of one prediction
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub label: i64,
    pub crop: Option<&'static Crop>,
    /// Mean tree probability of the predicted label
    pub confidence: f64,
    /// Raw inputs, as received
    pub inputs: FeatureVector,
}

impl Recommendation {
    pub fn crop_name(&self) -> String {
        self.crop
            .map(Crop::display_name)
            .unwrap_or_else(|| UNKNOWN_CROP.to_string())
    }
}

impl ModelContext {
    pub fn new(stage: NormalizationStage, classifier: Classifier) -> Self {
        Self { stage, classifier }
    }

    /// Load all artifacts.
    ///
    /// The classifier and primary scaler are required. The secondary scaler is
    /// best-effort: if it cannot be read it is treated as absent.
    pub fn load(paths: &ModelPaths) -> anyhow::Result<Self> {
        tracing::info!("Loading classifier: {:?}", paths.classifier);
        let classifier = Artifact::load(&paths.classifier)
            .and_then(Artifact::into_classifier)
            .with_context(|| format!("Failed to load classifier: {:?}", paths.classifier))?;

        tracing::info!("Loading primary scaler: {:?}", paths.primary_scaler);
        let primary = Artifact::load(&paths.primary_scaler)
            .and_then(Artifact::into_scaler)
            .with_context(|| {
                format!("Failed to load primary scaler: {:?}", paths.primary_scaler)
            })?;

        let secondary = paths.secondary_scaler.as_deref().and_then(|path| {
            tracing::info!("Loading secondary scaler: {:?}", path);
            match Artifact::load(path) {
                Ok(artifact) => Some(artifact),
                Err(e) => {
                    tracing::warn!("Secondary scaler unavailable ({:?}): {}", path, e);
                    None
                }
            }
        });

        let stage = NormalizationStage::resolve(primary, secondary);
        let context = Self::new(stage, classifier);
        context.log_summary();
        Ok(context)
    }

    fn log_summary(&self) {
        tracing::info!(
            "Model ready: {} ({} trees, {} nodes, avg depth {:.1}, {} classes), normalization: {}",
            self.classifier.name(),
            self.classifier.n_trees(),
            self.classifier.total_nodes(),
            self.classifier.avg_depth(),
            self.classifier.classes().len(),
            self.stage.describe()
        );

        if self.classifier.n_features() != N_FEATURES {
            tracing::warn!(
                "Classifier expects {} features but inputs have {}; every prediction will fail",
                self.classifier.n_features(),
                N_FEATURES
            );
        }

        let unmapped: Vec<i64> = self
            .classifier
            .classes()
            .iter()
            .copied()
            .filter(|&label| catalog::lookup(label).is_none())
            .collect();
        if !unmapped.is_empty() {
            tracing::warn!("Labels without a crop entry: {:?}", unmapped);
        }
    }

    pub fn stage(&self) -> &NormalizationStage {
        &self.stage
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Run one feature vector through the models
    pub fn recommend(&self, inputs: &FeatureVector) -> Result<Recommendation, RecommendError> {
        // Out-of-range values are still predicted on
        for spec in FEATURES.iter().filter(|spec| !spec.contains(inputs.get(spec.key))) {
            tracing::debug!(
                "{} = {} is outside the slider range [{}, {}]",
                spec.key.field_name(),
                inputs.get(spec.key),
                spec.min,
                spec.max
            );
        }

        let normalized = self.stage.transform(&inputs.to_row())?;
        let prediction = self.classifier.predict(&normalized)?;
        let crop = catalog::lookup(prediction.label);

        tracing::debug!(
            "Predicted label {} ({}) with confidence {:.3}",
            prediction.label,
            crop.map(|c| c.name).unwrap_or(UNKNOWN_CROP),
            prediction.confidence
        );

        Ok(Recommendation {
            label: prediction.label,
            crop,
            confidence: prediction.confidence,
            inputs: *inputs,
        })
    }

    /// Same as [`recommend`](Self::recommend), from a raw row
    pub fn recommend_values(&self, values: &[f64]) -> Result<Recommendation, RecommendError> {
        let inputs = FeatureVector::from_slice(values)?;
        self.recommend(&inputs)
    }

    /// Markdown report for a raw row; failures become an error report
    pub fn recommend_report(&self, values: &[f64]) -> String {
        match self.recommend_values(values) {
            Ok(recommendation) => ReportFormatter::format(&recommendation),
            Err(e) => {
                tracing::warn!("Prediction failed: {}", e);
                ReportFormatter::format_error(&e)
            }
        }
    }
}
