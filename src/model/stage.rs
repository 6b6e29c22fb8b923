//! Normalization Chain
//!
//! The transforms applied to a raw feature row before it reaches the
//! classifier. Which variant is in play is decided once, when artifacts are
//! loaded.

use super::artifact::Artifact;
use super::scaler::Scaler;
use super::Result;

#[derive(Debug, Clone)]
pub enum NormalizationStage {
    /// Raw features go straight to the classifier
    Identity,
    Single(Scaler),
    /// Primary scaler, then secondary scaler on its output
    Chained(Scaler, Scaler),
}

impl NormalizationStage {
    /// Build the chain from the primary scaler and whatever the secondary
    /// artifact turned out to be.
    ///
    /// A secondary artifact that carries a tree count is a classifier that was
    /// saved under the scaler's name; it is dropped with a warning. Any other
    /// artifact without a transform is dropped the same way.
    pub fn resolve(primary: Scaler, secondary: Option<Artifact>) -> Self {
        match secondary {
            None => NormalizationStage::Single(primary),
            Some(artifact) => {
                if let Some(n_estimators) = artifact.n_estimators() {
                    tracing::warn!(
                        "Secondary scaler artifact is a {} ({} estimators); using {} only",
                        artifact.kind(),
                        n_estimators,
                        primary.name()
                    );
                    return NormalizationStage::Single(primary);
                }
                let kind = artifact.kind();
                match artifact.into_scaler() {
                    Ok(secondary) => NormalizationStage::Chained(primary, secondary),
                    Err(_) => {
                        tracing::warn!(
                            "Secondary scaler artifact is a {} with no transform; using {} only",
                            kind,
                            primary.name()
                        );
                        NormalizationStage::Single(primary)
                    }
                }
            }
        }
    }

    /// Apply every stage in order
    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>> {
        match self {
            NormalizationStage::Identity => Ok(x.to_vec()),
            NormalizationStage::Single(s) => s.transform(x),
            NormalizationStage::Chained(first, second) => second.transform(&first.transform(x)?),
        }
    }

    /// Human-readable description, e.g. `MinMaxScaler → StandardScaler`
    pub fn describe(&self) -> String {
        match self {
            NormalizationStage::Identity => "identity".to_string(),
            NormalizationStage::Single(s) => s.name().to_string(),
            NormalizationStage::Chained(a, b) => format!("{} → {}", a.name(), b.name()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            NormalizationStage::Identity => 0,
            NormalizationStage::Single(_) => 1,
            NormalizationStage::Chained(..) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
