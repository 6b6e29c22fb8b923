//! Model Artifact Loading
//!
//! Each artifact is a JSON document tagged with a `kind`, carrying the fitted
//! attributes of one scikit-learn estimator. Loading resolves what the
//! artifact can do (transform vs. predict) once, so request handling never
//! probes capabilities.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::decision_tree::{DecisionTree, TreeArrays};
use super::random_forest::{ForestArrays, Prediction, RandomForest};
use super::scaler::{MinMaxScaler, Scaler, StandardScaler};
use super::{ModelError, Result};

/// Serialized single-tree classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeClassifierArrays {
    pub classes: Vec<i64>,
    #[serde(flatten)]
    pub tree: TreeArrays,
}

/// Raw artifact document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactDoc {
    MinMaxScaler(MinMaxScaler),
    StandardScaler(StandardScaler),
    RandomForestClassifier(ForestArrays),
    DecisionTreeClassifier(TreeClassifierArrays),
}

/// A validated, ready-to-use artifact
#[derive(Debug, Clone)]
pub enum Artifact {
    Scaler(Scaler),
    Classifier(Classifier),
}

/// Any fitted classifier
#[derive(Debug, Clone)]
pub enum Classifier {
    Forest(RandomForest),
    Tree {
        tree: DecisionTree,
        classes: Vec<i64>,
    },
}

impl Artifact {
    /// Parse and validate an artifact from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: ArtifactDoc = serde_json::from_str(json)?;
        Self::from_doc(doc)
    }

    /// Read and validate an artifact file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_doc(doc: ArtifactDoc) -> Result<Self> {
        let artifact = match doc {
            ArtifactDoc::MinMaxScaler(s) => Artifact::Scaler(Scaler::MinMax(s)),
            ArtifactDoc::StandardScaler(s) => Artifact::Scaler(Scaler::Standard(s)),
            ArtifactDoc::RandomForestClassifier(f) => {
                Artifact::Classifier(Classifier::Forest(RandomForest::from_arrays(&f)?))
            }
            ArtifactDoc::DecisionTreeClassifier(t) => {
                if t.classes.is_empty() {
                    return Err(ModelError::Invalid("tree has no classes".into()));
                }
                let tree = DecisionTree::from_arrays(&t.tree, t.classes.len())?;
                Artifact::Classifier(Classifier::Tree {
                    tree,
                    classes: t.classes,
                })
            }
        };
        if let Artifact::Scaler(s) = &artifact {
            s.validate()?;
        }
        Ok(artifact)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Artifact::Scaler(s) => s.name(),
            Artifact::Classifier(c) => c.name(),
        }
    }

    /// Tree count, for ensemble classifiers
    pub fn n_estimators(&self) -> Option<usize> {
        match self {
            Artifact::Classifier(Classifier::Forest(f)) => Some(f.n_trees()),
            _ => None,
        }
    }

    pub fn into_scaler(self) -> Result<Scaler> {
        match self {
            Artifact::Scaler(s) => Ok(s),
            other => Err(ModelError::WrongKind {
                kind: other.kind(),
                expected: "scaler",
            }),
        }
    }

    pub fn into_classifier(self) -> Result<Classifier> {
        match self {
            Artifact::Classifier(c) => Ok(c),
            other => Err(ModelError::WrongKind {
                kind: other.kind(),
                expected: "classifier",
            }),
        }
    }
}

impl Classifier {
    pub fn name(&self) -> &'static str {
        match self {
            Classifier::Forest(_) => "RandomForestClassifier",
            Classifier::Tree { .. } => "DecisionTreeClassifier",
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            Classifier::Forest(f) => f.n_features(),
            Classifier::Tree { tree, .. } => tree.n_features(),
        }
    }

    pub fn n_trees(&self) -> usize {
        match self {
            Classifier::Forest(f) => f.n_trees(),
            Classifier::Tree { .. } => 1,
        }
    }

    pub fn classes(&self) -> &[i64] {
        match self {
            Classifier::Forest(f) => f.classes(),
            Classifier::Tree { classes, .. } => classes,
        }
    }

    pub fn total_nodes(&self) -> usize {
        match self {
            Classifier::Forest(f) => f.total_nodes(),
            Classifier::Tree { tree, .. } => tree.n_nodes(),
        }
    }

    pub fn total_leaves(&self) -> usize {
        match self {
            Classifier::Forest(f) => f.total_leaves(),
            Classifier::Tree { tree, .. } => tree.n_leaves(),
        }
    }

    /// Mean root-to-leaf depth across trees
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_depth(&self) -> f64 {
        match self {
            Classifier::Forest(f) => f.avg_depth(),
            Classifier::Tree { tree, .. } => tree.depth() as f64,
        }
    }

    /// Predict one normalized sample
    pub fn predict(&self, x: &[f64]) -> Result<Prediction> {
        match self {
            Classifier::Forest(f) => f.predict_with_proba(x),
            Classifier::Tree { tree, classes } => {
                let probabilities = tree.predict_proba(x)?.to_vec();
                let best = super::decision_tree::argmax(&probabilities);
                Ok(Prediction {
                    label: classes[best],
                    confidence: probabilities[best],
                    probabilities,
                })
            }
        }
    }
}
