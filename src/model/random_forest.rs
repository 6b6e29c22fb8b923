//! Random Forest inference engine.
//!
//! Ensemble of [`DecisionTree`]s following sklearn's
//! `RandomForestClassifier.predict`: per-tree class probabilities are
//! averaged and the winning index is mapped through `classes_` to the
//! label the model was trained on. Trees are independent, so they are
//! evaluated in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::decision_tree::{argmax, DecisionTree, TreeArrays};
use super::{check_width, ModelError, Result};

/// Serialized forest, as exported from a fitted `RandomForestClassifier`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestArrays {
    pub n_estimators: usize,
    pub n_features: usize,
    /// `classes_`: label for each probability column
    pub classes: Vec<i64>,
    pub trees: Vec<TreeArrays>,
}

/// A validated random forest classifier
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    classes: Vec<i64>,
    n_features: usize,
}

/// Result of a forest prediction
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Predicted class label (from `classes_`)
    pub label: i64,
    /// Mean probability per class, aligned with the class list
    pub probabilities: Vec<f64>,
    /// Probability of the winning class
    pub confidence: f64,
}

impl RandomForest {
    /// Build a forest from exported arrays
    pub fn from_arrays(arrays: &ForestArrays) -> Result<Self> {
        if arrays.trees.is_empty() {
            return Err(ModelError::Invalid("empty forest".into()));
        }
        if arrays.trees.len() != arrays.n_estimators {
            return Err(ModelError::Invalid(format!(
                "n_estimators is {} but {} trees were exported",
                arrays.n_estimators,
                arrays.trees.len()
            )));
        }
        if arrays.classes.is_empty() {
            return Err(ModelError::Invalid("forest has no classes".into()));
        }

        let n_classes = arrays.classes.len();
        let trees = arrays
            .trees
            .iter()
            .enumerate()
            .map(|(i, t)| {
                if t.n_features != arrays.n_features {
                    return Err(ModelError::Invalid(format!(
                        "tree {} expects {} features, forest expects {}",
                        i, t.n_features, arrays.n_features
                    )));
                }
                DecisionTree::from_arrays(t, n_classes)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            trees,
            classes: arrays.classes.clone(),
            n_features: arrays.n_features,
        })
    }

    /// Mean class probabilities across all trees
    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>> {
        check_width("RandomForestClassifier", self.n_features, x)?;
        let n_classes = self.classes.len();

        let sums = self
            .trees
            .par_iter()
            .fold(
                || vec![0.0; n_classes],
                |mut acc, tree| {
                    for (a, p) in acc.iter_mut().zip(tree.leaf_for(x)) {
                        *a += p;
                    }
                    acc
                },
            )
            .reduce(
                || vec![0.0; n_classes],
                |mut a, b| {
                    for (x, y) in a.iter_mut().zip(b) {
                        *x += y;
                    }
                    a
                },
            );

        let n_trees = self.trees.len() as f64;
        Ok(sums.into_iter().map(|s| s / n_trees).collect())
    }

    /// Predict one sample, with probability details
    pub fn predict_with_proba(&self, x: &[f64]) -> Result<Prediction> {
        let probabilities = self.predict_proba(x)?;
        let best = argmax(&probabilities);
        Ok(Prediction {
            label: self.classes[best],
            confidence: probabilities[best],
            probabilities,
        })
    }

    /// Predict one sample, returning the class label only
    pub fn predict(&self, x: &[f64]) -> Result<i64> {
        Ok(self.predict_with_proba(x)?.label)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn avg_depth(&self) -> f64 {
        let total: usize = self.trees.iter().map(DecisionTree::depth).sum();
        total as f64 / self.trees.len() as f64
    }

    pub fn total_nodes(&self) -> usize {
        self.trees.iter().map(DecisionTree::n_nodes).sum()
    }

    pub fn total_leaves(&self) -> usize {
        self.trees.iter().map(DecisionTree::n_leaves).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stump(feature: i64, left: [f64; 2], right: [f64; 2]) -> TreeArrays {
        TreeArrays {
            n_features: 2,
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![feature, -2, -2],
            threshold: vec![0.5, -2.0, -2.0],
            value: vec![vec![1.0, 1.0], left.to_vec(), right.to_vec()],
        }
    }

    fn constant(value: [f64; 2]) -> TreeArrays {
        TreeArrays {
            n_features: 2,
            children_left: vec![-1],
            children_right: vec![-1],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![value.to_vec()],
        }
    }

    fn forest(trees: Vec<TreeArrays>) -> RandomForest {
        RandomForest::from_arrays(&ForestArrays {
            n_estimators: trees.len(),
            n_features: 2,
            classes: vec![7, 9],
            trees,
        })
        .unwrap()
    }

    #[test]
    fn unanimous_trees() {
        let rf = forest(vec![
            stump(0, [1.0, 0.0], [0.0, 1.0]),
            stump(1, [1.0, 0.0], [0.0, 1.0]),
            constant([0.0, 1.0]),
        ]);
        let pred = rf.predict_with_proba(&[0.9, 0.9]).unwrap();
        assert_eq!(pred.label, 9);
        assert_relative_eq!(pred.confidence, 1.0);
    }

    #[test]
    fn majority_wins_and_maps_through_classes() {
        let rf = forest(vec![
            stump(0, [1.0, 0.0], [0.0, 1.0]),
            stump(1, [1.0, 0.0], [0.0, 1.0]),
            constant([0.0, 1.0]),
        ]);
        // tree a → 7, tree b → 7, tree c → 9
        let pred = rf.predict_with_proba(&[0.1, 0.1]).unwrap();
        assert_eq!(pred.label, 7);
        assert_relative_eq!(pred.confidence, 2.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(pred.probabilities.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn soft_voting_uses_leaf_distributions() {
        // Two weak votes for class 7 lose to one confident vote for class 9
        let rf = forest(vec![
            constant([0.6, 0.4]),
            constant([0.6, 0.4]),
            constant([0.0, 1.0]),
        ]);
        assert_eq!(rf.predict(&[0.0, 0.0]).unwrap(), 9);
    }

    #[test]
    fn tie_goes_to_first_class() {
        let rf = forest(vec![constant([1.0, 0.0]), constant([0.0, 1.0])]);
        assert_eq!(rf.predict(&[0.0, 0.0]).unwrap(), 7);
    }

    #[test]
    fn n_estimators_must_match_tree_count() {
        let err = RandomForest::from_arrays(&ForestArrays {
            n_estimators: 5,
            n_features: 2,
            classes: vec![7, 9],
            trees: vec![constant([1.0, 0.0])],
        });
        assert!(err.is_err());
    }

    #[test]
    fn empty_forest_is_rejected() {
        let err = RandomForest::from_arrays(&ForestArrays {
            n_estimators: 0,
            n_features: 2,
            classes: vec![7, 9],
            trees: vec![],
        });
        assert!(err.is_err());
    }

    #[test]
    fn wrong_width_is_reported() {
        let rf = forest(vec![constant([1.0, 0.0])]);
        assert!(matches!(
            rf.predict(&[0.0; 7]).unwrap_err(),
            ModelError::DimensionMismatch { expected: 2, actual: 7, .. }
        ));
    }

    #[test]
    fn structure_accessors() {
        let rf = forest(vec![stump(0, [1.0, 0.0], [0.0, 1.0]), constant([1.0, 0.0])]);
        assert_eq!(rf.n_trees(), 2);
        assert_eq!(rf.total_nodes(), 4);
        assert_eq!(rf.total_leaves(), 3);
        assert_relative_eq!(rf.avg_depth(), 0.5);
        assert_eq!(rf.classes(), &[7, 9]);
    }
}
