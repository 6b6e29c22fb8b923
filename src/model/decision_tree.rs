//! Decision tree inference engine.
//!
//! Array-based tree representation mirroring sklearn's `tree_` attribute:
//! parallel `children_left` / `children_right` / `feature` / `threshold`
//! arrays plus a per-node `value` row of class weights. Only inference is
//! handled here.
//!
//! Trees are validated on construction (child pointers in range and always
//! pointing forward), so traversal terminates and never indexes out of bounds.

use serde::{Deserialize, Serialize};

use super::{check_width, ModelError, Result};

/// Marker sklearn uses for "no child"
const TREE_LEAF: i64 = -1;

/// Serialized tree, as exported from a fitted `DecisionTreeClassifier`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeArrays {
    pub n_features: usize,
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights (counts or fractions)
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Normalized class probabilities
    Leaf(Vec<f64>),
}

/// A validated decision tree classifier
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
    n_features: usize,
}

impl DecisionTree {
    /// Build from parallel arrays, validating structure against `n_classes`
    pub fn from_arrays(arrays: &TreeArrays, n_classes: usize) -> Result<Self> {
        let n = arrays.children_left.len();
        if n == 0 {
            return Err(ModelError::Invalid("tree has no nodes".into()));
        }
        if arrays.children_right.len() != n
            || arrays.feature.len() != n
            || arrays.threshold.len() != n
            || arrays.value.len() != n
        {
            return Err(ModelError::Invalid("inconsistent tree array lengths".into()));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let left = arrays.children_left[i];
            let right = arrays.children_right[i];

            if left == TREE_LEAF && right == TREE_LEAF {
                nodes.push(TreeNode::Leaf(leaf_probabilities(&arrays.value[i], n_classes, i)?));
                continue;
            }

            let child = |c: i64| -> Result<usize> {
                usize::try_from(c)
                    .ok()
                    .filter(|&c| c > i && c < n)
                    .ok_or_else(|| ModelError::Invalid(format!("node {} has bad child {}", i, c)))
            };
            let feature = usize::try_from(arrays.feature[i])
                .ok()
                .filter(|&f| f < arrays.n_features)
                .ok_or_else(|| {
                    ModelError::Invalid(format!(
                        "node {} splits on feature {}",
                        i, arrays.feature[i]
                    ))
                })?;

            nodes.push(TreeNode::Split {
                feature,
                threshold: arrays.threshold[i],
                left: child(left)?,
                right: child(right)?,
            });
        }

        Ok(Self {
            nodes,
            n_features: arrays.n_features,
        })
    }

    /// Class probabilities for one sample (features <= threshold go left)
    pub fn predict_proba(&self, x: &[f64]) -> Result<&[f64]> {
        check_width("DecisionTreeClassifier", self.n_features, x)?;
        Ok(self.leaf_for(x))
    }

    /// Traversal without width checks; callers validate once per sample
    pub(crate) fn leaf_for(&self, x: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf(proba) => return proba,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, TreeNode::Leaf(_)))
            .count()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Longest root-to-leaf path
    pub fn depth(&self) -> usize {
        self.node_depth(0)
    }

    fn node_depth(&self, idx: usize) -> usize {
        match &self.nodes[idx] {
            TreeNode::Leaf(_) => 0,
            TreeNode::Split { left, right, .. } => {
                1 + self.node_depth(*left).max(self.node_depth(*right))
            }
        }
    }
}

fn leaf_probabilities(weights: &[f64], n_classes: usize, node: usize) -> Result<Vec<f64>> {
    if weights.len() != n_classes {
        return Err(ModelError::Invalid(format!(
            "leaf {} has {} class weights, expected {}",
            node,
            weights.len(),
            n_classes
        )));
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(ModelError::Invalid(format!("leaf {} has invalid weights", node)));
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(ModelError::Invalid(format!("leaf {} has zero weight", node)));
    }
    Ok(weights.iter().map(|w| w / total).collect())
}

/// First index of the maximum (numpy argmax tie rule)
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn predict_index(tree: &DecisionTree, x: &[f64]) -> usize {
        argmax(tree.predict_proba(x).unwrap())
    }

    // f[0] <= 0.5 → class 0, else → class 1
    fn simple_arrays() -> TreeArrays {
        TreeArrays {
            n_features: 1,
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![0, -2, -2],
            threshold: vec![0.5, -2.0, -2.0],
            value: vec![vec![5.0, 5.0], vec![4.0, 1.0], vec![0.0, 3.0]],
        }
    }

    #[test]
    fn classify_left_and_right() {
        let tree = DecisionTree::from_arrays(&simple_arrays(), 2).unwrap();
        assert_eq!(predict_index(&tree, &[0.3]), 0);
        assert_eq!(predict_index(&tree, &[0.7]), 1);
    }

    #[test]
    fn boundary_goes_left() {
        let tree = DecisionTree::from_arrays(&simple_arrays(), 2).unwrap();
        assert_eq!(predict_index(&tree, &[0.5]), 0);
    }

    #[test]
    fn leaf_weights_are_normalized() {
        let tree = DecisionTree::from_arrays(&simple_arrays(), 2).unwrap();
        let p = tree.predict_proba(&[0.0]).unwrap();
        assert_relative_eq!(p[0], 0.8);
        assert_relative_eq!(p[1], 0.2);
    }

    #[test]
    fn structure_accessors() {
        let tree = DecisionTree::from_arrays(&simple_arrays(), 2).unwrap();
        assert_eq!(tree.n_nodes(), 3);
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.n_features(), 1);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn deeper_tree_routes_on_two_features() {
        // f[0] <= 5.0:
        //   f[1] <= 3.0 → class 0
        //   else → class 1
        // else:
        //   f[0] <= 8.0 → class 1
        //   else → class 2
        let arrays = TreeArrays {
            n_features: 2,
            children_left: vec![1, 2, -1, -1, 5, -1, -1],
            children_right: vec![4, 3, -1, -1, 6, -1, -1],
            feature: vec![0, 1, -2, -2, 0, -2, -2],
            threshold: vec![5.0, 3.0, -2.0, -2.0, 8.0, -2.0, -2.0],
            value: vec![
                vec![1.0, 1.0, 1.0],
                vec![1.0, 1.0, 0.0],
                vec![1.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
                vec![0.0, 1.0, 1.0],
                vec![0.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
            ],
        };
        let tree = DecisionTree::from_arrays(&arrays, 3).unwrap();
        assert_eq!(predict_index(&tree, &[3.0, 2.0]), 0);
        assert_eq!(predict_index(&tree, &[3.0, 4.0]), 1);
        assert_eq!(predict_index(&tree, &[6.0, 0.0]), 1);
        assert_eq!(predict_index(&tree, &[9.0, 0.0]), 2);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn backward_child_pointer_is_rejected() {
        let mut arrays = simple_arrays();
        arrays.children_left[0] = 0;
        assert!(DecisionTree::from_arrays(&arrays, 2).is_err());
    }

    #[test]
    fn out_of_range_feature_is_rejected() {
        let mut arrays = simple_arrays();
        arrays.feature[0] = 3;
        assert!(DecisionTree::from_arrays(&arrays, 2).is_err());
    }

    #[test]
    fn leaf_width_must_match_classes() {
        assert!(DecisionTree::from_arrays(&simple_arrays(), 3).is_err());
    }

    #[test]
    fn wrong_input_width_is_an_error() {
        let tree = DecisionTree::from_arrays(&simple_arrays(), 2).unwrap();
        assert!(tree.predict_proba(&[0.1, 0.2]).is_err());
    }

    #[test]
    fn argmax_takes_first_maximum() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), 1);
        assert_eq!(argmax(&[1.0]), 0);
    }
}
