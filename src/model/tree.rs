//! Decision trees and random forests
//!
//! Trees are stored as flat node arrays with node 0 as the root. A split sends
//! `x[feature] <= threshold` to the left child. Classification leaves hold
//! per-class weights; regression leaves hold a single value.

use serde::{Deserialize, Serialize};

use super::{argmax, numeric_input, ModelError, Predictor, ProbabilisticPredictor};
use crate::frame::{FeatureRow, Scalar};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeTask {
    Classification { classes: Vec<Scalar> },
    Regression,
}

impl TreeTask {
    fn leaf_width(&self) -> usize {
        match self {
            TreeTask::Classification { classes } => classes.len(),
            TreeTask::Regression => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn validate(&self, n_features: usize, leaf_width: usize) -> Result<(), ModelError> {
        validate_nodes(&self.nodes, n_features, leaf_width)
    }

    fn leaf(&self, x: &[f64]) -> Result<&[f64], ModelError> {
        find_leaf(&self.nodes, x)
    }
}

fn validate_nodes(nodes: &[TreeNode], n_features: usize, leaf_width: usize) -> Result<(), ModelError> {
    if nodes.is_empty() {
        return Err(ModelError::Malformed("tree has no nodes".into()));
    }
    for (i, node) in nodes.iter().enumerate() {
        match node {
            TreeNode::Split {
                feature,
                left,
                right,
                ..
            } => {
                if *feature >= n_features {
                    return Err(ModelError::Malformed(format!(
                        "node {} splits on feature {} of {}",
                        i, feature, n_features
                    )));
                }
                // Children must come after their parent, which also rules out cycles.
                let in_range = |c: usize| c > i && c < nodes.len();
                if !in_range(*left) || !in_range(*right) {
                    return Err(ModelError::Malformed(format!(
                        "node {} has invalid children {} and {}",
                        i, left, right
                    )));
                }
            }
            TreeNode::Leaf { value } => {
                if value.len() != leaf_width {
                    return Err(ModelError::Malformed(format!(
                        "leaf {} holds {} values, expected {}",
                        i,
                        value.len(),
                        leaf_width
                    )));
                }
            }
        }
    }
    Ok(())
}

fn find_leaf<'a>(nodes: &'a [TreeNode], x: &[f64]) -> Result<&'a [f64], ModelError> {
    let mut index = 0;
    loop {
        match nodes.get(index) {
            Some(TreeNode::Leaf { value }) => return Ok(value),
            Some(TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            }) => {
                let v = x.get(*feature).copied().unwrap_or(f64::NAN);
                index = if v <= *threshold { *left } else { *right };
            }
            None => {
                return Err(ModelError::Malformed(format!("node {} missing", index)));
            }
        }
    }
}

fn normalized(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        weights.iter().map(|w| w / total).collect()
    } else {
        vec![1.0 / weights.len() as f64; weights.len()]
    }
}

fn classes_of(task: &TreeTask) -> &[Scalar] {
    match task {
        TreeTask::Classification { classes } => classes,
        TreeTask::Regression => &[],
    }
}

fn pick_class(task: &TreeTask, proba: &[f64]) -> Result<Scalar, ModelError> {
    argmax(proba)
        .and_then(|i| classes_of(task).get(i).cloned())
        .ok_or_else(|| ModelError::Malformed("no class to predict".into()))
}

fn validate_task(task: &TreeTask) -> Result<(), ModelError> {
    if let TreeTask::Classification { classes } = task {
        if classes.is_empty() {
            return Err(ModelError::Malformed("classification without classes".into()));
        }
    }
    Ok(())
}

/// Single CART tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub task: TreeTask,
    pub n_features: usize,
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        validate_task(&self.task)?;
        validate_nodes(&self.nodes, self.n_features, self.task.leaf_width())
    }

    fn leaf(&self, row: &FeatureRow) -> Result<Vec<f64>, ModelError> {
        let x = numeric_input(row, self.n_features)?;
        Ok(find_leaf(&self.nodes, &x)?.to_vec())
    }
}

impl Predictor for DecisionTree {
    fn predict(&self, row: &FeatureRow) -> Result<Scalar, ModelError> {
        let leaf = self.leaf(row)?;
        match &self.task {
            TreeTask::Regression => Ok(Scalar::Float(leaf[0])),
            TreeTask::Classification { .. } => pick_class(&self.task, &normalized(&leaf)),
        }
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn as_probabilistic(&self) -> Option<&dyn ProbabilisticPredictor> {
        match self.task {
            TreeTask::Classification { .. } => Some(self),
            TreeTask::Regression => None,
        }
    }
}

impl ProbabilisticPredictor for DecisionTree {
    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>, ModelError> {
        Ok(normalized(&self.leaf(row)?))
    }

    fn classes(&self) -> &[Scalar] {
        classes_of(&self.task)
    }
}

/// Bagged ensemble of trees sharing one task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub task: TreeTask,
    pub n_features: usize,
    pub estimators: Vec<Tree>,
}

impl RandomForest {
    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        validate_task(&self.task)?;
        if self.estimators.is_empty() {
            return Err(ModelError::Malformed("forest has no estimators".into()));
        }
        for tree in &self.estimators {
            tree.validate(self.n_features, self.task.leaf_width())?;
        }
        Ok(())
    }

    /// Mean of the per-tree leaf outputs, normalizing class weights first
    fn averaged(&self, row: &FeatureRow) -> Result<Vec<f64>, ModelError> {
        let x = numeric_input(row, self.n_features)?;
        let width = self.task.leaf_width();
        let mut sum = vec![0.0; width];
        for tree in &self.estimators {
            let leaf = tree.leaf(&x)?;
            let contribution = match self.task {
                TreeTask::Classification { .. } => normalized(leaf),
                TreeTask::Regression => leaf.to_vec(),
            };
            for (s, c) in sum.iter_mut().zip(contribution) {
                *s += c;
            }
        }
        let n = self.estimators.len() as f64;
        Ok(sum.into_iter().map(|s| s / n).collect())
    }
}

impl Predictor for RandomForest {
    fn predict(&self, row: &FeatureRow) -> Result<Scalar, ModelError> {
        let averaged = self.averaged(row)?;
        match &self.task {
            TreeTask::Regression => Ok(Scalar::Float(averaged[0])),
            TreeTask::Classification { .. } => pick_class(&self.task, &averaged),
        }
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn as_probabilistic(&self) -> Option<&dyn ProbabilisticPredictor> {
        match self.task {
            TreeTask::Classification { .. } => Some(self),
            TreeTask::Regression => None,
        }
    }
}

impl ProbabilisticPredictor for RandomForest {
    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>, ModelError> {
        self.averaged(row)
    }

    fn classes(&self) -> &[Scalar] {
        classes_of(&self.task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump_nodes(left: Vec<f64>, right: Vec<f64>) -> Vec<TreeNode> {
        vec![
            TreeNode::Split {
                feature: 0,
                threshold: 0.5,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { value: left },
            TreeNode::Leaf { value: right },
        ]
    }

    fn classifier() -> DecisionTree {
        DecisionTree {
            task: TreeTask::Classification {
                classes: vec![Scalar::Int(0), Scalar::Int(1)],
            },
            n_features: 1,
            nodes: stump_nodes(vec![8.0, 2.0], vec![1.0, 3.0]),
        }
    }

    #[test]
    fn test_classifier_routes_and_normalizes() {
        let tree = classifier();
        assert!(tree.validate().is_ok());

        let low = FeatureRow::positional(vec![0.2]);
        assert_eq!(tree.predict(&low).unwrap(), Scalar::Int(0));
        assert_eq!(tree.predict_proba(&low).unwrap(), vec![0.8, 0.2]);

        let high = FeatureRow::positional(vec![0.9]);
        assert_eq!(tree.predict(&high).unwrap(), Scalar::Int(1));
        assert_eq!(tree.predict_proba(&high).unwrap(), vec![0.25, 0.75]);
    }

    #[test]
    fn test_regression_tree_has_no_probabilities() {
        let tree = DecisionTree {
            task: TreeTask::Regression,
            n_features: 1,
            nodes: stump_nodes(vec![10.0], vec![20.0]),
        };
        assert!(tree.validate().is_ok());
        assert!(tree.as_probabilistic().is_none());
        assert_eq!(
            tree.predict(&FeatureRow::positional(vec![1.0])).unwrap(),
            Scalar::Float(20.0)
        );
    }

    #[test]
    fn test_validate_rejects_backward_children() {
        let mut tree = classifier();
        tree.nodes[0] = TreeNode::Split {
            feature: 0,
            threshold: 0.0,
            left: 0,
            right: 2,
        };
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_feature_out_of_range() {
        let mut tree = classifier();
        tree.n_features = 0;
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_forest_averages_trees() {
        let forest = RandomForest {
            task: TreeTask::Classification {
                classes: vec!["cat".into(), "dog".into()],
            },
            n_features: 1,
            estimators: vec![
                Tree {
                    nodes: stump_nodes(vec![1.0, 0.0], vec![0.0, 1.0]),
                },
                Tree {
                    nodes: vec![TreeNode::Leaf {
                        value: vec![1.0, 1.0],
                    }],
                },
            ],
        };
        assert!(forest.validate().is_ok());
        let row = FeatureRow::positional(vec![1.0]);
        assert_eq!(forest.predict_proba(&row).unwrap(), vec![0.25, 0.75]);
        assert_eq!(forest.predict(&row).unwrap(), Scalar::Text("dog".into()));
    }

    #[test]
    fn test_forest_regression_mean() {
        let forest = RandomForest {
            task: TreeTask::Regression,
            n_features: 1,
            estimators: vec![
                Tree {
                    nodes: stump_nodes(vec![1.0], vec![3.0]),
                },
                Tree {
                    nodes: stump_nodes(vec![2.0], vec![5.0]),
                },
            ],
        };
        let row = FeatureRow::positional(vec![0.0]);
        assert_eq!(forest.predict(&row).unwrap(), Scalar::Float(1.5));
    }
}
