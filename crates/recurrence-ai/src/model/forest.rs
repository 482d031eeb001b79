use super::artifact::{NodeSpec, TreeSpec};
use super::{ClassProbabilities, ModelError};
use crate::clinical::{FeatureVector, FEATURE_COUNT};

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(ClassProbabilities),
}

#[derive(Debug, Clone)]
pub(crate) struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Children must sit after their parent, which rules out cycles and
    /// guarantees every walk terminates.
    pub(crate) fn from_spec(tree: usize, spec: &TreeSpec) -> Result<Self, ModelError> {
        if spec.nodes.is_empty() {
            return Err(ModelError::InvalidTree {
                tree,
                reason: "tree has no nodes".to_string(),
            });
        }

        let count = spec.nodes.len();
        let nodes = spec
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| convert_node(tree, index, count, node))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { nodes })
    }

    pub(crate) fn leaf_for(&self, features: &FeatureVector) -> ClassProbabilities {
        let values = features.values();
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf(probabilities) => return *probabilities,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if values[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

fn convert_node(
    tree: usize,
    index: usize,
    count: usize,
    node: &NodeSpec,
) -> Result<Node, ModelError> {
    let invalid = |reason: String| ModelError::InvalidTree { tree, reason };

    match (node.feature, node.left, node.right) {
        (Some(feature), Some(left), Some(right)) => {
            if feature >= FEATURE_COUNT {
                return Err(invalid(format!(
                    "node {index} splits on feature {feature}, only {FEATURE_COUNT} exist"
                )));
            }
            for child in [left, right] {
                if child <= index || child >= count {
                    return Err(invalid(format!(
                        "node {index} points to child {child} outside {}..{count}",
                        index + 1
                    )));
                }
            }
            if !node.threshold.is_finite() {
                return Err(invalid(format!("node {index} has a non-finite threshold")));
            }
            Ok(Node::Split {
                feature,
                threshold: node.threshold,
                left,
                right,
            })
        }
        (None, None, None) => {
            let [no, yes] = node.value;
            ClassProbabilities::from_weights(no, yes)
                .map(Node::Leaf)
                .map_err(|_| invalid(format!("leaf {index} has unusable class weights")))
        }
        _ => Err(invalid(format!(
            "node {index} is neither a complete split nor a leaf"
        ))),
    }
}

/// Averages the normalised leaf distributions of every tree.
#[derive(Debug, Clone)]
pub(crate) struct RandomForest {
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub(crate) fn from_specs(specs: &[TreeSpec]) -> Result<Self, ModelError> {
        if specs.is_empty() {
            return Err(ModelError::EmptyForest);
        }

        let trees = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| DecisionTree::from_spec(index, spec))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { trees })
    }

    pub(crate) fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub(crate) fn predict(&self, features: &FeatureVector) -> ClassProbabilities {
        let count = self.trees.len() as f64;
        let (no, yes) = self
            .trees
            .iter()
            .map(|tree| tree.leaf_for(features))
            .fold((0.0, 0.0), |(no, yes), leaf| {
                (no + leaf.no_recurrence, yes + leaf.recurrence)
            });

        ClassProbabilities {
            no_recurrence: no / count,
            recurrence: yes / count,
        }
    }
}

/// Logistic regression over the raw feature vector.
#[derive(Debug, Clone)]
pub(crate) struct LogisticModel {
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LogisticModel {
    pub(crate) fn new(coefficients: &[f64], intercept: f64) -> Result<Self, ModelError> {
        let coefficients: [f64; FEATURE_COUNT] =
            coefficients
                .try_into()
                .map_err(|_| ModelError::CoefficientCount {
                    expected: FEATURE_COUNT,
                    found: coefficients.len(),
                })?;

        Ok(Self {
            coefficients,
            intercept,
        })
    }

    pub(crate) fn predict(&self, features: &FeatureVector) -> ClassProbabilities {
        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.values())
                .map(|(weight, value)| weight * value)
                .sum::<f64>();
        let recurrence = 1.0 / (1.0 + (-z).exp());

        ClassProbabilities {
            no_recurrence: 1.0 - recurrence,
            recurrence,
        }
    }
}
