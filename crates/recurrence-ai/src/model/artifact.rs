use serde::{Deserialize, Serialize};

/// On-disk model document: the training column order plus the fitted classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_names: Vec<String>,
    pub classifier: ClassifierSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    RandomForest { trees: Vec<TreeSpec> },
    Logistic { coefficients: Vec<f64>, intercept: f64 },
}

/// Flat node table of one fitted tree. Node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSpec {
    pub nodes: Vec<NodeSpec>,
}

/// A split node carries `feature`, `threshold`, `left` and `right`; a leaf
/// carries only `value`, the per-class sample weights (no, yes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<usize>,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<usize>,
    #[serde(default)]
    pub value: [f64; 2],
}

impl NodeSpec {
    pub fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Self {
        Self {
            feature: Some(feature),
            threshold,
            left: Some(left),
            right: Some(right),
            value: [0.0, 0.0],
        }
    }

    pub fn leaf(no: f64, yes: f64) -> Self {
        Self {
            feature: None,
            threshold: 0.0,
            left: None,
            right: None,
            value: [no, yes],
        }
    }
}
