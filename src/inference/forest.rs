//! Random-forest classifier stored as flat node arrays.

use super::{check_arity, Model, ModelError};
use serde::Deserialize;

/// One tree node
///
/// A split sends `x` left when `x[feature] <= threshold`. A leaf holds
/// per-class weights (sample counts or fractions).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        leaf: Vec<f64>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

/// On-disk shape before structural validation
#[derive(Debug, Deserialize)]
pub struct ForestSpec {
    pub n_features: usize,
    pub n_classes: usize,
    pub trees: Vec<Tree>,
}

/// Validated forest
///
/// Child indices always point forward, so a walk from the root terminates.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "ForestSpec")]
pub struct ForestClassifier {
    n_features: usize,
    n_classes: usize,
    trees: Vec<Tree>,
}

impl TryFrom<ForestSpec> for ForestClassifier {
    type Error = ModelError;

    fn try_from(spec: ForestSpec) -> Result<Self, Self::Error> {
        Self::new(spec.n_features, spec.n_classes, spec.trees)
    }
}

impl ForestClassifier {
    pub fn new(n_features: usize, n_classes: usize, trees: Vec<Tree>) -> Result<Self, ModelError> {
        if n_features == 0 {
            return Err(ModelError::Malformed("n_features must be > 0".to_string()));
        }
        if n_classes == 0 {
            return Err(ModelError::Malformed("n_classes must be > 0".to_string()));
        }
        if trees.is_empty() {
            return Err(ModelError::Malformed("forest has no trees".to_string()));
        }

        for (t, tree) in trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelError::Malformed(format!("tree {} has no nodes", t)));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= n_features {
                            return Err(ModelError::Malformed(format!(
                                "tree {} node {} splits on feature {} of {}",
                                t, i, feature, n_features
                            )));
                        }
                        if !threshold.is_finite() {
                            return Err(ModelError::Malformed(format!(
                                "tree {} node {} has a non-finite threshold",
                                t, i
                            )));
                        }
                        for child in [*left, *right] {
                            if child <= i || child >= tree.nodes.len() {
                                return Err(ModelError::Malformed(format!(
                                    "tree {} node {} has invalid child {}",
                                    t, i, child
                                )));
                            }
                        }
                    }
                    Node::Leaf { leaf } => {
                        if leaf.len() != n_classes {
                            return Err(ModelError::Malformed(format!(
                                "tree {} leaf {} has {} classes, expected {}",
                                t,
                                i,
                                leaf.len(),
                                n_classes
                            )));
                        }
                        let total: f64 = leaf.iter().sum();
                        if leaf.iter().any(|w| !w.is_finite() || *w < 0.0)
                            || !total.is_finite()
                            || total <= 0.0
                        {
                            return Err(ModelError::Malformed(format!(
                                "tree {} leaf {} has invalid weights",
                                t, i
                            )));
                        }
                    }
                }
            }
        }

        Ok(Self {
            n_features,
            n_classes,
            trees,
        })
    }

    fn leaf_for<'a>(&self, tree: &'a Tree, features: &[f64]) -> Result<&'a [f64], ModelError> {
        let mut index = 0;
        loop {
            match tree.nodes.get(index) {
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                Some(Node::Leaf { leaf }) => return Ok(leaf),
                None => {
                    return Err(ModelError::Malformed(format!(
                        "node {} out of range",
                        index
                    )))
                }
            }
        }
    }

    fn distribution(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_arity(self.n_features, features)?;

        let mut totals = vec![0.0; self.n_classes];
        for tree in &self.trees {
            let leaf = self.leaf_for(tree, features)?;
            let sum: f64 = leaf.iter().sum();
            for (total, weight) in totals.iter_mut().zip(leaf) {
                *total += weight / sum;
            }
        }

        let n = self.trees.len() as f64;
        for total in &mut totals {
            *total /= n;
        }
        Ok(totals)
    }
}

impl Model for ForestClassifier {
    fn n_features(&self) -> usize {
        self.n_features
    }

    /// Index of the most probable class; the first one wins ties
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        let proba = self.distribution(features)?;
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        Ok(best as f64)
    }

    fn predict_proba(&self, features: &[f64]) -> Option<Result<Vec<f64>, ModelError>> {
        Some(self.distribution(features))
    }
}
