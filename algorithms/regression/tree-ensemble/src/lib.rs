use ndarray::{Array1, ArrayView1, ArrayView2};
use sales_helpers::{Float, ModelError, RegressionModel};
use serde::{Deserialize, Deserializer, Serialize, de};

/// One node of a flattened binary regression tree.
///
/// Nodes are stored in a flat vector; the root is at index 0 and children always
/// have a larger index than their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node<F: Float> {
    /// Rows with `x[feature] <= threshold` go left, everything else (NaN included) goes right.
    Split {
        feature: usize,
        threshold: F,
        left: usize,
        right: usize,
    },
    Leaf { value: F },
}

/// A single regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree<F: Float> {
    pub nodes: Vec<Node<F>>,
}

impl<F: Float> RegressionTree<F> {
    pub fn new(nodes: Vec<Node<F>>) -> Self {
        Self { nodes }
    }

    /// A tree consisting of a single leaf.
    pub fn constant(value: F) -> Self {
        Self {
            nodes: vec![Node::Leaf { value }],
        }
    }

    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        let len = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} but the model has {} features",
                            i, feature, n_features
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", i));
                    }
                    for child in [left, right] {
                        if child <= i || child >= len {
                            return Err(format!("node {} has invalid child index {}", i, child));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} has a non-finite value", i));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walks the tree from the root and returns the value of the leaf `row` lands in.
    ///
    /// The tree must have passed validation, which guarantees the walk terminates
    /// and never indexes outside `nodes` or `row`.
    fn evaluate(&self, row: ArrayView1<F>) -> F {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[feature] <= threshold { left } else { right };
                }
                Node::Leaf { value } => return value,
            }
        }
    }
}

/// How the outputs of the individual trees are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Gradient boosting: `base_score + learning_rate * Σ tree(x)`.
    Sum,
    /// Bagging / random forest: `base_score + mean(tree(x))`.
    Mean,
}

/// An ensemble of regression trees, as produced by gradient boosting or random forests.
///
/// Deserializing goes through [`TreeEnsemble::new`], so every value of this type
/// has passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeEnsemble<F: Float> {
    n_features: usize,
    aggregation: Aggregation,
    base_score: F,
    /// Only used with `Aggregation::Sum`; missing means 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    learning_rate: Option<F>,
    trees: Vec<RegressionTree<F>>,
}

/// Wire form of [`TreeEnsemble`] before validation.
#[derive(Deserialize)]
struct EnsembleParams<F: Float> {
    n_features: usize,
    aggregation: Aggregation,
    #[serde(default)]
    base_score: F,
    #[serde(default)]
    learning_rate: Option<F>,
    trees: Vec<RegressionTree<F>>,
}

impl<'de, F> Deserialize<'de> for TreeEnsemble<F>
where
    F: Float + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let params = EnsembleParams::<F>::deserialize(deserializer)?;
        Self::new(
            params.n_features,
            params.aggregation,
            params.base_score,
            params.learning_rate,
            params.trees,
        )
        .map_err(de::Error::custom)
    }
}

impl<F: Float> TreeEnsemble<F> {
    /// Creates and validates an ensemble.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidModel` if the ensemble is empty, a tree is malformed
    /// or the learning rate is not a positive finite number.
    pub fn new(
        n_features: usize,
        aggregation: Aggregation,
        base_score: F,
        learning_rate: Option<F>,
        trees: Vec<RegressionTree<F>>,
    ) -> Result<Self, ModelError> {
        let ensemble = Self {
            n_features,
            aggregation,
            base_score,
            learning_rate,
            trees,
        };
        ensemble.validate()?;
        Ok(ensemble)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.n_features == 0 {
            return Err(ModelError::InvalidModel("ensemble has zero features".to_string()));
        }
        if self.trees.is_empty() {
            return Err(ModelError::InvalidModel("ensemble has no trees".to_string()));
        }
        if !self.base_score.is_finite() {
            return Err(ModelError::InvalidModel("base score is not finite".to_string()));
        }
        if let Some(lr) = self.learning_rate {
            if !lr.is_finite() || lr <= F::zero() {
                return Err(ModelError::InvalidModel(
                    "learning rate must be positive and finite".to_string(),
                ));
            }
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|e| ModelError::InvalidModel(format!("tree {}: {}", t, e)))?;
        }
        Ok(())
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    fn predict_row(&self, row: ArrayView1<F>) -> F {
        let total: F = self.trees.iter().map(|tree| tree.evaluate(row)).sum();
        match self.aggregation {
            Aggregation::Sum => self.base_score + self.learning_rate.unwrap_or_else(F::one) * total,
            Aggregation::Mean => {
                // validate() guarantees at least one tree.
                let n = F::from_usize(self.trees.len()).unwrap_or_else(F::one);
                self.base_score + total / n
            }
        }
    }
}

impl<F: Float> RegressionModel<F> for TreeEnsemble<F> {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, rows: ArrayView2<F>) -> Result<Array1<F>, ModelError> {
        self.check_width(&rows)?;
        Ok(rows
            .rows()
            .into_iter()
            .map(|row| self.predict_row(row))
            .collect())
    }

    fn name(&self) -> String {
        let family = match self.aggregation {
            Aggregation::Sum => "Gradient-boosted trees",
            Aggregation::Mean => "Random forest",
        };
        format!("{} ({} trees)", family, self.trees.len())
    }
}
