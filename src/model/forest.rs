//! Bagged decision-tree ensembles.
//!
//! Every tree is grown on a bootstrap resample (`n` draws with replacement) of
//! the training rows. One seeded RNG drives both the resampling and the
//! per-split feature draws, so a given [`ForestParams`] always grows the same forest.

use crate::model::error::ModelError;
use crate::model::params::ForestParams;
use crate::model::tree::{majority, Criterion, DecisionTree, TreeGrower};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn grow_forest<X: AsRef<[f64]>>(
    x: &[X],
    y: &[f64],
    criterion: Criterion,
    params: &ForestParams,
    model: &'static str,
) -> Result<(Vec<DecisionTree>, usize), ModelError> {
    if x.is_empty() {
        return Err(ModelError::EmptyTrainingSet { model });
    }
    if x.len() != y.len() {
        return Err(ModelError::LengthMismatch {
            inputs: x.len(),
            targets: y.len(),
        });
    }
    if params.n_trees == 0 {
        return Err(ModelError::InvalidParameter(
            "n_trees must be at least 1".to_string(),
        ));
    }
    let n_features = x[0].as_ref().len();
    if n_features == 0 || x.iter().any(|row| row.as_ref().len() != n_features) {
        return Err(ModelError::InvalidParameter(format!(
            "every input row must have the same, non-zero width ({n_features})"
        )));
    }

    let grower = TreeGrower {
        criterion,
        max_depth: params.max_depth,
        min_samples_split: params.min_samples_split,
        n_features,
        n_try: params.max_features.resolve(n_features),
    };

    let n = x.len();
    let mut rng = StdRng::seed_from_u64(params.seed);
    let trees: Vec<DecisionTree> = (0..params.n_trees)
        .map(|_| {
            let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            grower.grow(x, y, bootstrap, &mut rng)
        })
        .collect();

    debug!(
        "Grew {} {} trees on {} rows ({} leaves on average)",
        trees.len(),
        model,
        n,
        trees.iter().map(DecisionTree::n_leaves).sum::<usize>() / trees.len()
    );
    Ok((trees, n_features))
}

/// Random forest classifier over integer class codes `0..n_classes`.
///
/// Predictions are the majority vote of the trees; ties go to the lowest code.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTree>,
    n_features: usize,
    n_classes: usize,
}

impl RandomForestClassifier {
    /// Fits the forest on rows `x` and class codes `y`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyTrainingSet`] for no rows,
    /// [`ModelError::LengthMismatch`] if `x` and `y` differ in length, and
    /// [`ModelError::InvalidParameter`] for zero trees or ragged rows.
    pub fn fit<X: AsRef<[f64]>>(
        x: &[X],
        y: &[usize],
        params: &ForestParams,
    ) -> Result<Self, ModelError> {
        let n_classes = y.iter().max().map_or(0, |max| max + 1);
        let targets: Vec<f64> = y.iter().map(|&class| class as f64).collect();
        let (trees, n_features) = grow_forest(
            x,
            &targets,
            Criterion::Gini { n_classes },
            params,
            "classification",
        )?;
        Ok(Self {
            trees,
            n_features,
            n_classes,
        })
    }

    pub fn predict(&self, row: &[f64]) -> usize {
        debug_assert_eq!(row.len(), self.n_features);
        let mut votes = vec![0usize; self.n_classes];
        for tree in &self.trees {
            votes[tree.predict(row) as usize] += 1;
        }
        majority(&votes)
    }

    /// Share of trees voting for each class code.
    pub fn predict_proba(&self, row: &[f64]) -> Vec<f64> {
        let mut votes = vec![0.0; self.n_classes];
        for tree in &self.trees {
            votes[tree.predict(row) as usize] += 1.0;
        }
        let n_trees = self.trees.len() as f64;
        votes.iter().map(|v| v / n_trees).collect()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

/// Random forest regressor; predictions are the mean of the trees.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl RandomForestRegressor {
    /// Fits the forest on rows `x` and targets `y`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`RandomForestClassifier::fit`].
    pub fn fit<X: AsRef<[f64]>>(
        x: &[X],
        y: &[f64],
        params: &ForestParams,
    ) -> Result<Self, ModelError> {
        let (trees, n_features) =
            grow_forest(x, y, Criterion::SquaredError, params, "regression")?;
        Ok(Self { trees, n_features })
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        debug_assert_eq!(row.len(), self.n_features);
        self.trees.iter().map(|tree| tree.predict(row)).sum::<f64>() / self.trees.len() as f64
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
