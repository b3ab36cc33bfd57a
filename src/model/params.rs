//! Hyperparameters shared by the classification and regression forests.

/// How many features a tree considers when searching for a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxFeatures {
    /// Every feature, at every split.
    All,
    /// A random subset of `floor(sqrt(n_features))` features per split, at least one.
    Sqrt,
}

impl MaxFeatures {
    pub(crate) fn resolve(&self, n_features: usize) -> usize {
        match self {
            MaxFeatures::All => n_features,
            MaxFeatures::Sqrt => {
                ((n_features as f64).sqrt().floor() as usize).clamp(1, n_features.max(1))
            }
        }
    }
}

/// Settings for growing a bagged decision-tree forest.
///
/// The same `seed` always grows the same forest from the same data.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestParams {
    /// Number of trees in the ensemble.
    pub n_trees: usize,
    /// Depth limit per tree, `None` grows until leaves are pure.
    pub max_depth: Option<usize>,
    /// Nodes with fewer samples than this become leaves.
    pub min_samples_split: usize,
    pub max_features: MaxFeatures,
    pub seed: u64,
}

impl ForestParams {
    pub const DEFAULT_TREES: usize = 100;
    pub const DEFAULT_SEED: u64 = 42;

    /// Defaults for the rain classifier: 100 trees, √features per split.
    pub fn classifier() -> Self {
        Self {
            n_trees: Self::DEFAULT_TREES,
            max_depth: None,
            min_samples_split: 2,
            max_features: MaxFeatures::Sqrt,
            seed: Self::DEFAULT_SEED,
        }
    }

    /// Defaults for the trend regressors: 100 trees, every feature per split.
    pub fn regressor() -> Self {
        Self {
            max_features: MaxFeatures::All,
            ..Self::classifier()
        }
    }

    pub fn with_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }
}
