use crate::encoding::label_encoder::LabelEncoder;
use crate::features::{ClassifierFeatures, FeatureVector};
use crate::model::error::ModelError;
use crate::model::forest::RandomForestClassifier;
use crate::model::params::ForestParams;
use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeSet;

/// Share of rows held out to report the classifier's error.
const TEST_FRACTION: f64 = 0.2;

/// "Will it rain tomorrow" classifier.
///
/// Trained on 80% of the historical rows; the remaining 20% only feed a
/// diagnostic error figure that is logged, never returned.
#[derive(Debug, Clone)]
pub struct RainClassifier {
    forest: RandomForestClassifier,
    labels: LabelEncoder,
}

impl RainClassifier {
    /// Trains the classifier on `training`, using `params.seed` for the holdout
    /// shuffle as well as for the forest.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DegenerateLabel`] if fewer than two distinct
    /// `RainTomorrow` values are present, plus any error of
    /// [`RandomForestClassifier::fit`].
    pub fn train(training: &ClassifierFeatures, params: &ForestParams) -> Result<Self, ModelError> {
        let distinct = training.labels.iter().collect::<BTreeSet<_>>().len();
        if distinct < 2 {
            return Err(ModelError::DegenerateLabel { distinct });
        }
        if training.features.len() != training.labels.len() {
            return Err(ModelError::LengthMismatch {
                inputs: training.features.len(),
                targets: training.labels.len(),
            });
        }

        let (train_rows, test_rows) =
            holdout_split(training.features.len(), TEST_FRACTION, params.seed);
        let x_train: Vec<FeatureVector> =
            train_rows.iter().map(|&i| training.features[i]).collect();
        let y_train: Vec<usize> = train_rows.iter().map(|&i| training.labels[i]).collect();

        let forest = RandomForestClassifier::fit(&x_train, &y_train, params)?;

        let squared_error: f64 = test_rows
            .iter()
            .map(|&i| {
                let predicted = forest.predict(training.features[i].as_ref()) as f64;
                (predicted - training.labels[i] as f64).powi(2)
            })
            .sum();
        info!(
            "Rain model error: {:.4} (MSE over {} held-out of {} rows)",
            squared_error / test_rows.len().max(1) as f64,
            test_rows.len(),
            training.features.len()
        );

        Ok(Self {
            forest,
            labels: training.label_encoder.clone(),
        })
    }

    /// Majority-vote class code for `features`.
    pub fn predict(&self, features: &FeatureVector) -> usize {
        self.forest.predict(features.as_ref())
    }

    /// `true` unless the vote lands on code 0.
    ///
    /// Codes come from sorting the dataset's `RainTomorrow` values, so with the
    /// usual `No`/`Yes` labels this means "Yes".
    pub fn predict_rain(&self, features: &FeatureVector) -> bool {
        self.predict(features) != 0
    }

    /// The `RainTomorrow` label the vote lands on.
    pub fn predict_label(&self, features: &FeatureVector) -> Option<&str> {
        self.labels.decode(self.predict(features))
    }
}

/// Shuffles `0..n` with `seed` and returns `(train, test)` index sets, the test
/// set holding `ceil(n * test_fraction)` rows. The train set keeps at least one row.
pub(crate) fn holdout_split(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));
    let n_test = ((n as f64 * test_fraction).ceil() as usize).min(n.saturating_sub(1));
    let train = indices.split_off(n_test);
    (train, indices)
}
