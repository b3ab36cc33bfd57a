use crate::features::LagPairs;
use crate::model::error::ModelError;
use crate::model::forest::RandomForestRegressor;
use crate::model::params::ForestParams;

/// A model that maps a value at time `t` to its estimate at `t + 1`.
pub trait StepModel {
    fn predict_next(&self, value: f64) -> f64;
}

impl<F> StepModel for F
where
    F: Fn(f64) -> f64,
{
    fn predict_next(&self, value: f64) -> f64 {
        self(value)
    }
}

/// Single-field regressor trained on [`LagPairs`], e.g. temperature or humidity.
///
/// It is fitted on every pair with no holdout: it only serves short-horizon
/// extrapolation through [`forecast`].
#[derive(Debug, Clone)]
pub struct TrendRegressor {
    forest: RandomForestRegressor,
}

impl TrendRegressor {
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyTrainingSet`] when `pairs` is empty, i.e. the
    /// dataset had fewer than two records.
    pub fn train(pairs: &LagPairs, params: &ForestParams) -> Result<Self, ModelError> {
        if pairs.is_empty() {
            return Err(ModelError::EmptyTrainingSet {
                model: "trend regressor",
            });
        }
        let inputs: Vec<[f64; 1]> = pairs.x.iter().map(|&value| [value]).collect();
        let forest = RandomForestRegressor::fit(&inputs, &pairs.y, params)?;
        Ok(Self { forest })
    }

    pub fn predict(&self, value: f64) -> f64 {
        self.forest.predict(&[value])
    }
}

impl StepModel for TrendRegressor {
    fn predict_next(&self, value: f64) -> f64 {
        self.predict(value)
    }
}

/// Projects `model` `steps` times, feeding every prediction back in as the next input.
///
/// The output has exactly `steps` values and does not include `seed`. Errors
/// compound over the horizon; nothing corrects for drift.
///
/// # Examples
///
/// ```
/// use meteocast::forecast;
///
/// let warming = |t: f64| t + 0.5;
/// assert_eq!(forecast(&warming, 20.0, 3), vec![20.5, 21.0, 21.5]);
/// ```
pub fn forecast<M: StepModel + ?Sized>(model: &M, seed: f64, steps: usize) -> Vec<f64> {
    let mut predictions = Vec::with_capacity(steps);
    let mut current = seed;
    for _ in 0..steps {
        current = model.predict_next(current);
        predictions.push(current);
    }
    predictions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> LagPairs {
        let series: Vec<f64> = (0..60)
            .map(|i| 25.0 + 5.0 * (i as f64 / 4.0).sin())
            .collect();
        LagPairs {
            x: series[..series.len() - 1].to_vec(),
            y: series[1..].to_vec(),
        }
    }

    #[test]
    fn forecast_has_exactly_the_requested_length() {
        let model = |v: f64| v * 2.0;
        assert_eq!(forecast(&model, 1.0, 5), vec![2.0, 4.0, 8.0, 16.0, 32.0]);
        assert!(forecast(&model, 1.0, 0).is_empty());
    }

    #[test]
    fn forecast_excludes_the_seed() {
        let model = |v: f64| v;
        assert_eq!(forecast(&model, 7.0, 2), vec![7.0, 7.0]);
    }

    #[test]
    fn trained_forecast_is_deterministic() -> Result<(), ModelError> {
        let model = TrendRegressor::train(&pairs(), &ForestParams::regressor().with_trees(20))?;
        let first = forecast(&model, 20.0, 5);
        let second = forecast(&model, 20.0, 5);
        assert_eq!(first.len(), 5);
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn forecast_stays_within_the_trained_range() -> Result<(), ModelError> {
        let model = TrendRegressor::train(&pairs(), &ForestParams::regressor().with_trees(20))?;
        for value in forecast(&model, 22.0, 5) {
            assert!((20.0..=30.0).contains(&value), "{value} out of range");
        }
        Ok(())
    }

    #[test]
    fn empty_pairs_cannot_be_trained() {
        let result = TrendRegressor::train(&LagPairs::default(), &ForestParams::regressor());
        assert!(matches!(
            result,
            Err(ModelError::EmptyTrainingSet { .. })
        ));
    }
}
