//! Turns historical records and live observations into model inputs.
//!
//! Two shapes are produced: the fixed 7-wide [`FeatureVector`] the rain classifier
//! is trained and queried with, and single-field [`LagPairs`] for the trend
//! regressors.

use crate::dataset::record::{HistoricalRecord, NumericField};
use crate::encoding::compass::DirectionEncoder;
use crate::encoding::label_encoder::{LabelEncoder, UnknownLabelError};
use crate::types::observation::WeatherObservation;

/// Number of classifier features.
pub const FEATURE_COUNT: usize = 7;

/// Classifier input, always in the order
/// `(MinTemp, MaxTemp, WindGustDir code, WindGustSpeed, Humidity, Pressure, Temp)`.
///
/// The classifier is trained and queried with this exact order, so both
/// constructors below must stay in sync with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Features of one historical row; the wind direction label is encoded with `directions`.
    pub fn from_record(
        record: &HistoricalRecord,
        directions: &DirectionEncoder,
    ) -> Result<Self, UnknownLabelError> {
        let direction_code = directions.encode(&record.wind_gust_dir)?;
        Ok(Self([
            record.min_temp,
            record.max_temp,
            direction_code as f64,
            record.wind_gust_speed,
            record.humidity,
            record.pressure,
            record.temp,
        ]))
    }

    /// Features of a live observation whose heading was already encoded to `direction_code`.
    pub fn from_observation(observation: &WeatherObservation, direction_code: usize) -> Self {
        Self([
            observation.temp_min,
            observation.temp_max,
            direction_code as f64,
            observation.wind_gust_speed,
            observation.humidity as f64,
            observation.pressure,
            observation.current_temp,
        ])
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}

impl AsRef<[f64]> for FeatureVector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// Training set for the rain classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierFeatures {
    pub features: Vec<FeatureVector>,
    /// `RainTomorrow` codes, aligned with `features`.
    pub labels: Vec<usize>,
    /// Encoder fitted on the `RainTomorrow` values present in this dataset only.
    pub label_encoder: LabelEncoder,
}

/// Builds the classifier training set from cleaned records.
///
/// # Errors
///
/// Returns [`UnknownLabelError`] if a record's `WindGustDir` is not one of the
/// 16 compass labels.
pub fn build_classifier_features(
    records: &[HistoricalRecord],
    directions: &DirectionEncoder,
) -> Result<ClassifierFeatures, UnknownLabelError> {
    let features = records
        .iter()
        .map(|record| FeatureVector::from_record(record, directions))
        .collect::<Result<Vec<_>, _>>()?;

    let label_encoder = LabelEncoder::fit(records.iter().map(|r| r.rain_tomorrow.as_str()));
    let labels = records
        .iter()
        .map(|record| label_encoder.encode(&record.rain_tomorrow))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ClassifierFeatures {
        features,
        labels,
        label_encoder,
    })
}

/// Next-value training pairs for one scalar field: `y[i]` is the value that
/// followed `x[i]` in the record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LagPairs {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl LagPairs {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Pairs each record's `field` value with the next record's, in record order.
///
/// `n` records yield `n - 1` pairs; fewer than two records yield none.
pub fn build_lag_pairs(records: &[HistoricalRecord], field: NumericField) -> LagPairs {
    let (x, y) = records
        .windows(2)
        .map(|pair| (pair[0].value(field), pair[1].value(field)))
        .unzip();
    LagPairs { x, y }
}
