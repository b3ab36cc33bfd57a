//! Orchestrates one forecast: observation in, report out.
//!
//! Every call reloads the dataset and retrains all three models from scratch; nothing
//! trained outlives the call.

use crate::config::{ForecastConfig, ForecastSettings};
use crate::dataset::loader::HistoricalDataset;
use crate::dataset::record::NumericField;
use crate::encoding::compass::DirectionEncoder;
use crate::error::ForecastError;
use crate::features::{build_classifier_features, build_lag_pairs, FeatureVector};
use crate::model::rain::RainClassifier;
use crate::model::trend::{forecast, TrendRegressor};
use crate::types::observation::WeatherObservation;
use crate::types::report::{ForecastReport, ForecastResult};
use crate::weather_source::openweather::OpenWeatherClient;
use crate::weather_source::WeatherSource;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use log::{info, warn};
use std::path::Path;

/// Message of the [`ForecastError::Validation`] raised for a blank city.
pub const CITY_REQUIRED: &str = "City is required";

/// Returns the trimmed city name.
///
/// # Errors
///
/// Returns [`ForecastError::Validation`] with [`CITY_REQUIRED`] if nothing but
/// whitespace is left.
pub fn validate_city(city: &str) -> Result<&str, ForecastError> {
    let city = city.trim();
    if city.is_empty() {
        return Err(ForecastError::Validation(CITY_REQUIRED.to_string()));
    }
    Ok(city)
}

/// `HH:00` labels for the `steps` hours following `now`, starting at the next top of the hour.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use meteocast::future_times;
///
/// let now = Utc.with_ymd_and_hms(2024, 3, 1, 22, 15, 0).unwrap();
/// assert_eq!(future_times(now, 3), vec!["23:00", "00:00", "01:00"]);
/// ```
pub fn future_times<Tz: TimeZone>(now: DateTime<Tz>, steps: usize) -> Vec<String>
where
    Tz::Offset: std::fmt::Display,
{
    (1..=steps as i64)
        .map(|hours| (now.clone() + TimeDelta::hours(hours)).format("%H:00").to_string())
        .collect()
}

/// Runs the full pipeline for `observation` against the dataset at `dataset_path`.
///
/// Steps, in order: load and clean the dataset, train the rain classifier, classify
/// the live observation, train one trend regressor each for `Temp` and `Humidity`,
/// forecast `settings.steps` values of both and label the forecast hours in
/// `settings.timezone`.
///
/// The temperature forecast is seeded from `observation.temp_min`, the humidity
/// forecast from `observation.humidity`.
///
/// # Errors
///
/// * [`ForecastError::Dataset`] if the file is missing or does not match the schema.
/// * [`ForecastError::Model`] if a model cannot be trained, e.g. a single
///   `RainTomorrow` value, fewer than two records, an unknown compass label in the
///   data or a non-finite wind heading in `observation`.
pub fn run(
    observation: &WeatherObservation,
    dataset_path: &Path,
    settings: &ForecastSettings,
    now: DateTime<Utc>,
) -> Result<ForecastReport, ForecastError> {
    let dataset = HistoricalDataset::load(dataset_path)?;
    let records = dataset.records();

    let directions = DirectionEncoder::new();
    let training = build_classifier_features(records, &directions)?;
    let rain_model = RainClassifier::train(&training, &settings.classifier)?;

    let direction_code = directions.encode_heading(observation.wind_gust_dir)?;
    let live = FeatureVector::from_observation(observation, direction_code);
    let rain_prediction = rain_model.predict_rain(&live);

    let temp_model = TrendRegressor::train(
        &build_lag_pairs(records, NumericField::Temp),
        &settings.regressor,
    )?;
    let humidity_model = TrendRegressor::train(
        &build_lag_pairs(records, NumericField::Humidity),
        &settings.regressor,
    )?;

    let future_temp = forecast(&temp_model, observation.temp_min, settings.steps);
    let future_humidity = forecast(&humidity_model, observation.humidity as f64, settings.steps);
    let future_times = future_times(now.with_timezone(&settings.timezone), settings.steps);

    info!(
        "Forecast for {}: rain={}, {} hourly steps from {} records",
        observation.city,
        rain_prediction,
        settings.steps,
        records.len()
    );

    Ok(ForecastReport::new(
        observation,
        ForecastResult {
            rain_prediction,
            future_temp,
            future_humidity,
            future_times,
        },
    ))
}

/// Entry point tying a [`WeatherSource`] to the historical dataset.
///
/// Holds only immutable configuration and the source, so one instance can be
/// shared between concurrent requests (e.g. behind an `Arc`).
#[derive(Debug)]
pub struct Forecaster<S = OpenWeatherClient> {
    config: ForecastConfig,
    source: S,
}

impl Forecaster<OpenWeatherClient> {
    /// Creates a forecaster backed by OpenWeatherMap.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::WeatherSource`] if the HTTP client cannot be built.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use meteocast::{ForecastConfig, ForecastError, Forecaster};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), ForecastError> {
    /// let config = ForecastConfig::builder()
    ///     .weather_api_key("my-api-key")
    ///     .dataset_path("data/weather.csv")
    ///     .build();
    /// let forecaster = Forecaster::new(config)?;
    ///
    /// let report = forecaster.forecast_city("Mumbai").await?;
    /// println!("{}: rain tomorrow = {}", report.city, report.forecast.rain_prediction);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: ForecastConfig) -> Result<Self, ForecastError> {
        let source = OpenWeatherClient::new(config.weather_api_key(), config.base_url())?;
        Ok(Self { config, source })
    }
}

impl<S: WeatherSource> Forecaster<S> {
    /// Creates a forecaster with a custom weather source.
    pub fn with_source(config: ForecastConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Runs the pipeline synchronously for an observation obtained elsewhere.
    ///
    /// See [`run`] for the steps and errors.
    pub fn run(&self, observation: &WeatherObservation) -> Result<ForecastReport, ForecastError> {
        run(
            observation,
            self.config.dataset_path(),
            self.config.settings(),
            Utc::now(),
        )
    }

    /// Fetches the current weather for `city` and forecasts from it.
    ///
    /// The city is validated before anything else happens. Training runs on
    /// tokio's blocking pool.
    ///
    /// # Errors
    ///
    /// * [`ForecastError::Validation`] for a blank city.
    /// * [`ForecastError::WeatherSource`] if the observation cannot be fetched.
    /// * [`ForecastError::TaskJoin`] if the blocking task panics.
    /// * Any error of [`run`].
    pub async fn forecast_city(&self, city: &str) -> Result<ForecastReport, ForecastError> {
        let city = validate_city(city)?;
        let observation = self.source.fetch(city).await.inspect_err(|e| {
            warn!("Could not fetch current weather for '{}': {}", city, e);
        })?;

        let dataset_path = self.config.dataset_path().to_path_buf();
        let settings = self.config.settings().clone();
        let now = Utc::now();
        tokio::task::spawn_blocking(move || run(&observation, &dataset_path, &settings, now))
            .await?
    }
}
