//! Configuration injected into [`crate::Forecaster`].

use crate::error::ForecastError;
use crate::model::params::ForestParams;
use crate::weather_source::openweather::DEFAULT_BASE_URL;
use bon::bon;
use chrono_tz::Tz;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable holding the OpenWeatherMap API key.
pub const ENV_API_KEY: &str = "OPENWEATHER_API_KEY";
/// Environment variable overriding the historical dataset location.
pub const ENV_DATASET: &str = "METEOCAST_DATASET";
/// Environment variable overriding the OpenWeatherMap API root.
pub const ENV_BASE_URL: &str = "OPENWEATHER_BASE_URL";

/// Dataset location used by [`ForecastConfig::from_env`] when [`ENV_DATASET`] is unset.
pub const DEFAULT_DATASET_PATH: &str = "data/weather.csv";
/// Number of hourly values forecast per call.
pub const DEFAULT_STEPS: usize = 5;

/// Model and horizon settings for one orchestration call.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSettings {
    /// Hours to forecast.
    pub steps: usize,
    /// Zone the `HH:00` labels of the forecast hours are rendered in.
    pub timezone: Tz,
    pub classifier: ForestParams,
    pub regressor: ForestParams,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            timezone: chrono_tz::Asia::Kolkata,
            classifier: ForestParams::classifier(),
            regressor: ForestParams::regressor(),
        }
    }
}

/// Everything a [`crate::Forecaster`] needs: credentials, the dataset and model settings.
///
/// # Examples
///
/// ```
/// use meteocast::{ForecastConfig, ForecastSettings};
///
/// let config = ForecastConfig::builder()
///     .weather_api_key("my-api-key")
///     .dataset_path("data/weather.csv")
///     .settings(ForecastSettings {
///         steps: 3,
///         ..ForecastSettings::default()
///     })
///     .build();
///
/// assert_eq!(config.settings().steps, 3);
/// assert_eq!(config.base_url(), "https://api.openweathermap.org/data/2.5/");
/// ```
#[derive(Clone)]
pub struct ForecastConfig {
    weather_api_key: String,
    dataset_path: PathBuf,
    base_url: String,
    settings: ForecastSettings,
}

#[bon]
impl ForecastConfig {
    /// Creates a configuration using a builder.
    ///
    /// # Arguments
    ///
    /// * `.weather_api_key(impl Into<String>)`: **Required.** OpenWeatherMap API key.
    /// * `.dataset_path(impl Into<PathBuf>)`: **Required.** CSV file with the historical records.
    /// * `.base_url(impl Into<String>)`: Optional. API root, defaults to the public endpoint.
    /// * `.settings(ForecastSettings)`: Optional. Defaults to [`ForecastSettings::default`].
    #[builder]
    pub fn new(
        #[builder(into)] weather_api_key: String,
        #[builder(into)] dataset_path: PathBuf,
        #[builder(into)] base_url: Option<String>,
        settings: Option<ForecastSettings>,
    ) -> Self {
        Self {
            weather_api_key,
            dataset_path,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            settings: settings.unwrap_or_default(),
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// [`ENV_API_KEY`] is required; [`ENV_DATASET`] and [`ENV_BASE_URL`] fall back to
    /// [`DEFAULT_DATASET_PATH`] and the public API root.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Configuration`] if the API key is missing or blank.
    pub fn from_env() -> Result<Self, ForecastError> {
        let weather_api_key = env::var(ENV_API_KEY)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ForecastError::Configuration(format!("{ENV_API_KEY} is not set")))?;
        let dataset_path =
            env::var(ENV_DATASET).unwrap_or_else(|_| DEFAULT_DATASET_PATH.to_string());

        Ok(Self::builder()
            .weather_api_key(weather_api_key)
            .dataset_path(dataset_path)
            .maybe_base_url(env::var(ENV_BASE_URL).ok())
            .build())
    }

    pub fn weather_api_key(&self) -> &str {
        &self.weather_api_key
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }
}

impl fmt::Debug for ForecastConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForecastConfig")
            .field("weather_api_key", &"<redacted>")
            .field("dataset_path", &self.dataset_path)
            .field("base_url", &self.base_url)
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_defaults() {
        let config = ForecastConfig::builder()
            .weather_api_key("key")
            .dataset_path("weather.csv")
            .build();

        assert_eq!(config.weather_api_key(), "key");
        assert_eq!(config.dataset_path(), Path::new("weather.csv"));
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.settings(), &ForecastSettings::default());
    }

    #[test]
    fn default_settings() {
        let settings = ForecastSettings::default();
        assert_eq!(settings.steps, 5);
        assert_eq!(settings.timezone, chrono_tz::Asia::Kolkata);
        assert_eq!(settings.classifier.n_trees, 100);
        assert_eq!(settings.regressor.seed, 42);
    }

    #[test]
    fn debug_output_hides_the_api_key() {
        let config = ForecastConfig::builder()
            .weather_api_key("super-secret")
            .dataset_path("weather.csv")
            .base_url("http://localhost:1234/")
            .build();

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("localhost:1234"));
    }
}
