use crate::types::observation::WeatherObservation;
use serde::{Deserialize, Serialize};

/// The model outputs of one orchestration call.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Majority vote of the rain classifier for tomorrow.
    pub rain_prediction: bool,
    /// Recursive temperature forecast, one value per hour.
    pub future_temp: Vec<f64>,
    /// Recursive humidity forecast, one value per hour.
    pub future_humidity: Vec<f64>,
    /// `HH:00` labels of the forecast hours.
    pub future_times: Vec<String>,
}

/// Response payload: the forecast plus the observation fields shown alongside it.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ForecastReport {
    pub city: String,
    pub country: String,
    pub current_temp: f64,
    pub feels_like: f64,
    pub humidity: i64,
    pub description: String,
    pub pressure: f64,
    #[serde(flatten)]
    pub forecast: ForecastResult,
}

impl ForecastReport {
    pub fn new(observation: &WeatherObservation, forecast: ForecastResult) -> Self {
        Self {
            city: observation.city.clone(),
            country: observation.country.clone(),
            current_temp: observation.current_temp,
            feels_like: observation.feels_like,
            humidity: observation.humidity,
            description: observation.description.clone(),
            pressure: observation.pressure,
            forecast,
        }
    }
}
