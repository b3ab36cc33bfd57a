use serde::{Deserialize, Serialize};

/// Current conditions for one city, as reported by a [`crate::WeatherSource`].
///
/// Temperatures are in °C. Humidity is a whole percentage. `wind_gust_dir` is a
/// heading in degrees and is mapped onto the 16-point compass before it is fed
/// to the rain classifier.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub city: String,
    pub country: String,
    pub current_temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: i64,
    pub pressure: f64,
    pub description: String,
    pub wind_gust_dir: f64,
    pub wind_gust_speed: f64,
}
