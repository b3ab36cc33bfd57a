//! Where live observations come from.

pub mod error;
pub mod openweather;

use crate::types::observation::WeatherObservation;
use crate::weather_source::error::WeatherSourceError;
use std::future::Future;

/// Fetches the current conditions for a city.
///
/// [`crate::OpenWeatherClient`] is the production implementation; tests and
/// embedders can supply their own.
pub trait WeatherSource: Send + Sync {
    /// # Errors
    ///
    /// Returns [`WeatherSourceError::CityNotFound`] for an unknown city and
    /// another [`WeatherSourceError`] variant for any other upstream failure.
    fn fetch(
        &self,
        city: &str,
    ) -> impl Future<Output = Result<WeatherObservation, WeatherSourceError>> + Send;
}
