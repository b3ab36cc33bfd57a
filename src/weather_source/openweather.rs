//! Client for the OpenWeatherMap "current weather" endpoint.

use crate::types::observation::WeatherObservation;
use crate::weather_source::error::WeatherSourceError;
use crate::weather_source::WeatherSource;
use log::{info, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

/// Public OpenWeatherMap API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const FALLBACK_MESSAGE: &str = "Error fetching weather data";

#[derive(Debug, Deserialize)]
struct OwmResponse {
    name: Option<String>,
    main: Option<OwmMain>,
    #[serde(default)]
    weather: Vec<OwmWeather>,
    wind: Option<OwmWind>,
    sys: Option<OwmSys>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    pressure: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: Option<f64>,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    country: Option<String>,
}

fn field<T>(value: Option<T>, name: &'static str) -> Result<T, WeatherSourceError> {
    value.ok_or(WeatherSourceError::MissingField(name))
}

impl OwmResponse {
    fn into_observation(self) -> Result<WeatherObservation, WeatherSourceError> {
        let Some(main) = self.main else {
            return Err(WeatherSourceError::Upstream {
                status: StatusCode::OK.as_u16(),
                message: self.message.unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
            });
        };
        let wind = field(self.wind, "wind")?;
        let description = self
            .weather
            .into_iter()
            .next()
            .map(|weather| weather.description);

        // Temperatures and humidity are reported rounded to whole numbers
        Ok(WeatherObservation {
            city: field(self.name, "name")?,
            country: field(self.sys.and_then(|sys| sys.country), "sys.country")?,
            current_temp: field(main.temp, "main.temp")?.round(),
            feels_like: field(main.feels_like, "main.feels_like")?.round(),
            temp_min: field(main.temp_min, "main.temp_min")?.round(),
            temp_max: field(main.temp_max, "main.temp_max")?.round(),
            humidity: field(main.humidity, "main.humidity")?.round() as i64,
            pressure: field(main.pressure, "main.pressure")?,
            description: field(description, "weather[0].description")?,
            wind_gust_dir: field(wind.deg, "wind.deg")?,
            wind_gust_speed: field(wind.speed, "wind.speed")?,
        })
    }
}

/// [`WeatherSource`] backed by the OpenWeatherMap REST API (metric units).
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    /// Creates a client for the API rooted at `base_url`, e.g. [`DEFAULT_BASE_URL`].
    ///
    /// # Errors
    ///
    /// Returns [`WeatherSourceError::ClientBuild`] if the HTTP client cannot be initialized.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, WeatherSourceError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(WeatherSourceError::ClientBuild)?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        })
    }

    /// Fetches current conditions for `city`.
    ///
    /// # Errors
    ///
    /// * [`WeatherSourceError::CityNotFound`] when the API answers 404.
    /// * [`WeatherSourceError::Upstream`] for any other non-success status, or a
    ///   success body without a `main` section. The API's `message` is kept.
    /// * [`WeatherSourceError::MissingField`] when another required field is absent.
    /// * [`WeatherSourceError::NetworkRequest`] / [`WeatherSourceError::Decode`] for
    ///   transport and JSON failures.
    pub async fn fetch_observation(
        &self,
        city: &str,
    ) -> Result<WeatherObservation, WeatherSourceError> {
        // The API key travels as a query parameter, so `url` itself is safe to log
        let url = format!("{}/weather", self.base_url.trim_end_matches('/'));
        info!("Fetching current weather for '{}' from {}", city, url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| WeatherSourceError::NetworkRequest(url.clone(), e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WeatherSourceError::NetworkRequest(url.clone(), e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<OwmResponse>(&body)
                .ok()
                .and_then(|parsed| parsed.message)
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
            warn!(
                "Weather request for '{}' failed with status {}: {}",
                city, status, message
            );
            return Err(if status == StatusCode::NOT_FOUND {
                WeatherSourceError::CityNotFound {
                    city: city.to_string(),
                    message,
                }
            } else {
                WeatherSourceError::Upstream {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        let parsed: OwmResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherSourceError::Decode { url, source: e })?;
        parsed.into_observation()
    }
}

impl WeatherSource for OpenWeatherClient {
    fn fetch(
        &self,
        city: &str,
    ) -> impl Future<Output = Result<WeatherObservation, WeatherSourceError>> + Send {
        self.fetch_observation(city)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn london() -> serde_json::Value {
        serde_json::json!({
            "name": "London",
            "main": {
                "temp": 14.62,
                "feels_like": 13.9,
                "temp_min": 13.4,
                "temp_max": 15.51,
                "pressure": 1012,
                "humidity": 71.6
            },
            "weather": [{"main": "Clouds", "description": "broken clouds"}],
            "wind": {"speed": 4.63, "deg": 240},
            "sys": {"country": "GB"}
        })
    }

    #[tokio::test]
    async fn test_fetch_parses_and_rounds() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "London"))
            .and(query_param("appid", "test_key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london()))
            .mount(&mock_server)
            .await;

        let client = OpenWeatherClient::new("test_key", mock_server.uri()).unwrap();
        let observation = client.fetch("London").await.unwrap();

        assert_eq!(observation.city, "London");
        assert_eq!(observation.country, "GB");
        assert_eq!(observation.current_temp, 15.0);
        assert_eq!(observation.feels_like, 14.0);
        assert_eq!(observation.temp_min, 13.0);
        assert_eq!(observation.temp_max, 16.0);
        assert_eq!(observation.humidity, 72);
        assert_eq!(observation.pressure, 1012.0);
        assert_eq!(observation.description, "broken clouds");
        assert_eq!(observation.wind_gust_dir, 240.0);
        assert_eq!(observation.wind_gust_speed, 4.63);
    }

    #[tokio::test]
    async fn test_unknown_city_keeps_upstream_message() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "cod": "404",
                "message": "city not found"
            })))
            .mount(&mock_server)
            .await;

        let client = OpenWeatherClient::new("test_key", format!("{}/", mock_server.uri())).unwrap();
        let err = client.fetch("Atlantis").await.unwrap_err();

        assert!(matches!(
            err,
            WeatherSourceError::CityNotFound { ref city, .. } if city == "Atlantis"
        ));
        assert_eq!(err.to_string(), "city not found");
    }

    #[tokio::test]
    async fn test_other_failures_are_upstream_errors() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "cod": 401,
                "message": "Invalid API key."
            })))
            .mount(&mock_server)
            .await;

        let client = OpenWeatherClient::new("bad_key", mock_server.uri()).unwrap();
        match client.fetch("London").await {
            Err(WeatherSourceError::Upstream { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API key.");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body_uses_fallback_message() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&mock_server)
            .await;

        let client = OpenWeatherClient::new("test_key", mock_server.uri()).unwrap();
        let err = client.fetch("London").await.unwrap_err();
        assert_eq!(err.to_string(), FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_body_without_main_is_upstream_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "London"
            })))
            .mount(&mock_server)
            .await;

        let client = OpenWeatherClient::new("test_key", mock_server.uri()).unwrap();
        let err = client.fetch("London").await.unwrap_err();
        assert!(matches!(err, WeatherSourceError::Upstream { status: 200, .. }));
    }

    #[tokio::test]
    async fn test_missing_wind_direction_is_reported() {
        let mut body = london();
        body["wind"] = serde_json::json!({"speed": 3.1});

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;

        let client = OpenWeatherClient::new("test_key", mock_server.uri()).unwrap();
        let err = client.fetch("London").await.unwrap_err();
        assert!(matches!(err, WeatherSourceError::MissingField("wind.deg")));
    }
}
