use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherSourceError {
    // Upstream messages are surfaced verbatim, e.g. "city not found"
    #[error("{message}")]
    CityNotFound { city: String, message: String },

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("Failed to decode weather response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Weather response is missing field '{0}'")]
    MissingField(&'static str),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}
