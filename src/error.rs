use crate::dataset::error::DatasetError;
use crate::encoding::label_encoder::UnknownLabelError;
use crate::model::error::ModelError;
use crate::weather_source::error::WeatherSourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    WeatherSource(#[from] WeatherSourceError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Background forecasting task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl From<UnknownLabelError> for ForecastError {
    fn from(err: UnknownLabelError) -> Self {
        ForecastError::Model(ModelError::from(err))
    }
}

impl ForecastError {
    /// `true` for errors caused by the caller's input rather than a downstream failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, ForecastError::Validation(_))
    }
}
