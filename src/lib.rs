mod config;
mod dataset;
mod encoding;
mod error;
mod features;
mod forecaster;
mod model;
mod types;
mod weather_source;

pub use config::*;
pub use error::ForecastError;
pub use forecaster::*;

pub use dataset::error::DatasetError;
pub use dataset::loader::HistoricalDataset;
pub use dataset::record::{HistoricalRecord, NumericField};

pub use encoding::compass::{heading_to_label, CompassPoint, DirectionEncoder, COMPASS_LABELS};
pub use encoding::label_encoder::{LabelEncoder, UnknownLabelError};

pub use features::*;

pub use model::error::ModelError;
pub use model::forest::{RandomForestClassifier, RandomForestRegressor};
pub use model::params::{ForestParams, MaxFeatures};
pub use model::rain::RainClassifier;
pub use model::trend::{forecast, StepModel, TrendRegressor};

pub use types::observation::WeatherObservation;
pub use types::report::{ForecastReport, ForecastResult};

pub use weather_source::error::WeatherSourceError;
pub use weather_source::openweather::{OpenWeatherClient, DEFAULT_BASE_URL};
pub use weather_source::WeatherSource;
