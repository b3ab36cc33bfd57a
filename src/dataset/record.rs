use std::fmt;

pub(crate) const COL_MIN_TEMP: &str = "MinTemp";
pub(crate) const COL_MAX_TEMP: &str = "MaxTemp";
pub(crate) const COL_WIND_GUST_DIR: &str = "WindGustDir"; // Compass label, e.g. "NNE"
pub(crate) const COL_WIND_GUST_SPEED: &str = "WindGustSpeed";
pub(crate) const COL_HUMIDITY: &str = "Humidity";
pub(crate) const COL_PRESSURE: &str = "Pressure";
pub(crate) const COL_TEMP: &str = "Temp";
pub(crate) const COL_RAIN_TOMORROW: &str = "RainTomorrow"; // Categorical, usually "Yes"/"No"

/// Column set a historical CSV file must have, in canonical order.
pub(crate) const SCHEMA_COLUMNS: [&str; 8] = [
    COL_MIN_TEMP,
    COL_MAX_TEMP,
    COL_WIND_GUST_DIR,
    COL_WIND_GUST_SPEED,
    COL_HUMIDITY,
    COL_PRESSURE,
    COL_TEMP,
    COL_RAIN_TOMORROW,
];

/// One cleaned row of the historical weather record.
#[derive(Debug, PartialEq, Clone)]
pub struct HistoricalRecord {
    pub min_temp: f64,          // MinTemp
    pub max_temp: f64,          // MaxTemp
    pub wind_gust_dir: String,  // WindGustDir
    pub wind_gust_speed: f64,   // WindGustSpeed
    pub humidity: f64,          // Humidity
    pub pressure: f64,          // Pressure
    pub temp: f64,              // Temp
    pub rain_tomorrow: String,  // RainTomorrow
}

/// The numeric columns of a [`HistoricalRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    MinTemp,
    MaxTemp,
    WindGustSpeed,
    Humidity,
    Pressure,
    Temp,
}

impl NumericField {
    pub const ALL: [NumericField; 6] = [
        NumericField::MinTemp,
        NumericField::MaxTemp,
        NumericField::WindGustSpeed,
        NumericField::Humidity,
        NumericField::Pressure,
        NumericField::Temp,
    ];

    /// Name of the CSV column holding this field.
    pub fn column_name(&self) -> &'static str {
        match self {
            NumericField::MinTemp => COL_MIN_TEMP,
            NumericField::MaxTemp => COL_MAX_TEMP,
            NumericField::WindGustSpeed => COL_WIND_GUST_SPEED,
            NumericField::Humidity => COL_HUMIDITY,
            NumericField::Pressure => COL_PRESSURE,
            NumericField::Temp => COL_TEMP,
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

impl HistoricalRecord {
    pub fn value(&self, field: NumericField) -> f64 {
        match field {
            NumericField::MinTemp => self.min_temp,
            NumericField::MaxTemp => self.max_temp,
            NumericField::WindGustSpeed => self.wind_gust_speed,
            NumericField::Humidity => self.humidity,
            NumericField::Pressure => self.pressure,
            NumericField::Temp => self.temp,
        }
    }
}
