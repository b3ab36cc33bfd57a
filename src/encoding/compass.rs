//! Defines the 16-point `CompassPoint` enum, the degree-to-point lookup table and the
//! `DirectionEncoder` used to turn wind directions into classifier features.

use crate::encoding::label_encoder::{LabelEncoder, UnknownLabelError};
use std::fmt;

/// The 16 compass labels in compass order, starting at north and turning clockwise.
pub const COMPASS_LABELS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// A point of the 16-wind compass rose.
///
/// Historic records store wind direction as one of these labels (the `WindGustDir`
/// column) while live observations report a heading in degrees. Use
/// [`CompassPoint::from_degrees`] to bridge the two.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum CompassPoint {
    /// North, 0°.
    N,
    /// North-northeast, 22.5°.
    NNE,
    /// Northeast, 45°.
    NE,
    /// East-northeast, 67.5°.
    ENE,
    /// East, 90°.
    E,
    /// East-southeast, 112.5°.
    ESE,
    /// Southeast, 135°.
    SE,
    /// South-southeast, 157.5°.
    SSE,
    /// South, 180°.
    S,
    /// South-southwest, 202.5°.
    SSW,
    /// Southwest, 225°.
    SW,
    /// West-southwest, 247.5°.
    WSW,
    /// West, 270°.
    W,
    /// West-northwest, 292.5°.
    WNW,
    /// Northwest, 315°.
    NW,
    /// North-northwest, 337.5°.
    NNW,
}

/// Half-open `[start, end)` degree sectors, searched first-match in this order.
/// North owns both slivers around 0°.
const HEADING_TABLE: [(CompassPoint, f64, f64); 17] = [
    (CompassPoint::N, 0.0, 11.25),
    (CompassPoint::NNE, 11.25, 33.75),
    (CompassPoint::NE, 33.75, 56.25),
    (CompassPoint::ENE, 56.25, 78.75),
    (CompassPoint::E, 78.75, 101.25),
    (CompassPoint::ESE, 101.25, 123.75),
    (CompassPoint::SE, 123.75, 146.25),
    (CompassPoint::SSE, 146.25, 168.75),
    (CompassPoint::S, 168.75, 191.25),
    (CompassPoint::SSW, 191.25, 213.75),
    (CompassPoint::SW, 213.75, 236.25),
    (CompassPoint::WSW, 236.25, 258.75),
    (CompassPoint::W, 258.75, 281.25),
    (CompassPoint::WNW, 281.25, 303.75),
    (CompassPoint::NW, 303.75, 326.25),
    (CompassPoint::NNW, 326.25, 348.75),
    (CompassPoint::N, 348.75, 360.0),
];

impl CompassPoint {
    /// All points in compass order.
    pub const ALL: [CompassPoint; 16] = [
        CompassPoint::N,
        CompassPoint::NNE,
        CompassPoint::NE,
        CompassPoint::ENE,
        CompassPoint::E,
        CompassPoint::ESE,
        CompassPoint::SE,
        CompassPoint::SSE,
        CompassPoint::S,
        CompassPoint::SSW,
        CompassPoint::SW,
        CompassPoint::WSW,
        CompassPoint::W,
        CompassPoint::WNW,
        CompassPoint::NW,
        CompassPoint::NNW,
    ];

    /// The label used for this point in historic records, e.g. `"NNE"`.
    pub fn label(&self) -> &'static str {
        COMPASS_LABELS[*self as usize]
    }

    /// Parses a compass label. Labels are case-sensitive, as in the CSV data.
    pub fn from_label(label: &str) -> Option<CompassPoint> {
        COMPASS_LABELS
            .iter()
            .position(|candidate| *candidate == label)
            .map(|idx| CompassPoint::ALL[idx])
    }

    /// Resolves a heading in degrees to the compass point whose sector contains it.
    ///
    /// The heading is first normalized into `[0, 360)`, so negative headings and
    /// headings past a full turn are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownLabelError`] for a non-finite heading, which no sector contains.
    ///
    /// # Examples
    ///
    /// ```
    /// use meteocast::CompassPoint;
    ///
    /// assert_eq!(CompassPoint::from_degrees(100.0).unwrap(), CompassPoint::E);
    /// assert_eq!(CompassPoint::from_degrees(-10.0).unwrap(), CompassPoint::N);
    /// assert!(CompassPoint::from_degrees(f64::NAN).is_err());
    /// ```
    pub fn from_degrees(degrees: f64) -> Result<CompassPoint, UnknownLabelError> {
        let heading = degrees.rem_euclid(360.0);
        // rem_euclid can round tiny negative headings up to exactly 360.0
        let heading = if heading >= 360.0 { 0.0 } else { heading };
        HEADING_TABLE
            .iter()
            .find(|(_, start, end)| *start <= heading && heading < *end)
            .map(|(point, _, _)| *point)
            .ok_or_else(|| UnknownLabelError(format!("{degrees}°")))
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Maps a heading in degrees to its compass label, e.g. `90.0 -> "E"`.
///
/// See [`CompassPoint::from_degrees`] for the normalization rules.
pub fn heading_to_label(degrees: f64) -> Result<&'static str, UnknownLabelError> {
    CompassPoint::from_degrees(degrees).map(|point| point.label())
}

/// Label encoder fitted on the full 16-point compass.
///
/// Codes follow lexicographic label order (`E` = 0, `ENE` = 1, ... `WSW` = 15),
/// not compass order. The same encoder instance must be used for the training
/// rows and for the live observation so both sides agree on the codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionEncoder {
    encoder: LabelEncoder,
}

impl DirectionEncoder {
    pub fn new() -> Self {
        Self {
            encoder: LabelEncoder::fit(COMPASS_LABELS),
        }
    }

    pub fn encode(&self, label: &str) -> Result<usize, UnknownLabelError> {
        self.encoder.encode(label)
    }

    pub fn decode(&self, code: usize) -> Option<&str> {
        self.encoder.decode(code)
    }

    /// Heading in degrees straight to its direction code.
    pub fn encode_heading(&self, degrees: f64) -> Result<usize, UnknownLabelError> {
        self.encode(heading_to_label(degrees)?)
    }
}

impl Default for DirectionEncoder {
    fn default() -> Self {
        Self::new()
    }
}
