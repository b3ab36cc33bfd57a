//! Integer encoding of categorical string labels.

use std::collections::BTreeSet;
use thiserror::Error;

/// Returned when a label (or heading) has no code in a fitted encoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown label '{0}'")]
pub struct UnknownLabelError(pub String);

/// Maps a fixed set of string labels to the codes `0..n`.
///
/// Codes are assigned in lexicographic order of the distinct labels seen while
/// fitting, so the same label set always yields the same codes regardless of
/// the order the labels were supplied in. Two encoders fitted on *different*
/// label sets may assign different codes to the same label.
///
/// # Examples
///
/// ```
/// use meteocast::LabelEncoder;
///
/// let encoder = LabelEncoder::fit(["Yes", "No", "Yes"]);
/// assert_eq!(encoder.len(), 2);
/// assert_eq!(encoder.encode("No").unwrap(), 0);
/// assert_eq!(encoder.encode("Yes").unwrap(), 1);
/// assert_eq!(encoder.decode(1), Some("Yes"));
/// assert!(encoder.encode("Maybe").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fits an encoder on every distinct label yielded by `labels`.
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let distinct: BTreeSet<String> = labels
            .into_iter()
            .map(|label| label.as_ref().to_string())
            .collect();
        Self {
            classes: distinct.into_iter().collect(),
        }
    }

    /// Returns the code of `label`.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownLabelError`] if `label` was not part of the fitted set.
    pub fn encode(&self, label: &str) -> Result<usize, UnknownLabelError> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(label))
            .map_err(|_| UnknownLabelError(label.to_string()))
    }

    /// Returns the label for `code`, or `None` if the code is out of range.
    pub fn decode(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    /// The fitted labels, indexed by code.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
