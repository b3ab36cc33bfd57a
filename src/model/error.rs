use crate::encoding::label_encoder::UnknownLabelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Training labels contain {distinct} distinct class(es), at least 2 are required")]
    DegenerateLabel { distinct: usize },

    #[error("Cannot train {model} on an empty training set")]
    EmptyTrainingSet { model: &'static str },

    #[error("Training inputs ({inputs}) and targets ({targets}) differ in length")]
    LengthMismatch { inputs: usize, targets: usize },

    #[error("Invalid forest parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    UnknownLabel(#[from] UnknownLabelError),
}
