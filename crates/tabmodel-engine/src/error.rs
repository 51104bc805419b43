//! Evaluation errors

use tabmodel_core::{KnownAggregateType, ModelError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("No field at index {0}")]
    NoCurrentField(usize),

    #[error("No filtered row at index {0}")]
    NoCurrentRow(usize),

    #[error("{aggregate:?} aggregate of field '{field}' overflowed")]
    AggregateOverflow {
        field: String,
        aggregate: KnownAggregateType,
    },
}
