//! tabmodel engine - evaluation of table models against data
//!
//! This crate implements:
//! - Cell value resolution and packed dates
//! - Conditional styles
//! - Column aggregates
//! - Model validation
//! - Table snapshots

pub mod aggregate;
pub mod condition;
pub mod error;
pub mod packet;
pub mod snapshot;
pub mod validate;
pub mod value;

pub use aggregate::{aggregate_text, compute_aggregate};
pub use condition::{remarks, ConditionEngine, ConditionOutcome};
pub use error::EvalError;
pub use packet::format_packed;
pub use snapshot::{SnapshotCell, TableSnapshot};
pub use validate::ModelValidation;
pub use value::{FieldValueInfo, ValueResolver};
