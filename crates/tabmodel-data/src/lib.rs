//! Data inputs and the evaluation context
//!
//! Inputs read JSON, XML or in-memory records into [`tabmodel_core::Row`]s.
//! [`InputDataModel`] pairs an input with a table and produces the
//! [`ModelContext`] the engine evaluates against.
//!
//! ```rust,ignore
//! use tabmodel_data::{InputDataModel, JsonInput};
//!
//! let input = JsonInput::from_file("sales.json");
//! let ctx = InputDataModel::new(&table, &input).with_filter("Spain").create_context()?;
//! println!("{ctx}: {} rows", ctx.filtered_len());
//! ```

pub mod context;
pub mod input;
pub mod json;
pub mod memory;
pub mod xml;

pub use context::{InputDataModel, ModelContext};
pub use input::{DataInput, InputError, InputSource};
pub use json::JsonInput;
pub use memory::MemoryInput;
pub use xml::XmlInput;
