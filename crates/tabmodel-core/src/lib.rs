//! tabmodel core
//!
//! Declarative model of a tabular report: table fields, styles, filters,
//! fixed-width and group resources, conditions, plus the configuration and
//! the diagnostics/report types shared by the other crates.
//! Never rename diagnostic codes; they are part of the report format.

pub mod binding;
pub mod condition;
pub mod config;
pub mod culture;
pub mod diagnostic;
pub mod error;
pub mod field;
pub mod filter;
pub mod fixed;
pub mod group;
pub mod identifier;
pub mod known;
pub mod reference;
pub mod report;
pub mod resources;
pub mod row;
pub mod style;
pub mod table;

pub use binding::Bindings;
pub use condition::{Condition, ConditionKind, ConditionResult};
pub use config::{Config, ConfigError, SeverityThreshold};
pub use culture::{parse_date, parse_decimal, KnownCulture};
pub use diagnostic::{Diagnostic, DiagnosticCode, Location, Severity};
pub use error::ModelError;
pub use field::{Field, FieldAggregate, FieldHeader, FieldKind, FieldValue, FieldsCollection};
pub use filter::{Filter, FilterExpression};
pub use fixed::{FixedWidth, Piece};
pub use group::{Group, GroupItem};
pub use identifier::{encode_field_name, DEFAULT_SPECIAL_CHARS};
pub use known::{
    KnownAggregateLocation, KnownAggregateType, KnownFieldType, KnownInputPacketFormat,
    KnownItemGroupSeparator, KnownOperator, KnownTrimMode, YesNo,
};
pub use reference::Reference;
pub use report::{Report, ReportSummary, ReportVersion};
pub use resources::Resources;
pub use row::Row;
pub use style::{Style, StylesCollection, DEFAULT_STYLE_NAME};
pub use table::TableDefinition;
