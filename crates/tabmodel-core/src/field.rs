//! Table fields
//!
//! A field is one output column. Its [`FieldKind`] says where the cell
//! value comes from:
//!
//! - `Field`: a data attribute
//! - `Gap`: an empty spacer column
//! - `Group`: several attributes joined through a group resource
//! - `Fixed`: one piece of a fixed-width resource
//! - `Packet`: a packed date attribute reformatted for display
//!
//! In model documents the kind is the `type` tag of the field object.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::identifier::{check_field_name, check_identifier, check_style_name};
use crate::known::{
    KnownAggregateLocation, KnownAggregateType, KnownFieldType, KnownInputPacketFormat, YesNo,
};
use crate::style::DEFAULT_STYLE_NAME;

/// Width keyword meaning "use the writer's default column width"
pub const DEFAULT_WIDTH: &str = "Default";

/// Column width in writer units for [`DEFAULT_WIDTH`]
pub const DEFAULT_WIDTH_VALUE: f64 = 9.140625;

const DEFAULT_AGGREGATE_TEXT: &str = "Text";

fn default_style() -> String {
    DEFAULT_STYLE_NAME.to_string()
}

fn default_width() -> String {
    DEFAULT_WIDTH.to_string()
}

fn default_aggregate_text() -> String {
    DEFAULT_AGGREGATE_TEXT.to_string()
}

fn no() -> YesNo {
    YesNo::No
}

fn short_date() -> KnownInputPacketFormat {
    KnownInputPacketFormat::ShortDateFormat
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldHeader {
    #[serde(default)]
    pub show: YesNo,

    #[serde(default = "default_style")]
    pub style: String,

    /// Header text; the alias or field name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Default for FieldHeader {
    fn default() -> Self {
        Self {
            show: YesNo::Yes,
            style: default_style(),
            text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    #[serde(default)]
    pub show: YesNo,

    #[serde(default = "default_style")]
    pub style: String,
}

impl Default for FieldValue {
    fn default() -> Self {
        Self {
            show: YesNo::Yes,
            style: default_style(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAggregate {
    #[serde(default, rename = "type")]
    pub aggregate_type: KnownAggregateType,

    #[serde(default)]
    pub location: KnownAggregateLocation,

    #[serde(default = "no")]
    pub show: YesNo,

    #[serde(default = "default_style")]
    pub style: String,

    #[serde(default = "default_aggregate_text")]
    pub text: String,
}

impl Default for FieldAggregate {
    fn default() -> Self {
        Self {
            aggregate_type: KnownAggregateType::None,
            location: KnownAggregateLocation::Top,
            show: YesNo::No,
            style: default_style(),
            text: default_aggregate_text(),
        }
    }
}

impl FieldAggregate {
    pub fn is_visible_at(&self, location: KnownAggregateLocation) -> bool {
        self.show.is_yes() && self.location == location
    }
}

/// Source of a field's value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FieldKind {
    /// Plain data attribute
    #[serde(rename = "Field")]
    Data { name: String },

    Gap,

    Group { name: String },

    /// `pieces` names the fixed-width resource, `piece` one of its pieces
    Fixed { pieces: String, piece: String },

    Packet {
        name: String,
        #[serde(default = "short_date")]
        input_format: KnownInputPacketFormat,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,

    /// Integer width in hundredths, `Default`, or a `{Binding}`
    #[serde(default = "default_width")]
    pub width: String,

    #[serde(default)]
    pub header: FieldHeader,

    #[serde(default)]
    pub value: FieldValue,

    #[serde(default)]
    pub aggregate: FieldAggregate,

    #[serde(flatten)]
    pub kind: FieldKind,
}

impl Field {
    fn with_kind(kind: FieldKind) -> Self {
        Self {
            alias: String::new(),
            width: default_width(),
            header: FieldHeader::default(),
            value: FieldValue::default(),
            aggregate: FieldAggregate::default(),
            kind,
        }
    }

    pub fn data(name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        check_field_name("Field", "Name", &name)?;
        Ok(Self::with_kind(FieldKind::Data { name }))
    }

    pub fn gap() -> Self {
        Self::with_kind(FieldKind::Gap)
    }

    pub fn group(name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        check_identifier("Group", "Name", &name)?;
        Ok(Self::with_kind(FieldKind::Group { name }))
    }

    pub fn fixed(pieces: impl Into<String>, piece: impl Into<String>) -> Result<Self, ModelError> {
        let pieces = pieces.into();
        let piece = piece.into();
        check_identifier("Fixed", "Pieces", &pieces)?;
        check_identifier("Fixed", "Piece", &piece)?;
        Ok(Self::with_kind(FieldKind::Fixed { pieces, piece }))
    }

    pub fn packet(name: impl Into<String>, input_format: KnownInputPacketFormat) -> Result<Self, ModelError> {
        let name = name.into();
        check_field_name("Packet", "Name", &name)?;
        Ok(Self::with_kind(FieldKind::Packet { name, input_format }))
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn with_width(mut self, width: impl Into<String>) -> Self {
        self.width = width.into();
        self
    }

    pub fn with_value_style(mut self, style: impl Into<String>) -> Result<Self, ModelError> {
        let style = style.into();
        check_style_name("Value", &style)?;
        self.value.style = style;
        Ok(self)
    }

    pub fn with_header_style(mut self, style: impl Into<String>) -> Result<Self, ModelError> {
        let style = style.into();
        check_style_name("Header", &style)?;
        self.header.style = style;
        Ok(self)
    }

    pub fn with_aggregate(mut self, aggregate: FieldAggregate) -> Result<Self, ModelError> {
        check_style_name("Aggregate", &aggregate.style)?;
        self.aggregate = aggregate;
        Ok(self)
    }

    pub fn hide_value(mut self) -> Self {
        self.value.show = YesNo::No;
        self
    }

    pub fn field_type(&self) -> KnownFieldType {
        match self.kind {
            FieldKind::Data { .. } => KnownFieldType::Field,
            FieldKind::Gap => KnownFieldType::Gap,
            FieldKind::Group { .. } => KnownFieldType::Group,
            FieldKind::Fixed { .. } => KnownFieldType::Fixed,
            FieldKind::Packet { .. } => KnownFieldType::Packet,
        }
    }

    /// Name this field is known by
    ///
    /// Data and packet fields use the attribute name, group fields the
    /// group name, fixed fields the piece name; gaps have none.
    pub fn field_name(&self) -> &str {
        match &self.kind {
            FieldKind::Data { name } | FieldKind::Group { name } | FieldKind::Packet { name, .. } => name,
            FieldKind::Fixed { piece, .. } => piece,
            FieldKind::Gap => "",
        }
    }

    /// Header caption: explicit text, then alias, then field name
    pub fn header_text(&self) -> &str {
        match &self.header.text {
            Some(text) => text,
            None if !self.alias.is_empty() => &self.alias,
            None => self.field_name(),
        }
    }

    /// Column width in writer units; NaN when the width is not understood
    pub fn width_value(&self) -> f64 {
        let width = self.width.trim();
        if width.eq_ignore_ascii_case(DEFAULT_WIDTH) {
            return DEFAULT_WIDTH_VALUE;
        }
        match width.parse::<i64>() {
            Ok(hundredths) => hundredths as f64 / 100.0,
            Err(_) => f64::NAN,
        }
    }
}

/// Ordered field list of a table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldsCollection {
    items: Vec<Field>,
}

impl FieldsCollection {
    pub fn new(items: Vec<Field>) -> Self {
        Self { items }
    }

    pub fn push(&mut self, field: Field) {
        self.items.push(field);
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.items.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Field> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn visible_headers(&self) -> Vec<&Field> {
        self.items.iter().filter(|f| f.header.show.is_yes()).collect()
    }

    pub fn has_visible_headers(&self) -> bool {
        self.items.iter().any(|f| f.header.show.is_yes())
    }

    pub fn by_aggregate_location(&self, location: KnownAggregateLocation) -> Vec<&Field> {
        self.items
            .iter()
            .filter(|f| f.aggregate.is_visible_at(location))
            .collect()
    }

    pub fn has_visible_aggregates(&self, location: KnownAggregateLocation) -> bool {
        self.items.iter().any(|f| f.aggregate.is_visible_at(location))
    }

    pub fn by_type(&self, field_type: KnownFieldType) -> Vec<&Field> {
        self.items.iter().filter(|f| f.field_type() == field_type).collect()
    }

    /// Index of the first field with this name, ignoring case
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|f| !f.field_name().is_empty() && f.field_name().eq_ignore_ascii_case(name))
    }
}

impl<'a> IntoIterator for &'a FieldsCollection {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
