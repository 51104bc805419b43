//! Cell value resolution
//!
//! [`ValueResolver`] computes the text a field shows for a row and
//! classifies it (numeric, date, text) for conditions and aggregates.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use tabmodel_core::{
    encode_field_name, parse_date, parse_decimal, Config, Field, FieldKind, KnownCulture,
    ModelError, Row, Style, TableDefinition,
};
use tabmodel_data::ModelContext;

use crate::error::EvalError;
use crate::packet::format_packed;

/// Classified value of one cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValueInfo {
    pub value: String,
    pub is_numeric: bool,
    pub is_date_time: bool,
    pub is_text: bool,
    pub is_negative: bool,

    /// Value style name declared by the field
    pub style: String,

    #[serde(skip)]
    pub number: Option<Decimal>,

    #[serde(skip)]
    pub date: Option<NaiveDateTime>,
}

impl FieldValueInfo {
    /// Classify `value`: numeric when it parses as a decimal, otherwise a
    /// date when it parses as one, otherwise text
    pub fn classify(value: String, style: impl Into<String>, culture: KnownCulture) -> Self {
        let number = parse_decimal(&value, culture);
        let date = match number {
            Some(_) => None,
            None => parse_date(&value, culture),
        };

        Self {
            is_numeric: number.is_some(),
            is_date_time: date.is_some(),
            is_text: number.is_none() && date.is_none(),
            is_negative: number.is_some_and(|n| n.is_sign_negative() && !n.is_zero()),
            style: style.into(),
            number,
            date,
            value,
        }
    }
}

pub struct ValueResolver<'a> {
    table: &'a TableDefinition,
    config: &'a Config,
    special_chars: Vec<char>,
}

impl<'a> ValueResolver<'a> {
    pub fn new(table: &'a TableDefinition, config: &'a Config) -> Self {
        Self {
            table,
            config,
            special_chars: config.special_chars.clone(),
        }
    }

    /// Resolver using the special characters of the context's input
    pub fn for_context(ctx: &ModelContext<'a>, config: &'a Config) -> Self {
        Self {
            table: ctx.table(),
            config,
            special_chars: ctx.special_chars().to_vec(),
        }
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    /// Culture conditions declared with `Current` fall back to
    pub fn culture(&self) -> KnownCulture {
        self.config.culture.resolve(KnownCulture::Current)
    }

    fn attribute<'r>(&self, row: &'r Row, name: &str) -> Option<&'r str> {
        let value = row.attribute_any_case(&encode_field_name(name, &self.special_chars));
        if value.is_none() {
            tracing::debug!(field = name, "attribute not present in row");
        }
        value
    }

    /// Text shown for `field` in `row`; empty when the field hides its value
    pub fn raw_value(&self, field: &Field, row: &Row) -> Result<String, EvalError> {
        if !field.value.show.is_yes() {
            return Ok(String::new());
        }
        self.source_value(field, row)
    }

    /// Value of `field` in `row` whether or not the field shows it
    pub fn source_value(&self, field: &Field, row: &Row) -> Result<String, EvalError> {
        let resources = &self.table.resources;
        match &field.kind {
            FieldKind::Data { name } => Ok(self.attribute(row, name).unwrap_or_default().to_string()),
            FieldKind::Gap => Ok(String::new()),
            FieldKind::Fixed { pieces, piece } => {
                let fixed = resources
                    .fixed(pieces)
                    .ok_or_else(|| ModelError::UnknownResource { kind: "Fixed", name: pieces.clone() })?;
                Ok(fixed.value_of(piece, row)?)
            }
            FieldKind::Group { name } => {
                let group = resources
                    .group(name)
                    .ok_or_else(|| ModelError::UnknownResource { kind: "Group", name: name.clone() })?;

                let mut text = String::new();
                for item in &group.fields {
                    let value = match item.value_of(row) {
                        Ok(value) => value,
                        Err(ModelError::MissingAttribute(missing)) => {
                            self.piece_value(&item.name, row)?
                                .map(|v| item.parse_value(&v).to_string())
                                .ok_or(ModelError::MissingAttribute(missing))?
                        }
                        Err(err) => return Err(err.into()),
                    };
                    text.push_str(&value);
                    text.push_str(item.separator_text());
                }
                Ok(text)
            }
            FieldKind::Packet { name, input_format } => {
                let raw = self.attribute(row, name).unwrap_or_default();
                Ok(format_packed(raw, input_format))
            }
        }
    }

    /// Value of the first piece named `name` in any fixed-width resource
    fn piece_value(&self, name: &str, row: &Row) -> Result<Option<String>, ModelError> {
        for fixed in &self.table.resources.fixed {
            if fixed.piece(name).is_some() {
                return fixed.value_of(name, row).map(Some);
            }
        }
        Ok(None)
    }

    /// Resolved value style of `field`, or the default style when the
    /// declared one cannot be resolved
    pub fn value_style(&self, field: &Field) -> Style {
        self.style_or_default(&field.value.style)
    }

    pub fn style_or_default(&self, name: &str) -> Style {
        let styles = &self.table.resources.styles;
        match styles.resolve(name) {
            Ok(style) => style,
            Err(err) => {
                tracing::debug!(style = name, error = %err, "falling back to default style");
                styles
                    .resolve(&self.config.default_style)
                    .unwrap_or_else(|_| Style::default_style())
            }
        }
    }

    /// Value of `field` in `row`, classified with `culture`
    pub fn value_info(&self, field: &Field, row: &Row, culture: KnownCulture) -> Result<FieldValueInfo, EvalError> {
        let value = self.raw_value(field, row)?;
        Ok(FieldValueInfo::classify(value, &field.value.style, culture))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabmodel_core::{
        FixedWidth, Group, GroupItem, KnownInputPacketFormat, KnownTrimMode, Piece, Resources,
        StylesCollection,
    };

    fn table() -> TableDefinition {
        TableDefinition::new("T")
            .unwrap()
            .with_field(Field::data("#AMOUNT").unwrap())
            .with_field(Field::gap())
            .with_field(Field::fixed("Account", "Bank").unwrap())
            .with_field(Field::group("Address").unwrap())
            .with_field(Field::packet("DATE", KnownInputPacketFormat::LongDateFormat).unwrap())
            .with_field(Field::data("CITY").unwrap().hide_value())
            .with_resources(Resources {
                styles: StylesCollection::new(vec![Style::new("Money").unwrap()]),
                fixed: vec![FixedWidth::new("Account", "RAW")
                    .unwrap()
                    .with_piece(Piece::new("Bank", 0, 4).unwrap())
                    .with_piece(Piece::new("Zip", 4, 5).unwrap())],
                groups: vec![Group::new("Address")
                    .unwrap()
                    .with_item(GroupItem::new("STREET").unwrap().with_trim(KnownTrimMode::All).with_separator("Comma"))
                    .with_item(GroupItem::new("Zip").unwrap().with_separator("Space"))
                    .with_item(GroupItem::new("CITY").unwrap())],
                ..Resources::default()
            })
    }

    fn row() -> Row {
        Row::new()
            .with("_x0023_AMOUNT", "-12,5")
            .with("RAW", "004975001")
            .with("STREET", " Rue Haute ")
            .with("CITY", "Paris")
            .with("DATE", "20240305")
    }

    #[test]
    fn resolves_every_kind() {
        let table = table();
        let config = Config::default();
        let resolver = ValueResolver::new(&table, &config);
        let row = row();
        let value = |i: usize| resolver.raw_value(table.fields.get(i).unwrap(), &row).unwrap();

        assert_eq!(value(0), "-12,5");
        assert_eq!(value(1), "");
        assert_eq!(value(2), "0049");
        assert_eq!(value(3), "Rue Haute,75001 Paris");
        assert_eq!(value(4), "2024/03/05");
        assert_eq!(value(5), "");
        assert_eq!(resolver.source_value(table.fields.get(5).unwrap(), &row).unwrap(), "Paris");
    }

    #[test]
    fn unknown_resources_are_errors() {
        let mut table = table();
        table.resources.groups.clear();
        let config = Config::default();
        let resolver = ValueResolver::new(&table, &config);

        let err = resolver.raw_value(table.fields.get(3).unwrap(), &row()).unwrap_err();
        assert_eq!(err, EvalError::Model(ModelError::UnknownResource { kind: "Group", name: "Address".into() }));
    }

    #[test]
    fn classification_uses_culture() {
        let table = table();
        let config = Config::default();
        let resolver = ValueResolver::new(&table, &config);
        let field = table.fields.get(0).unwrap();

        let spanish = resolver.value_info(field, &row(), KnownCulture::EsEs).unwrap();
        assert!(spanish.is_numeric);
        assert!(spanish.is_negative);

        let date = FieldValueInfo::classify("2024-03-05".into(), "Default", KnownCulture::Invariant);
        assert!(date.is_date_time);
        assert!(!date.is_text);

        let text = FieldValueInfo::classify("Paris".into(), "Default", KnownCulture::Invariant);
        assert!(text.is_text);
    }

    #[test]
    fn styles_fall_back_to_default() {
        let table = table();
        let config = Config::default();
        let resolver = ValueResolver::new(&table, &config);

        assert_eq!(resolver.style_or_default("Money").name, "Money");
        assert_eq!(resolver.style_or_default("Missing").name, "Default");
    }
}
