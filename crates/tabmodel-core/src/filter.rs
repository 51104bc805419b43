//! Row filters
//!
//! A filter is declared in the table resources and compiled into a
//! [`FilterExpression`], a predicate over rows of the dataset. Field names
//! and values are compared upper-cased.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ModelError;
use crate::identifier::check_field_name;
use crate::known::{KnownOperator, YesNo};
use crate::row::Row;

/// Declared filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub key: String,

    #[serde(default)]
    pub active: YesNo,

    #[serde(default)]
    pub criterial: KnownOperator,

    pub field: String,

    #[serde(default)]
    pub value: String,
}

impl Filter {
    pub fn new(
        key: impl Into<String>,
        field: impl Into<String>,
        criterial: KnownOperator,
        value: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let key = key.into();
        let field = field.into();
        if key.trim().is_empty() {
            return Err(ModelError::EmptyValue {
                element: "Filter".into(),
                attribute: "Key".into(),
            });
        }
        check_field_name("Filter", "Field", &field)?;

        Ok(Self {
            key,
            active: YesNo::Yes,
            criterial,
            field,
            value: value.into(),
        })
    }

    pub fn with_active(mut self, active: YesNo) -> Self {
        self.active = active;
        self
    }

    pub fn is_active(&self) -> bool {
        self.active.is_yes()
    }

    /// Compile this filter into a row predicate
    pub fn build_expression(&self) -> Result<FilterExpression, ModelError> {
        let field = self.field.to_uppercase();
        let value = self.value.to_uppercase();

        let expression = match self.criterial {
            KnownOperator::EqualTo => FilterExpression::Equals {
                field,
                value,
                negate: false,
            },
            KnownOperator::NotEqualTo => FilterExpression::Equals {
                field,
                value,
                negate: true,
            },
            KnownOperator::Like => FilterExpression::Like { field, value },
            KnownOperator::In => FilterExpression::In {
                field,
                values: value.split(' ').filter(|v| !v.is_empty()).map(String::from).collect(),
            },
            KnownOperator::Between => {
                let values: Vec<&str> = value.split(' ').collect();
                if values.len() != 2 {
                    return Err(self.invalid_value("Between needs exactly two space-separated values"));
                }
                FilterExpression::Between {
                    field,
                    low: self.number(values[0])?,
                    high: self.number(values[1])?,
                }
            }
            op @ (KnownOperator::GreaterThan
            | KnownOperator::GreaterOrEqualThan
            | KnownOperator::LessThan
            | KnownOperator::LessOrEqualThan) => FilterExpression::Compare {
                field,
                op,
                value: self.number(&value)?,
            },
        };

        Ok(expression)
    }

    fn number(&self, text: &str) -> Result<Decimal, ModelError> {
        parse_number(text).ok_or_else(|| self.invalid_value("not a number"))
    }

    fn invalid_value(&self, reason: &str) -> ModelError {
        ModelError::InvalidFilterValue {
            key: self.key.clone(),
            value: self.value.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Decimal with either `.` or `,` as separator
fn parse_number(text: &str) -> Option<Decimal> {
    Decimal::from_str(&text.trim().replace(',', ".")).ok()
}

/// Compiled row predicate
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpression {
    Equals {
        field: String,
        value: String,
        negate: bool,
    },
    Like {
        field: String,
        value: String,
    },
    In {
        field: String,
        values: Vec<String>,
    },
    Between {
        field: String,
        low: Decimal,
        high: Decimal,
    },
    Compare {
        field: String,
        op: KnownOperator,
        value: Decimal,
    },
}

impl FilterExpression {
    fn field(&self) -> &str {
        match self {
            Self::Equals { field, .. }
            | Self::Like { field, .. }
            | Self::In { field, .. }
            | Self::Between { field, .. }
            | Self::Compare { field, .. } => field,
        }
    }

    pub fn matches(&self, row: &Row) -> bool {
        let Some(raw) = row.attribute_ignore_case(self.field()) else {
            return false;
        };
        let text = raw.to_uppercase();

        match self {
            Self::Equals { value, negate, .. } => (text == *value) != *negate,
            Self::Like { value, .. } => text.contains(value.as_str()),
            Self::In { values, .. } => values.iter().any(|v| *v == text),
            Self::Between { low, high, .. } => {
                parse_number(&text).is_some_and(|n| n >= *low && n <= *high)
            }
            Self::Compare { op, value, .. } => parse_number(&text).is_some_and(|n| match op {
                KnownOperator::GreaterThan => n > *value,
                KnownOperator::GreaterOrEqualThan => n >= *value,
                KnownOperator::LessThan => n < *value,
                KnownOperator::LessOrEqualThan => n <= *value,
                _ => false,
            }),
        }
    }

    /// Rows of `rows` accepted by this expression
    pub fn apply<'r>(&self, rows: &'r [Row]) -> Vec<&'r Row> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Row> {
        vec![
            Row::new().with("CITY", "Madrid").with("AMOUNT", "10.5"),
            Row::new().with("CITY", "Paris").with("AMOUNT", "20"),
            Row::new().with("CITY", "Porto").with("AMOUNT", "30,25"),
        ]
    }

    fn run(op: KnownOperator, field: &str, value: &str) -> Vec<String> {
        let expr = Filter::new("f", field, op, value).unwrap().build_expression().unwrap();
        expr.apply(&rows())
            .into_iter()
            .map(|r| r.attribute("CITY").unwrap().to_string())
            .collect()
    }

    #[test]
    fn text_operators_ignore_case() {
        assert_eq!(run(KnownOperator::EqualTo, "city", "paris"), vec!["Paris"]);
        assert_eq!(run(KnownOperator::NotEqualTo, "City", "PARIS"), vec!["Madrid", "Porto"]);
        assert_eq!(run(KnownOperator::Like, "CITY", "r"), vec!["Madrid", "Paris", "Porto"]);
        assert_eq!(run(KnownOperator::In, "CITY", "madrid porto"), vec!["Madrid", "Porto"]);
    }

    #[test]
    fn numeric_operators_accept_both_separators() {
        assert_eq!(run(KnownOperator::GreaterThan, "AMOUNT", "10,5"), vec!["Paris", "Porto"]);
        assert_eq!(run(KnownOperator::GreaterOrEqualThan, "AMOUNT", "10.5"), vec!["Madrid", "Paris", "Porto"]);
        assert_eq!(run(KnownOperator::LessThan, "AMOUNT", "20"), vec!["Madrid"]);
        assert_eq!(run(KnownOperator::LessOrEqualThan, "AMOUNT", "20"), vec!["Madrid", "Paris"]);
        assert_eq!(run(KnownOperator::Between, "AMOUNT", "20 30.25"), vec!["Paris", "Porto"]);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let between = Filter::new("f", "AMOUNT", KnownOperator::Between, "1 2 3").unwrap();
        assert!(matches!(
            between.build_expression(),
            Err(ModelError::InvalidFilterValue { .. })
        ));

        let greater = Filter::new("f", "AMOUNT", KnownOperator::GreaterThan, "ten").unwrap();
        assert!(greater.build_expression().is_err());
    }

    #[test]
    fn missing_attribute_never_matches() {
        assert!(run(KnownOperator::NotEqualTo, "COUNTRY", "ES").is_empty());
    }
}
