//! Column aggregates over the filtered rows

use rust_decimal::Decimal;

use tabmodel_core::{parse_decimal, Field, KnownAggregateType, KnownCulture};
use tabmodel_data::ModelContext;

use crate::error::EvalError;
use crate::value::ValueResolver;

/// Aggregate `field` over the filtered rows
///
/// `Count` counts non-empty values; the other functions only see values
/// that parse as decimals. `None` is returned for `KnownAggregateType::None`
/// and when there is nothing to aggregate. A sum outside the decimal range
/// is an [`EvalError::AggregateOverflow`].
pub fn compute_aggregate(
    ctx: &ModelContext<'_>,
    resolver: &ValueResolver<'_>,
    field: &Field,
) -> Result<Option<Decimal>, EvalError> {
    let aggregate = field.aggregate.aggregate_type;
    if aggregate == KnownAggregateType::None {
        return Ok(None);
    }

    let culture = resolver.culture();
    let mut non_empty = 0usize;
    let mut numbers = Vec::new();
    for row in ctx.filtered_rows() {
        let value = resolver.raw_value(field, row)?;
        if value.trim().is_empty() {
            continue;
        }
        non_empty += 1;
        if let Some(number) = parse_decimal(&value, culture) {
            numbers.push(number);
        }
    }

    aggregate_values(field.field_name(), aggregate, non_empty, &numbers)
}

fn aggregate_values(
    field: &str,
    aggregate: KnownAggregateType,
    non_empty: usize,
    numbers: &[Decimal],
) -> Result<Option<Decimal>, EvalError> {
    let overflow = || EvalError::AggregateOverflow {
        field: field.to_string(),
        aggregate,
    };
    let sum = || {
        numbers
            .iter()
            .try_fold(Decimal::ZERO, |acc, n| acc.checked_add(*n))
            .ok_or_else(overflow)
    };

    Ok(match aggregate {
        KnownAggregateType::None => None,
        KnownAggregateType::Count => Some(Decimal::from(non_empty)),
        KnownAggregateType::Sum => Some(sum()?),
        KnownAggregateType::Average => {
            if numbers.is_empty() {
                return Ok(None);
            }
            let total = sum()?;
            Some(total.checked_div(Decimal::from(numbers.len())).ok_or_else(overflow)?)
        }
        KnownAggregateType::Max => numbers.iter().copied().max(),
        KnownAggregateType::Min => numbers.iter().copied().min(),
    })
}

/// Text shown in an aggregate cell
pub fn aggregate_text(field: &Field, value: Option<Decimal>, culture: KnownCulture) -> String {
    match (field.aggregate.aggregate_type, value) {
        (KnownAggregateType::None, _) => field.aggregate.text.clone(),
        (_, None) => String::new(),
        (_, Some(value)) => {
            let text = value.normalize().to_string();
            match culture.decimal_separator() {
                '.' => text,
                separator => text.replace('.', &separator.to_string()),
            }
        }
    }
}
