//! Condition evaluation
//!
//! [`ConditionEngine`] evaluates the conditions of a table against the
//! cell the [`ModelContext`] cursor points at. Maximum/Minimum cache the
//! column extreme and WhenChange remembers the style it handed out last,
//! so one engine must be used for one pass over one context. WhenChange
//! compares the underlying values, so it also stripes hidden columns.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::HashMap;

use tabmodel_core::{
    parse_date, parse_decimal, Condition, ConditionKind, ConditionResult, Field, KnownCulture,
    KnownOperator,
};
use tabmodel_data::ModelContext;

use crate::error::EvalError;
use crate::value::{FieldValueInfo, ValueResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extreme {
    Max,
    Min,
}

#[derive(Debug, Default)]
struct ConditionState {
    /// Cached column extreme; `Some(None)` when the column has none
    extreme: Option<Option<String>>,

    /// Last WhenChange style and the row it was computed for
    last_style: Option<String>,
    last_row: Option<usize>,
}

/// Combined outcome of every condition on the current cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionOutcome {
    /// Style of the last applicable condition
    pub style: Option<String>,

    /// Style of the last applicable condition asking for the whole row
    pub entire_row_style: Option<String>,
}

#[derive(Debug, Default)]
pub struct ConditionEngine {
    state: HashMap<String, ConditionState>,
}

impl ConditionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget cached extremes and WhenChange history
    pub fn reset(&mut self) {
        self.state.clear();
    }

    /// Evaluate one condition against the current cell
    pub fn evaluate(
        &mut self,
        ctx: &ModelContext<'_>,
        resolver: &ValueResolver<'_>,
        condition: &Condition,
    ) -> Result<ConditionResult, EvalError> {
        if !condition.is_active() {
            return Ok(ConditionResult::default());
        }

        let Some(field) = ctx.current_field() else {
            return Ok(ConditionResult::default());
        };
        if !condition.field.eq_ignore_ascii_case(field.field_name()) {
            return Ok(ConditionResult::default());
        }

        let row_index = ctx.current_row_index();
        let row = ctx.current_row().ok_or(EvalError::NoCurrentRow(row_index))?;
        let culture = condition.locale.resolve(resolver.config().culture);
        let info = resolver.value_info(field, row, culture)?;

        let result = match &condition.kind {
            ConditionKind::Remarks { criterial, style, value } => {
                apply_if(remarks(&info, *criterial, value, culture), style)
            }
            ConditionKind::Zero { style } => apply_if(remarks(&info, KnownOperator::EqualTo, "0", culture), style),
            ConditionKind::Maximum { style } => {
                self.extreme_condition(ctx, resolver, condition, field, &info, culture, Extreme::Max, style)?
            }
            ConditionKind::Minimum { style } => {
                self.extreme_condition(ctx, resolver, condition, field, &info, culture, Extreme::Min, style)?
            }
            ConditionKind::WhenChange {
                first_swap_style,
                second_swap_style,
            } => {
                let current = resolver.source_value(field, row)?;
                let previous = match ctx.previous_row() {
                    Some(previous) => Some(resolver.source_value(field, previous)?),
                    None => None,
                };
                let state = self.state.entry(condition.key.clone()).or_default();
                ConditionResult::applied(when_change(
                    state,
                    row_index,
                    &current,
                    previous.as_deref(),
                    first_swap_style,
                    second_swap_style.as_deref(),
                ))
            }
        };

        Ok(result)
    }

    /// Evaluate every condition watching the current field
    pub fn evaluate_all(
        &mut self,
        ctx: &ModelContext<'_>,
        resolver: &ValueResolver<'_>,
    ) -> Result<ConditionOutcome, EvalError> {
        let mut outcome = ConditionOutcome::default();
        let Some(field) = ctx.current_field() else {
            return Ok(outcome);
        };
        if field.field_name().is_empty() {
            return Ok(outcome);
        }

        for condition in ctx.table().resources.conditions_for(field.field_name()) {
            let result = self.evaluate(ctx, resolver, condition)?;
            if result.can_apply {
                if condition.applies_to_entire_row() {
                    outcome.entire_row_style = Some(result.style.clone());
                }
                outcome.style = Some(result.style);
            }
        }

        Ok(outcome)
    }

    #[allow(clippy::too_many_arguments)]
    fn extreme_condition(
        &mut self,
        ctx: &ModelContext<'_>,
        resolver: &ValueResolver<'_>,
        condition: &Condition,
        field: &Field,
        info: &FieldValueInfo,
        culture: KnownCulture,
        which: Extreme,
        style: &str,
    ) -> Result<ConditionResult, EvalError> {
        if info.is_text {
            return Ok(ConditionResult::default());
        }

        let cached = self
            .state
            .get(&condition.key)
            .and_then(|state| state.extreme.clone());

        let extreme = match cached {
            Some(extreme) => extreme,
            None => {
                let extreme = column_extreme(ctx, resolver, field, culture, which, info.is_numeric)?;
                tracing::debug!(condition = %condition.key, extreme = ?extreme, "cached column extreme");
                self.state.entry(condition.key.clone()).or_default().extreme = Some(extreme.clone());
                extreme
            }
        };

        Ok(match extreme {
            Some(value) => apply_if(remarks(info, KnownOperator::EqualTo, &value, culture), style),
            None => ConditionResult::default(),
        })
    }
}

fn apply_if(applies: bool, style: &str) -> ConditionResult {
    if applies {
        ConditionResult::applied(style)
    } else {
        ConditionResult::default()
    }
}

/// Largest or smallest value of the column, compared as numbers or dates
fn column_extreme(
    ctx: &ModelContext<'_>,
    resolver: &ValueResolver<'_>,
    field: &Field,
    culture: KnownCulture,
    which: Extreme,
    numeric: bool,
) -> Result<Option<String>, EvalError> {
    let mut best: Option<(Ordered, String)> = None;

    for row in ctx.filtered_rows() {
        let value = resolver.raw_value(field, row)?;
        if value.is_empty() {
            continue;
        }

        let key = if numeric {
            parse_decimal(&value, culture).map(Ordered::Number)
        } else {
            parse_date(&value, culture).map(Ordered::Date)
        };
        let Some(key) = key else { continue };

        let better = match &best {
            None => true,
            Some((current, _)) => match which {
                Extreme::Max => key > *current,
                Extreme::Min => key < *current,
            },
        };
        if better {
            best = Some((key, value));
        }
    }

    Ok(best.map(|(_, value)| value))
}

#[derive(Debug, Clone, PartialEq, PartialOrd)]
enum Ordered {
    Number(Decimal),
    Date(NaiveDateTime),
}

fn when_change(
    state: &mut ConditionState,
    row: usize,
    current: &str,
    previous: Option<&str>,
    first: &str,
    second: Option<&str>,
) -> String {
    if state.last_row == Some(row) {
        if let Some(style) = &state.last_style {
            return style.clone();
        }
    }

    let last = state.last_style.clone();
    let style = match (previous, last) {
        (None, _) | (Some(_), None) => first.to_string(),
        (Some(prev), Some(last)) if prev == current => last,
        (Some(_), Some(last)) => match second {
            None => last,
            Some(second) if last == first => second.to_string(),
            Some(_) => first.to_string(),
        },
    };

    state.last_row = Some(row);
    state.last_style = Some(style.clone());
    style
}

/// Compare a cell value against a literal with `op`
///
/// Numeric cells compare as decimals, date cells as dates, text cells as
/// strings. Operands that do not parse never match.
pub fn remarks(info: &FieldValueInfo, op: KnownOperator, target: &str, culture: KnownCulture) -> bool {
    if op == KnownOperator::Like {
        return info.value.to_uppercase().contains(&target.to_uppercase());
    }

    if let Some(number) = info.number {
        return compare_with(op, target, |t| parse_decimal(t, culture), |t| number.cmp(&t));
    }
    if let Some(date) = info.date {
        return compare_with(op, target, |t| parse_date(t, culture), |t| date.cmp(&t));
    }

    let value = info.value.as_str();
    compare_with(op, target, |t| Some(t.to_string()), |t| value.cmp(t.as_str()))
}

fn compare_with<T>(
    op: KnownOperator,
    target: &str,
    parse: impl Fn(&str) -> Option<T>,
    cmp: impl Fn(T) -> Ordering,
) -> bool {
    let single = || parse(target).map(&cmp);

    match op {
        KnownOperator::EqualTo => single() == Some(Ordering::Equal),
        KnownOperator::NotEqualTo => single().is_some_and(|o| o != Ordering::Equal),
        KnownOperator::GreaterThan => single() == Some(Ordering::Greater),
        KnownOperator::GreaterOrEqualThan => single().is_some_and(|o| o != Ordering::Less),
        KnownOperator::LessThan => single() == Some(Ordering::Less),
        KnownOperator::LessOrEqualThan => single().is_some_and(|o| o != Ordering::Greater),
        KnownOperator::Between => {
            let bounds: Vec<&str> = target.split_whitespace().collect();
            let [low, high] = bounds.as_slice() else {
                return false;
            };
            match (parse(low).map(&cmp), parse(high).map(&cmp)) {
                (Some(lo), Some(hi)) => lo != Ordering::Less && hi != Ordering::Greater,
                _ => false,
            }
        }
        KnownOperator::In => target
            .split_whitespace()
            .any(|item| parse(item).map(&cmp) == Some(Ordering::Equal)),
        KnownOperator::Like => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabmodel_core::{Config, Resources, Row, TableDefinition, YesNo};
    use tabmodel_data::{InputDataModel, MemoryInput};

    fn info(value: &str) -> FieldValueInfo {
        FieldValueInfo::classify(value.to_string(), "Default", KnownCulture::Invariant)
    }

    #[test]
    fn numeric_remarks() {
        let c = KnownCulture::Invariant;
        assert!(remarks(&info("10.50"), KnownOperator::EqualTo, "10.5", c));
        assert!(remarks(&info("10"), KnownOperator::GreaterThan, "9.99", c));
        assert!(remarks(&info("10"), KnownOperator::LessOrEqualThan, "10", c));
        assert!(remarks(&info("10"), KnownOperator::Between, "5 10", c));
        assert!(remarks(&info("7"), KnownOperator::In, "1 7 9", c));
        assert!(!remarks(&info("10"), KnownOperator::NotEqualTo, "abc", c));
        assert!(!remarks(&info("10"), KnownOperator::Between, "5", c));
    }

    #[test]
    fn date_and_text_remarks() {
        let c = KnownCulture::Invariant;
        assert!(remarks(&info("2024-03-05"), KnownOperator::GreaterThan, "2024-01-01", c));
        assert!(remarks(&info("2024-03-05"), KnownOperator::EqualTo, "2024/03/05", c));
        assert!(remarks(&info("Paris"), KnownOperator::EqualTo, "Paris", c));
        assert!(!remarks(&info("Paris"), KnownOperator::EqualTo, "paris", c));
        assert!(remarks(&info("Paris"), KnownOperator::Like, "ari", c));
        assert!(remarks(&info("Lyon"), KnownOperator::In, "Paris Lyon", c));
        assert!(remarks(&info("b"), KnownOperator::LessThan, "c", c));
    }

    #[test]
    fn spanish_culture_reads_comma_decimals() {
        let value = FieldValueInfo::classify("1.234,5".into(), "Default", KnownCulture::EsEs);
        assert!(remarks(&value, KnownOperator::EqualTo, "1234,5", KnownCulture::EsEs));
    }

    #[test]
    fn when_change_toggles_on_change_only() {
        let mut state = ConditionState::default();
        let run = |state: &mut ConditionState, row, cur, prev| {
            when_change(state, row, cur, prev, "Odd", Some("Even"))
        };

        assert_eq!(run(&mut state, 0, "A", None), "Odd");
        assert_eq!(run(&mut state, 0, "A", None), "Odd");
        assert_eq!(run(&mut state, 1, "A", Some("A")), "Odd");
        assert_eq!(run(&mut state, 2, "B", Some("A")), "Even");
        assert_eq!(run(&mut state, 2, "B", Some("A")), "Even");
        assert_eq!(run(&mut state, 3, "C", Some("B")), "Odd");
    }

    #[test]
    fn when_change_without_second_style_keeps_first() {
        let mut state = ConditionState::default();
        assert_eq!(when_change(&mut state, 0, "A", None, "Only", None), "Only");
        assert_eq!(when_change(&mut state, 1, "B", Some("A"), "Only", None), "Only");
    }

    fn single_field(field: Field, conditions: Vec<Condition>) -> TableDefinition {
        TableDefinition::new("T")
            .unwrap()
            .with_field(field)
            .with_resources(Resources {
                conditions,
                ..Resources::default()
            })
    }

    /// Combined outcome for every row of the first column
    fn outcomes(table: &TableDefinition, values: &[&str]) -> Vec<ConditionOutcome> {
        let name = table.fields.get(0).unwrap().field_name().to_string();
        let input = MemoryInput::new(values.iter().map(|v| Row::new().with(name.as_str(), *v)).collect());
        let config = Config::default();
        let mut ctx = InputDataModel::new(table, &input).create_context().unwrap();
        let resolver = ValueResolver::for_context(&ctx, &config);
        let mut engine = ConditionEngine::new();

        ctx.set_current_field(0);
        let mut outcomes = Vec::new();
        for row in 0..ctx.filtered_len() {
            ctx.set_current_row(row);
            outcomes.push(engine.evaluate_all(&ctx, &resolver).unwrap());
        }
        outcomes
    }

    fn styles(table: &TableDefinition, values: &[&str]) -> Vec<Option<String>> {
        outcomes(table, values).into_iter().map(|o| o.style).collect()
    }

    fn style(name: &str) -> Option<String> {
        Some(name.to_string())
    }

    #[test]
    fn minimum_marks_smallest_number() {
        let table = single_field(
            Field::data("AMOUNT").unwrap(),
            vec![Condition::new("low", "AMOUNT", ConditionKind::Minimum { style: "Low".into() }).unwrap()],
        );

        assert_eq!(
            styles(&table, &["5", "-2", "7", "", "-2.00"]),
            vec![None, style("Low"), None, None, style("Low")]
        );
    }

    #[test]
    fn maximum_compares_dates() {
        let table = single_field(
            Field::data("HIRED").unwrap(),
            vec![Condition::new("last", "HIRED", ConditionKind::Maximum { style: "Top".into() }).unwrap()],
        );

        assert_eq!(
            styles(&table, &["2024-01-05", "2023-12-31", "2024-03-01"]),
            vec![None, None, style("Top")]
        );
    }

    #[test]
    fn extremes_ignore_text_columns() {
        let table = single_field(
            Field::data("CITY").unwrap(),
            vec![Condition::new("top", "CITY", ConditionKind::Maximum { style: "Top".into() }).unwrap()],
        );

        assert_eq!(styles(&table, &["Paris", "Lyon"]), vec![None, None]);
    }

    #[test]
    fn inactive_and_foreign_conditions_do_not_apply() {
        let inactive = Condition::new("zero", "AMOUNT", ConditionKind::Zero { style: "Alert".into() })
            .unwrap()
            .with_active(YesNo::No);
        let table = single_field(Field::data("AMOUNT").unwrap(), vec![inactive]);
        assert_eq!(styles(&table, &["0"]), vec![None]);

        let foreign = Condition::new("zero", "OTHER", ConditionKind::Zero { style: "Alert".into() }).unwrap();
        let table = single_field(Field::data("AMOUNT").unwrap(), vec![foreign.clone()]);
        let input = MemoryInput::new(vec![Row::new().with("AMOUNT", "0").with("OTHER", "0")]);
        let config = Config::default();
        let mut ctx = InputDataModel::new(&table, &input).create_context().unwrap();
        let resolver = ValueResolver::for_context(&ctx, &config);
        ctx.set_current_field(0);
        ctx.set_current_row(0);

        let result = ConditionEngine::new().evaluate(&ctx, &resolver, &foreign).unwrap();
        assert_eq!(result, ConditionResult::not_applied());
    }

    #[test]
    fn entire_row_style_survives_later_cell_conditions() {
        let zero = Condition::new("zero", "AMOUNT", ConditionKind::Zero { style: "Alert".into() })
            .unwrap()
            .with_entire_row();
        let negative = Condition::new(
            "neg",
            "AMOUNT",
            ConditionKind::Remarks {
                criterial: KnownOperator::LessOrEqualThan,
                style: "Red".into(),
                value: "0".into(),
            },
        )
        .unwrap();

        let table = single_field(Field::data("AMOUNT").unwrap(), vec![zero.clone(), negative.clone()]);
        assert_eq!(
            outcomes(&table, &["0", "-1", "4"]),
            vec![
                ConditionOutcome {
                    style: style("Red"),
                    entire_row_style: style("Alert"),
                },
                ConditionOutcome {
                    style: style("Red"),
                    entire_row_style: None,
                },
                ConditionOutcome::default(),
            ]
        );

        let table = single_field(Field::data("AMOUNT").unwrap(), vec![negative, zero]);
        assert_eq!(
            outcomes(&table, &["0"]),
            vec![ConditionOutcome {
                style: style("Alert"),
                entire_row_style: style("Alert"),
            }]
        );
    }

    #[test]
    fn when_change_stripes_hidden_columns() {
        let stripes = Condition::new(
            "stripes",
            "DEPT",
            ConditionKind::WhenChange {
                first_swap_style: "Even".into(),
                second_swap_style: Some("Odd".into()),
            },
        )
        .unwrap();
        let table = single_field(Field::data("DEPT").unwrap().hide_value(), vec![stripes]);

        assert_eq!(
            styles(&table, &["Sales", "Sales", "Ops", "Sales"]),
            vec![style("Even"), style("Even"), style("Odd"), style("Even")]
        );
    }
}
