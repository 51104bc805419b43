//! Evaluated grid of a table
//!
//! A [`TableSnapshot`] is what a writer would render: header captions,
//! cell values with their effective style and the aggregate rows.

use serde::Serialize;

use tabmodel_core::{Field, KnownAggregateLocation};
use tabmodel_data::ModelContext;

use crate::aggregate::{aggregate_text, compute_aggregate};
use crate::condition::ConditionEngine;
use crate::error::EvalError;
use crate::value::ValueResolver;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotCell {
    pub value: String,

    /// Style name; a condition style when one applied
    pub style: String,
}

impl SnapshotCell {
    fn new(value: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            style: style.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSnapshot {
    pub table: String,

    /// Empty when the table hides its column headers
    pub headers: Vec<SnapshotCell>,

    /// Empty when the table hides its data values
    pub rows: Vec<Vec<SnapshotCell>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_aggregates: Option<Vec<SnapshotCell>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_aggregates: Option<Vec<SnapshotCell>>,
}

impl TableSnapshot {
    /// Walk the filtered rows of `ctx` and evaluate every cell
    ///
    /// The context cursor is left on the last evaluated cell.
    pub fn build(
        ctx: &mut ModelContext<'_>,
        engine: &mut ConditionEngine,
        resolver: &ValueResolver<'_>,
    ) -> Result<Self, EvalError> {
        let table = ctx.table();
        tracing::debug!(table = %table.name, rows = ctx.filtered_len(), "building snapshot");

        let headers = if table.show_column_headers.is_yes() {
            table.fields.iter().map(header_cell).collect()
        } else {
            Vec::new()
        };

        let mut rows = Vec::new();
        if table.show_data_values.is_yes() {
            for row_index in 0..ctx.filtered_len() {
                ctx.set_current_row(row_index);
                rows.push(build_row(ctx, engine, resolver)?);
            }
        }

        Ok(Self {
            table: table.name.clone(),
            headers,
            rows,
            top_aggregates: aggregate_row(ctx, resolver, KnownAggregateLocation::Top)?,
            bottom_aggregates: aggregate_row(ctx, resolver, KnownAggregateLocation::Bottom)?,
        })
    }

    pub fn column_count(&self) -> usize {
        self.headers
            .len()
            .max(self.rows.first().map_or(0, Vec::len))
    }
}

fn header_cell(field: &Field) -> SnapshotCell {
    let text = if field.header.show.is_yes() {
        field.header_text()
    } else {
        ""
    };
    SnapshotCell::new(text, &field.header.style)
}

fn build_row(
    ctx: &mut ModelContext<'_>,
    engine: &mut ConditionEngine,
    resolver: &ValueResolver<'_>,
) -> Result<Vec<SnapshotCell>, EvalError> {
    let table = ctx.table();
    let mut cells = Vec::with_capacity(table.fields.len());
    let mut row_style = None;

    for (index, field) in table.fields.iter().enumerate() {
        ctx.set_current_field(index);
        ctx.set_current_col(index);

        let row_index = ctx.current_row_index();
        let row = ctx.current_row().ok_or(EvalError::NoCurrentRow(row_index))?;
        let value = resolver.raw_value(field, row)?;

        let outcome = engine.evaluate_all(ctx, resolver)?;
        if outcome.entire_row_style.is_some() {
            row_style = outcome.entire_row_style;
        }
        let style = outcome.style.unwrap_or_else(|| field.value.style.clone());
        cells.push(SnapshotCell { value, style });
    }

    if let Some(style) = row_style {
        for cell in &mut cells {
            cell.style.clone_from(&style);
        }
    }

    Ok(cells)
}

fn aggregate_row(
    ctx: &ModelContext<'_>,
    resolver: &ValueResolver<'_>,
    location: KnownAggregateLocation,
) -> Result<Option<Vec<SnapshotCell>>, EvalError> {
    let table = ctx.table();
    if !table.fields.has_visible_aggregates(location) {
        return Ok(None);
    }

    let culture = resolver.culture();
    let mut cells = Vec::with_capacity(table.fields.len());
    for field in &table.fields {
        if !field.aggregate.is_visible_at(location) {
            cells.push(SnapshotCell::new("", &field.aggregate.style));
            continue;
        }
        let value = compute_aggregate(ctx, resolver, field)?;
        cells.push(SnapshotCell::new(
            aggregate_text(field, value, culture),
            &field.aggregate.style,
        ));
    }

    Ok(Some(cells))
}
