//! Evaluation context
//!
//! [`ModelContext`] holds the dataset a table is evaluated against (raw and
//! filtered rows) and the cursor of the cell being evaluated. Build one per
//! evaluation through [`InputDataModel::create_context`] and pass it to the
//! engine explicitly.

use std::fmt;

use tabmodel_core::{encode_field_name, Field, Reference, Row, TableDefinition};

use crate::input::{DataInput, InputError};

/// Everything needed to evaluate a table
pub struct InputDataModel<'a> {
    pub table: &'a TableDefinition,
    pub input: &'a dyn DataInput,

    /// Filter key; defaults to the table's own filter
    pub current_filter: Option<String>,

    pub references: Vec<Reference>,
}

impl<'a> InputDataModel<'a> {
    pub fn new(table: &'a TableDefinition, input: &'a dyn DataInput) -> Self {
        Self {
            table,
            input,
            current_filter: table.filter.clone(),
            references: table.references.clone(),
        }
    }

    pub fn with_filter(mut self, key: impl Into<String>) -> Self {
        self.current_filter = Some(key.into());
        self
    }

    pub fn without_filter(mut self) -> Self {
        self.current_filter = None;
        self
    }

    pub fn with_references(mut self, references: Vec<Reference>) -> Self {
        self.references = references;
        self
    }

    /// Read the input and apply the current filter
    pub fn create_context(self) -> Result<ModelContext<'a>, InputError> {
        let raw = self.input.rows()?;
        let filtered = filter_rows(self.table, self.current_filter.as_deref(), &raw)?;

        tracing::debug!(
            table = %self.table.name,
            provider = self.input.name(),
            raw = raw.len(),
            filtered = filtered.len(),
            "created model context"
        );

        Ok(ModelContext {
            table: self.table,
            provider: self.input.name().to_string(),
            special_chars: self.input.special_chars().to_vec(),
            references: self.references,
            raw,
            filtered,
            current_row: 0,
            current_col: 0,
            current_field: 0,
        })
    }
}

fn filter_rows(table: &TableDefinition, key: Option<&str>, raw: &[Row]) -> Result<Vec<usize>, InputError> {
    let all = || (0..raw.len()).collect();

    let key = match key.map(str::trim) {
        Some(key) if !key.is_empty() => key,
        _ => return Ok(all()),
    };

    let Some(filter) = table.resources.filter(key) else {
        tracing::warn!(filter = key, table = %table.name, "filter not found, using unfiltered rows");
        return Ok(all());
    };

    if !filter.is_active() {
        tracing::debug!(filter = key, "filter inactive, using unfiltered rows");
        return Ok(all());
    }

    let expression = filter.build_expression()?;
    Ok(raw
        .iter()
        .enumerate()
        .filter(|(_, row)| expression.matches(row))
        .map(|(index, _)| index)
        .collect())
}

/// Dataset snapshot plus the cursor of the cell being evaluated
pub struct ModelContext<'a> {
    table: &'a TableDefinition,
    provider: String,
    special_chars: Vec<char>,
    references: Vec<Reference>,
    raw: Vec<Row>,
    filtered: Vec<usize>,
    current_row: usize,
    current_col: usize,
    current_field: usize,
}

impl<'a> ModelContext<'a> {
    pub fn table(&self) -> &'a TableDefinition {
        self.table
    }

    pub fn provider_name(&self) -> &str {
        &self.provider
    }

    pub fn special_chars(&self) -> &[char] {
        &self.special_chars
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn raw_rows(&self) -> &[Row] {
        &self.raw
    }

    pub fn filtered_rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.filtered.iter().map(move |&index| &self.raw[index])
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Row at `index` of the filtered rows
    pub fn filtered_row(&self, index: usize) -> Option<&Row> {
        self.filtered.get(index).map(|&i| &self.raw[i])
    }

    /// Index into the filtered rows
    pub fn current_row_index(&self) -> usize {
        self.current_row
    }

    pub fn set_current_row(&mut self, index: usize) {
        self.current_row = index;
    }

    pub fn current_row(&self) -> Option<&Row> {
        self.filtered_row(self.current_row)
    }

    /// Filtered row before the current one
    pub fn previous_row(&self) -> Option<&Row> {
        self.current_row.checked_sub(1).and_then(|i| self.filtered_row(i))
    }

    /// Output column, which differs from the field index when writers skip
    /// hidden fields
    pub fn current_col(&self) -> usize {
        self.current_col
    }

    pub fn set_current_col(&mut self, col: usize) {
        self.current_col = col;
    }

    pub fn current_field_index(&self) -> usize {
        self.current_field
    }

    pub fn set_current_field(&mut self, index: usize) {
        self.current_field = index;
    }

    pub fn current_field(&self) -> Option<&'a Field> {
        self.table.fields.get(self.current_field)
    }

    /// Attribute name a field name is stored under in this dataset
    pub fn attribute_name(&self, name: &str) -> String {
        encode_field_name(name, &self.special_chars)
    }

    /// Non-empty values of an attribute across the filtered rows
    pub fn field_values(&self, name: &str) -> Vec<&str> {
        let attribute = self.attribute_name(name);
        self.filtered_rows()
            .filter_map(|row| row.attribute_any_case(&attribute))
            .filter(|value| !value.is_empty())
            .collect()
    }
}

impl fmt::Display for ModelContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Model=\"{}\", Provider=\"{}\"", self.table.name, self.provider)
    }
}

impl fmt::Debug for ModelContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelContext")
            .field("table", &self.table.name)
            .field("provider", &self.provider)
            .field("raw", &self.raw.len())
            .field("filtered", &self.filtered.len())
            .field("current_row", &self.current_row)
            .field("current_field", &self.current_field)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryInput;
    use tabmodel_core::{Filter, KnownOperator, Resources, YesNo};

    fn table(active: YesNo) -> TableDefinition {
        TableDefinition::new("Sales")
            .unwrap()
            .with_field(Field::data("CITY").unwrap())
            .with_field(Field::data("#AMOUNT").unwrap())
            .with_resources(Resources {
                filters: vec![Filter::new("Big", "_x0023_AMOUNT", KnownOperator::GreaterThan, "10")
                    .unwrap()
                    .with_active(active)],
                ..Resources::default()
            })
    }

    fn input() -> MemoryInput {
        MemoryInput::new(vec![
            Row::new().with("CITY", "Paris").with("_x0023_AMOUNT", "5"),
            Row::new().with("CITY", "Lyon").with("_x0023_AMOUNT", "50"),
            Row::new().with("CITY", "Nice").with("_x0023_AMOUNT", ""),
        ])
    }

    #[test]
    fn filters_only_with_active_known_filter() {
        let table = table(YesNo::Yes);
        let input = input();

        let all = InputDataModel::new(&table, &input).create_context().unwrap();
        assert_eq!(all.filtered_len(), 3);

        let big = InputDataModel::new(&table, &input).with_filter("Big").create_context().unwrap();
        assert_eq!(big.filtered_len(), 1);
        assert_eq!(big.raw_rows().len(), 3);
        assert_eq!(big.filtered_row(0).unwrap().attribute("CITY"), Some("Lyon"));

        let unknown = InputDataModel::new(&table, &input).with_filter("Nope").create_context().unwrap();
        assert_eq!(unknown.filtered_len(), 3);

        let inactive_table = self::table(YesNo::No);
        let inactive = InputDataModel::new(&inactive_table, &input)
            .with_filter("Big")
            .create_context()
            .unwrap();
        assert_eq!(inactive.filtered_len(), 3);
    }

    #[test]
    fn cursors_and_values() {
        let table = table(YesNo::Yes);
        let input = input();
        let mut ctx = InputDataModel::new(&table, &input).create_context().unwrap();

        ctx.set_current_row(1);
        ctx.set_current_field(1);
        assert_eq!(ctx.current_row().unwrap().attribute("CITY"), Some("Lyon"));
        assert_eq!(ctx.previous_row().unwrap().attribute("CITY"), Some("Paris"));
        assert_eq!(ctx.current_field().unwrap().field_name(), "#AMOUNT");

        assert_eq!(ctx.field_values("#AMOUNT"), vec!["5", "50"]);
        assert_eq!(ctx.to_string(), "Model=\"Sales\", Provider=\"MemoryInput\"");
    }
}
