//! Table definition, the root of a model document

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::binding::Bindings;
use crate::condition::ConditionKind;
use crate::error::ModelError;
use crate::field::{Field, FieldKind, FieldsCollection};
use crate::identifier::check_identifier;
use crate::known::YesNo;
use crate::reference::Reference;
use crate::resources::Resources;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,

    #[serde(default)]
    pub show: YesNo,

    #[serde(default)]
    pub show_column_headers: YesNo,

    #[serde(default)]
    pub show_data_values: YesNo,

    /// Key of the filter applied to the dataset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    #[serde(default)]
    pub fields: FieldsCollection,

    #[serde(default)]
    pub resources: Resources,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        check_identifier("Table", "Name", &name)?;
        Ok(Self {
            name,
            alias: String::new(),
            show: YesNo::Yes,
            show_column_headers: YesNo::Yes,
            show_data_values: YesNo::Yes,
            filter: None,
            fields: FieldsCollection::default(),
            resources: Resources::default(),
            references: Vec::new(),
        })
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_resources(mut self, resources: Resources) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>) -> Result<Self, ModelError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ModelError::EmptyValue {
                element: "Table".into(),
                attribute: "Filter".into(),
            });
        }
        self.filter = Some(key);
        Ok(self)
    }

    /// Parse a model document
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let table: TableDefinition =
            serde_json::from_str(json).map_err(|e| ModelError::Parse(e.to_string()))?;

        check_identifier("Table", "Name", &table.name)?;
        if table.filter.as_deref().is_some_and(|f| f.trim().is_empty()) {
            return Err(ModelError::EmptyValue {
                element: "Table".into(),
                attribute: "Filter".into(),
            });
        }

        Ok(table)
    }

    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ModelError::Io(e.to_string()))?;
        let table = Self::from_json(&contents)?;
        tracing::debug!(path = %path.display(), table = %table.name, fields = table.fields.len(), "loaded model");
        Ok(table)
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        serde_json::to_string_pretty(self).map_err(|e| ModelError::Serialize(e.to_string()))
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ModelError> {
        std::fs::write(path, self.to_json()?).map_err(|e| ModelError::Io(e.to_string()))
    }

    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }

    /// SHA-256 of the compact JSON form, hex encoded
    pub fn fingerprint(&self) -> Result<String, ModelError> {
        let canonical = serde_json::to_vec(self).map_err(|e| ModelError::Serialize(e.to_string()))?;
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Replace `{Key}` placeholders in bindable attributes
    pub fn apply_bindings(&mut self, bindings: &Bindings) {
        if bindings.is_empty() {
            return;
        }

        if let Some(filter) = self.filter.as_mut() {
            bindings.apply(filter);
        }

        for field in self.fields.iter_mut() {
            if let FieldKind::Data { name } = &mut field.kind {
                bindings.apply(name);
            }
            bindings.apply(&mut field.width);
            bindings.apply(&mut field.header.style);
            bindings.apply(&mut field.value.style);
            bindings.apply(&mut field.aggregate.style);
        }

        for filter in &mut self.resources.filters {
            bindings.apply(&mut filter.field);
            bindings.apply(&mut filter.value);
        }

        for condition in &mut self.resources.conditions {
            match &mut condition.kind {
                ConditionKind::Maximum { style }
                | ConditionKind::Minimum { style }
                | ConditionKind::Zero { style } => bindings.apply(style),
                ConditionKind::Remarks { style, value, .. } => {
                    bindings.apply(style);
                    bindings.apply(value);
                }
                ConditionKind::WhenChange {
                    first_swap_style,
                    second_swap_style,
                } => {
                    bindings.apply(first_swap_style);
                    if let Some(second) = second_swap_style.as_mut() {
                        bindings.apply(second);
                    }
                }
            }
        }
    }
}
