//! Conditional formatting rules
//!
//! A condition watches one field and, when it applies to the current row,
//! names the style that overrides the field's value style. Evaluation lives
//! in the engine crate; this module only holds the declarations.

use serde::{Deserialize, Serialize};

use crate::culture::KnownCulture;
use crate::error::ModelError;
use crate::identifier::{check_field_name, check_style_name};
use crate::known::{KnownOperator, YesNo};

fn no() -> YesNo {
    YesNo::No
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConditionKind {
    /// Row holding the column maximum
    Maximum { style: String },

    /// Row holding the column minimum
    Minimum { style: String },

    /// Value compared against a literal
    Remarks {
        #[serde(default)]
        criterial: KnownOperator,
        style: String,
        value: String,
    },

    /// Alternate styles each time the value changes
    WhenChange {
        first_swap_style: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        second_swap_style: Option<String>,
    },

    /// Value equal to zero
    Zero { style: String },
}

impl ConditionKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Maximum { .. } => "Maximum",
            Self::Minimum { .. } => "Minimum",
            Self::Remarks { .. } => "Remarks",
            Self::WhenChange { .. } => "WhenChange",
            Self::Zero { .. } => "Zero",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub key: String,

    #[serde(default)]
    pub active: YesNo,

    /// Field this condition watches
    pub field: String,

    /// Apply the style to every cell of the row, not only this field
    #[serde(default = "no")]
    pub entire_row: YesNo,

    /// Culture used to read numbers and dates
    #[serde(default)]
    pub locale: KnownCulture,

    #[serde(flatten)]
    pub kind: ConditionKind,
}

impl Condition {
    pub fn new(key: impl Into<String>, field: impl Into<String>, kind: ConditionKind) -> Result<Self, ModelError> {
        let key = key.into();
        let field = field.into();
        if key.trim().is_empty() {
            return Err(ModelError::EmptyValue {
                element: "Condition".into(),
                attribute: "Key".into(),
            });
        }
        check_field_name("Condition", "Field", &field)?;
        for style in kind_styles(&kind) {
            check_style_name(kind.name(), style)?;
        }

        Ok(Self {
            key,
            active: YesNo::Yes,
            field,
            entire_row: YesNo::No,
            locale: KnownCulture::Current,
            kind,
        })
    }

    pub fn with_entire_row(mut self) -> Self {
        self.entire_row = YesNo::Yes;
        self
    }

    pub fn with_locale(mut self, locale: KnownCulture) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_active(mut self, active: YesNo) -> Self {
        self.active = active;
        self
    }

    pub fn is_active(&self) -> bool {
        self.active.is_yes()
    }

    pub fn applies_to_entire_row(&self) -> bool {
        self.entire_row.is_yes()
    }

    /// Every style name this condition can produce
    pub fn styles(&self) -> Vec<&str> {
        kind_styles(&self.kind)
    }
}

fn kind_styles(kind: &ConditionKind) -> Vec<&str> {
    match kind {
        ConditionKind::Maximum { style }
        | ConditionKind::Minimum { style }
        | ConditionKind::Remarks { style, .. }
        | ConditionKind::Zero { style } => vec![style.as_str()],
        ConditionKind::WhenChange {
            first_swap_style,
            second_swap_style,
        } => std::iter::once(first_swap_style.as_str())
            .chain(second_swap_style.as_deref())
            .collect(),
    }
}

/// Outcome of evaluating a condition against the current cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionResult {
    pub can_apply: bool,
    pub style: String,
}

impl ConditionResult {
    pub fn applied(style: impl Into<String>) -> Self {
        Self {
            can_apply: true,
            style: style.into(),
        }
    }

    pub fn not_applied() -> Self {
        Self::default()
    }
}
