//! Diagnostic codes produced by model validation
//!
//! Codes are part of the report format. Add new codes, never rename or
//! remove existing ones.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Model structure
    /// Model file cannot be read or parsed
    ModelParseError,

    /// A name attribute is not a valid identifier
    ModelInvalidIdentifier,

    /// A field attribute is not a valid field name
    ModelInvalidFieldName,

    /// A reference path is not usable
    ModelInvalidPath,

    /// Two resources of one collection share a name or key
    ModelDuplicateKey,

    /// Piece has a zero length or a range past the addressable end
    ModelInvalidPiece,

    // Fields
    /// Fixed field names a fixed-width resource that does not exist
    FieldUnknownFixed,

    /// Fixed field names a piece its resource does not define
    FieldUnknownPiece,

    /// Group field names a group that does not exist
    FieldUnknownGroup,

    /// Width is neither an integer nor `Default`
    FieldInvalidWidth,

    // Styles
    StyleNotFound,
    StyleInheritanceCycle,

    // Filters
    /// Table filter key has no matching filter resource
    FilterNotFound,

    /// Filter value cannot be compiled for its operator
    FilterInvalidExpression,

    // Conditions
    /// Condition watches a field the table does not have
    ConditionUnknownField,

    /// Condition produces a style that does not exist
    ConditionMissingStyle,

    // General
    Info,
    Warning,
}

impl DiagnosticCode {
    /// Stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ModelParseError => "MODEL_PARSE_ERROR",
            Self::ModelInvalidIdentifier => "MODEL_INVALID_IDENTIFIER",
            Self::ModelInvalidFieldName => "MODEL_INVALID_FIELD_NAME",
            Self::ModelInvalidPath => "MODEL_INVALID_PATH",
            Self::ModelDuplicateKey => "MODEL_DUPLICATE_KEY",
            Self::ModelInvalidPiece => "MODEL_INVALID_PIECE",
            Self::FieldUnknownFixed => "FIELD_UNKNOWN_FIXED",
            Self::FieldUnknownPiece => "FIELD_UNKNOWN_PIECE",
            Self::FieldUnknownGroup => "FIELD_UNKNOWN_GROUP",
            Self::FieldInvalidWidth => "FIELD_INVALID_WIDTH",
            Self::StyleNotFound => "STYLE_NOT_FOUND",
            Self::StyleInheritanceCycle => "STYLE_INHERITANCE_CYCLE",
            Self::FilterNotFound => "FILTER_NOT_FOUND",
            Self::FilterInvalidExpression => "FILTER_INVALID_EXPRESSION",
            Self::ConditionUnknownField => "CONDITION_UNKNOWN_FIELD",
            Self::ConditionMissingStyle => "CONDITION_MISSING_STYLE",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    /// Fails `tabmodel validate`
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Where in a model document a diagnostic points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Model file, when validating from disk
    pub file: Option<String>,

    /// Element path inside the model, e.g. `fields[2].value.style`
    pub element: String,
}

impl Location {
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            file: None,
            element: element.into(),
        }
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}#{}", file, self.element),
            None => write!(f, "{}", self.element),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,

    pub severity: Severity,

    pub message: String,

    pub location: Option<Location>,

    /// What the model should hold (for reference diagnostics)
    pub expected: Option<String>,

    /// What the model actually holds
    pub actual: Option<String>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            location: None,
            expected: None,
            actual: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_comparison(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }

    /// Attach the model file to the location
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        let file = file.into();
        self.location = Some(match self.location.take() {
            Some(location) => location.in_file(file),
            None => Location::new("").in_file(file),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_code_stability() {
        assert_eq!(DiagnosticCode::StyleNotFound.as_str(), "STYLE_NOT_FOUND");
        assert_eq!(DiagnosticCode::FieldUnknownPiece.as_str(), "FIELD_UNKNOWN_PIECE");

        let json = serde_json::to_string(&DiagnosticCode::ConditionMissingStyle).unwrap();
        assert_eq!(json, "\"CONDITION_MISSING_STYLE\"");
    }

    #[test]
    fn diagnostic_serialization() {
        let diag = Diagnostic::new(DiagnosticCode::StyleNotFound, Severity::Error, "Style 'Money' not found")
            .with_location(Location::new("fields[1].value.style"))
            .in_file("models/sales.json");

        assert_eq!(
            diag.location.as_ref().unwrap().to_string(),
            "models/sales.json#fields[1].value.style"
        );
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("STYLE_NOT_FOUND"));
        assert!(json.contains("error"));
    }
}
