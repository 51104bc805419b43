//! Model validation
//!
//! Cross-checks a table definition: names, resource references, styles,
//! filters and conditions. Every finding becomes a [`Diagnostic`] whose
//! severity can be overridden from the configuration.

use std::collections::HashSet;

use tabmodel_core::identifier::{is_static_binding, is_valid_field_name, is_valid_identifier, is_valid_path};
use tabmodel_core::{
    Config, Diagnostic, DiagnosticCode, Field, FieldKind, Location, ModelError, Severity, TableDefinition,
};

/// Result of validating one table definition
#[derive(Debug, Clone)]
pub struct ModelValidation {
    /// Table name
    pub model: String,

    pub diagnostics: Vec<Diagnostic>,
}

impl ModelValidation {
    /// Validate `table`; `file_path` is attached to every location
    pub fn validate(table: &TableDefinition, config: &Config, file_path: Option<String>) -> Self {
        let mut validator = Validator {
            table,
            config,
            diagnostics: Vec::new(),
        };
        validator.run();

        let diagnostics = match file_path {
            Some(path) => validator
                .diagnostics
                .into_iter()
                .map(|d| d.in_file(path.clone()))
                .collect(),
            None => validator.diagnostics,
        };

        Self {
            model: table.name.clone(),
            diagnostics,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Warn)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warn).count()
    }
}

struct Validator<'a> {
    table: &'a TableDefinition,
    config: &'a Config,
    diagnostics: Vec<Diagnostic>,
}

impl Validator<'_> {
    fn report(&mut self, code: DiagnosticCode, default: Severity, element: String, message: String) {
        let severity = self.config.severity.get_severity(code, default);
        self.diagnostics
            .push(Diagnostic::new(code, severity, message).with_location(Location::new(element)));
    }

    fn run(&mut self) {
        self.check_names();
        self.check_duplicates();
        self.check_fields();
        self.check_styles();
        self.check_filters();
        self.check_conditions();
        self.check_references();
    }

    fn identifier(&mut self, element: String, value: &str) {
        if !is_valid_identifier(value) {
            self.report(
                DiagnosticCode::ModelInvalidIdentifier,
                Severity::Error,
                element,
                format!("'{value}' is not a valid identifier"),
            );
        }
    }

    fn field_name(&mut self, element: String, value: &str) {
        if !is_valid_field_name(value) {
            self.report(
                DiagnosticCode::ModelInvalidFieldName,
                Severity::Error,
                element,
                format!("'{value}' is not a valid field name"),
            );
        }
    }

    fn check_names(&mut self) {
        let table = self.table;
        self.identifier("name".into(), &table.name);

        let resources = &table.resources;
        for (i, style) in resources.styles.iter().enumerate() {
            self.identifier(format!("resources.styles[{i}].name"), &style.name);
        }
        for (i, fixed) in resources.fixed.iter().enumerate() {
            self.identifier(format!("resources.fixed[{i}].name"), &fixed.name);
            self.field_name(format!("resources.fixed[{i}].reference"), &fixed.reference);
            for (j, piece) in fixed.pieces.iter().enumerate() {
                self.identifier(format!("resources.fixed[{i}].pieces[{j}].name"), &piece.name);
                if piece.length < 1 || piece.to().is_none() {
                    self.report(
                        DiagnosticCode::ModelInvalidPiece,
                        Severity::Error,
                        format!("resources.fixed[{i}].pieces[{j}]"),
                        format!(
                            "Piece '{}' (from {}, length {}) is not a usable range",
                            piece.name, piece.from, piece.length
                        ),
                    );
                }
            }
        }
        for (i, group) in resources.groups.iter().enumerate() {
            self.identifier(format!("resources.groups[{i}].name"), &group.name);
            for (j, item) in group.fields.iter().enumerate() {
                self.field_name(format!("resources.groups[{i}].fields[{j}].name"), &item.name);
            }
        }
        for (i, filter) in resources.filters.iter().enumerate() {
            self.field_name(format!("resources.filters[{i}].field"), &filter.field);
        }
        for (i, condition) in resources.conditions.iter().enumerate() {
            self.field_name(format!("resources.conditions[{i}].field"), &condition.field);
        }
    }

    fn check_duplicates(&mut self) {
        let table = self.table;
        let resources = &table.resources;
        let collections: [(&str, Vec<&str>); 5] = [
            ("styles", resources.styles.iter().map(|s| s.name.as_str()).collect()),
            ("filters", resources.filters.iter().map(|f| f.key.as_str()).collect()),
            ("fixed", resources.fixed.iter().map(|f| f.name.as_str()).collect()),
            ("groups", resources.groups.iter().map(|g| g.name.as_str()).collect()),
            ("conditions", resources.conditions.iter().map(|c| c.key.as_str()).collect()),
        ];

        for (collection, names) in collections {
            let mut seen = HashSet::new();
            for (i, name) in names.into_iter().enumerate() {
                if !seen.insert(name) {
                    self.report(
                        DiagnosticCode::ModelDuplicateKey,
                        Severity::Error,
                        format!("resources.{collection}[{i}]"),
                        format!("'{name}' is declared more than once in {collection}"),
                    );
                }
            }
        }
    }

    fn check_fields(&mut self) {
        let table = self.table;
        for (i, field) in table.fields.iter().enumerate() {
            let element = format!("fields[{i}]");
            self.check_field_kind(&element, field);

            if field.width_value().is_nan() {
                self.report(
                    DiagnosticCode::FieldInvalidWidth,
                    Severity::Warn,
                    format!("{element}.width"),
                    format!("Width '{}' is neither a number nor 'Default'", field.width),
                );
            }

            for (part, style) in [
                ("header", &field.header.style),
                ("value", &field.value.style),
                ("aggregate", &field.aggregate.style),
            ] {
                self.style_reference(format!("{element}.{part}.style"), style, DiagnosticCode::StyleNotFound);
            }
        }
    }

    fn check_field_kind(&mut self, element: &str, field: &Field) {
        let table = self.table;
        let resources = &table.resources;
        match &field.kind {
            FieldKind::Data { name } | FieldKind::Packet { name, .. } => {
                self.field_name(format!("{element}.name"), name);
            }
            FieldKind::Gap => {}
            FieldKind::Group { name } => {
                if resources.group(name).is_none() {
                    self.report(
                        DiagnosticCode::FieldUnknownGroup,
                        Severity::Error,
                        format!("{element}.name"),
                        format!("Group '{name}' is not declared in resources"),
                    );
                }
            }
            FieldKind::Fixed { pieces, piece } => match resources.fixed(pieces) {
                None => self.report(
                    DiagnosticCode::FieldUnknownFixed,
                    Severity::Error,
                    format!("{element}.pieces"),
                    format!("Fixed-width resource '{pieces}' is not declared in resources"),
                ),
                Some(fixed) if fixed.piece(piece).is_none() => self.report(
                    DiagnosticCode::FieldUnknownPiece,
                    Severity::Error,
                    format!("{element}.piece"),
                    format!("Piece '{piece}' is not defined by '{pieces}'"),
                ),
                Some(_) => {}
            },
        }
    }

    fn style_reference(&mut self, element: String, style: &str, code: DiagnosticCode) {
        if self.table.resources.styles.contains(style) {
            return;
        }

        let message = if is_static_binding(style) {
            format!("Style binding '{style}' is not bound")
        } else {
            format!("Style '{style}' is not declared in resources")
        };
        let severity = self.config.severity.get_severity(code, Severity::Error);
        self.diagnostics.push(
            Diagnostic::new(code, severity, message)
                .with_location(Location::new(element))
                .with_comparison("style declared in resources", style),
        );
    }

    fn check_styles(&mut self) {
        let table = self.table;
        let styles = &table.resources.styles;
        let mut reported_cycles = HashSet::new();

        for (i, style) in styles.iter().enumerate() {
            match styles.resolve(&style.name) {
                Ok(_) => {}
                Err(ModelError::StyleInheritanceCycle(chain)) => {
                    let mut members: Vec<String> = chain.clone();
                    members.sort();
                    members.dedup();
                    if reported_cycles.insert(members) {
                        self.report(
                            DiagnosticCode::StyleInheritanceCycle,
                            Severity::Error,
                            format!("resources.styles[{i}].inherits"),
                            format!("Style inheritance cycle: {}", chain.join(" -> ")),
                        );
                    }
                }
                Err(ModelError::UnknownResource { name, .. }) => self.report(
                    DiagnosticCode::StyleNotFound,
                    Severity::Error,
                    format!("resources.styles[{i}].inherits"),
                    format!("Style '{}' inherits from undeclared style '{name}'", style.name),
                ),
                Err(err) => self.report(
                    DiagnosticCode::StyleNotFound,
                    Severity::Error,
                    format!("resources.styles[{i}]"),
                    err.to_string(),
                ),
            }
        }
    }

    fn check_filters(&mut self) {
        let table = self.table;
        if let Some(key) = &table.filter {
            if table.resources.filter(key).is_none() {
                self.report(
                    DiagnosticCode::FilterNotFound,
                    Severity::Error,
                    "filter".into(),
                    format!("Filter '{key}' is not declared in resources"),
                );
            }
        }

        for (i, filter) in table.resources.filters.iter().enumerate() {
            if let Err(err) = filter.build_expression() {
                self.report(
                    DiagnosticCode::FilterInvalidExpression,
                    Severity::Error,
                    format!("resources.filters[{i}].value"),
                    err.to_string(),
                );
            }
        }
    }

    fn check_conditions(&mut self) {
        let table = self.table;
        for (i, condition) in table.resources.conditions.iter().enumerate() {
            if table.fields.position_of(&condition.field).is_none() {
                self.report(
                    DiagnosticCode::ConditionUnknownField,
                    Severity::Warn,
                    format!("resources.conditions[{i}].field"),
                    format!(
                        "Condition '{}' watches field '{}' which the table does not have",
                        condition.key, condition.field
                    ),
                );
            }

            for style in condition.styles() {
                self.style_reference(
                    format!("resources.conditions[{i}].style"),
                    style,
                    DiagnosticCode::ConditionMissingStyle,
                );
            }
        }
    }

    fn check_references(&mut self) {
        let table = self.table;
        for (i, reference) in table.references.iter().enumerate() {
            if !is_valid_path(&reference.path) {
                self.report(
                    DiagnosticCode::ModelInvalidPath,
                    Severity::Error,
                    format!("references[{i}].path"),
                    format!("Path '{}' is not valid", reference.path),
                );
            }
        }
    }
}
