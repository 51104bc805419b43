//! Naming rules for model elements
//!
//! Resource names (styles, pieces, conditions, tables) are identifiers.
//! Data field names are looser because source systems prefix columns with
//! `#`, `*` or `@`; those prefixes are encoded before lookup, see
//! [`encode_field_name`].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ModelError;

/// Characters that source systems put in front of column names
pub const DEFAULT_SPECIAL_CHARS: [char; 3] = ['#', '*', '@'];

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_\-\.]*$").expect("identifier pattern is valid")
});

static FIELD_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_#*@][A-Za-z0-9_\-\. #*@]*$").expect("field name pattern is valid")
});

static STATIC_BINDING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{([A-Za-z_][A-Za-z0-9_\-\.]*)\}$").expect("binding pattern is valid")
});

/// Check whether `value` is a valid resource identifier
pub fn is_valid_identifier(value: &str) -> bool {
    IDENTIFIER.is_match(value)
}

/// Check whether `value` is a valid data field name
pub fn is_valid_field_name(value: &str) -> bool {
    FIELD_NAME.is_match(value)
}

/// Check whether `value` is a valid reference path
pub fn is_valid_path(value: &str) -> bool {
    !value.trim().is_empty()
        && !value
            .chars()
            .any(|c| c.is_control() || matches!(c, '<' | '>' | '|' | '"' | '?'))
}

/// Check whether `value` is a static binding such as `{Currency}`
pub fn is_static_binding(value: &str) -> bool {
    STATIC_BINDING.is_match(value)
}

/// Extract the key of a static binding (`{Currency}` -> `Currency`)
pub fn static_binding_key(value: &str) -> Option<&str> {
    STATIC_BINDING
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Encode a field name that starts with a special character
///
/// `#AMOUNT` becomes `_x0023_AMOUNT`, the form the data inputs store the
/// column under. Names without a leading special character are returned
/// unchanged.
pub fn encode_field_name(name: &str, special_chars: &[char]) -> String {
    let Some(first) = name.chars().next() else {
        return String::new();
    };

    if !special_chars.contains(&first) || !first.is_ascii() {
        return name.to_string();
    }

    let cleaned = name.replace(first, "");
    format!("_x{:04X}_{}", first as u32, cleaned)
}

pub(crate) fn check_identifier(element: &str, attribute: &str, value: &str) -> Result<(), ModelError> {
    if is_valid_identifier(value) {
        Ok(())
    } else {
        Err(ModelError::identifier(element, attribute, value))
    }
}

pub(crate) fn check_field_name(element: &str, attribute: &str, value: &str) -> Result<(), ModelError> {
    if is_valid_field_name(value) {
        Ok(())
    } else {
        Err(ModelError::field_name(element, attribute, value))
    }
}

/// Style attributes may hold either an identifier or a static binding
pub(crate) fn check_style_name(element: &str, value: &str) -> Result<(), ModelError> {
    if is_static_binding(value) {
        return Ok(());
    }
    check_identifier(element, "Style", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(is_valid_identifier("Default"));
        assert!(is_valid_identifier("header_style-2.bold"));
        assert!(!is_valid_identifier("2header"));
        assert!(!is_valid_identifier("with space"));
        assert!(!is_valid_identifier(""));
    }

    #[test]
    fn field_names_allow_prefixes_and_spaces() {
        assert!(is_valid_field_name("#AMOUNT"));
        assert!(is_valid_field_name("@Customer Name"));
        assert!(is_valid_field_name("_x0023_AMOUNT"));
        assert!(!is_valid_field_name("1column"));
        assert!(!is_valid_field_name("a/b"));
    }

    #[test]
    fn paths() {
        assert!(is_valid_path("~/styles"));
        assert!(is_valid_path("C:\\models\\table.json"));
        assert!(!is_valid_path("what?"));
        assert!(is_valid_path("reports/*.dll"));
        assert!(!is_valid_path("a|b"));
        assert!(!is_valid_path("   "));
    }

    #[test]
    fn static_bindings() {
        assert!(is_static_binding("{Currency}"));
        assert!(!is_static_binding("Currency"));
        assert!(!is_static_binding("{1x}"));
        assert_eq!(static_binding_key("{Currency}"), Some("Currency"));
        assert_eq!(static_binding_key("Currency"), None);
    }

    #[test]
    fn encodes_special_prefix() {
        assert_eq!(encode_field_name("#AMOUNT", &DEFAULT_SPECIAL_CHARS), "_x0023_AMOUNT");
        assert_eq!(encode_field_name("*KEY", &DEFAULT_SPECIAL_CHARS), "_x002A_KEY");
        assert_eq!(encode_field_name("@ID", &DEFAULT_SPECIAL_CHARS), "_x0040_ID");
        assert_eq!(encode_field_name("AMOUNT", &DEFAULT_SPECIAL_CHARS), "AMOUNT");
        assert_eq!(encode_field_name("#AMOUNT", &[]), "#AMOUNT");
    }
}
