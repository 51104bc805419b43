//! A single record of the in-memory dataset

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One data record: attribute name -> raw text value, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    attributes: IndexMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy in tests and in-memory inputs
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Exact-name lookup
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Lookup trying the name as written, then upper-case, then lower-case
    pub fn attribute_any_case(&self, name: &str) -> Option<&str> {
        self.attribute(name)
            .or_else(|| self.attribute(&name.to_uppercase()))
            .or_else(|| self.attribute(&name.to_lowercase()))
    }

    /// Case-insensitive lookup over every attribute
    pub fn attribute_ignore_case(&self, name: &str) -> Option<&str> {
        self.attribute_any_case(name).or_else(|| {
            self.attributes
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        })
    }

    /// Position of an attribute in source order
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attributes.get_index_of(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            attributes: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_by_case() {
        let row = Row::new().with("NAME", "Ann").with("city", "Paris").with("Zip", "75001");

        assert_eq!(row.attribute("NAME"), Some("Ann"));
        assert_eq!(row.attribute("name"), None);
        assert_eq!(row.attribute_any_case("name"), Some("Ann"));
        assert_eq!(row.attribute_any_case("CITY"), Some("Paris"));
        assert_eq!(row.attribute_any_case("zip"), None);
        assert_eq!(row.attribute_ignore_case("zip"), Some("75001"));
    }

    #[test]
    fn keeps_source_order() {
        let row: Row = vec![("b", "1"), ("a", "2")].into_iter().collect();
        assert_eq!(row.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(row.index_of("a"), Some(1));
    }
}
