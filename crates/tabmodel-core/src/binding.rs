//! Static bindings
//!
//! A string attribute written as `{Key}` is a placeholder resolved from the
//! `[bindings]` table of the configuration before the model is evaluated.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::identifier::static_binding_key;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bindings {
    values: HashMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolve `raw` if it is a binding with a known key
    pub fn resolve<'a>(&'a self, raw: &'a str) -> &'a str {
        match static_binding_key(raw) {
            Some(key) => match self.get(key) {
                Some(value) => value,
                None => {
                    tracing::debug!(binding = raw, "unbound static binding left as is");
                    raw
                }
            },
            None => raw,
        }
    }

    /// Rewrite `target` in place when it is a bound placeholder
    pub fn apply(&self, target: &mut String) {
        let resolved = self.resolve(target);
        if resolved != target.as_str() {
            *target = resolved.to_string();
        }
    }
}

impl FromIterator<(String, String)> for Bindings {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_keys_only() {
        let mut bindings = Bindings::new();
        bindings.insert("AmountStyle", "Money");

        assert_eq!(bindings.resolve("{AmountStyle}"), "Money");
        assert_eq!(bindings.resolve("{Other}"), "{Other}");
        assert_eq!(bindings.resolve("Plain"), "Plain");

        let mut target = "{AmountStyle}".to_string();
        bindings.apply(&mut target);
        assert_eq!(target, "Money");
    }
}
