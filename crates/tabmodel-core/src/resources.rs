//! Named resources of a table, resolved by name at evaluation time

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::filter::Filter;
use crate::fixed::FixedWidth;
use crate::group::Group;
use crate::style::{Style, StylesCollection};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default)]
    pub styles: StylesCollection,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixed: Vec<FixedWidth>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl Resources {
    pub fn style(&self, name: &str) -> Option<&Style> {
        self.styles.get(name)
    }

    pub fn filter(&self, key: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.key == key)
    }

    pub fn fixed(&self, name: &str) -> Option<&FixedWidth> {
        self.fixed.iter().find(|f| f.name == name)
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn condition(&self, key: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.key == key)
    }

    /// Conditions watching `field`, in declaration order
    pub fn conditions_for(&self, field: &str) -> Vec<&Condition> {
        self.conditions
            .iter()
            .filter(|c| c.field.eq_ignore_ascii_case(field))
            .collect()
    }
}
