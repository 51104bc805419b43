//! Group resources: several attributes joined into one cell

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::identifier::{check_field_name, check_identifier};
use crate::known::{KnownItemGroupSeparator, KnownTrimMode, YesNo};
use crate::row::Row;

fn default_separator() -> String {
    KnownItemGroupSeparator::NONE.to_string()
}

fn no() -> YesNo {
    YesNo::No
}

/// One member of a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupItem {
    /// Data attribute (or fixed piece) name
    pub name: String,

    /// Separator name (`Space`, `Comma`, `New Line`...) or literal text
    #[serde(default = "default_separator")]
    pub separator: String,

    #[serde(default = "no")]
    pub trim: YesNo,

    #[serde(default)]
    pub trim_mode: KnownTrimMode,
}

impl GroupItem {
    pub fn new(name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        check_field_name("Field", "Name", &name)?;
        Ok(Self {
            name,
            separator: default_separator(),
            trim: YesNo::No,
            trim_mode: KnownTrimMode::All,
        })
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_trim(mut self, mode: KnownTrimMode) -> Self {
        self.trim = YesNo::Yes;
        self.trim_mode = mode;
        self
    }

    /// Text inserted after this item
    pub fn separator_text(&self) -> &str {
        KnownItemGroupSeparator::resolve(&self.separator)
    }

    /// Apply this item's trim settings to a raw value
    pub fn parse_value<'a>(&self, value: &'a str) -> &'a str {
        if self.trim.is_yes() {
            self.trim_mode.apply(value)
        } else {
            value
        }
    }

    /// Value of this item's attribute in `row`
    pub fn value_of(&self, row: &Row) -> Result<String, ModelError> {
        row.attribute_any_case(&self.name)
            .map(|value| self.parse_value(value).to_string())
            .ok_or_else(|| ModelError::MissingAttribute(self.name.clone()))
    }
}

/// Named group of items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,

    #[serde(default)]
    pub fields: Vec<GroupItem>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        check_identifier("Group", "Name", &name)?;
        Ok(Self {
            name,
            fields: Vec::new(),
        })
    }

    pub fn with_item(mut self, item: GroupItem) -> Self {
        self.fields.push(item);
        self
    }

    /// True when any item breaks the line
    pub fn is_multiline(&self) -> bool {
        self.fields
            .iter()
            .any(|item| item.separator.eq_ignore_ascii_case(KnownItemGroupSeparator::NEW_LINE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_defaults_from_json() {
        let item: GroupItem = serde_json::from_str(r#"{"name": "CITY"}"#).unwrap();
        assert_eq!(item.separator, "None");
        assert_eq!(item.trim, YesNo::No);
        assert_eq!(item.trim_mode, KnownTrimMode::All);
        assert_eq!(item.separator_text(), "");
    }

    #[test]
    fn item_value_is_trimmed_on_request() {
        let row = Row::new().with("CITY", "  Lyon ");
        let plain = GroupItem::new("CITY").unwrap();
        let trimmed = GroupItem::new("city").unwrap().with_trim(KnownTrimMode::End);

        assert_eq!(plain.value_of(&row).unwrap(), "  Lyon ");
        assert_eq!(trimmed.value_of(&row).unwrap(), "  Lyon");
        assert_eq!(
            GroupItem::new("ZIP").unwrap().value_of(&row),
            Err(ModelError::MissingAttribute("ZIP".into()))
        );
    }

    #[test]
    fn multiline_detection() {
        let group = Group::new("Address")
            .unwrap()
            .with_item(GroupItem::new("STREET").unwrap().with_separator("new line"))
            .with_item(GroupItem::new("CITY").unwrap());
        assert!(group.is_multiline());

        let flat = Group::new("Name")
            .unwrap()
            .with_item(GroupItem::new("FIRST").unwrap().with_separator("Space"));
        assert!(!flat.is_multiline());
    }
}
