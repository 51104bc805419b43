//! Style resources and the inheritance protocol
//!
//! Styles are looked up by name at evaluation time. A style may name a
//! parent through `inherits`; every attribute left unset on the child is
//! taken from the parent chain.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::identifier::check_identifier;
use crate::known::YesNo;

/// Name of the style every field falls back to
pub const DEFAULT_STYLE_NAME: &str = "Default";

const DEFAULT_FONT_NAME: &str = "Segoe UI";
const DEFAULT_FONT_SIZE: f32 = 10.0;
const DEFAULT_FONT_COLOR: &str = "Black";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KnownHorizontalAlignment {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KnownVerticalAlignment {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownBorderPosition {
    Left,
    Top,
    Right,
    Bottom,
}

/// Font settings; unset values are inherited
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<YesNo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<YesNo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<YesNo>,
}

impl FontModel {
    pub fn effective_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_FONT_NAME)
    }

    pub fn effective_size(&self) -> f32 {
        self.size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn effective_color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_FONT_COLOR)
    }

    pub fn is_bold(&self) -> bool {
        self.bold.is_some_and(YesNo::is_yes)
    }

    pub fn is_italic(&self) -> bool {
        self.italic.is_some_and(YesNo::is_yes)
    }

    pub fn is_underline(&self) -> bool {
        self.underline.is_some_and(YesNo::is_yes)
    }

    fn inherit_from(&mut self, parent: &FontModel) {
        if self.name.is_none() {
            self.name = parent.name.clone();
        }
        if self.size.is_none() {
            self.size = parent.size;
        }
        if self.color.is_none() {
            self.color = parent.color.clone();
        }
        self.bold = self.bold.or(parent.bold);
        self.italic = self.italic.or(parent.italic);
        self.underline = self.underline.or(parent.underline);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentAlignment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<KnownHorizontalAlignment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<KnownVerticalAlignment>,
}

/// Cell content settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentModel {
    #[serde(default)]
    pub alignment: ContentAlignment,

    /// Background color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Display format understood by the writer (e.g. `#,##0.00`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl ContentModel {
    fn inherit_from(&mut self, parent: &ContentModel) {
        self.alignment.horizontal = self.alignment.horizontal.or(parent.alignment.horizontal);
        self.alignment.vertical = self.alignment.vertical.or(parent.alignment.vertical);
        if self.color.is_none() {
            self.color = parent.color.clone();
        }
        if self.format.is_none() {
            self.format = parent.format.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub position: KnownBorderPosition,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default)]
    pub show: YesNo,
}

/// A named style resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits: Option<String>,

    #[serde(default)]
    pub font: FontModel,

    #[serde(default)]
    pub content: ContentModel,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub borders: Vec<Border>,
}

impl Style {
    /// Create an empty style with a validated name
    pub fn new(name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        check_identifier("Style", "Name", &name)?;
        Ok(Self::unchecked(name))
    }

    fn unchecked(name: String) -> Self {
        Self {
            name,
            inherits: None,
            font: FontModel::default(),
            content: ContentModel::default(),
            borders: Vec::new(),
        }
    }

    /// The implicit style used when a field names none or an unknown one
    pub fn default_style() -> Self {
        Self::unchecked(DEFAULT_STYLE_NAME.to_string())
    }

    pub fn with_inherits(mut self, parent: impl Into<String>) -> Self {
        self.inherits = Some(parent.into());
        self
    }

    pub fn with_font(mut self, font: FontModel) -> Self {
        self.font = font;
        self
    }

    pub fn with_content(mut self, content: ContentModel) -> Self {
        self.content = content;
        self
    }

    pub fn border(&self, position: KnownBorderPosition) -> Option<&Border> {
        self.borders.iter().find(|b| b.position == position)
    }

    fn inherit_from(&mut self, parent: &Style) {
        self.font.inherit_from(&parent.font);
        self.content.inherit_from(&parent.content);
        for border in &parent.borders {
            if self.border(border.position).is_none() {
                self.borders.push(border.clone());
            }
        }
    }
}

/// Style resources of a table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StylesCollection {
    items: Vec<Style>,
}

impl StylesCollection {
    pub fn new(items: Vec<Style>) -> Self {
        Self { items }
    }

    pub fn push(&mut self, style: Style) {
        self.items.push(style);
    }

    pub fn get(&self, name: &str) -> Option<&Style> {
        self.items.iter().find(|s| s.name == name)
    }

    /// Whether `name` names a style, counting the implicit default style
    pub fn contains(&self, name: &str) -> bool {
        name == DEFAULT_STYLE_NAME || self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Style> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Resolve a style with its whole inheritance chain applied
    pub fn resolve(&self, name: &str) -> Result<Style, ModelError> {
        let mut chain = vec![name.to_string()];
        let mut resolved = match self.get(name) {
            Some(style) => style.clone(),
            None if name == DEFAULT_STYLE_NAME => return Ok(Style::default_style()),
            None => return Err(ModelError::unknown("Style", name)),
        };

        let mut parent_name = resolved.inherits.clone();
        while let Some(parent) = parent_name {
            if chain.contains(&parent) {
                chain.push(parent);
                return Err(ModelError::StyleInheritanceCycle(chain));
            }
            chain.push(parent.clone());

            let parent_style = match self.get(&parent) {
                Some(style) => style,
                None if parent == DEFAULT_STYLE_NAME => break,
                None => return Err(ModelError::unknown("Style", parent)),
            };

            resolved.inherit_from(parent_style);
            parent_name = parent_style.inherits.clone();
        }

        Ok(resolved)
    }
}

impl<'a> IntoIterator for &'a StylesCollection {
    type Item = &'a Style;
    type IntoIter = std::slice::Iter<'a, Style>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styles() -> StylesCollection {
        let base = Style::new("Base")
            .unwrap()
            .with_font(FontModel {
                name: Some("Arial".into()),
                size: Some(9.0),
                bold: Some(YesNo::No),
                ..FontModel::default()
            })
            .with_content(ContentModel {
                format: Some("#,##0.00".into()),
                ..ContentModel::default()
            });

        let mut highlight = Style::new("Highlight")
            .unwrap()
            .with_inherits("Base")
            .with_font(FontModel {
                bold: Some(YesNo::Yes),
                ..FontModel::default()
            });
        highlight.borders.push(Border {
            position: KnownBorderPosition::Bottom,
            color: Some("Red".into()),
            width: Some(2),
            show: YesNo::Yes,
        });

        StylesCollection::new(vec![base, highlight])
    }

    #[test]
    fn child_overrides_parent() {
        let resolved = styles().resolve("Highlight").unwrap();
        assert_eq!(resolved.font.effective_name(), "Arial");
        assert_eq!(resolved.font.effective_size(), 9.0);
        assert!(resolved.font.is_bold());
        assert_eq!(resolved.content.format.as_deref(), Some("#,##0.00"));
        assert!(resolved.border(KnownBorderPosition::Bottom).is_some());
    }

    #[test]
    fn default_style_always_resolves() {
        let resolved = StylesCollection::default().resolve(DEFAULT_STYLE_NAME).unwrap();
        assert_eq!(resolved.name, DEFAULT_STYLE_NAME);
        assert_eq!(resolved.font.effective_color(), "Black");
    }

    #[test]
    fn unknown_and_cyclic_styles() {
        let mut collection = styles();
        assert!(matches!(
            collection.resolve("Missing"),
            Err(ModelError::UnknownResource { kind: "Style", .. })
        ));

        collection.push(Style::new("A").unwrap().with_inherits("B"));
        collection.push(Style::new("B").unwrap().with_inherits("A"));
        assert_eq!(
            collection.resolve("A"),
            Err(ModelError::StyleInheritanceCycle(vec!["A".into(), "B".into(), "A".into()]))
        );
    }

    #[test]
    fn rejects_invalid_names() {
        assert!(Style::new("9lives").is_err());
    }
}
