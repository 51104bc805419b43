//! Enumerations shared across the model

use serde::{Deserialize, Serialize};

/// Boolean flag as it appears in model documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    #[default]
    Yes,
    No,
}

impl YesNo {
    pub fn is_yes(self) -> bool {
        self == Self::Yes
    }

    /// Parse a bound string value; anything other than "no" means yes
    pub fn from_bound(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("no") {
            Self::No
        } else {
            Self::Yes
        }
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }
}

/// Comparison operator used by filters and remarks conditions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownOperator {
    #[default]
    EqualTo,
    NotEqualTo,
    #[serde(alias = "GreatherThan")]
    GreaterThan,
    #[serde(alias = "GreatherOrEqualsThan")]
    GreaterOrEqualThan,
    LessThan,
    LessOrEqualThan,
    #[serde(alias = "Beetween")]
    Between,
    In,
    Like,
}

impl std::fmt::Display for KnownOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::EqualTo => "EqualTo",
            Self::NotEqualTo => "NotEqualTo",
            Self::GreaterThan => "GreaterThan",
            Self::GreaterOrEqualThan => "GreaterOrEqualThan",
            Self::LessThan => "LessThan",
            Self::LessOrEqualThan => "LessOrEqualThan",
            Self::Between => "Between",
            Self::In => "In",
            Self::Like => "Like",
        };
        f.write_str(text)
    }
}

/// Which side of a value gets trimmed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownTrimMode {
    #[default]
    All,
    Start,
    End,
}

impl KnownTrimMode {
    pub fn apply<'a>(&self, value: &'a str) -> &'a str {
        match self {
            Self::All => value.trim(),
            Self::Start => value.trim_start(),
            Self::End => value.trim_end(),
        }
    }
}

/// Aggregate function applied to a field column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownAggregateType {
    #[default]
    None,
    Average,
    Count,
    Max,
    Min,
    Sum,
}

/// Where aggregates are written relative to the data rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownAggregateLocation {
    #[default]
    Top,
    Bottom,
}

/// Kind of a table field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownFieldType {
    Field,
    Gap,
    Group,
    Fixed,
    Packet,
}

impl std::fmt::Display for KnownFieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Field => "Field",
            Self::Gap => "Gap",
            Self::Group => "Group",
            Self::Fixed => "Fixed",
            Self::Packet => "Packet",
        };
        f.write_str(text)
    }
}

/// Layout of a packed date column
///
/// Unrecognised names are kept verbatim so a model round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum KnownInputPacketFormat {
    /// `yymmdd` style, six digits
    ShortDateFormat,
    /// `yyyymmdd`, eight digits
    LongDateFormat,
    /// `yyyymmddhhmmss`, fourteen digits
    FullDateFormat,
    Other(String),
}

impl From<String> for KnownInputPacketFormat {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ShortDateFormat" => Self::ShortDateFormat,
            "LongDateFormat" => Self::LongDateFormat,
            "FullDateFormat" => Self::FullDateFormat,
            _ => Self::Other(value),
        }
    }
}

impl From<KnownInputPacketFormat> for String {
    fn from(value: KnownInputPacketFormat) -> Self {
        match value {
            KnownInputPacketFormat::ShortDateFormat => "ShortDateFormat".to_string(),
            KnownInputPacketFormat::LongDateFormat => "LongDateFormat".to_string(),
            KnownInputPacketFormat::FullDateFormat => "FullDateFormat".to_string(),
            KnownInputPacketFormat::Other(other) => other,
        }
    }
}

/// Named separators between the items of a group field
pub struct KnownItemGroupSeparator;

impl KnownItemGroupSeparator {
    pub const NONE: &'static str = "None";
    pub const NEW_LINE: &'static str = "New Line";

    /// Translate a separator name into the text inserted after an item
    ///
    /// Unknown names are inserted literally.
    pub fn resolve(separator: &str) -> &str {
        match separator {
            "None" => "",
            "Space" => " ",
            "Backslash" => "\\",
            "Dash" => "-",
            "Dot" => ".",
            "Comma" => ",",
            "Colon" => ":",
            "Slash" => "/",
            "Semi Colon" => ";",
            "New Line" => "\n",
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_accepts_legacy_spellings() {
        let op: KnownOperator = serde_json::from_str("\"GreatherThan\"").unwrap();
        assert_eq!(op, KnownOperator::GreaterThan);
        let op: KnownOperator = serde_json::from_str("\"Beetween\"").unwrap();
        assert_eq!(op, KnownOperator::Between);
    }

    #[test]
    fn packet_format_round_trips_unknown_names() {
        let fmt: KnownInputPacketFormat = serde_json::from_str("\"yyyymm\"").unwrap();
        assert_eq!(fmt, KnownInputPacketFormat::Other("yyyymm".to_string()));
        assert_eq!(serde_json::to_string(&fmt).unwrap(), "\"yyyymm\"");

        let fmt: KnownInputPacketFormat = serde_json::from_str("\"LongDateFormat\"").unwrap();
        assert_eq!(fmt, KnownInputPacketFormat::LongDateFormat);
    }

    #[test]
    fn separators() {
        assert_eq!(KnownItemGroupSeparator::resolve("None"), "");
        assert_eq!(KnownItemGroupSeparator::resolve("Semi Colon"), ";");
        assert_eq!(KnownItemGroupSeparator::resolve("New Line"), "\n");
        assert_eq!(KnownItemGroupSeparator::resolve(" | "), " | ");
    }

    #[test]
    fn trim_modes() {
        assert_eq!(KnownTrimMode::All.apply("  a  "), "a");
        assert_eq!(KnownTrimMode::Start.apply("  a  "), "a  ");
        assert_eq!(KnownTrimMode::End.apply("  a  "), "  a");
    }

    #[test]
    fn yes_no_from_bound_text() {
        assert_eq!(YesNo::from_bound("NO"), YesNo::No);
        assert_eq!(YesNo::from_bound("whatever"), YesNo::Yes);
    }
}
