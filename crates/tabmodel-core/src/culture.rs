//! Culture-aware parsing of decimals and dates
//!
//! Conditions compare cell values as numbers or dates, and the textual form
//! of both depends on the culture the data was exported with.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Order of day, month and year in short date strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    DayMonthYear,
    MonthDayYear,
    YearMonthDay,
}

/// Cultures a model can pin a condition to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownCulture {
    /// Whatever the configuration says
    #[default]
    Current,
    Invariant,
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "en-GB")]
    EnGb,
    #[serde(rename = "es-ES")]
    EsEs,
    #[serde(rename = "fr-FR")]
    FrFr,
    #[serde(rename = "de-DE")]
    DeDe,
    #[serde(rename = "it-IT")]
    ItIt,
    #[serde(rename = "pt-BR")]
    PtBr,
}

impl KnownCulture {
    /// Replace `Current` with the configured culture
    pub fn resolve(self, current: KnownCulture) -> KnownCulture {
        match (self, current) {
            (Self::Current, Self::Current) => Self::Invariant,
            (Self::Current, other) => other,
            (culture, _) => culture,
        }
    }

    pub fn decimal_separator(self) -> char {
        match self {
            Self::EsEs | Self::FrFr | Self::DeDe | Self::ItIt | Self::PtBr => ',',
            _ => '.',
        }
    }

    pub fn group_separator(self) -> char {
        match self {
            Self::EsEs | Self::DeDe | Self::ItIt | Self::PtBr => '.',
            Self::FrFr => ' ',
            _ => ',',
        }
    }

    pub fn date_order(self) -> DateOrder {
        match self {
            Self::EnUs => DateOrder::MonthDayYear,
            Self::Invariant | Self::Current => DateOrder::YearMonthDay,
            _ => DateOrder::DayMonthYear,
        }
    }
}

/// Parse a decimal written in `culture`
pub fn parse_decimal(text: &str, culture: KnownCulture) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let group = culture.group_separator();
    let decimal = culture.decimal_separator();

    let normalized: String = trimmed
        .chars()
        .filter(|c| *c != group && *c != '\u{a0}')
        .map(|c| if c == decimal { '.' } else { c })
        .collect();

    let normalized = normalized.strip_prefix('+').unwrap_or(&normalized);
    Decimal::from_str(normalized).ok()
}

const ISO_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y%m%d%H%M%S",
];

const ISO_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a date (optionally with time) written in `culture`
pub fn parse_date(text: &str, culture: KnownCulture) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in ISO_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(value);
        }
    }

    for format in ISO_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    let (date_format, separators): (&str, &[char]) = match culture.date_order() {
        DateOrder::DayMonthYear => ("%d{s}%m{s}%Y", &['/', '-', '.']),
        DateOrder::MonthDayYear => ("%m{s}%d{s}%Y", &['/', '-']),
        DateOrder::YearMonthDay => return None,
    };

    for separator in separators {
        let date_only = date_format.replace("{s}", &separator.to_string());

        for time in [" %H:%M:%S", " %H:%M"] {
            let format = format!("{date_only}{time}");
            if let Ok(value) = NaiveDateTime::parse_from_str(trimmed, &format) {
                return Some(value);
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, &date_only) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}
