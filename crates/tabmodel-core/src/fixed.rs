//! Fixed-width resources
//!
//! A fixed-width resource names one data attribute (`reference`) whose text
//! is a concatenation of fixed-width pieces. Each piece is a character
//! range of that text.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ModelError;
use crate::identifier::{check_field_name, check_identifier};
use crate::known::{KnownTrimMode, YesNo};
use crate::row::Row;

/// A character range of a fixed-width attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub name: String,

    /// Zero-based start character
    pub from: usize,

    #[serde(alias = "lenght")]
    pub length: usize,

    #[serde(default = "no")]
    pub trim: YesNo,

    #[serde(default)]
    pub trim_mode: KnownTrimMode,
}

fn no() -> YesNo {
    YesNo::No
}

impl Piece {
    pub fn new(name: impl Into<String>, from: i64, length: i64) -> Result<Self, ModelError> {
        let name = name.into();
        check_identifier("Piece", "Name", &name)?;

        if from < 0 {
            return Err(ModelError::OutOfRange {
                element: "Piece".into(),
                attribute: "From".into(),
                value: from,
                reason: "must be zero or greater".into(),
            });
        }
        if length < 1 {
            return Err(ModelError::OutOfRange {
                element: "Piece".into(),
                attribute: "Length".into(),
                value: length,
                reason: "must be one or greater".into(),
            });
        }

        Ok(Self {
            name,
            from: from as usize,
            length: length as usize,
            trim: YesNo::No,
            trim_mode: KnownTrimMode::All,
        })
    }

    pub fn with_trim(mut self, mode: KnownTrimMode) -> Self {
        self.trim = YesNo::Yes;
        self.trim_mode = mode;
        self
    }

    /// End of the range (exclusive); `None` when it does not fit a `usize`
    pub fn to(&self) -> Option<usize> {
        self.from.checked_add(self.length)
    }

    /// Cut this piece out of `source`
    ///
    /// `reference` only feeds the error message.
    pub fn extract(&self, reference: &str, source: &str) -> Result<String, ModelError> {
        let len = source.chars().count();
        let to = self.to();
        if self.length == 0 || to.map_or(true, |to| to > len) {
            return Err(ModelError::PieceOutOfRange {
                piece: self.name.clone(),
                reference: reference.to_string(),
                from: self.from,
                to: to.unwrap_or(usize::MAX),
                len,
            });
        }

        let raw: String = source.chars().skip(self.from).take(self.length).collect();
        Ok(self.parse_value(raw))
    }

    fn parse_value(&self, value: String) -> String {
        if !self.trim.is_yes() {
            return value;
        }
        self.trim_mode.apply(&value).to_string()
    }
}

/// Fixed-width resource: a reference attribute split into pieces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedWidth {
    pub name: String,

    /// Data attribute holding the fixed-width text
    pub reference: String,

    #[serde(default)]
    pub pieces: Vec<Piece>,
}

impl FixedWidth {
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        let reference = reference.into();
        check_identifier("Pieces", "Name", &name)?;
        check_field_name("Pieces", "Reference", &reference)?;

        Ok(Self {
            name,
            reference,
            pieces: Vec::new(),
        })
    }

    pub fn with_piece(mut self, piece: Piece) -> Self {
        self.pieces.push(piece);
        self
    }

    pub fn piece(&self, name: &str) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.name == name)
    }

    /// Raw text of the reference attribute in `row`
    pub fn source<'r>(&self, row: &'r Row) -> Result<&'r str, ModelError> {
        row.attribute_any_case(&self.reference)
            .ok_or_else(|| ModelError::MissingAttribute(self.reference.clone()))
    }

    /// Value of one piece for `row`
    pub fn value_of(&self, piece: &str, row: &Row) -> Result<String, ModelError> {
        let piece = self
            .piece(piece)
            .ok_or_else(|| ModelError::unknown("Piece", format!("{}.{}", self.name, piece)))?;
        piece.extract(&self.reference, self.source(row)?)
    }

    /// Every piece of this resource, keyed by piece name
    pub fn to_map(&self, row: &Row) -> Result<HashMap<String, String>, ModelError> {
        let source = self.source(row)?;
        self.pieces
            .iter()
            .map(|piece| Ok((piece.name.clone(), piece.extract(&self.reference, source)?)))
            .collect()
    }
}
