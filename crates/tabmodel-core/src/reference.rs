//! External references declared by a table

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::identifier::is_valid_path;

/// Path value meaning "the model's own directory"
pub const DEFAULT_PATH: &str = "Default";

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}

/// A component the writers load alongside the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub assembly: String,

    #[serde(default = "default_path")]
    pub path: String,
}

impl Reference {
    pub fn new(assembly: impl Into<String>) -> Self {
        Self {
            assembly: assembly.into(),
            path: default_path(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Result<Self, ModelError> {
        let path = path.into();
        if !is_valid_path(&path) {
            return Err(ModelError::InvalidPath {
                attribute: "Path".into(),
                value: path,
            });
        }
        self.path = path;
        Ok(self)
    }

    /// Path with the `Default` keyword shown as `~`
    pub fn display_path(&self) -> String {
        self.path.replace(DEFAULT_PATH, "~")
    }
}
