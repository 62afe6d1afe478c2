pub mod checker;
pub mod cli;
pub mod config;
pub mod dict;
pub mod error;
pub mod lang;

#[cfg(test)]
pub(crate) mod testing;

pub use checker::{SpellCheckOptions, SpellChecker};
pub use config::{Config, IgnoreScope};
pub use error::{Error, Result};
pub use lang::Language;

use serde::{Deserialize, Serialize};

/// One step of a location inside the linted document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

pub type JsonPath = Vec<PathSegment>;

/// What the calling rule engine knows about the value being checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleContext {
    pub path: JsonPath,
}

impl RuleContext {
    pub fn new<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
        }
    }
}

/// A reported problem. Misspellings carry the caller's path; failures of
/// the check itself carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResultItem {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<JsonPath>,
}

impl CheckResultItem {
    pub fn new(message: impl Into<String>, path: JsonPath) -> Self {
        Self {
            message: message.into(),
            path: Some(path),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.path.is_none()
    }
}
