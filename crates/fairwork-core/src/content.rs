//! # Content References
//!
//! [`ContentRef`] is an opaque content-address (an IPFS CID in the current
//! deployment). The engine never inspects content — references pass through
//! to the storage collaborator untouched, so validation is limited to the
//! reference being a plausible token rather than empty noise.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An opaque content-address string for a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentRef(String);

impl ContentRef {
    /// Wrap a content-address token.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidContentRef`] if the token is empty
    /// or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        if raw.is_empty() || raw.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidContentRef(raw));
        }
        Ok(Self(raw))
    }

    /// The reference token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContentRef {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContentRef> for String {
    fn from(r: ContentRef) -> Self {
        r.0
    }
}

impl std::fmt::Display for ContentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
