//! Human-readable media type names

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Validated media type name
///
/// Line breaks are removed and surrounding whitespace is trimmed.
/// A name that is empty after normalization is rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    /// Normalize and validate a raw name
    ///
    /// # Errors
    /// Returns [`NameError::Blank`] if nothing but whitespace remains
    pub fn new(raw: impl AsRef<str>) -> Result<Self, NameError> {
        let raw = raw.as_ref();
        let stripped: String = raw.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
        let trimmed = stripped.trim();
        if trimmed.is_empty() {
            return Err(NameError::Blank {
                raw: raw.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Name {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Name> for String {
    fn from(value: Name) -> Self {
        value.0
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Name validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// Empty or whitespace-only after normalization
    #[error("name must not be blank: {raw:?}")]
    Blank {
        /// Input as given
        raw: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed() {
        assert_eq!(Name::new("  Lossless  ").unwrap().as_str(), "Lossless");
    }

    #[test]
    fn name_strips_line_breaks() {
        assert_eq!(Name::new("Loss\nless\r\n").unwrap().as_str(), "Lossless");
    }

    #[test]
    fn name_rejects_blank() {
        assert!(matches!(Name::new(""), Err(NameError::Blank { .. })));
        assert!(matches!(Name::new("   "), Err(NameError::Blank { .. })));
        assert!(matches!(Name::new(" \n\t\r\n "), Err(NameError::Blank { .. })));
    }

    #[test]
    fn name_from_str() {
        let name: Name = "Vinyl".parse().unwrap();
        assert_eq!(name.to_string(), "Vinyl");
    }

    #[test]
    fn name_deserialization_validates() {
        let ok: Name = serde_json::from_str("\" Tape \"").unwrap();
        assert_eq!(ok.as_str(), "Tape");

        let blank: Result<Name, _> = serde_json::from_str("\"  \"");
        assert!(blank.is_err());
    }
}
