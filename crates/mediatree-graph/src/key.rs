//! Node identifiers
//!
//! Provides the [`NodeKey`] bound and the default [`MediaTypeId`] key.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::Hash;

/// Identifier usable as a media type key
///
/// Any comparable, hashable, serializable value qualifies; the blanket
/// implementation covers strings, integers and newtypes over them.
pub trait NodeKey:
    Clone + Eq + Ord + Hash + Debug + Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

impl<T> NodeKey for T where
    T: Clone
        + Eq
        + Ord
        + Hash
        + Debug
        + Display
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static
{
}

/// String identifier of a media type (e.g. `"lossless-audio"`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaTypeId(String);

impl MediaTypeId {
    /// Create new identifier
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MediaTypeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaTypeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MediaTypeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for MediaTypeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_id_display() {
        assert_eq!(MediaTypeId::from("flac").to_string(), "flac");
    }

    #[test]
    fn media_type_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&MediaTypeId::from("flac")).unwrap();
        assert_eq!(json, "\"flac\"");
    }
}
