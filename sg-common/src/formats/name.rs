//! Names read from length-prefixed fields

use std::fmt;

use serde::{Serialize, Serializer};

use crate::cursor::text_before_nul;

/// A skeleton, bone or clip name.
///
/// Exporters often NUL-pad name fields. The text is everything before the
/// first NUL; the full stored field is kept so writers reproduce it exactly.
/// Names built from text store just the text bytes.
#[derive(Debug, Clone, Default)]
pub struct Name {
    text: String,
    stored: Option<Vec<u8>>,
}

impl Name {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            stored: None,
        }
    }

    /// Name from a raw field, padding and all
    pub fn from_stored(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        Self {
            text: text_before_nul(&bytes),
            stored: Some(bytes),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Bytes a writer emits for this name
    pub fn stored_bytes(&self) -> &[u8] {
        self.stored.as_deref().unwrap_or(self.text.as_bytes())
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.stored_bytes() == other.stored_bytes()
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

impl From<String> for Name {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}
