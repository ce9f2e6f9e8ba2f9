//! Translation identifiers: `Domain_Key` strings naming a translatable message.
//!
//! The domain is everything before the first underscore, the key is the
//! remainder and may itself contain underscores. A string with no underscore
//! is not an identifier at all and is treated as literal text.

use std::fmt;

/// Separator between the domain and the key.
pub const SEPARATOR: char = '_';

/// A parsed, fully qualified translation identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TranslationId<'a> {
    domain: &'a str,
    key: &'a str,
}

impl<'a> TranslationId<'a> {
    /// Split an identifier at its first underscore.
    ///
    /// # Returns
    /// * `Some(TranslationId)` if the string contains the separator
    /// * `None` for literal text (no separator)
    ///
    /// # Example
    /// ```
    /// use translation_resolver::i18n::TranslationId;
    ///
    /// let id = TranslationId::parse("General_Save_Changes").unwrap();
    /// assert_eq!(id.domain(), "General");
    /// assert_eq!(id.key(), "Save_Changes");
    /// assert!(TranslationId::parse("Hello").is_none());
    /// ```
    pub fn parse(identifier: &'a str) -> Option<Self> {
        identifier
            .split_once(SEPARATOR)
            .map(|(domain, key)| TranslationId { domain, key })
    }

    /// Build an identifier from its parts.
    pub fn new(domain: &'a str, key: &'a str) -> Self {
        TranslationId { domain, key }
    }

    /// The owning domain (text before the first underscore).
    pub fn domain(&self) -> &'a str {
        self.domain
    }

    /// The key within the domain.
    pub fn key(&self) -> &'a str {
        self.key
    }
}

impl fmt::Display for TranslationId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.domain, SEPARATOR, self.key)
    }
}
