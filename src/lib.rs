//! Translation resolver: `Domain_Key` lookups with language fallback,
//! positional formatting, locale-aware listings and client-side export.

pub mod config;
pub mod error;
pub mod i18n;

pub use error::{FormatError, SourceError, TranslatorError};
pub use i18n::Translator;
