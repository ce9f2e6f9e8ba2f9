//! Error types shared across the resolver.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while applying positional arguments to a translation template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A placeholder refers to an argument that was not supplied.
    /// `index` is 1-based, matching the `%1$s` notation.
    #[error("placeholder refers to argument {index} but only {supplied} supplied")]
    MissingArgument { index: usize, supplied: usize },

    /// The template uses a conversion character outside
    /// `s d u f F e E g G x X o b c`.
    #[error("unknown format conversion '%{0}'")]
    UnknownConversion(char),

    /// The template ends in the middle of a placeholder.
    #[error("template ends inside a placeholder")]
    Truncated,
}

/// Failure raised by a [`crate::i18n::TranslationSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read translation file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse translation file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Any error surfaced by [`crate::i18n::Translator`].
#[derive(Debug, Error)]
pub enum TranslatorError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

pub type Result<T, E = TranslatorError> = std::result::Result<T, E>;
