//! Internationalization (i18n) module: translation lookup and formatting.
//!
//! # Architecture
//!
//! - `identifier`: `Domain_Key` identifier parsing
//! - `source`: where translation tables come from (`TranslationSource`)
//! - `cache`: lazily populated per-language table cache
//! - `translator`: the `Translator`, fallback resolution and public API
//! - `format`: positional `printf`-style formatting
//! - `listing`: locale-aware "A, B, and C" phrases
//! - `html`: entity decoding (`clean`, markup-safe decoding)
//! - `export`: client-side export of selected translations
//! - `validator`: translation quality validation
//! - `metrics`: resolver counters
//!
//! # Example
//!
//! ```rust
//! use translation_resolver::i18n::{StaticSource, Translator};
//!
//! let source = StaticSource::new()
//!     .with_entry("en", "General", "Yes", "Yes")
//!     .with_entry("en", "Intl", "ListPatternAnd2", "{0} and {1}")
//!     .with_entry("de", "General", "Yes", "Ja");
//! let translator = Translator::new(source, || Some("en".to_string()), vec![]);
//!
//! translator.set_current_language(Some("de"));
//! assert_eq!(translator.translate("General_Yes").unwrap(), "Ja");
//! assert_eq!(translator.create_and_listing(&["A", "B"], None).unwrap(), "A and B");
//! ```

mod cache;
mod export;
mod format;
mod html;
mod identifier;
mod listing;
mod metrics;
mod source;
mod translator;
mod validator;

pub use cache::{Lookup, TranslationCache};
pub use export::{render_script, to_json, ClientExportTable, ClientKeyProvider, StaticKeys};
pub use format::{format_positional, unescape_percent, FormatArg};
pub use html::{clean, decode_entities_safe_for_html};
pub use identifier::TranslationId;
pub use listing::{create_listing, ListType};
pub use metrics::{MetricsReport, TranslationMetrics};
pub use source::{DomainTable, JsonFileSource, KeyTable, StaticSource, TranslationSource};
pub use translator::{DefaultLanguage, Translator, FALLBACK_LANGUAGE, LEGACY_DOMAIN};
pub use validator::{TranslationValidator, ValidationReport};
