//! The translator: resolves `Domain_Key` identifiers to localized text.
//!
//! Lookups go through a fixed fallback chain (requested language, then
//! [`FALLBACK_LANGUAGE`]). Within each language an identifier is first looked
//! up under its own domain and then under the shared [`LEGACY_DOMAIN`], which
//! keeps keys that were migrated into `Intl` resolvable under their old
//! domain. An identifier that resolves nowhere is returned unchanged, so a
//! broken string shows up in place instead of failing the caller.

use crate::error::{Result, SourceError};
use crate::i18n::cache::{Lookup, TranslationCache};
use crate::i18n::export::{self, ClientExportTable, ClientKeyProvider, ClientKeyRegistry};
use crate::i18n::format::{format_positional, unescape_percent, FormatArg};
use crate::i18n::html::{self, decode_entities_safe_for_html};
use crate::i18n::listing::{create_listing, ListType};
use crate::i18n::metrics::TranslationMetrics;
use crate::i18n::source::{DomainTable, TranslationSource};
use crate::i18n::TranslationId;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// Language used when a key is missing from the requested language.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Shared domain that older keys were moved into.
pub const LEGACY_DOMAIN: &str = "Intl";

/// Provides the configured default language.
///
/// `None` (or an empty string) means the configuration is unavailable, in
/// which case [`FALLBACK_LANGUAGE`] is used.
pub trait DefaultLanguage: Send + Sync {
    fn default_language(&self) -> Option<String>;
}

impl<F> DefaultLanguage for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn default_language(&self) -> Option<String> {
        self()
    }
}

pub struct Translator {
    source: Arc<dyn TranslationSource>,
    config: Arc<dyn DefaultLanguage>,
    initial_directories: Vec<String>,
    directories: RwLock<Vec<String>>,
    current_language: RwLock<String>,
    cache: TranslationCache,
    client_keys: ClientKeyRegistry,
    metrics: TranslationMetrics,
}

impl Translator {
    /// Create a translator reading from `source` with the given search
    /// locations (duplicates are dropped, order is kept).
    ///
    /// The current language starts as the configured default language.
    pub fn new<S, C>(source: S, config: C, directories: Vec<String>) -> Self
    where
        S: TranslationSource + 'static,
        C: DefaultLanguage + 'static,
    {
        Self::from_shared(Arc::new(source), Arc::new(config), directories)
    }

    /// Like [`new`](Self::new) for collaborators that are already shared.
    pub fn from_shared(
        source: Arc<dyn TranslationSource>,
        config: Arc<dyn DefaultLanguage>,
        directories: Vec<String>,
    ) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(directories.len());
        for directory in directories {
            if !unique.contains(&directory) {
                unique.push(directory);
            }
        }

        let current = resolve_default(config.as_ref());

        Translator {
            source,
            config,
            initial_directories: unique.clone(),
            directories: RwLock::new(unique),
            current_language: RwLock::new(current),
            cache: TranslationCache::new(),
            client_keys: ClientKeyRegistry::new(),
            metrics: TranslationMetrics::new(),
        }
    }

    /// Trim and decode every HTML entity, quotes included.
    pub fn clean(text: &str) -> String {
        html::clean(text)
    }

    // ==================== Translation ====================

    /// Translate `identifier` in the current language, without arguments.
    pub fn translate(&self, identifier: &str) -> Result<String> {
        self.translate_with(identifier, &[], None)
    }

    /// Translate `identifier`, optionally forcing `language`, and apply `args`.
    ///
    /// An identifier without an underscore is literal text and is only
    /// formatted. Without arguments `%%` is collapsed to `%`; with arguments
    /// the text is a positional template and a placeholder with no matching
    /// argument fails with [`FormatError`](crate::error::FormatError).
    ///
    /// # Example
    /// ```
    /// use translation_resolver::i18n::{FormatArg, StaticSource, Translator};
    ///
    /// let source = StaticSource::new()
    ///     .with_entry("en", "General", "VisitsIn", "%s visits in %s")
    ///     .with_entry("de", "General", "VisitsIn", "%s Besuche im %s");
    /// let translator = Translator::new(source, || Some("de".to_string()), vec![]);
    ///
    /// let args = [FormatArg::from(12), FormatArg::from("Mai")];
    /// let text = translator.translate_with("General_VisitsIn", &args, None).unwrap();
    /// assert_eq!(text, "12 Besuche im Mai");
    /// ```
    pub fn translate_with(
        &self,
        identifier: &str,
        args: &[FormatArg],
        language: Option<&str>,
    ) -> Result<String> {
        let text = match TranslationId::parse(identifier) {
            Some(id) => {
                let language = match language {
                    Some(language) => language.to_string(),
                    None => self.current_language(),
                };
                self.resolve(identifier, id, &language)?
            }
            None => identifier.to_string(),
        };

        if args.is_empty() {
            return Ok(unescape_percent(&text));
        }
        Ok(format_positional(&text, args)?)
    }

    /// Walk the fallback chain for `id` starting at `language`.
    fn resolve(
        &self,
        identifier: &str,
        id: TranslationId<'_>,
        language: &str,
    ) -> std::result::Result<String, SourceError> {
        let fallback = (language != FALLBACK_LANGUAGE).then_some(FALLBACK_LANGUAGE);

        for (hop, lang) in std::iter::once(language).chain(fallback).enumerate() {
            let Some(table) = self.ensure_loaded(lang)? else {
                continue;
            };
            if let Some(text) = lookup(&table, id) {
                if hop > 0 {
                    self.metrics.record_fallback_hit();
                }
                return Ok(text.to_string());
            }
        }

        self.metrics.record_missing();
        Ok(identifier.to_string())
    }

    /// Load the table of `language` unless it is cached already.
    ///
    /// Returns `None` for an empty language code.
    fn ensure_loaded(
        &self,
        language: &str,
    ) -> std::result::Result<Option<Arc<DomainTable>>, SourceError> {
        if language.is_empty() {
            return Ok(None);
        }

        // Held across the load so add_directory cannot clear the cache
        // between reading the locations and storing the table.
        let directories = self
            .directories
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let (table, lookup) = self.cache.get_or_load(language, || {
            debug!(
                "Loading translations for '{}' from {} location(s)",
                language,
                directories.len()
            );
            self.source.load(language, &directories)
        })?;

        match lookup {
            Lookup::Hit => self.metrics.record_cache_hit(),
            Lookup::Loaded => self.metrics.record_cache_miss(),
        }

        Ok(Some(table))
    }

    // ==================== Listings ====================

    /// Join items with the locale's "and" patterns: `A, B, and C`.
    pub fn create_and_listing<S: AsRef<str>>(
        &self,
        items: &[S],
        language: Option<&str>,
    ) -> Result<String> {
        self.create_listing(ListType::And, items, language)
    }

    /// Join items with the locale's "or" patterns: `A, B, or C`.
    pub fn create_or_listing<S: AsRef<str>>(
        &self,
        items: &[S],
        language: Option<&str>,
    ) -> Result<String> {
        self.create_listing(ListType::Or, items, language)
    }

    fn create_listing<S: AsRef<str>>(
        &self,
        list_type: ListType,
        items: &[S],
        language: Option<&str>,
    ) -> Result<String> {
        create_listing(list_type, items, |id| self.translate_with(id, &[], language))
    }

    // ==================== Client export ====================

    /// Register a provider of identifiers to include in the client export.
    pub fn register_client_keys<P>(&self, provider: P)
    where
        P: ClientKeyProvider + 'static,
    {
        self.client_keys.register(Arc::new(provider));
    }

    /// Resolve every registered client identifier in the current language.
    ///
    /// Values have their HTML entities decoded except `&lt;` and `&gt;`.
    /// Identifiers without a domain are skipped with a warning. Entries keep
    /// the order in which the providers named them.
    pub fn client_export_table(&self) -> Result<ClientExportTable> {
        let language = self.current_language();
        let mut table = ClientExportTable::new();

        for identifier in self.client_keys.collect() {
            let Some(id) = TranslationId::parse(&identifier) else {
                warn!(
                    translation_key = %identifier,
                    "Unexpected translation key found in client side translations"
                );
                continue;
            };
            let text = self.resolve(&identifier, id, &language)?;
            let text = decode_entities_safe_for_html(&text);
            table.insert(identifier, Value::String(text));
        }

        Ok(table)
    }

    /// The client export table wrapped in its bootstrap snippet.
    pub fn client_export_script(&self) -> Result<String> {
        Ok(export::render_script(&self.client_export_table()?))
    }

    // ==================== State ====================

    pub fn current_language(&self) -> String {
        self.current_language
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Switch the current language. `None` or an empty code resets it to the
    /// configured default language.
    pub fn set_current_language(&self, language: Option<&str>) {
        let language = match language {
            Some(language) if !language.is_empty() => language.to_string(),
            _ => self.default_language(),
        };
        *self
            .current_language
            .write()
            .unwrap_or_else(PoisonError::into_inner) = language;
    }

    /// The configured default language, `"en"` when configuration is unavailable.
    pub fn default_language(&self) -> String {
        resolve_default(self.config.as_ref())
    }

    /// Register another search location and drop every cached table.
    ///
    /// A location that is already registered is not added twice, but the
    /// cache is cleared either way.
    pub fn add_directory(&self, location: impl Into<String>) {
        let location = location.into();
        let mut directories = self
            .directories
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if directories.contains(&location) {
            debug!("Translation location already registered: {}", location);
        } else {
            debug!("Registering translation location: {}", location);
            directories.push(location);
        }

        self.cache.clear();
    }

    pub fn directories(&self) -> Vec<String> {
        self.directories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether the table of `language` is cached.
    pub fn is_loaded(&self, language: &str) -> bool {
        self.cache.is_loaded(language)
    }

    /// Restore the initial state: default language, initial locations, empty
    /// cache and zeroed metrics. Registered client key providers are kept.
    pub fn reset(&self) {
        self.set_current_language(None);
        let mut directories = self
            .directories
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *directories = self.initial_directories.clone();
        self.cache.clear();
        self.metrics.reset();
    }

    pub fn metrics(&self) -> &TranslationMetrics {
        &self.metrics
    }

    // ==================== Whole-table access ====================

    /// Every translation of the current language.
    pub fn all_translations(&self) -> Result<Arc<DomainTable>> {
        let language = self.current_language();
        Ok(self.ensure_loaded(&language)?.unwrap_or_default())
    }

    /// Find an identifier whose text in the current language is exactly `text`.
    ///
    /// When several keys share the same text, the first one found in the
    /// table's iteration order wins; that order is not specified.
    pub fn find_translation_key_for_translation(&self, text: &str) -> Result<Option<String>> {
        let table = self.all_translations()?;

        let found = table.iter().find_map(|(domain, keys)| {
            keys.iter()
                .find(|(_, value)| value.as_str() == text)
                .map(|(key, _)| TranslationId::new(domain, key).to_string())
        });

        Ok(found)
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("current_language", &self.current_language())
            .field("directories", &self.directories())
            .field("loaded", &self.cache.loaded_languages())
            .field("client_keys", &self.client_keys)
            .finish()
    }
}

fn resolve_default(config: &dyn DefaultLanguage) -> String {
    config
        .default_language()
        .filter(|language| !language.is_empty())
        .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string())
}

/// Own domain first, then the legacy shared domain.
fn lookup<'t>(table: &'t DomainTable, id: TranslationId<'_>) -> Option<&'t str> {
    let in_domain = table.get(id.domain()).and_then(|keys| keys.get(id.key()));
    let in_legacy = || {
        if id.domain() == LEGACY_DOMAIN {
            return None;
        }
        table.get(LEGACY_DOMAIN).and_then(|keys| keys.get(id.key()))
    };

    in_domain.or_else(in_legacy).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FormatError, TranslatorError};
    use crate::i18n::export::StaticKeys;
    use crate::i18n::source::StaticSource;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts how often each load happens.
    struct CountingSource {
        inner: StaticSource,
        loads: Arc<AtomicUsize>,
    }

    impl TranslationSource for CountingSource {
        fn load(
            &self,
            language: &str,
            locations: &[String],
        ) -> std::result::Result<DomainTable, SourceError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.inner.load(language, locations)
        }
    }

    struct FailingSource;

    impl TranslationSource for FailingSource {
        fn load(
            &self,
            language: &str,
            _locations: &[String],
        ) -> std::result::Result<DomainTable, SourceError> {
            Err(SourceError::Io {
                path: format!("lang/{language}.json").into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            })
        }
    }

    fn source() -> StaticSource {
        StaticSource::new()
            .with_entry("en", "General", "Yes", "Yes")
            .with_entry("en", "General", "OnlyEnglish", "Only in English")
            .with_entry("en", "General", "Percent", "100%% sure")
            .with_entry("en", "General", "VisitsIn", "%s visits in %s")
            .with_entry("en", "Intl", "Month_Short", "Mon")
            .with_entry("en", "Intl", "ListPatternAnd2", "{0} and {1}")
            .with_entry("en", "Intl", "ListPatternAndStart", "{0}, {1}")
            .with_entry("en", "Intl", "ListPatternAndMiddle", "{0}, {1}")
            .with_entry("en", "Intl", "ListPatternAndEnd", "{0}, and {1}")
            .with_entry("en", "Intl", "ListPatternOr2", "{0} or {1}")
            .with_entry("en", "Intl", "ListPatternOrStart", "{0}, {1}")
            .with_entry("en", "Intl", "ListPatternOrMiddle", "{0}, {1}")
            .with_entry("en", "Intl", "ListPatternOrEnd", "{0}, or {1}")
            .with_entry("de", "General", "Yes", "Ja")
            .with_entry("de", "General", "VisitsIn", "%s Besuche im %s")
            .with_entry("de", "Intl", "ListPatternAnd2", "{0} und {1}")
            .with_entry("de", "Intl", "ListPatternAndStart", "{0}, {1}")
            .with_entry("de", "Intl", "ListPatternAndMiddle", "{0}, {1}")
            .with_entry("de", "Intl", "ListPatternAndEnd", "{0} und {1}")
    }

    fn no_config() -> Option<String> {
        None
    }

    fn translator() -> Translator {
        Translator::new(source(), no_config, vec!["lang".to_string()])
    }

    fn counting(loads: &Arc<AtomicUsize>) -> Translator {
        let source = CountingSource {
            inner: source(),
            loads: Arc::clone(loads),
        };
        Translator::new(source, no_config, vec!["lang".to_string()])
    }

    // ==================== translate Tests ====================

    #[test]
    fn test_translate_current_language() {
        let translator = translator();
        translator.set_current_language(Some("de"));
        assert_eq!(translator.translate("General_Yes").unwrap(), "Ja");
    }

    #[test]
    fn test_translate_forced_language() {
        let translator = translator();
        let text = translator.translate_with("General_Yes", &[], Some("de")).unwrap();
        assert_eq!(text, "Ja");
        assert_eq!(translator.current_language(), "en");
    }

    #[test]
    fn test_translate_literal_without_separator() {
        let translator = translator();
        translator.set_current_language(Some("de"));
        assert_eq!(translator.translate("Dashboard").unwrap(), "Dashboard");
        assert_eq!(translator.translate("50%% off").unwrap(), "50% off");
        assert!(!translator.is_loaded("de"));
    }

    #[test]
    fn test_translate_empty_identifier() {
        assert_eq!(translator().translate("").unwrap(), "");
    }

    #[test]
    fn test_translate_unescapes_percent_without_args() {
        assert_eq!(translator().translate("General_Percent").unwrap(), "100% sure");
    }

    #[test]
    fn test_translate_with_args() {
        let translator = translator();
        let args = [FormatArg::from(12), FormatArg::from("Mai")];
        let text = translator
            .translate_with("General_VisitsIn", &args, Some("de"))
            .unwrap();
        assert_eq!(text, "12 Besuche im Mai");
    }

    #[test]
    fn test_translate_with_too_few_args_is_format_error() {
        let translator = translator();
        let err = translator
            .translate_with("General_VisitsIn", &[FormatArg::from(12)], None)
            .unwrap_err();
        assert!(matches!(
            err,
            TranslatorError::Format(FormatError::MissingArgument { index: 2, supplied: 1 })
        ));
    }

    #[test]
    fn test_translate_unknown_identifier_with_args_is_returned() {
        let translator = translator();
        let text = translator
            .translate_with("Nope_Missing", &[FormatArg::from("x")], None)
            .unwrap();
        assert_eq!(text, "Nope_Missing");
    }

    // ==================== Fallback Tests ====================

    #[test]
    fn test_fallback_to_english() {
        let translator = translator();
        translator.set_current_language(Some("de"));
        assert_eq!(translator.translate("General_OnlyEnglish").unwrap(), "Only in English");
        assert_eq!(translator.metrics().fallback_hits(), 1);
    }

    #[test]
    fn test_fallback_for_unknown_language() {
        let translator = translator();
        let text = translator.translate_with("General_Yes", &[], Some("xx")).unwrap();
        assert_eq!(text, "Yes");
        assert!(translator.is_loaded("xx"));
    }

    #[test]
    fn test_legacy_intl_alias() {
        let translator = translator();
        assert_eq!(translator.translate("CoreHome_Month_Short").unwrap(), "Mon");
    }

    #[test]
    fn test_own_domain_wins_over_legacy_alias() {
        let source = source()
            .with_entry("en", "Intl", "Yes", "Intl yes")
            .with_entry("en", "Other", "Yes", "Other yes");
        let translator = Translator::new(source, no_config, vec![]);
        assert_eq!(translator.translate("Other_Yes").unwrap(), "Other yes");
        assert_eq!(translator.translate("Third_Yes").unwrap(), "Intl yes");
    }

    #[test]
    fn test_missing_returns_identifier() {
        let translator = translator();
        translator.set_current_language(Some("de"));
        assert_eq!(translator.translate("Foo_Bar_Baz").unwrap(), "Foo_Bar_Baz");
        assert_eq!(translator.metrics().missing(), 1);
    }

    #[test]
    fn test_missing_is_idempotent() {
        let translator = translator();
        let once = translator.translate("Unknown_Key").unwrap();
        let twice = translator.translate(&once).unwrap();
        assert_eq!(once, twice);
    }

    // ==================== Loading Tests ====================

    #[test]
    fn test_each_language_loaded_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let translator = counting(&loads);
        translator.set_current_language(Some("de"));

        translator.translate("General_Yes").unwrap();
        translator.translate("General_Yes").unwrap();
        translator.translate("General_OnlyEnglish").unwrap();
        translator.translate("General_OnlyEnglish").unwrap();

        // de + en
        assert_eq!(loads.load(Ordering::SeqCst), 2);
        assert_eq!(translator.metrics().cache_misses(), 2);
    }

    #[test]
    fn test_empty_language_table_is_cached() {
        let loads = Arc::new(AtomicUsize::new(0));
        let translator = counting(&loads);

        translator.translate_with("General_Yes", &[], Some("xx")).unwrap();
        translator.translate_with("General_Yes", &[], Some("xx")).unwrap();

        // xx + en, both once
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_source_error_propagates() {
        let translator = Translator::new(FailingSource, no_config, vec![]);
        let err = translator.translate("General_Yes").unwrap_err();
        assert!(matches!(err, TranslatorError::Source(_)));
        assert!(!translator.is_loaded("en"));
    }

    #[test]
    fn test_literal_does_not_touch_failing_source() {
        let translator = Translator::new(FailingSource, no_config, vec![]);
        assert_eq!(translator.translate("Literal").unwrap(), "Literal");
    }

    // ==================== Directory Tests ====================

    #[test]
    fn test_add_directory_clears_cache() {
        let loads = Arc::new(AtomicUsize::new(0));
        let translator = counting(&loads);

        translator.translate("General_Yes").unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        translator.add_directory("plugins/Foo/lang");
        assert!(!translator.is_loaded("en"));

        assert_eq!(translator.translate("General_Yes").unwrap(), "Yes");
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_add_existing_directory_still_clears_cache() {
        let loads = Arc::new(AtomicUsize::new(0));
        let translator = counting(&loads);

        translator.translate("General_Yes").unwrap();
        translator.add_directory("lang");

        assert_eq!(translator.directories(), vec!["lang"]);
        translator.translate("General_Yes").unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_constructor_deduplicates_directories() {
        let translator = Translator::new(
            source(),
            no_config,
            vec!["a".to_string(), "b".to_string(), "a".to_string()],
        );
        assert_eq!(translator.directories(), vec!["a", "b"]);
    }

    // ==================== Language State Tests ====================

    #[test]
    fn test_initial_language_from_config() {
        let translator = Translator::new(source(), || Some("de".to_string()), vec![]);
        assert_eq!(translator.current_language(), "de");
        assert_eq!(translator.translate("General_Yes").unwrap(), "Ja");
    }

    #[test]
    fn test_default_language_when_config_unavailable() {
        let translator = Translator::new(source(), || Some(String::new()), vec![]);
        assert_eq!(translator.default_language(), "en");
        assert_eq!(translator.current_language(), "en");
    }

    #[test]
    fn test_set_current_language_none_resets_to_default() {
        let translator = Translator::new(source(), || Some("de".to_string()), vec![]);
        translator.set_current_language(Some("fr"));
        assert_eq!(translator.current_language(), "fr");

        translator.set_current_language(None);
        assert_eq!(translator.current_language(), "de");

        translator.set_current_language(Some("fr"));
        translator.set_current_language(Some(""));
        assert_eq!(translator.current_language(), "de");
    }

    #[test]
    fn test_reset() {
        let translator = translator();
        translator.set_current_language(Some("de"));
        translator.add_directory("extra");
        translator.translate("General_Yes").unwrap();

        translator.reset();

        assert_eq!(translator.current_language(), "en");
        assert_eq!(translator.directories(), vec!["lang"]);
        assert!(!translator.is_loaded("de"));
        assert_eq!(translator.metrics().cache_misses(), 0);
    }

    // ==================== Listing Tests ====================

    #[test]
    fn test_and_listing() {
        let translator = translator();
        assert_eq!(translator.create_and_listing::<&str>(&[], None).unwrap(), "");
        assert_eq!(translator.create_and_listing(&["A"], None).unwrap(), "A");
        assert_eq!(translator.create_and_listing(&["A", "B"], None).unwrap(), "A and B");
        assert_eq!(
            translator.create_and_listing(&["A", "B", "C"], None).unwrap(),
            "A, B, and C"
        );
        assert_eq!(
            translator.create_and_listing(&["A", "B", "C", "D"], None).unwrap(),
            "A, B, C, and D"
        );
    }

    #[test]
    fn test_or_listing_falls_back_to_english_patterns() {
        let translator = translator();
        let text = translator
            .create_or_listing(&["A", "B", "C"], Some("de"))
            .unwrap();
        assert_eq!(text, "A, B, or C");
    }

    #[test]
    fn test_listing_in_language() {
        let translator = translator();
        let items = vec!["Rot".to_string(), "Grün".to_string(), "Blau".to_string()];
        let text = translator.create_and_listing(&items, Some("de")).unwrap();
        assert_eq!(text, "Rot, Grün und Blau");
    }

    // ==================== Client Export Tests ====================

    #[test]
    fn test_client_export_table() {
        let source = source().with_entry(
            "en",
            "Plugin",
            "Key",
            "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt; &quot;cartoon&quot;",
        );
        let translator = Translator::new(source, no_config, vec![]);
        translator.register_client_keys(StaticKeys::new(["Plugin_Key", "General_Yes"]));

        let table = translator.client_export_table().unwrap();

        assert_eq!(
            table["Plugin_Key"],
            "&lt;b&gt;Tom & Jerry&lt;/b&gt; \"cartoon\""
        );
        assert_eq!(table["General_Yes"], "Yes");
    }

    #[test]
    fn test_client_export_skips_unqualified_keys() {
        let translator = translator();
        translator.register_client_keys(|| {
            vec!["NoSeparator".to_string(), "General_Yes".to_string()]
        });

        let table = translator.client_export_table().unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.contains_key("General_Yes"));
    }

    #[test]
    fn test_client_export_keeps_provider_order() {
        let translator = translator();
        translator.register_client_keys(StaticKeys::new(["Intl_Month_Short", "General_Yes"]));
        translator.register_client_keys(StaticKeys::new(["General_OnlyEnglish", "General_Yes"]));

        let table = translator.client_export_table().unwrap();
        let keys: Vec<&str> = table.keys().map(String::as_str).collect();

        assert_eq!(keys, vec!["Intl_Month_Short", "General_Yes", "General_OnlyEnglish"]);
    }

    #[test]
    fn test_client_export_script_cannot_close_script_element() {
        let source = source().with_entry(
            "en",
            "Plugin",
            "Key",
            "</script><script>alert(1)</script>",
        );
        let translator = Translator::new(source, no_config, vec![]);
        translator.register_client_keys(StaticKeys::new(["Plugin_Key"]));

        let script = translator.client_export_script().unwrap();

        assert!(!script.contains("</script>"));
        assert!(script.contains(r#""Plugin_Key":"<\/script><script>alert(1)<\/script>""#));
    }

    #[test]
    fn test_client_export_uses_current_language() {
        let translator = translator();
        translator.register_client_keys(StaticKeys::new(["General_Yes"]));
        translator.set_current_language(Some("de"));

        let script = translator.client_export_script().unwrap();
        assert!(script.starts_with("var translations = {\"General_Yes\":\"Ja\"};"));
    }

    // ==================== Reverse Lookup Tests ====================

    #[test]
    fn test_find_translation_key() {
        let translator = translator();
        translator.set_current_language(Some("de"));

        let found = translator.find_translation_key_for_translation("Ja").unwrap();
        assert_eq!(found.as_deref(), Some("General_Yes"));
    }

    #[test]
    fn test_find_translation_key_none() {
        let translator = translator();
        let found = translator
            .find_translation_key_for_translation("Not there")
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_all_translations_current_language() {
        let translator = translator();
        translator.set_current_language(Some("de"));
        let all = translator.all_translations().unwrap();
        assert_eq!(all["General"]["Yes"], "Ja");
        assert!(!all["General"].contains_key("OnlyEnglish"));
    }

    // ==================== Misc Tests ====================

    #[test]
    fn test_clean() {
        assert_eq!(Translator::clean("  &amp;&#039;x&#039; "), "&'x'");
    }

    #[test]
    fn test_translator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Translator>();
    }
}
