//! Translation sources: where per-language tables come from.
//!
//! The resolver only knows the [`TranslationSource`] trait. Two
//! implementations ship with the crate: [`JsonFileSource`] reads
//! `<location>/<language>.json` files, [`StaticSource`] serves tables held in
//! memory.

use crate::error::SourceError;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// `key -> text` for one domain.
pub type KeyTable = HashMap<String, String>;

/// `domain -> key -> text` for one language.
pub type DomainTable = HashMap<String, KeyTable>;

/// Provides the translation table of a language.
///
/// Implementations must be deterministic for fixed inputs. A language with no
/// data is an empty table, not an error.
pub trait TranslationSource: Send + Sync {
    fn load(&self, language: &str, locations: &[String]) -> Result<DomainTable, SourceError>;
}

/// Reads `<location>/<language>.json` from every location in order.
///
/// Each file holds a JSON object `{ "Domain": { "Key": "text", ... }, ... }`.
/// Files found in later locations override earlier ones key by key, so a
/// plugin directory registered after the core directory can replace single
/// strings without repeating the whole domain.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileSource;

impl JsonFileSource {
    pub fn new() -> Self {
        JsonFileSource
    }

    /// Path of the resource file for `language` inside `location`.
    pub fn file_path(location: &str, language: &str) -> PathBuf {
        Path::new(location).join(format!("{language}.json"))
    }

    fn merge_file(path: &Path, table: &mut DomainTable) -> Result<(), SourceError> {
        let content = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let root: Value = serde_json::from_str(&content).map_err(|source| SourceError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let Value::Object(domains) = root else {
            warn!("Ignoring {:?}: top level is not a JSON object", path);
            return Ok(());
        };

        for (domain, keys) in domains {
            let Value::Object(keys) = keys else {
                warn!("Ignoring domain '{}' in {:?}: not a JSON object", domain, path);
                continue;
            };
            let entries = table.entry(domain.clone()).or_default();
            for (key, text) in keys {
                match text {
                    Value::String(text) => {
                        entries.insert(key, text);
                    }
                    other => warn!(
                        "Ignoring {}_{} in {:?}: expected a string, found {}",
                        domain, key, path, other
                    ),
                }
            }
        }

        Ok(())
    }
}

impl TranslationSource for JsonFileSource {
    fn load(&self, language: &str, locations: &[String]) -> Result<DomainTable, SourceError> {
        let mut table = DomainTable::new();

        if !is_safe_language_code(language) {
            warn!("Refusing to load translations for language code '{}'", language);
            return Ok(table);
        }

        for location in locations {
            let path = Self::file_path(location, language);
            if !path.is_file() {
                debug!("No translation file at {:?}", path);
                continue;
            }
            debug!("Loading translations from {:?}", path);
            Self::merge_file(&path, &mut table)?;
        }

        Ok(table)
    }
}

/// Language codes are used as file names, so only `[A-Za-z0-9_-]` is allowed.
fn is_safe_language_code(language: &str) -> bool {
    !language.is_empty()
        && language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// In-memory tables keyed by language. Ignores the search locations.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    languages: HashMap<String, DomainTable>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single translation.
    pub fn with_entry(mut self, language: &str, domain: &str, key: &str, text: &str) -> Self {
        self.languages
            .entry(language.to_string())
            .or_default()
            .entry(domain.to_string())
            .or_default()
            .insert(key.to_string(), text.to_string());
        self
    }

    /// Replace the whole table of a language.
    pub fn with_language(mut self, language: &str, table: DomainTable) -> Self {
        self.languages.insert(language.to_string(), table);
        self
    }
}

impl TranslationSource for StaticSource {
    fn load(&self, language: &str, _locations: &[String]) -> Result<DomainTable, SourceError> {
        Ok(self.languages.get(language).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, file: &str, content: &str) {
        fs::write(dir.path().join(file), content).expect("Failed to write resource");
    }

    fn location(dir: &TempDir) -> String {
        dir.path().to_str().unwrap().to_string()
    }

    // ==================== JsonFileSource Tests ====================

    #[test]
    fn test_json_source_reads_nested_table() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "de.json",
            r#"{"General": {"Date": "Datum", "Visits": "Besuche"}, "Goals": {"Goal": "Ziel"}}"#,
        );

        let table = JsonFileSource::new().load("de", &[location(&dir)]).unwrap();

        assert_eq!(table["General"]["Date"], "Datum");
        assert_eq!(table["General"]["Visits"], "Besuche");
        assert_eq!(table["Goals"]["Goal"], "Ziel");
    }

    #[test]
    fn test_json_source_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let table = JsonFileSource::new().load("fr", &[location(&dir)]).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_json_source_later_location_overrides() {
        let core = TempDir::new().unwrap();
        let plugin = TempDir::new().unwrap();
        write(&core, "en.json", r#"{"General": {"Save": "Save", "Cancel": "Cancel"}}"#);
        write(&plugin, "en.json", r#"{"General": {"Save": "Store"}}"#);

        let table = JsonFileSource::new()
            .load("en", &[location(&core), location(&plugin)])
            .unwrap();

        assert_eq!(table["General"]["Save"], "Store");
        assert_eq!(table["General"]["Cancel"], "Cancel");
    }

    #[test]
    fn test_json_source_invalid_json_is_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "en.json", "{ not json");

        let result = JsonFileSource::new().load("en", &[location(&dir)]);
        assert!(matches!(result, Err(SourceError::Parse { .. })));
    }

    #[test]
    fn test_json_source_skips_non_string_values() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "en.json",
            r#"{"General": {"Ok": "OK", "Count": 3, "Nested": {"a": "b"}}, "Broken": "x"}"#,
        );

        let table = JsonFileSource::new().load("en", &[location(&dir)]).unwrap();

        assert_eq!(table["General"].len(), 1);
        assert_eq!(table["General"]["Ok"], "OK");
        assert!(!table.contains_key("Broken"));
    }

    #[test]
    fn test_json_source_rejects_path_like_language() {
        let dir = TempDir::new().unwrap();
        write(&dir, "en.json", r#"{"General": {"Ok": "OK"}}"#);

        let table = JsonFileSource::new()
            .load("../en", &[location(&dir)])
            .unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_file_path() {
        let path = JsonFileSource::file_path("lang", "pt-br");
        assert_eq!(path, Path::new("lang").join("pt-br.json"));
    }

    // ==================== StaticSource Tests ====================

    #[test]
    fn test_static_source_entries() {
        let source = StaticSource::new()
            .with_entry("en", "General", "Yes", "Yes")
            .with_entry("de", "General", "Yes", "Ja");

        let de = source.load("de", &[]).unwrap();
        assert_eq!(de["General"]["Yes"], "Ja");
        assert!(source.load("fr", &[]).unwrap().is_empty());
    }
}
