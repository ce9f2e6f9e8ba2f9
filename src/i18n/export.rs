//! Client-side export of selected translations.
//!
//! Host applications register [`ClientKeyProvider`]s that name the
//! identifiers a separate runtime (typically browser scripts) needs. The
//! translator resolves those identifiers and the result is serialized as a
//! JSON object plus a small bootstrap snippet that merges it into a shared
//! dictionary. Identifiers keep the order in which providers named them.

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

/// Identifier -> markup-safe localized text, in first-seen order.
pub type ClientExportTable = Map<String, Value>;

/// Supplies fully qualified identifiers (`Domain_Key`) to export.
pub trait ClientKeyProvider: Send + Sync {
    fn client_keys(&self) -> Vec<String>;
}

impl<F> ClientKeyProvider for F
where
    F: Fn() -> Vec<String> + Send + Sync,
{
    fn client_keys(&self) -> Vec<String> {
        self()
    }
}

/// A fixed list of identifiers.
#[derive(Debug, Clone, Default)]
pub struct StaticKeys(pub Vec<String>);

impl StaticKeys {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StaticKeys(keys.into_iter().map(Into::into).collect())
    }
}

impl ClientKeyProvider for StaticKeys {
    fn client_keys(&self) -> Vec<String> {
        self.0.clone()
    }
}

/// Ordered list of registered providers.
#[derive(Default)]
pub struct ClientKeyRegistry {
    providers: RwLock<Vec<Arc<dyn ClientKeyProvider>>>,
}

impl ClientKeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, provider: Arc<dyn ClientKeyProvider>) {
        self.providers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys of every provider, de-duplicated, in first-seen order.
    pub fn collect(&self) -> Vec<String> {
        let providers = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let mut seen = HashSet::new();
        providers
            .iter()
            .flat_map(|provider| provider.client_keys())
            .filter(|key| seen.insert(key.clone()))
            .collect()
    }
}

impl std::fmt::Debug for ClientKeyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientKeyRegistry")
            .field("providers", &self.len())
            .finish()
    }
}

/// JSON object literal of the export table.
///
/// `/` is written as `\/` so the literal can sit inside a `<script>` element
/// without a value closing it.
pub fn to_json(table: &ClientExportTable) -> String {
    // `/` only occurs inside JSON strings, where `\/` is a valid escape
    Value::Object(table.clone()).to_string().replace('/', "\\/")
}

/// Bootstrap snippet assigning the table and merging it into the shared
/// `piwik_translations` dictionary.
pub fn render_script(table: &ClientExportTable) -> String {
    format!(
        "var translations = {};\n\
         if (typeof(piwik_translations) == 'undefined') {{ var piwik_translations = new Object; }}\
         for(var i in translations) {{ piwik_translations[i] = translations[i];}} ",
        to_json(table)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Registry Tests ====================

    #[test]
    fn test_collect_deduplicates_in_order() {
        let registry = ClientKeyRegistry::new();
        registry.register(Arc::new(StaticKeys::new(["General_Yes", "General_No"])));
        registry.register(Arc::new(|| {
            vec!["Goals_Goal".to_string(), "General_Yes".to_string()]
        }));

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.collect(),
            vec!["General_Yes", "General_No", "Goals_Goal"]
        );
    }

    #[test]
    fn test_empty_registry() {
        let registry = ClientKeyRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.collect().is_empty());
    }

    // ==================== Rendering Tests ====================

    fn entry(table: &mut ClientExportTable, id: &str, text: &str) {
        table.insert(id.to_string(), Value::String(text.to_string()));
    }

    #[test]
    fn test_to_json_is_valid_json() {
        let mut table = ClientExportTable::new();
        entry(&mut table, "General_Quote", "say \"hi\"");
        entry(&mut table, "General_Tag", "&lt;b&gt;");
        entry(&mut table, "General_Path", "a/b");

        let json = to_json(&table);
        let parsed: ClientExportTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_to_json_keeps_insertion_order() {
        let mut table = ClientExportTable::new();
        entry(&mut table, "Goals_Goal", "Goal");
        entry(&mut table, "General_Yes", "Yes");
        entry(&mut table, "Actions_Actions", "Actions");

        assert_eq!(
            to_json(&table),
            r#"{"Goals_Goal":"Goal","General_Yes":"Yes","Actions_Actions":"Actions"}"#
        );
    }

    #[test]
    fn test_to_json_escapes_slashes() {
        let mut table = ClientExportTable::new();
        entry(&mut table, "Plugin_Key", "</script><b>x</b>");

        let json = to_json(&table);

        assert!(!json.contains("</"));
        assert_eq!(json, r#"{"Plugin_Key":"<\/script><b>x<\/b>"}"#);
    }

    #[test]
    fn test_render_script_never_closes_script_element() {
        let mut table = ClientExportTable::new();
        entry(&mut table, "Plugin_Key", "</script><script>alert(1)</script>");

        let script = render_script(&table);

        assert!(!script.contains("</script>"));
        assert!(!script.to_lowercase().contains("</"));
    }

    #[test]
    fn test_render_script_shape() {
        let mut table = ClientExportTable::new();
        entry(&mut table, "General_Yes", "Ja");

        let script = render_script(&table);

        assert!(script.starts_with("var translations = {\"General_Yes\":\"Ja\"};\n"));
        assert!(script.contains("var piwik_translations = new Object;"));
        assert!(script.contains("piwik_translations[i] = translations[i];"));
    }

    #[test]
    fn test_render_script_empty_table() {
        let script = render_script(&ClientExportTable::new());
        assert!(script.starts_with("var translations = {};"));
    }
}
