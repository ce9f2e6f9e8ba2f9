use crate::i18n::DefaultLanguage;
use anyhow::{Context, Result};
use std::env::{self, VarError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Configured default language, `None` when not configured
    pub default_language: Option<String>,

    /// Translation search locations, in override order
    pub translation_dirs: Vec<String>,

    /// Identifiers exported by the `export` command
    pub client_export_keys: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_language: None,
            translation_dirs: vec!["lang".to_string()],
            client_export_keys: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Empty means "not configured"
            default_language: optional_var("DEFAULT_LANGUAGE")?
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),

            // Colon-separated, like PATH
            translation_dirs: optional_var("TRANSLATION_DIRS")?
                .map(|v| split_list(&v, ':'))
                .filter(|dirs| !dirs.is_empty())
                .unwrap_or_else(|| vec!["lang".to_string()]),

            client_export_keys: optional_var("CLIENT_EXPORT_KEYS")?
                .map(|v| split_list(&v, ','))
                .unwrap_or_default(),
        })
    }
}

impl DefaultLanguage for Config {
    fn default_language(&self) -> Option<String> {
        self.default_language.clone()
    }
}

fn optional_var(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("{name} is not valid unicode")),
    }
}

fn split_list(value: &str, separator: char) -> Vec<String> {
    value
        .split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
