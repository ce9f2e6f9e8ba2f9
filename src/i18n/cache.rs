//! Per-language table cache.
//!
//! Tables are loaded lazily, one language at a time, and are immutable once
//! cached. The map sits behind a read-mostly `RwLock`; a miss re-checks under
//! the write lock before loading, so concurrent first lookups of the same
//! language load it only once.

use crate::error::SourceError;
use crate::i18n::source::DomainTable;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// How a table was obtained from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Already cached.
    Hit,
    /// Loaded from the source by this call.
    Loaded,
}

#[derive(Debug, Default)]
pub struct TranslationCache {
    tables: RwLock<HashMap<String, Arc<DomainTable>>>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached table of `language`, if it has been loaded.
    ///
    /// An empty table is a valid cached result and is returned as `Some`.
    pub fn get(&self, language: &str) -> Option<Arc<DomainTable>> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(language)
            .cloned()
    }

    /// Return the table of `language`, calling `load` if it is not cached yet.
    ///
    /// `load` runs at most once per language between two [`clear`](Self::clear)
    /// calls. On error nothing is cached and the error is returned as is.
    pub fn get_or_load<F>(
        &self,
        language: &str,
        load: F,
    ) -> Result<(Arc<DomainTable>, Lookup), SourceError>
    where
        F: FnOnce() -> Result<DomainTable, SourceError>,
    {
        if let Some(table) = self.get(language) {
            return Ok((table, Lookup::Hit));
        }

        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = tables.get(language) {
            return Ok((Arc::clone(table), Lookup::Hit));
        }

        let table = Arc::new(load()?);
        tables.insert(language.to_string(), Arc::clone(&table));
        Ok((table, Lookup::Loaded))
    }

    /// Whether `language` has been loaded (possibly as an empty table).
    pub fn is_loaded(&self, language: &str) -> bool {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(language)
    }

    /// Sorted list of cached languages.
    pub fn loaded_languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        languages.sort();
        languages
    }

    /// Drop every cached language.
    pub fn clear(&self) {
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
