//! Translation quality validation module.
//!
//! Checks that a translated string keeps the structural elements of its
//! reference text (usually the fallback language): format placeholders,
//! list-pattern tokens and HTML tags. A translation that drops a `%s` breaks
//! formatting at runtime, so placeholder problems are errors; the rest are
//! warnings.

use crate::i18n::html::clean;
use crate::i18n::source::DomainTable;
use crate::i18n::TranslationId;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that break formatting
    pub errors: Vec<String>,

    /// Non-critical warnings about potential issues
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }

    /// Append another report, prefixing each message.
    fn absorb(&mut self, prefix: &str, other: ValidationReport) {
        self.errors
            .extend(other.errors.into_iter().map(|e| format!("{prefix}: {e}")));
        self.warnings
            .extend(other.warnings.into_iter().map(|w| format!("{prefix}: {w}")));
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for translation quality.
pub struct TranslationValidator;

// Regex patterns for extraction (cached for performance)
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();
static LIST_TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
static HTML_TAG_REGEX: OnceLock<Regex> = OnceLock::new();

impl TranslationValidator {
    /// Validate that a translation preserves important elements of its reference.
    ///
    /// This function checks that:
    /// - the same format arguments are consumed (`%s`, `%2$s`, `%d`...)
    /// - list-pattern tokens (`{0}`, `{1}`) are preserved
    /// - HTML tags are preserved (encoded or not)
    /// - the translation is not empty when the reference is not
    ///
    /// # Arguments
    /// * `reference` - The reference text, typically the fallback language
    /// * `translated` - The translated text
    pub fn validate(reference: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        if translated.trim().is_empty() && !reference.trim().is_empty() {
            report.warnings.push("Translation is empty".to_string());
            return report;
        }

        let ref_args = Self::extract_argument_indices(reference);
        let trans_args = Self::extract_argument_indices(translated);
        if ref_args != trans_args {
            report.errors.push(format!(
                "Placeholder mismatch: reference uses arguments {:?}, translation uses {:?}",
                ref_args, trans_args
            ));
        }

        let ref_tokens = Self::extract_list_tokens(reference);
        let trans_tokens = Self::extract_list_tokens(translated);
        if ref_tokens != trans_tokens {
            report.errors.push(format!(
                "List token mismatch: reference has {:?}, translation has {:?}",
                ref_tokens, trans_tokens
            ));
        }

        let ref_tags = Self::extract_html_tags(reference);
        let trans_tags = Self::extract_html_tags(translated);
        if ref_tags != trans_tags {
            report.warnings.push(format!(
                "HTML tag mismatch: reference has {:?}, translation has {:?}",
                ref_tags, trans_tags
            ));
        }

        report
    }

    /// Validate every key of `candidate` against `reference`.
    ///
    /// Keys missing from the candidate are reported as warnings (they resolve
    /// through the fallback language at runtime). Keys only present in the
    /// candidate are ignored. Messages are prefixed with the identifier and
    /// ordered by identifier.
    pub fn validate_tables(reference: &DomainTable, candidate: &DomainTable) -> ValidationReport {
        let mut report = ValidationReport::new();

        let mut domains: Vec<&String> = reference.keys().collect();
        domains.sort();

        for domain in domains {
            let mut keys: Vec<(&String, &String)> = reference[domain].iter().collect();
            keys.sort();

            for (key, reference_text) in keys {
                let id = TranslationId::new(domain, key).to_string();
                match candidate.get(domain).and_then(|keys| keys.get(key)) {
                    Some(text) => report.absorb(&id, Self::validate(reference_text, text)),
                    None => report.warnings.push(format!("{id}: missing translation")),
                }
            }
        }

        report
    }

    /// Argument indices consumed by the format placeholders (1-based).
    fn extract_argument_indices(text: &str) -> BTreeSet<usize> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| {
            Regex::new(r"%(?:(\d+)\$)?[-+ 0]*(?:'.)?\d*(?:\.\d+)?[sdufFeEgGxXobc]").unwrap()
        });

        let without_escapes = text.replace("%%", "");
        let mut next = 0;
        regex
            .captures_iter(&without_escapes)
            .map(|cap| match cap.get(1).and_then(|m| m.as_str().parse::<usize>().ok()) {
                Some(position) => position,
                None => {
                    next += 1;
                    next
                }
            })
            .collect()
    }

    /// All `{n}` tokens, sorted.
    fn extract_list_tokens(text: &str) -> Vec<String> {
        let regex = LIST_TOKEN_REGEX.get_or_init(|| Regex::new(r"\{\d+\}").unwrap());

        let mut tokens: Vec<String> = regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();
        tokens.sort();
        tokens
    }

    /// Lowercased tag names (closing tags prefixed with `/`), sorted.
    /// Entity-encoded tags count as tags.
    fn extract_html_tags(text: &str) -> Vec<String> {
        let regex = HTML_TAG_REGEX
            .get_or_init(|| Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)[^>]*>").unwrap());

        let decoded = clean(text);
        let mut tags: Vec<String> = regex
            .captures_iter(&decoded)
            .map(|cap| format!("{}{}", &cap[1], cap[2].to_lowercase()))
            .collect();
        tags.sort();
        tags
    }
}
