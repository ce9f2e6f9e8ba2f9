//! Locale-aware list phrases ("A, B, and C" / "A, B, or C").
//!
//! Every locale supplies four patterns per list type under the `Intl`
//! domain, each with `{0}` and `{1}` placeholders:
//!
//! - `ListPattern<Type>2` joins exactly two items
//! - `ListPattern<Type>Start` wraps the first item and the rest of the list
//! - `ListPattern<Type>Middle` wraps each inner item and the rest of the list
//! - `ListPattern<Type>End` joins the final two items
//!
//! Items are inserted verbatim: placeholder-like text inside an item is never
//! substituted again.

use std::fmt;

/// Conjunction used to join the items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    And,
    Or,
}

impl ListType {
    fn as_str(&self) -> &'static str {
        match self {
            ListType::And => "And",
            ListType::Or => "Or",
        }
    }

    /// Identifier of one of the four patterns, e.g. `Intl_ListPatternAndStart`.
    pub fn pattern_id(&self, part: &str) -> String {
        format!("Intl_ListPattern{}{}", self.as_str(), part)
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join `items` using the patterns returned by `pattern`.
///
/// `pattern` receives a full identifier (see [`ListType::pattern_id`]) and is
/// only called for the patterns the item count needs.
pub fn create_listing<S, F, E>(
    list_type: ListType,
    items: &[S],
    mut pattern: F,
) -> Result<String, E>
where
    S: AsRef<str>,
    F: FnMut(&str) -> Result<String, E>,
{
    match items {
        [] => Ok(String::new()),
        [only] => Ok(only.as_ref().to_string()),
        [first, second] => {
            let pair = pattern(&list_type.pattern_id("2"))?;
            Ok(substitute(&pair, first.as_ref(), second.as_ref()))
        }
        [first, inner @ .., before_last, last] => {
            let start = pattern(&list_type.pattern_id("Start"))?;
            let middle = pattern(&list_type.pattern_id("Middle"))?;
            let end = pattern(&list_type.pattern_id("End"))?;

            // Build from the right: End(n-2, n-1), then Middle(i, rest) for
            // each inner item, then Start(first, rest).
            let mut tail = substitute(&end, before_last.as_ref(), last.as_ref());
            for item in inner.iter().rev() {
                tail = substitute(&middle, item.as_ref(), &tail);
            }
            Ok(substitute(&start, first.as_ref(), &tail))
        }
    }
}

/// Replace `{0}` and `{1}` in a single pass.
fn substitute(pattern: &str, first: &str, second: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + first.len() + second.len());
    let mut rest = pattern;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        if let Some(after) = candidate.strip_prefix("{0}") {
            out.push_str(first);
            rest = after;
        } else if let Some(after) = candidate.strip_prefix("{1}") {
            out.push_str(second);
            rest = after;
        } else {
            out.push('{');
            rest = &candidate[1..];
        }
    }
    out.push_str(rest);

    out
}
