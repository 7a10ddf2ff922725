//! Client-side text matching shared by the fallback filters.

use unicase::UniCase;

/// Case-insensitive substring search over a set of optional fields.
///
/// An empty or whitespace-only term matches everything; a missing field
/// never matches.
pub fn search_matches(term: &str, fields: &[Option<&str>]) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Case-insensitive equality, used for enum-like values such as categories.
pub fn same_text(a: &str, b: &str) -> bool {
    UniCase::new(a) == UniCase::new(b)
}
