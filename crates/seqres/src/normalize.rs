//! # Identifier Normalization
//!
//! The as-is fallback stages of the cascade re-try the raw URL-supplied
//! identifier in progressively normalized forms. Each helper here produces a
//! new `String` so stages cannot observe each other's in-place edits; the
//! semantics are fixed: upper-case once, then either strip *all* trailing
//! separators or append exactly one.

/// Separator character used by FASTA-style compound identifiers.
pub const ID_SEPARATOR: char = '|';

/// Upper-cases an identifier for case-insensitive matching against the
/// synonym table.
pub fn normalize_case(raw: &str) -> String {
    raw.to_ascii_uppercase()
}

/// Strips every trailing [`ID_SEPARATOR`], leaving interior separators
/// untouched.
pub fn strip_trailing_separators(id: &str) -> String {
    id.trim_end_matches(ID_SEPARATOR).to_string()
}

/// Appends exactly one [`ID_SEPARATOR`].
pub fn append_separator(id: &str) -> String {
    let mut extended = String::with_capacity(id.len() + 1);
    extended.push_str(id);
    extended.push(ID_SEPARATOR);
    extended
}

/// The terminal-fallback rewrite: identifiers already ending in a separator
/// lose all trailing separators, all others gain exactly one.
pub fn modified_fallback_form(id: &str) -> String {
    if id.ends_with(ID_SEPARATOR) {
        strip_trailing_separators(id)
    } else {
        append_separator(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_normalization_is_ascii_upper() {
        assert_eq!(normalize_case("nc_000001.1"), "NC_000001.1");
        assert_eq!(normalize_case("gi|123"), "GI|123");
    }

    #[test]
    fn trailing_separator_is_stripped_entirely() {
        assert_eq!(modified_fallback_form("NC_000001.1|"), "NC_000001.1");
        assert_eq!(modified_fallback_form("NC_000001.1|||"), "NC_000001.1");
    }

    #[test]
    fn missing_separator_gains_exactly_one() {
        assert_eq!(modified_fallback_form("NC_000001.1"), "NC_000001.1|");
    }

    #[test]
    fn interior_separators_survive_stripping() {
        assert_eq!(modified_fallback_form("GB|ACC|"), "GB|ACC");
        assert_eq!(modified_fallback_form("GB|ACC"), "GB|ACC|");
    }
}
