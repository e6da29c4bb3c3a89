//! XML name validation utilities
//!
//! Lexical checks for NCNames and colon-qualified names as they appear in
//! XSD reference attributes (`type`, `ref`, `base`, `itemType`,
//! `memberTypes`, `substitutionGroup`).

use once_cell::sync::Lazy;
use regex::Regex;

static NCNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}][A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\-\.0-9\u{B7}]*$",
    )
    .unwrap()
});

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    !name.is_empty() && NCNAME.is_match(name)
}

/// Check if a string is a lexically valid qualified name
///
/// A qualified name is either `local` or `prefix:local` where both parts
/// are NCNames. Strings with a leading/trailing colon or more than one
/// colon are rejected.
pub fn is_valid_qname(name: &str) -> bool {
    if let Some((prefix, local)) = name.split_once(':') {
        is_valid_ncname(prefix) && is_valid_ncname(local)
    } else {
        is_valid_ncname(name)
    }
}

/// Split a qualified name into optional prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some((prefix, local)) = qname.split_once(':') {
        (Some(prefix), local)
    } else {
        (None, qname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_ncname() {
        assert!(is_valid_ncname("element"));
        assert!(is_valid_ncname("my-element"));
        assert!(is_valid_ncname("_element"));
        assert!(is_valid_ncname("element.1"));

        assert!(!is_valid_ncname(""));
        assert!(!is_valid_ncname("123element"));
        assert!(!is_valid_ncname("-element"));
        assert!(!is_valid_ncname("prefix:element"));
    }

    #[test]
    fn test_non_ascii_ncnames() {
        assert!(is_valid_ncname("größe"));
        assert!(is_valid_ncname("ørsted"));
        assert!(is_valid_ncname("élément"));
        assert!(is_valid_ncname("nom·bre"));

        assert!(!is_valid_ncname("÷element"));
        assert!(!is_valid_ncname("·element"));
    }

    #[test]
    fn test_is_valid_qname() {
        assert!(is_valid_qname("element"));
        assert!(is_valid_qname("xs:element"));

        assert!(!is_valid_qname(""));
        assert!(!is_valid_qname(":element"));
        assert!(!is_valid_qname("element:"));
        assert!(!is_valid_qname("a:b:c"));
    }

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("element"), (None, "element"));
        assert_eq!(split_qname("xs:element"), (Some("xs"), "element"));
    }
}
