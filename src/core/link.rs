//! Reference classification.
//!
//! Decides whether a reference found in a fetched document must be left
//! alone or resolved against the document's remote directory.

/// Syntactic classification of references
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind<'a> {
    /// Empty (or whitespace-only) attribute value.
    Empty,
    /// Network location with `http:`/`https:` scheme, or protocol-relative `//host`.
    Absolute(&'a str),
    /// Pure in-page anchor (#section). Value is anchor without `#`.
    Fragment(&'a str),
    /// Inline `data:` payload.
    Data(&'a str),
    /// Non-fetchable scheme (`mailto:`, `tel:`, `javascript:`).
    Inert(&'a str),
    /// Anything else: resolved against the base directory.
    Relative(&'a str),
}

/// Schemes that denote something other than a fetchable resource.
const INERT_SCHEMES: [&str; 3] = ["mailto:", "tel:", "javascript:"];

impl<'a> RefKind<'a> {
    /// Parse a reference string into its syntactic kind.
    pub fn parse(reference: &'a str) -> Self {
        let trimmed = reference.trim_start();
        if trimmed.trim_end().is_empty() {
            Self::Empty
        } else if has_prefix_ignore_case(trimmed, "http:")
            || has_prefix_ignore_case(trimmed, "https:")
            || trimmed.starts_with("//")
        {
            Self::Absolute(reference)
        } else if let Some(anchor) = trimmed.strip_prefix('#') {
            Self::Fragment(anchor)
        } else if has_prefix_ignore_case(trimmed, "data:") {
            Self::Data(reference)
        } else if INERT_SCHEMES
            .iter()
            .any(|scheme| has_prefix_ignore_case(trimmed, scheme))
        {
            Self::Inert(reference)
        } else {
            Self::Relative(reference)
        }
    }

    /// Whether this reference is resolved against the base directory.
    #[inline]
    pub fn is_rewritable(&self) -> bool {
        matches!(self, Self::Relative(_))
    }
}

/// Check if a reference must be left untouched by the rewriter.
#[inline]
pub fn is_untouched(reference: &str) -> bool {
    !RefKind::parse(reference).is_rewritable()
}

#[inline]
fn has_prefix_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        assert_eq!(RefKind::parse(""), RefKind::Empty);
        assert_eq!(RefKind::parse("   "), RefKind::Empty);
    }

    #[test]
    fn test_parse_absolute() {
        assert!(matches!(
            RefKind::parse("https://example.com/a.css"),
            RefKind::Absolute("https://example.com/a.css")
        ));
        assert!(matches!(
            RefKind::parse("HTTP://EXAMPLE.COM"),
            RefKind::Absolute(_)
        ));
        assert!(matches!(
            RefKind::parse("//cdn.example.com/lib.js"),
            RefKind::Absolute(_)
        ));
    }

    #[test]
    fn test_parse_fragment() {
        assert!(matches!(
            RefKind::parse("#section"),
            RefKind::Fragment("section")
        ));
        assert!(matches!(RefKind::parse("#"), RefKind::Fragment("")));
    }

    #[test]
    fn test_parse_data() {
        assert!(matches!(
            RefKind::parse("data:image/png;base64,AAAA"),
            RefKind::Data(_)
        ));
        assert!(matches!(RefKind::parse("DATA:text/plain,hi"), RefKind::Data(_)));
    }

    #[test]
    fn test_parse_inert() {
        assert!(matches!(
            RefKind::parse("mailto:user@example.com"),
            RefKind::Inert(_)
        ));
        assert!(matches!(RefKind::parse("tel:+1234567890"), RefKind::Inert(_)));
        assert!(matches!(
            RefKind::parse("javascript:void(0)"),
            RefKind::Inert(_)
        ));
        assert!(matches!(
            RefKind::parse("  JavaScript:alert(1)"),
            RefKind::Inert(_)
        ));
    }

    #[test]
    fn test_parse_relative() {
        assert!(matches!(
            RefKind::parse("style.css"),
            RefKind::Relative("style.css")
        ));
        assert!(matches!(
            RefKind::parse("../img/logo.png"),
            RefKind::Relative(_)
        ));
        assert!(matches!(RefKind::parse("/root.js"), RefKind::Relative(_)));
        assert!(matches!(
            RefKind::parse("page.html#top"),
            RefKind::Relative(_)
        ));
    }

    #[test]
    fn test_is_untouched() {
        assert!(is_untouched(""));
        assert!(is_untouched("https://example.com"));
        assert!(is_untouched("#top"));
        assert!(is_untouched("data:,x"));
        assert!(is_untouched("mailto:a@b.c"));
        assert!(!is_untouched("./a.js"));
        assert!(!is_untouched("a.js"));
    }

    #[test]
    fn test_non_ascii_prefix_does_not_panic() {
        assert!(matches!(RefKind::parse("中文.html"), RefKind::Relative(_)));
        assert!(matches!(RefKind::parse("é"), RefKind::Relative(_)));
    }
}
