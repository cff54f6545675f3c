//! HTML helpers for the document rewriter.
//!
//! - `encode_attr()`, `decode_attr()` - attribute value entity handling
//! - `is_void_element()` - elements serialized without a closing tag
//! - `is_doctype()`, `strip_doctype()` - doctype declarations, dropped on re-serialization

use std::borrow::Cow;

/// Standard doctype prefixed to every rewritten document.
pub const DOCTYPE: &str = "<!DOCTYPE html>";

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Escape a value for use inside a double-quoted attribute.
///
/// Uses `Cow` to avoid allocation when nothing needs escaping.
pub fn encode_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '"', '<', '>']) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Decode character references in an attribute value.
///
/// Handles the named entities that show up in URLs plus numeric references.
/// Anything unrecognized is kept literally.
pub fn decode_attr(value: &str) -> Cow<'_, str> {
    if !value.contains('&') {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        match tail.find(';').filter(|&end| end <= 12) {
            Some(end) => match decode_entity(&tail[1..end]) {
                Some(c) => {
                    out.push(c);
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push('&');
                    rest = &tail[1..];
                }
            },
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "nbsp" => Some('\u{00A0}'),
        _ => {
            let digits = entity.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Check if a (lowercase) tag name is a void element.
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Check if markup starts with a doctype declaration.
pub fn is_doctype(markup: &str) -> bool {
    let trimmed = markup.trim_start().as_bytes();
    trimmed.len() >= 9 && trimmed[..9].eq_ignore_ascii_case(b"<!doctype")
}

/// Remove a leading doctype declaration, if any.
pub fn strip_doctype(markup: &str) -> &str {
    let trimmed = markup.trim_start();
    if !is_doctype(trimmed) {
        return markup;
    }
    match trimmed.find('>') {
        Some(end) => &trimmed[end + 1..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_attr() {
        assert_eq!(encode_attr("https://h/a.css"), "https://h/a.css");
        assert_eq!(encode_attr("a?x=1&y=2"), "a?x=1&amp;y=2");
        assert_eq!(encode_attr("say \"hi\""), "say &quot;hi&quot;");
        assert!(matches!(encode_attr("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_decode_attr() {
        assert_eq!(decode_attr("plain"), "plain");
        assert_eq!(decode_attr("a?x=1&amp;y=2"), "a?x=1&y=2");
        assert_eq!(decode_attr("&#65;&#x42;"), "AB");
        assert_eq!(decode_attr("&quot;q&quot;"), "\"q\"");
    }

    #[test]
    fn test_decode_attr_keeps_unknown() {
        assert_eq!(decode_attr("a&b"), "a&b");
        assert_eq!(decode_attr("&unknown;"), "&unknown;");
        assert_eq!(decode_attr("x&"), "x&");
        assert_eq!(decode_attr("&#xZZ;"), "&#xZZ;");
    }

    #[test]
    fn test_encode_decode_inverse() {
        let value = "a.css?x=1&y=\"2\"";
        assert_eq!(decode_attr(&encode_attr(value)), value);
    }

    #[test]
    fn test_void_elements() {
        assert!(is_void_element("br"));
        assert!(is_void_element("img"));
        assert!(is_void_element("source"));
        assert!(!is_void_element("a"));
        assert!(!is_void_element("script"));
    }

    #[test]
    fn test_is_doctype() {
        assert!(is_doctype("<!DOCTYPE html>"));
        assert!(is_doctype("  <!doctype html>"));
        assert!(!is_doctype("<html>"));
        assert!(!is_doctype("<!-- comment -->"));
    }

    #[test]
    fn test_strip_doctype() {
        assert_eq!(strip_doctype("<!DOCTYPE html>\n<html></html>"), "\n<html></html>");
        assert_eq!(strip_doctype("<html></html>"), "<html></html>");
        assert_eq!(strip_doctype("<!doctype"), "");
    }
}
