//! Document rewriter (raw markup → self-contained document).
//!
//! Parses the fetched markup with `tl`, then re-serializes it while
//! resolving every fetchable reference against the document's remote
//! directory:
//!
//! | Element  | Attributes        |
//! |----------|-------------------|
//! | `a`      | `href`            |
//! | `img`    | `src`             |
//! | `script` | `src`             |
//! | `link`   | `href` (stylesheet only) |
//! | `source` | `src`             |
//! | `video`  | `src`, `poster`   |
//! | `audio`  | `src`             |
//!
//! Raw-text element bodies (`script`, `style`, `textarea`, `title`) are
//! written back exactly as fetched.
//!
//! References classified as untouched by [`RefKind`](crate::core::RefKind) are emitted exactly as
//! they appeared in the source.

use std::borrow::Cow;
use std::fmt::Write;

use super::prepare::{BODY_MARKER, PreparedSource, prepare};
use crate::core::{is_untouched, resolve_reference};
use crate::utils::html::{
    DOCTYPE, decode_attr, encode_attr, is_doctype, is_void_element, strip_doctype,
};

/// Element → reference-bearing attributes.
const REFERENCE_ATTRS: [(&str, &[&str]); 7] = [
    ("a", &["href"]),
    ("img", &["src"]),
    ("script", &["src"]),
    ("link", &["href"]),
    ("source", &["src"]),
    ("video", &["src", "poster"]),
    ("audio", &["src"]),
];

/// Rewrite `markup` so that every relative reference resolves against `base`.
///
/// Always returns a complete document starting with `<!DOCTYPE html>`.
/// Never fails: unparseable input is wrapped as-is.
pub fn rewrite_document(markup: &str, base: &str) -> String {
    let markup = strip_doctype(markup);
    let source = prepare(markup);
    let body = match tl::parse(&source.markup, tl::ParserOptions::default()) {
        Ok(dom) => {
            let writer = DocumentWriter {
                base,
                source: &source,
            };
            let parser = dom.parser();
            let mut out = String::with_capacity(markup.len() + 256);
            let mut skeleton = Skeleton::Fragment;

            for handle in dom.children() {
                if let Some(tl::Node::Tag(tag)) = handle.get(parser) {
                    skeleton = skeleton.max(Skeleton::of(&tag.name().as_utf8_str()));
                }
                writer.write_node(*handle, parser, &mut out);
            }

            skeleton.complete(&out)
        }
        Err(e) => {
            crate::debug!("rewrite"; "parse failed, keeping markup as-is: {:?}", e);
            Skeleton::Fragment.complete(markup)
        }
    };

    format!("{DOCTYPE}\n{}", body.trim_start())
}

/// How much document structure the top level already provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Skeleton {
    Fragment,
    Sections,
    Document,
}

impl Skeleton {
    fn of(name: &str) -> Self {
        if name.eq_ignore_ascii_case("html") {
            Self::Document
        } else if name.eq_ignore_ascii_case("head") || name.eq_ignore_ascii_case("body") {
            Self::Sections
        } else {
            Self::Fragment
        }
    }

    /// Add only the structure `content` lacks.
    fn complete(self, content: &str) -> String {
        match self {
            Self::Document => content.to_owned(),
            Self::Sections => format!("<html>{content}</html>"),
            Self::Fragment => format!("<html><head></head><body>{content}</body></html>"),
        }
    }
}

/// Attributes of `tag` that carry fetchable references.
fn reference_attrs(tag: &str, rel: Option<&str>) -> &'static [&'static str] {
    if tag == "link" && !rel.is_some_and(is_stylesheet_rel) {
        return &[];
    }
    REFERENCE_ATTRS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, attrs)| *attrs)
        .unwrap_or(&[])
}

fn is_stylesheet_rel(rel: &str) -> bool {
    rel.split_ascii_whitespace()
        .any(|token| token.eq_ignore_ascii_case("stylesheet"))
}

// =============================================================================
// Serialization
// =============================================================================

struct DocumentWriter<'a> {
    base: &'a str,
    source: &'a PreparedSource,
}

impl DocumentWriter<'_> {
    fn write_node(&self, handle: tl::NodeHandle, parser: &tl::Parser<'_>, out: &mut String) {
        let Some(node) = handle.get(parser) else {
            return;
        };

        match node {
            tl::Node::Tag(tag) => self.write_tag(tag, parser, out),
            tl::Node::Raw(bytes) => {
                let text = bytes.as_utf8_str();
                if !is_doctype(&text) {
                    out.push_str(&text);
                }
            }
            tl::Node::Comment(bytes) => {
                let text = bytes.as_utf8_str();
                if text.starts_with("<!--") {
                    out.push_str(&text);
                } else {
                    let _ = write!(out, "<!--{text}-->");
                }
            }
        }
    }

    fn write_tag(&self, tag: &tl::HTMLTag<'_>, parser: &tl::Parser<'_>, out: &mut String) {
        let name = tag.name().as_utf8_str();
        if name.starts_with('!') {
            // Declarations such as <!DOCTYPE>; the prefix is added once at the end.
            for child in tag.children().top().iter() {
                self.write_node(*child, parser, out);
            }
            return;
        }
        let lower = name.to_ascii_lowercase();

        let attributes = tag.attributes();
        let rel = attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("rel"))
            .and_then(|(_, value)| value);
        let rewritable = reference_attrs(&lower, rel.as_deref());

        let mut raw_body = None;
        out.push('<');
        out.push_str(&name);
        for (key, value) in attributes.iter() {
            if key == BODY_MARKER {
                raw_body = value.as_deref().and_then(|index| self.source.body(index));
                continue;
            }
            out.push(' ');
            out.push_str(&key);

            let Some(value) = value else {
                continue;
            };
            let rewrite = rewritable
                .iter()
                .any(|attr| key.eq_ignore_ascii_case(attr));
            let value = if rewrite {
                self.rewrite_value(&value)
            } else {
                value
            };
            write_attr_value(&value, out);
        }
        out.push('>');

        if let Some(body) = raw_body {
            out.push_str(body);
        } else if is_void_element(&lower) {
            return;
        } else {
            for child in tag.children().top().iter() {
                self.write_node(*child, parser, out);
            }
        }

        out.push_str("</");
        out.push_str(&name);
        out.push('>');
    }

    /// Resolve a raw (entity-encoded) attribute value if it is rewritable.
    fn rewrite_value<'v>(&self, raw: &Cow<'v, str>) -> Cow<'v, str> {
        let decoded = decode_attr(raw);
        if is_untouched(&decoded) {
            return raw.clone();
        }
        let resolved = resolve_reference(decoded.trim(), self.base);
        Cow::Owned(encode_attr(&resolved).into_owned())
    }
}

/// Write `="value"`, picking a quote style that keeps the raw value intact.
fn write_attr_value(value: &str, out: &mut String) {
    if !value.contains('"') {
        let _ = write!(out, "=\"{value}\"");
    } else if !value.contains('\'') {
        let _ = write!(out, "='{value}'");
    } else {
        let _ = write!(out, "=\"{}\"", value.replace('"', "&quot;"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://raw.example.com/o/r/main/docs/";

    fn rewrite(markup: &str) -> String {
        rewrite_document(markup, BASE)
    }

    /// Output without the injected doctype line.
    fn body_of(document: &str) -> &str {
        document
            .strip_prefix(DOCTYPE)
            .map(str::trim_start)
            .unwrap_or(document)
    }

    #[test]
    fn test_rewrites_relative_references() {
        let out = rewrite(
            r#"<html><head><link rel="stylesheet" href="css/site.css"></head><body><img src="../logo.png"><script src="app.js"></script></body></html>"#,
        );
        assert!(out.contains(r#"href="https://raw.example.com/o/r/main/docs/css/site.css""#));
        assert!(out.contains(r#"src="https://raw.example.com/o/r/main/logo.png""#));
        assert!(out.contains(r#"src="https://raw.example.com/o/r/main/docs/app.js""#));
    }

    #[test]
    fn test_rewrites_media_elements() {
        let out = rewrite(
            r#"<html><body><video src="v.mp4" poster="p.png"><source src="v.webm"></video><audio src="a.ogg"></audio></body></html>"#,
        );
        assert!(out.contains(r#"src="https://raw.example.com/o/r/main/docs/v.mp4""#));
        assert!(out.contains(r#"poster="https://raw.example.com/o/r/main/docs/p.png""#));
        assert!(out.contains(r#"src="https://raw.example.com/o/r/main/docs/v.webm""#));
        assert!(out.contains(r#"src="https://raw.example.com/o/r/main/docs/a.ogg""#));
    }

    #[test]
    fn test_special_references_unchanged() {
        let specials = [
            "https://example.com/a.css",
            "http://example.com/",
            "#section",
            "data:image/png;base64,AAAA",
            "mailto:user@example.com",
            "tel:+123",
            "javascript:void(0)",
        ];
        for special in specials {
            let out = rewrite(&format!(r#"<html><body><a href="{special}">x</a></body></html>"#));
            assert!(
                out.contains(&format!(r#"href="{special}""#)),
                "{special} was modified: {out}"
            );
        }
    }

    #[test]
    fn test_non_stylesheet_link_unchanged() {
        let out = rewrite(r#"<html><head><link rel="icon" href="favicon.ico"></head></html>"#);
        assert!(out.contains(r#"href="favicon.ico""#));
    }

    #[test]
    fn test_unregistered_attributes_unchanged() {
        let out = rewrite(r#"<html><body><div data-src="x.png">a</div></body></html>"#);
        assert!(out.contains(r#"data-src="x.png""#));
    }

    #[test]
    fn test_entities_in_reference() {
        let out = rewrite(r#"<html><body><a href="page.html?a=1&amp;b=2">x</a></body></html>"#);
        assert!(out.contains(r#"href="https://raw.example.com/o/r/main/docs/page.html?a=1&amp;b=2""#));
    }

    #[test]
    fn test_output_has_doctype() {
        let out = rewrite("<!DOCTYPE html><html><body>hi</body></html>");
        assert!(out.starts_with(DOCTYPE));
        assert_eq!(out.matches("<!DOCTYPE").count() + out.matches("<!doctype").count(), 1);
    }

    #[test]
    fn test_fragment_is_wrapped() {
        let out = rewrite(r#"<p>hello <a href="b.html">b</a></p>"#);
        assert!(out.starts_with(DOCTYPE));
        assert!(out.contains("<html>"));
        assert!(out.contains("<body>"));
        assert!(out.contains(r#"href="https://raw.example.com/o/r/main/docs/b.html""#));
    }

    #[test]
    fn test_malformed_markup_does_not_panic() {
        let inputs = [
            "<div><p>unclosed <a href='x.html'>link",
            "<<<>>>",
            "</only-close>",
            "<img src=",
            "",
        ];
        for input in inputs {
            let out = rewrite(input);
            assert!(out.starts_with(DOCTYPE), "{input:?} produced {out:?}");
        }
    }

    #[test]
    fn test_idempotent_without_rewritable_references() {
        let doc = r##"<html><head><title>T</title></head><body><a href="#top">top</a><p>text</p><img src="https://example.com/i.png"></body></html>"##;
        let once = rewrite(doc);
        let twice = rewrite(&once);
        assert_eq!(body_of(&twice), body_of(&once));
    }

    #[test]
    fn test_void_elements_not_closed() {
        let out = rewrite(r#"<html><body>a<br>b<img src="x.png"></body></html>"#);
        assert!(!out.contains("</br>"));
        assert!(!out.contains("</img>"));
    }

    #[test]
    fn test_inline_script_kept_verbatim() {
        let out = rewrite(
            "<html><body><script>for(var i=0;i<n;i++){if(a&&b)x()}</script><p>after</p><br/></body></html>",
        );
        assert!(
            out.contains("<script>for(var i=0;i<n;i++){if(a&&b)x()}</script><p>after</p><br></body>"),
            "{out}"
        );
    }

    #[test]
    fn test_closing_tag_inside_script_string() {
        let out = rewrite(r#"<html><body><p>x</p><script>document.write("</p>")</script></body></html>"#);
        assert!(out.contains(r#"<script>document.write("</p>")</script></body>"#), "{out}");
    }

    #[test]
    fn test_raw_text_elements_keep_markup_like_text() {
        let out = rewrite(
            r#"<html><head><title>a < b</title><style>a>b{color:red}</style></head><body><textarea><a href="x.html">&amp;</textarea></body></html>"#,
        );
        assert!(out.contains("<title>a < b</title>"));
        assert!(out.contains("<style>a>b{color:red}</style>"));
        assert!(out.contains(r#"<textarea><a href="x.html">&amp;</textarea>"#));
        assert!(!out.contains("rawpeek"));
    }

    #[test]
    fn test_script_src_rewritten_alongside_body() {
        let out = rewrite(r#"<html><body><script src="app.js">init(1<2)</script></body></html>"#);
        assert!(out.contains(
            r#"<script src="https://raw.example.com/o/r/main/docs/app.js">init(1<2)</script>"#
        ));
    }

    #[test]
    fn test_self_closing_void_does_not_swallow_siblings() {
        let out = rewrite("a<br/>b");
        assert_eq!(body_of(&out), "<html><head></head><body>a<br>b</body></html>");
    }

    #[test]
    fn test_sections_without_root_wrapped_once() {
        let out = rewrite(
            r#"<head><link rel="stylesheet" href="s.css"></head><body>x</body>"#,
        );
        assert_eq!(
            body_of(&out),
            r#"<html><head><link rel="stylesheet" href="https://raw.example.com/o/r/main/docs/s.css"></head><body>x</body></html>"#
        );
    }

    #[test]
    fn test_reference_attrs_registry() {
        assert_eq!(reference_attrs("video", None), &["src", "poster"]);
        assert_eq!(reference_attrs("a", None), &["href"]);
        assert!(reference_attrs("div", None).is_empty());
        assert!(reference_attrs("link", Some("icon")).is_empty());
        assert_eq!(reference_attrs("link", Some("Alternate StyleSheet")), &["href"]);
    }
}
