//! Source preparation ahead of `tl` parsing.
//!
//! `tl` tokenizes everything as markup, including the contents of raw-text
//! elements, and reads a solidus glued to a tag name (`<br/>`) as part of the
//! name. This pass fixes both up on the source text:
//!
//! - bodies of `script`, `style`, `textarea` and `title` are lifted out and
//!   replaced by an index attribute, so the writer can put them back verbatim
//! - a raw-text element always gets a plain `</name>` close matching its opener
//! - `<name/>` becomes `<name />`

use std::fmt::Write;

/// Elements whose contents are text, not markup.
const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "title"];

/// Attribute carrying the index of a lifted body.
pub(super) const BODY_MARKER: &str = "data-rawpeek-body";

/// Markup ready for `tl`, plus the raw-text bodies lifted out of it.
#[derive(Debug, Default)]
pub(super) struct PreparedSource {
    pub markup: String,
    pub bodies: Vec<String>,
}

impl PreparedSource {
    /// Body recorded for a [`BODY_MARKER`] value.
    pub fn body(&self, marker: &str) -> Option<&str> {
        let index = marker.trim().parse::<usize>().ok()?;
        self.bodies.get(index).map(String::as_str)
    }
}

pub(super) fn prepare(markup: &str) -> PreparedSource {
    let mut prepared = PreparedSource {
        markup: String::with_capacity(markup.len() + 64),
        bodies: Vec::new(),
    };
    let out = &mut prepared.markup;
    let mut copied = 0;
    let mut pos = 0;

    while let Some(offset) = markup[pos..].find('<') {
        let open = pos + offset;
        let rest = &markup[open..];

        if rest.starts_with("<!--") {
            pos = rest.find("-->").map_or(markup.len(), |end| open + end + 3);
            continue;
        }
        if !rest.as_bytes().get(1).is_some_and(u8::is_ascii_alphabetic) {
            pos = open + 1;
            continue;
        }

        let name_end = open + 1 + rest[1..].bytes().take_while(|&b| is_name_byte(b)).count();
        let Some(tag_end) = find_tag_end(markup, name_end) else {
            break;
        };
        let name = &markup[open + 1..name_end];

        out.push_str(&markup[copied..name_end]);
        copied = name_end;

        if !RAW_TEXT_ELEMENTS
            .iter()
            .any(|raw| raw.eq_ignore_ascii_case(name))
        {
            if markup[name_end..].starts_with('/') {
                out.push(' ');
            }
            pos = tag_end + 1;
            continue;
        }

        let index = prepared.bodies.len();
        let _ = write!(out, " {BODY_MARKER}=\"{index}\"");
        out.push_str(&markup[name_end..=tag_end]);

        let body_start = tag_end + 1;
        let (body_end, after_close) =
            find_close(markup, body_start, name).unwrap_or((markup.len(), markup.len()));
        prepared.bodies.push(markup[body_start..body_end].to_owned());

        out.push_str("</");
        out.push_str(name);
        out.push('>');
        copied = after_close;
        pos = after_close;
    }

    out.push_str(&markup[copied..]);
    prepared
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':')
}

/// Index of the `>` ending the tag whose name ends at `from`, skipping quoted values.
fn find_tag_end(markup: &str, from: usize) -> Option<usize> {
    let mut quote = None;
    for (i, b) in markup.bytes().enumerate().skip(from) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i),
            _ => {}
        }
    }
    None
}

/// Locate `</name` (any case) at or after `from`.
///
/// Returns the start of the closing tag and the index just past its `>`.
fn find_close(markup: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let mut pos = from;
    while let Some(offset) = markup[pos..].find("</") {
        let start = pos + offset;
        let name_start = start + 2;
        let name_end = name_start + name.len();
        let matches = markup
            .get(name_start..name_end)
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
            && !markup
                .as_bytes()
                .get(name_end)
                .is_some_and(|&b| is_name_byte(b));

        if matches {
            let after = markup[name_end..]
                .find('>')
                .map_or(markup.len(), |gt| name_end + gt + 1);
            return Some((start, after));
        }
        pos = name_start;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifts_script_body() {
        let prepared = prepare("<script>if(a<b&&c)x()</script><p>after</p>");
        assert_eq!(prepared.bodies, ["if(a<b&&c)x()"]);
        assert_eq!(
            prepared.markup,
            format!("<script {BODY_MARKER}=\"0\"></script><p>after</p>")
        );
        assert_eq!(prepared.body("0"), Some("if(a<b&&c)x()"));
        assert_eq!(prepared.body("7"), None);
    }

    #[test]
    fn test_close_tag_matched_case_insensitively() {
        let prepared = prepare(r#"<style media="a>b">p{}</STYLE ><div>x</div>"#);
        assert_eq!(prepared.bodies, ["p{}"]);
        assert!(prepared.markup.ends_with("</style><div>x</div>"));
        assert!(prepared.markup.contains(r#"media="a>b""#));
    }

    #[test]
    fn test_closing_lookalike_inside_body() {
        let prepared = prepare(r#"<script>document.write("</scripts></p>")</script>"#);
        assert_eq!(prepared.bodies, [r#"document.write("</scripts></p>")"#]);
    }

    #[test]
    fn test_unterminated_body_runs_to_end() {
        let prepared = prepare("<textarea>a <b> c");
        assert_eq!(prepared.bodies, ["a <b> c"]);
        assert!(prepared.markup.ends_with("</textarea>"));
    }

    #[test]
    fn test_solidus_separated_from_name() {
        assert_eq!(prepare("a<br/>b").markup, "a<br />b");
        assert_eq!(prepare(r#"<img src="x.png"/>"#).markup, r#"<img src="x.png"/>"#);
    }

    #[test]
    fn test_comments_and_text_untouched() {
        let source = "<!-- <script> --><p>1 < 2 > 0</p>";
        let prepared = prepare(source);
        assert_eq!(prepared.markup, source);
        assert!(prepared.bodies.is_empty());
    }
}
