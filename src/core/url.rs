//! Reference resolution against a remote base directory.
//!
//! - `resolve_reference`: standard relative-URL resolution, best effort
//! - `base_directory`: the directory location containing a raw file location

use url::Url;

/// Resolve `reference` against the directory location `base`.
///
/// The base is treated as a directory: a missing trailing `/` is appended so
/// that sibling references resolve inside it. Malformed input yields the
/// original reference unchanged.
pub fn resolve_reference(reference: &str, base: &str) -> String {
    let base = as_directory(base);

    Url::parse(&base)
        .and_then(|base| base.join(reference))
        .map(String::from)
        .unwrap_or_else(|_| reference.to_string())
}

/// Location of the directory containing `raw_location`, ending in `/`.
///
/// Query and fragment are dropped together with the final segment.
/// Non-URL input falls back to truncating after the last `/`.
pub fn base_directory(raw_location: &str) -> String {
    match Url::parse(raw_location) {
        Ok(mut url) if !url.cannot_be_a_base() => {
            url.set_query(None);
            url.set_fragment(None);
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop();
                segments.push("");
            }
            url.into()
        }
        _ => match raw_location.rfind('/') {
            Some(idx) => raw_location[..=idx].to_string(),
            None => String::new(),
        },
    }
}

fn as_directory(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_parent() {
        assert_eq!(
            resolve_reference("../x.css", "https://h/o/r/ref/dir"),
            "https://h/o/r/ref/x.css"
        );
    }

    #[test]
    fn test_resolve_sibling_without_trailing_slash() {
        assert_eq!(
            resolve_reference("app.js", "https://h/o/r/ref/dir"),
            resolve_reference("app.js", "https://h/o/r/ref/dir/")
        );
        assert_eq!(
            resolve_reference("app.js", "https://h/o/r/ref/dir"),
            "https://h/o/r/ref/dir/app.js"
        );
    }

    #[test]
    fn test_resolve_dot_segments() {
        assert_eq!(
            resolve_reference("./a/./b/../c.png", "https://h/base/"),
            "https://h/base/a/c.png"
        );
    }

    #[test]
    fn test_resolve_keeps_query_and_fragment() {
        assert_eq!(
            resolve_reference("page.html?v=2#top", "https://h/base/"),
            "https://h/base/page.html?v=2#top"
        );
    }

    #[test]
    fn test_resolve_root_relative() {
        assert_eq!(
            resolve_reference("/asset.css", "https://h/o/r/main/docs/"),
            "https://h/asset.css"
        );
    }

    #[test]
    fn test_resolve_malformed_base_keeps_reference() {
        assert_eq!(resolve_reference("a.css", "not a url"), "a.css");
        assert_eq!(resolve_reference("a.css", ""), "a.css");
    }

    #[test]
    fn test_resolve_percent_encodes_spaces() {
        assert_eq!(
            resolve_reference("my file.css", "https://h/base/"),
            "https://h/base/my%20file.css"
        );
    }

    #[test]
    fn test_base_directory() {
        assert_eq!(
            base_directory("https://raw.example.com/o/r/main/docs/index.html"),
            "https://raw.example.com/o/r/main/docs/"
        );
        assert_eq!(
            base_directory("https://raw.example.com/o/r/main/index.html"),
            "https://raw.example.com/o/r/main/"
        );
    }

    #[test]
    fn test_base_directory_drops_query() {
        assert_eq!(
            base_directory("https://raw.example.com/o/r/main/a/index.html?token=abc"),
            "https://raw.example.com/o/r/main/a/"
        );
    }

    #[test]
    fn test_base_directory_fallback() {
        assert_eq!(base_directory("dir/index.html"), "dir/");
        assert_eq!(base_directory("index.html"), "");
    }
}
