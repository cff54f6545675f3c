//! Shareable location encoding.
//!
//! `?repo=owner/name&ref=revision&path=a/b/c`; `path` is omitted at the root.
//! Values are percent-encoded except for unreserved characters and `/`, and
//! decoded as `application/x-www-form-urlencoded`.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::core::{RepoPath, RepositoryRef};

/// Characters escaped in query values.
const VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Decoded shareable location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Raw `owner/name` value, validated when loaded.
    pub repository: String,
    pub revision: Option<String>,
    pub path: RepoPath,
}

/// Encode the shareable query string, including the leading `?`.
pub fn encode(repository: &RepositoryRef, revision: &str, path: &RepoPath) -> String {
    let mut query = format!(
        "?repo={}&ref={}",
        utf8_percent_encode(&repository.to_string(), VALUE),
        utf8_percent_encode(revision, VALUE)
    );
    if !path.is_root() {
        query.push_str("&path=");
        query.extend(utf8_percent_encode(path.as_str(), VALUE));
    }
    query
}

/// Decode a query string or a full URL carrying one.
///
/// Returns `None` when no non-empty `repo` parameter is present.
pub fn decode(input: &str) -> Option<Location> {
    let query = input.split_once('?').map_or(input, |(_, query)| query);
    let query = query.split_once('#').map_or(query, |(query, _)| query);

    let mut repository = None;
    let mut revision = None;
    let mut path = RepoPath::root();

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "repo" => repository = Some(value.into_owned()),
            "ref" => revision = Some(value.into_owned()).filter(|r| !r.trim().is_empty()),
            "path" => path = RepoPath::new(&value),
            _ => {}
        }
    }

    Some(Location {
        repository: repository.filter(|r| !r.trim().is_empty())?,
        revision,
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_root() {
        let repo = RepositoryRef::new("owner", "repo");
        assert_eq!(
            encode(&repo, "main", &RepoPath::root()),
            "?repo=owner/repo&ref=main"
        );
    }

    #[test]
    fn test_encode_path() {
        let repo = RepositoryRef::new("owner", "repo");
        assert_eq!(
            encode(&repo, "feature/x", &RepoPath::new("docs/my page")),
            "?repo=owner/repo&ref=feature/x&path=docs/my%20page"
        );
    }

    #[test]
    fn test_round_trip() {
        let cases = [
            ("o", "r", "main", ""),
            ("o-1", "r.rs", "v1.0+build", "a b/c&d=e"),
            ("ö", "仓库", "release/2024", "文档/index.html"),
            ("o", "r", "100%", "x?y#z"),
        ];
        for (owner, name, revision, path) in cases {
            let repo = RepositoryRef::new(owner, name);
            let path = RepoPath::new(path);
            let decoded = decode(&encode(&repo, revision, &path)).unwrap();

            assert_eq!(decoded.repository, repo.to_string());
            assert_eq!(decoded.revision.as_deref(), Some(revision));
            assert_eq!(decoded.path, path);
        }
    }

    #[test]
    fn test_decode_url_and_form_encoding() {
        let location = decode("https://example.com/view?repo=o%2Fr&ref=dev&path=a+b#top").unwrap();
        assert_eq!(location.repository, "o/r");
        assert_eq!(location.revision.as_deref(), Some("dev"));
        assert_eq!(location.path, "a b");
    }

    #[test]
    fn test_decode_without_repo() {
        assert_eq!(decode("?ref=main&path=docs"), None);
        assert_eq!(decode("?repo=&ref=main"), None);
        assert_eq!(decode(""), None);
    }

    #[test]
    fn test_decode_empty_ref() {
        let location = decode("repo=o/r&ref=").unwrap();
        assert_eq!(location.revision, None);
        assert!(location.path.is_root());
    }
}
