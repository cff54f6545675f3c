//! GitHub REST v3 client.
//!
//! # Endpoints
//!
//! | Operation        | Request                                                  |
//! |------------------|----------------------------------------------------------|
//! | `repo_info`      | `GET /repos/{o}/{r}`                                     |
//! | `list_directory` | `GET /repos/{o}/{r}/contents/{path}?ref=`                |
//! | `file_content`   | contents endpoint (with token) or `{raw_base}/{o}/{r}/{ref}/{path}` |
//! | `last_modified`  | `GET /repos/{o}/{r}/commits?path=&sha=&per_page=1`       |
//! | `search_repos`   | `/user/repos`, `/users/{q}/repos`, `/orgs/{q}/repos`     |

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{ACCEPT, HeaderMap};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use url::Url;

use super::{ApiError, RepoApi, Result};
use crate::config::ApiConfig;
use crate::core::{
    Coordinate, EntryKind, FileContent, ListingEntry, RepoPath, RepoSummary, RepositoryRef,
    RepositorySnapshot,
};

const MEDIA_TYPE: &str = "application/vnd.github+json";
const PAGE_SIZE: &str = "100";

// =============================================================================
// Response shapes
// =============================================================================

#[derive(Deserialize)]
struct RepoBody {
    default_branch: String,
    full_name: String,
}

#[derive(Deserialize)]
struct ContentItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    download_url: Option<String>,
}

#[derive(Deserialize)]
struct FileBody {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    download_url: Option<String>,
}

#[derive(Deserialize)]
struct CommitItem {
    commit: CommitDetail,
}

#[derive(Deserialize)]
struct CommitDetail {
    #[serde(default)]
    committer: Option<Signature>,
}

#[derive(Deserialize)]
struct Signature {
    #[serde(default)]
    date: Option<String>,
}

#[derive(Deserialize)]
struct UserBody {
    login: String,
}

// =============================================================================
// Client
// =============================================================================

/// [`RepoApi`] over `api.github.com` (or a compatible base).
pub struct GithubApi {
    client: Client,
    base: Url,
    raw_base: Url,
    token: Option<String>,
    /// Login of the token owner, fetched once.
    identity: OnceCell<Option<String>>,
}

impl GithubApi {
    pub fn new(config: &ApiConfig, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base: parse_base(&config.base)?,
            raw_base: parse_base(&config.raw_base)?,
            token: token.filter(|t| !t.trim().is_empty()),
            identity: OnceCell::new(),
        })
    }

    #[inline]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// API endpoint from path segments (each segment percent-encoded).
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        join_segments(&self.base, segments)
    }

    fn contents_url(&self, coord: &Coordinate) -> Url {
        let repo = &coord.repository;
        let mut url = self.endpoint(
            ["repos", repo.owner.as_str(), repo.repo.as_str(), "contents"]
                .into_iter()
                .chain(coord.path.segments()),
        );
        url.query_pairs_mut().append_pair("ref", &coord.revision);
        url
    }

    /// Raw static-file location: `{raw_base}/{owner}/{repo}/{ref}/{path}`.
    fn raw_url(&self, coord: &Coordinate) -> Url {
        let repo = &coord.repository;
        join_segments(
            &self.raw_base,
            [repo.owner.as_str(), repo.repo.as_str()]
                .into_iter()
                .chain(coord.revision.split('/'))
                .chain(coord.path.segments()),
        )
    }

    async fn send(&self, url: Url) -> Result<Response> {
        crate::debug!("api"; "GET {}", url);

        let mut request = self.client.get(url.clone()).header(ACCEPT, MEDIA_TYPE);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(status_error(status, response.headers(), url.path()))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.send(url).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get_text(&self, url: Url) -> Result<String> {
        let bytes = self.send(url).await?.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Login of the token owner, `None` without a token.
    async fn identity(&self) -> Result<Option<String>> {
        if self.token.is_none() {
            return Ok(None);
        }
        let login = self
            .identity
            .get_or_try_init(|| async {
                let user: UserBody = self.get_json(self.endpoint(["user"])).await?;
                Ok::<_, ApiError>(Some(user.login))
            })
            .await?;
        Ok(login.clone())
    }

    async fn repo_list(&self, mut url: Url) -> Result<Vec<RepoSummary>> {
        url.query_pairs_mut().append_pair("per_page", PAGE_SIZE);
        self.get_json(url).await
    }
}

impl RepoApi for GithubApi {
    async fn repo_info(&self, repo: &RepositoryRef) -> Result<RepositorySnapshot> {
        let url = self.endpoint(["repos", repo.owner.as_str(), repo.repo.as_str()]);
        let body: RepoBody = self.get_json(url).await?;
        Ok(RepositorySnapshot {
            default_branch: body.default_branch,
            full_name: body.full_name,
        })
    }

    async fn list_directory(&self, coord: &Coordinate) -> Result<Vec<ListingEntry>> {
        let value: serde_json::Value = self.get_json(self.contents_url(coord)).await?;
        parse_listing(value)
    }

    async fn file_content(&self, coord: &Coordinate) -> Result<FileContent> {
        if !self.has_token() {
            let location = self.raw_url(coord);
            let text = self.get_text(location.clone()).await?;
            return Ok(FileContent {
                text: text.into(),
                raw_location: location.into(),
            });
        }

        let value: serde_json::Value = self.get_json(self.contents_url(coord)).await?;
        if !value.is_object() {
            return Err(ApiError::Shape("expected file".into()));
        }
        let body: FileBody =
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;
        let raw_location = body
            .download_url
            .clone()
            .unwrap_or_else(|| self.raw_url(coord).into());

        let text = match (body.encoding.as_deref(), body.content.as_deref()) {
            (Some("base64"), Some(content)) => decode_content(content)?,
            // Large files come back without inline content.
            _ => {
                let location = Url::parse(&raw_location)
                    .map_err(|e| ApiError::Shape(format!("download url: {e}")))?;
                self.get_text(location).await?
            }
        };

        Ok(FileContent {
            text: text.into(),
            raw_location,
        })
    }

    async fn last_modified(&self, coord: &Coordinate) -> Result<Option<String>> {
        let repo = &coord.repository;
        let mut url = self.endpoint(["repos", repo.owner.as_str(), repo.repo.as_str(), "commits"]);
        url.query_pairs_mut()
            .append_pair("path", coord.path.as_str())
            .append_pair("sha", &coord.revision)
            .append_pair("per_page", "1");

        let commits: Vec<CommitItem> = self.get_json(url).await?;
        Ok(commits
            .into_iter()
            .next()
            .and_then(|item| item.commit.committer)
            .and_then(|signature| signature.date))
    }

    async fn search_repos(&self, query: &str) -> Result<Vec<RepoSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        if is_own_account(self.identity().await, query) {
            let mut url = self.endpoint(["user", "repos"]);
            url.query_pairs_mut()
                .append_pair("affiliation", "owner,collaborator,organization_member");
            return self.repo_list(url).await;
        }

        match self.repo_list(self.endpoint(["users", query, "repos"])).await {
            Err(ApiError::NotFound(_)) => {
                crate::debug!("api"; "no user {}, trying organization", query);
                self.repo_list(self.endpoint(["orgs", query, "repos"])).await
            }
            other => other,
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_base(base: &str) -> Result<Url> {
    let url = Url::parse(base).map_err(|e| ApiError::Request(format!("invalid base {base}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::Request(format!("invalid base {base}")));
    }
    Ok(url)
}

fn join_segments<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Whether `query` names the authenticated user.
///
/// A failed identity lookup counts as no match; the public endpoints still work.
fn is_own_account(identity: Result<Option<String>>, query: &str) -> bool {
    match identity {
        Ok(login) => login.as_deref() == Some(query),
        Err(e) => {
            crate::debug!("api"; "identity lookup failed, searching publicly: {}", e);
            false
        }
    }
}

/// Map a non-success status to an error.
fn status_error(status: StatusCode, headers: &HeaderMap, path: &str) -> ApiError {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    if status == StatusCode::NOT_FOUND {
        return ApiError::NotFound(path.to_string());
    }
    if status == StatusCode::FORBIDDEN && header("x-ratelimit-remaining") == Some("0") {
        return ApiError::RateLimit {
            reset: header("x-ratelimit-reset").and_then(|v| v.parse().ok()),
        };
    }
    ApiError::Request(format!("{status} for {path}"))
}

/// Contents-endpoint body → listing entries. Non-array bodies are files.
fn parse_listing(value: serde_json::Value) -> Result<Vec<ListingEntry>> {
    if !value.is_array() {
        return Err(ApiError::Shape("expected directory listing".into()));
    }
    let items: Vec<ContentItem> =
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;

    Ok(items
        .into_iter()
        .map(|item| ListingEntry {
            name: item.name,
            path: RepoPath::new(&item.path),
            kind: EntryKind::from_api(&item.kind),
            download_url: item.download_url,
            modified: None,
        })
        .collect())
}

/// Decode base64 file content (line-wrapped by the API) as UTF-8.
fn decode_content(content: &str) -> Result<String> {
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn api(token: Option<&str>) -> GithubApi {
        GithubApi::new(&ApiConfig::default(), token.map(String::from)).unwrap()
    }

    fn coord(path: &str) -> Coordinate {
        Coordinate::new(RepositoryRef::new("o", "r"), "main", RepoPath::new(path))
    }

    #[test]
    fn test_decode_content_multibyte() {
        // "héllo 世界\n" wrapped the way the API wraps it.
        let encoded = STANDARD.encode("héllo 世界\n");
        let (head, tail) = encoded.split_at(6);
        let wrapped = format!("{head}\n{tail}\n");
        assert_eq!(decode_content(&wrapped).unwrap(), "héllo 世界\n");
    }

    #[test]
    fn test_own_account_match() {
        assert!(is_own_account(Ok(Some("octocat".into())), "octocat"));
        assert!(!is_own_account(Ok(Some("octocat".into())), "rust-lang"));
        assert!(!is_own_account(Ok(None), "octocat"));
        assert!(!is_own_account(
            Err(ApiError::Request("401 Unauthorized for user".into())),
            "octocat"
        ));
    }

    #[test]
    fn test_decode_content_invalid() {
        assert!(matches!(decode_content("!!!"), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_contents_url() {
        let url = api(None).contents_url(&coord("docs/my page.html"));
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/o/r/contents/docs/my%20page.html?ref=main"
        );

        let root = api(None).contents_url(&coord(""));
        assert_eq!(root.as_str(), "https://api.github.com/repos/o/r/contents?ref=main");
    }

    #[test]
    fn test_raw_url() {
        let mut c = coord("site/index.html");
        c.revision = "feature/x".into();
        assert_eq!(
            api(None).raw_url(&c).as_str(),
            "https://raw.githubusercontent.com/o/r/feature/x/site/index.html"
        );
    }

    #[test]
    fn test_status_not_found() {
        let err = status_error(StatusCode::NOT_FOUND, &HeaderMap::new(), "/repos/o/x");
        assert_eq!(err, ApiError::NotFound("/repos/o/x".into()));
    }

    #[test]
    fn test_status_rate_limit() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        headers.insert("x-ratelimit-reset", HeaderValue::from_static("1700000000"));
        let err = status_error(StatusCode::FORBIDDEN, &headers, "/repos/o/r");
        assert_eq!(
            err,
            ApiError::RateLimit {
                reset: Some(1_700_000_000)
            }
        );
    }

    #[test]
    fn test_status_forbidden_without_budget_header() {
        let err = status_error(StatusCode::FORBIDDEN, &HeaderMap::new(), "/repos/o/r");
        assert!(matches!(err, ApiError::Request(_)));
    }

    #[test]
    fn test_parse_listing() {
        let value = serde_json::json!([
            {"name": "docs", "path": "docs", "type": "dir", "download_url": null},
            {"name": "a.html", "path": "a.html", "type": "file",
             "download_url": "https://raw.githubusercontent.com/o/r/main/a.html"},
            {"name": "link", "path": "link", "type": "symlink"}
        ]);
        let entries = parse_listing(value).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].kind, EntryKind::Dir);
        assert_eq!(entries[1].path, "a.html");
        assert!(entries[1].download_url.is_some());
        assert_eq!(entries[2].kind, EntryKind::File);
    }

    #[test]
    fn test_parse_listing_rejects_file_body() {
        let value = serde_json::json!({"name": "a.html", "type": "file"});
        assert_eq!(
            parse_listing(value),
            Err(ApiError::Shape("expected directory listing".into()))
        );
    }

    #[test]
    fn test_token_blank_is_none() {
        assert!(!api(Some("  ")).has_token());
        assert!(api(Some("ghp_x")).has_token());
    }
}
