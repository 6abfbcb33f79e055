//! GitHub contents adapter.
//!
//! Implements [`ContentsStore`] against the GitHub repository-contents API:
//! the repository configured in [`GatewayConfig`] is the storage engine, a
//! file's git blob sha is its version token, and every store operation is a
//! single authenticated HTTP round trip.
//!
//! The adapter does no HTTP-reply mapping for the gateway's own surface.
//! It reports upstream outcomes through [`StoreError`] and leaves the
//! interpretation (404 as empty listing vs. missing file, and so on) to the
//! request handlers.

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header;
use reqwest::{Method, StatusCode};

use shelf_core::{ContentsStore, FetchedFile, GatewayConfig, RemoteFile, StoreError, StoreResult};
use shelf_types::FileName;

const ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("shelf/", env!("CARGO_PKG_VERSION"));

/// One entry as the upstream API describes it.
///
/// `content` is present only on single-file reads, base64-encoded with the
/// line breaks the API inserts every 60 characters.
#[derive(Debug, serde::Deserialize)]
struct ContentsEntry {
    name: String,
    sha: String,
    #[serde(default)]
    size: u64,
    #[serde(rename = "type")]
    entry_type: String,
    #[serde(default)]
    content: Option<String>,
}

/// Body of a create-or-update call.
///
/// `sha` is omitted entirely (not serialised as null) when creating; its
/// presence is what turns the call into a guarded overwrite.
#[derive(Debug, serde::Serialize)]
struct PutPayload<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// Body of a delete call. The sha precondition is mandatory here.
#[derive(Debug, serde::Serialize)]
struct DeletePayload<'a> {
    message: &'a str,
    sha: &'a str,
    branch: &'a str,
}

/// Authenticated client for one configured upstream repository.
pub struct GithubStore {
    http: reqwest::Client,
    cfg: Arc<GatewayConfig>,
}

impl GithubStore {
    /// Builds a client for the configured repository.
    ///
    /// # Errors
    /// Returns [`StoreError::Transport`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(cfg: Arc<GatewayConfig>) -> StoreResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(transport)?;
        Ok(Self { http, cfg })
    }

    /// `{api_base}/repos/{owner}/{repo}/contents[/{name}]`, with the
    /// filename escaped as a single path segment.
    fn contents_url(&self, name: Option<&FileName>) -> String {
        let base = format!(
            "{}/repos/{}/{}/contents",
            self.cfg.api_base(),
            self.cfg.owner(),
            self.cfg.repo()
        );
        match name {
            Some(name) => format!("{}/{}", base, urlencoding::encode(name.as_str())),
            None => base,
        }
    }

    fn request(&self, method: Method, url: String) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header(header::AUTHORIZATION, format!("token {}", self.cfg.token()))
            .header(header::ACCEPT, ACCEPT)
    }

    /// Read-style call: `ref` pins the configured branch. Mutations name
    /// the branch in their payload instead.
    async fn get_contents(&self, name: Option<&FileName>) -> StoreResult<reqwest::Response> {
        self.request(Method::GET, self.contents_url(name))
            .query(&[("ref", self.cfg.branch())])
            .send()
            .await
            .map_err(transport)
    }
}

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::Transport(Box::new(err))
}

/// Read triage: upstream 404 means the resource is absent.
async fn triage_read(resp: reqwest::Response) -> StoreResult<reqwest::Response> {
    if resp.status() == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound);
    }
    expect_success(resp).await
}

/// Mutation triage: any non-success (404 included) is an upstream failure.
async fn expect_success(resp: reqwest::Response) -> StoreResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(StoreError::Upstream {
        status: status.as_u16(),
        body,
    })
}

async fn parse_entry(resp: reqwest::Response) -> StoreResult<ContentsEntry> {
    resp.json::<ContentsEntry>()
        .await
        .map_err(|e| StoreError::InvalidPayload(e.to_string()))
}

/// Strips the line breaks the API inserts into base64 payloads, then
/// decodes to raw bytes.
fn decode_content(encoded: &str) -> StoreResult<Vec<u8>> {
    let stripped: String = encoded
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .collect();
    BASE64
        .decode(stripped.as_bytes())
        .map_err(|e| StoreError::InvalidPayload(format!("content is not valid base64: {e}")))
}

/// Projects a root-listing body onto [`RemoteFile`] records.
///
/// Directories and other non-file entries are dropped. A body that is not
/// an array (the API returns a single object when the path names a file)
/// yields an empty listing.
fn parse_listing(body: &[u8]) -> Vec<RemoteFile> {
    let entries: Vec<ContentsEntry> = match serde_json::from_slice(body) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    entries
        .into_iter()
        .filter(|entry| entry.entry_type == "file")
        .map(|entry| RemoteFile {
            name: entry.name,
            size: entry.size,
            sha: entry.sha,
            entry_type: entry.entry_type,
        })
        .collect()
}

#[async_trait]
impl ContentsStore for GithubStore {
    async fn list(&self) -> StoreResult<Vec<RemoteFile>> {
        let resp = triage_read(self.get_contents(None).await?).await?;
        let body = resp.bytes().await.map_err(transport)?;
        Ok(parse_listing(&body))
    }

    async fn fetch(&self, name: &FileName) -> StoreResult<FetchedFile> {
        let resp = triage_read(self.get_contents(Some(name)).await?).await?;
        let entry = parse_entry(resp).await?;
        let encoded = entry
            .content
            .ok_or_else(|| StoreError::InvalidPayload("missing content field".into()))?;

        Ok(FetchedFile {
            content: decode_content(&encoded)?,
            sha: entry.sha,
        })
    }

    async fn stat(&self, name: &FileName) -> StoreResult<Option<String>> {
        match triage_read(self.get_contents(Some(name)).await?).await {
            Ok(resp) => Ok(Some(parse_entry(resp).await?.sha)),
            Err(StoreError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn put(
        &self,
        name: &FileName,
        content: &[u8],
        message: &str,
        prior_sha: Option<&str>,
    ) -> StoreResult<()> {
        let payload = PutPayload {
            message,
            content: BASE64.encode(content),
            branch: self.cfg.branch(),
            sha: prior_sha,
        };

        tracing::debug!(name = %name, update = prior_sha.is_some(), "contents put");

        let resp = self
            .request(Method::PUT, self.contents_url(Some(name)))
            .json(&payload)
            .send()
            .await
            .map_err(transport)?;
        expect_success(resp).await?;
        Ok(())
    }

    async fn delete(&self, name: &FileName, sha: &str, message: &str) -> StoreResult<()> {
        let payload = DeletePayload {
            message,
            sha,
            branch: self.cfg.branch(),
        };

        tracing::debug!(name = %name, "contents delete");

        let resp = self
            .request(Method::DELETE, self.contents_url(Some(name)))
            .json(&payload)
            .send()
            .await
            .map_err(transport)?;
        expect_success(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> GithubStore {
        let cfg = GatewayConfig::new("tok", "acme", "storage", None, None).unwrap();
        GithubStore::new(Arc::new(cfg)).unwrap()
    }

    #[test]
    fn contents_url_for_root_and_names() {
        let store = store();
        assert_eq!(
            store.contents_url(None),
            "https://api.github.com/repos/acme/storage/contents"
        );
        let name = FileName::new("notes.txt").unwrap();
        assert_eq!(
            store.contents_url(Some(&name)),
            "https://api.github.com/repos/acme/storage/contents/notes.txt"
        );
    }

    #[test]
    fn contents_url_escapes_path_segments() {
        let store = store();
        let name = FileName::new("docs/read me.md").unwrap();
        assert_eq!(
            store.contents_url(Some(&name)),
            "https://api.github.com/repos/acme/storage/contents/docs%2Fread%20me.md"
        );
    }

    #[test]
    fn contents_url_honours_api_base_override() {
        let cfg = GatewayConfig::new(
            "tok",
            "acme",
            "storage",
            None,
            Some("https://ghe.example.com/api/v3".into()),
        )
        .unwrap();
        let store = GithubStore::new(Arc::new(cfg)).unwrap();
        assert_eq!(
            store.contents_url(None),
            "https://ghe.example.com/api/v3/repos/acme/storage/contents"
        );
    }

    #[test]
    fn put_payload_omits_sha_on_create() {
        let payload = PutPayload {
            message: "Upload notes.txt via Shelf",
            content: BASE64.encode(b"hello"),
            branch: "main",
            sha: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("sha").is_none());
        assert_eq!(json["branch"], "main");
        assert_eq!(json["content"], "aGVsbG8=");
    }

    #[test]
    fn put_payload_carries_sha_on_update() {
        let payload = PutPayload {
            message: "Update notes.txt via Shelf",
            content: BASE64.encode(b"world"),
            branch: "main",
            sha: Some("abc123"),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["sha"], "abc123");
    }

    #[test]
    fn decode_content_strips_api_line_breaks() {
        // The API wraps base64 at 60 columns; both \n and \r\n appear in
        // the wild.
        let encoded = "aGVsbG8s\nIHdvcmxk\r\nIQ==";
        assert_eq!(decode_content(encoded).unwrap(), b"hello, world!");
    }

    #[test]
    fn decode_content_rejects_garbage() {
        assert!(matches!(
            decode_content("not base64 at all!!!"),
            Err(StoreError::InvalidPayload(_))
        ));
    }

    #[test]
    fn parse_listing_drops_directories() {
        let body = serde_json::json!([
            {"name": "notes.txt", "sha": "s1", "size": 5, "type": "file"},
            {"name": "images", "sha": "s2", "size": 0, "type": "dir"},
            {"name": "app.js", "sha": "s3", "size": 9, "type": "file"},
        ]);
        let files = parse_listing(body.to_string().as_bytes());
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "notes.txt");
        assert_eq!(files[1].name, "app.js");
        assert!(files.iter().all(|f| f.entry_type == "file"));
    }

    #[test]
    fn parse_listing_of_non_array_is_empty() {
        let body = serde_json::json!({"name": "notes.txt", "sha": "s1", "type": "file"});
        assert!(parse_listing(body.to_string().as_bytes()).is_empty());
    }
}
