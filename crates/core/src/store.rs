//! The contents-store seam.
//!
//! Request handlers talk to the upstream hosting API only through the
//! [`ContentsStore`] trait. The adapter performs no HTTP-reply mapping of
//! its own: it reports what happened upstream through [`StoreError`] and
//! each handler decides what that means for its operation (a missing root
//! is an empty listing for List but a 404 for Read).

use async_trait::async_trait;
use shelf_types::FileName;

/// One entry in the storage-root listing.
///
/// A transient projection of upstream state, reconstructed on every list
/// call and never cached. Directory entries are filtered out before this
/// type is produced, so `entry_type` is always `"file"`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct RemoteFile {
    /// Path of the file within the storage root
    pub name: String,
    /// Size in bytes, informational only
    pub size: u64,
    /// Opaque version token; precondition for update and delete
    pub sha: String,
    /// Always `"file"`
    #[serde(rename = "type")]
    pub entry_type: String,
}

/// One file's decoded content plus its current version token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    /// Raw bytes after transport decoding
    pub content: Vec<u8>,
    /// Version token observed alongside the content
    pub sha: String,
}

/// What went wrong when talking to the upstream store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Upstream reported the resource absent
    #[error("not found upstream")]
    NotFound,

    /// Upstream answered with a non-success status other than not-found.
    /// The body is preserved verbatim for surfacing to the caller.
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The upstream call never completed (DNS, connect, TLS, ...)
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Upstream answered successfully but the payload was not decodable
    #[error("invalid upstream payload: {0}")]
    InvalidPayload(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Operations the gateway needs from a hosted contents API.
///
/// Every method is a single upstream round trip. Compound behaviour
/// (probe-then-write, probe-then-delete) is composed by the handlers so
/// the two-call sequence stays visible at the call site.
#[async_trait]
pub trait ContentsStore: Send + Sync {
    /// Lists the storage root, files only, upstream order.
    ///
    /// An empty or uninitialised root surfaces as [`StoreError::NotFound`];
    /// the caller decides whether that is an error.
    async fn list(&self) -> StoreResult<Vec<RemoteFile>>;

    /// Fetches one file's decoded content and current version token.
    async fn fetch(&self, name: &FileName) -> StoreResult<FetchedFile>;

    /// Probes for a file's current version token.
    ///
    /// Returns `Ok(None)` when the file does not exist. This is the read
    /// half of the upstream's optimistic-concurrency contract: mutations
    /// must present the token observed here.
    async fn stat(&self, name: &FileName) -> StoreResult<Option<String>>;

    /// Creates or replaces a file.
    ///
    /// `prior_sha` must carry the token from a preceding [`stat`] when the
    /// file already exists, and `None` when creating. A stale token is
    /// rejected by the upstream store, not retried here.
    ///
    /// [`stat`]: ContentsStore::stat
    async fn put(
        &self,
        name: &FileName,
        content: &[u8],
        message: &str,
        prior_sha: Option<&str>,
    ) -> StoreResult<()>;

    /// Deletes a file. `sha` is the token from a preceding [`stat`].
    ///
    /// [`stat`]: ContentsStore::stat
    async fn delete(&self, name: &FileName, sha: &str, message: &str) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_file_serialises_with_type_field() {
        let entry = RemoteFile {
            name: "notes.txt".into(),
            size: 5,
            sha: "abc123".into(),
            entry_type: "file".into(),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "notes.txt",
                "size": 5,
                "sha": "abc123",
                "type": "file",
            })
        );
    }

    #[test]
    fn remote_file_round_trips() {
        let json = r#"{"name":"a.png","size":1024,"sha":"deadbeef","type":"file"}"#;
        let entry: RemoteFile = serde_json::from_str(json).unwrap();
        assert_eq!(entry.name, "a.png");
        assert_eq!(entry.size, 1024);
        assert_eq!(entry.entry_type, "file");
    }
}
