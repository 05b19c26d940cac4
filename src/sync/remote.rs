//! Client for the versioned-content HTTP API (GitHub contents endpoint).
//!
//! Two operations: fetch the current backup document together with its
//! version token (the blob sha), and write a new document conditioned on
//! the last-seen token. Concurrent remote modification is detected
//! server-side by token mismatch (optimistic concurrency, no local
//! read-then-write races).

use serde::{Deserialize, Serialize};

use super::error::RemoteError;
use crate::backup;
use crate::db::{SettingsRepository, OWNER_KEY, REPO_KEY, TOKEN_KEY};

const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("tally/", env!("CARGO_PKG_VERSION"));
const COMMIT_MESSAGE: &str = "Backup update";

/// Remote repository coordinates plus access token, read from settings at
/// call time. The client never stores them.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub owner: String,
    pub repo: String,
    pub token: String,
}

impl Credentials {
    /// Reads the three credential settings. Returns `None` when any of
    /// them is missing or empty; sync is simply unconfigured then.
    pub async fn from_settings(
        settings: &SettingsRepository,
    ) -> Result<Option<Self>, sqlx::Error> {
        let owner = settings.get(OWNER_KEY).await?;
        let repo = settings.get(REPO_KEY).await?;
        let token = settings.get(TOKEN_KEY).await?;

        match (owner, repo, token) {
            (Some(owner), Some(repo), Some(token))
                if !owner.is_empty() && !repo.is_empty() && !token.is_empty() =>
            {
                Ok(Some(Self { owner, repo, token }))
            }
            _ => Ok(None),
        }
    }
}

/// Result of fetching the current remote document. `Absent` (HTTP 404)
/// means no backup exists yet and drives the first-sync branch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Found { document: String, version: String },
    Absent,
}

/// Seam between the orchestrator and the concrete remote store. Lets a
/// future incremental or queued strategy (or a test double) replace the
/// full-document client without touching the store or codec.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    async fn fetch_current(&self, creds: &Credentials) -> Result<FetchOutcome, RemoteError>;

    /// Writes a new document, conditioned on `expected_version` when given.
    /// A write without a token creates the resource if absent. Returns the
    /// new version token.
    async fn write_document(
        &self,
        creds: &Credentials,
        document: &str,
        expected_version: Option<&str>,
    ) -> Result<String, RemoteError>;
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: String,
    sha: String,
}

#[derive(Debug, Serialize)]
struct WriteRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct WriteResponse {
    content: Option<WrittenContent>,
}

#[derive(Debug, Deserialize)]
struct WrittenContent {
    sha: String,
}

/// Content-API client for a single backup file within the configured
/// repository.
pub struct ContentClient {
    http: reqwest::Client,
    api_base: String,
    file_path: String,
}

impl ContentClient {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self::with_api_base(DEFAULT_API_BASE, file_path)
    }

    /// Overridable base URL, used by tests pointed at a local server.
    pub fn with_api_base(api_base: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
            file_path: file_path.into(),
        }
    }

    fn content_url(&self, creds: &Credentials) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base.trim_end_matches('/'),
            creds.owner,
            creds.repo,
            self.file_path
        )
    }
}

impl RemoteStore for ContentClient {
    async fn fetch_current(&self, creds: &Credentials) -> Result<FetchOutcome, RemoteError> {
        let url = self.content_url(creds);

        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {}", creds.token))
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!("GET {} -> {}", self.file_path, status);

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(FetchOutcome::Absent);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RemoteError::Auth);
        }
        if !status.is_success() {
            return Err(RemoteError::Network(format!(
                "Server returned status {}",
                status
            )));
        }

        let meta: ContentResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let document = backup::from_transport(&meta.content)?;

        Ok(FetchOutcome::Found {
            document,
            version: meta.sha,
        })
    }

    async fn write_document(
        &self,
        creds: &Credentials,
        document: &str,
        expected_version: Option<&str>,
    ) -> Result<String, RemoteError> {
        let url = self.content_url(creds);
        let body = WriteRequest {
            message: COMMIT_MESSAGE,
            content: backup::to_transport(document),
            sha: expected_version,
        };

        let response = self
            .http
            .put(&url)
            .header("Authorization", format!("Bearer {}", creds.token))
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", USER_AGENT)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!(
            "PUT {} (conditioned: {}) -> {}",
            self.file_path,
            expected_version.is_some(),
            status
        );

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RemoteError::Auth);
        }
        // The API reports a stale version token as 409; some deployments
        // use 422 for the same condition.
        if status == reqwest::StatusCode::CONFLICT
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            return Err(RemoteError::Conflict);
        }
        if !status.is_success() {
            return Err(RemoteError::Network(format!(
                "Server returned status {}",
                status
            )));
        }

        let written: WriteResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        written
            .content
            .map(|c| c.sha)
            .ok_or_else(|| RemoteError::Network("Write response missing content sha".to_string()))
    }
}
