//! Sequencing of local mutations against the remote backup.
//!
//! The orchestrator owns the user-visible sync status. On startup it pulls
//! the remote document and replaces local state with it; after every local
//! mutation it pushes the entire current state as a fresh snapshot. There
//! is no automatic retry; the next mutation triggers a fresh attempt, and
//! a sync failure never rolls back the local mutation that triggered it.

use std::fmt;

use super::error::{RemoteError, SyncError};
use super::remote::{Credentials, FetchOutcome, RemoteStore};
use crate::backup;
use crate::db::Store;

/// Outcome of the latest sync attempt, the single status value shown to
/// the user. Every attempt ends in one of the resting states.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
    Idle,
    Syncing,
    Success,
    NoCredentials,
    Conflict,
    AuthFailure,
    NetworkFailure,
    MalformedRemoteData,
}

impl SyncStatus {
    fn from_remote_error(error: &RemoteError) -> Self {
        match error {
            RemoteError::Auth => SyncStatus::AuthFailure,
            RemoteError::Conflict => SyncStatus::Conflict,
            RemoteError::Network(_) => SyncStatus::NetworkFailure,
            RemoteError::Malformed(_) => SyncStatus::MalformedRemoteData,
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Idle => write!(f, "idle"),
            SyncStatus::Syncing => write!(f, "syncing..."),
            SyncStatus::Success => write!(f, "✓ backup saved"),
            SyncStatus::NoCredentials => write!(f, "✗ remote settings missing"),
            SyncStatus::Conflict => write!(f, "✗ conflict: remote backup changed"),
            SyncStatus::AuthFailure => write!(f, "✗ authentication failed"),
            SyncStatus::NetworkFailure => write!(f, "✗ network failure"),
            SyncStatus::MalformedRemoteData => write!(f, "✗ remote backup unreadable"),
        }
    }
}

pub struct SyncOrchestrator<R: RemoteStore> {
    remote: R,
    status: SyncStatus,
}

impl<R: RemoteStore> SyncOrchestrator<R> {
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            status: SyncStatus::Idle,
        }
    }

    /// Status of the most recent attempt.
    pub fn status(&self) -> &SyncStatus {
        &self.status
    }

    /// Startup pull: fetch the remote document and replace local products
    /// and entries with it (clear-then-bulk-insert). An absent remote
    /// document is not an error; any failure leaves local data untouched
    /// and the app usable. Hard local failures (storage) propagate as
    /// `Err`.
    pub async fn pull(&mut self, store: &Store) -> Result<SyncStatus, SyncError> {
        let settings = store.settings();
        let creds = match Credentials::from_settings(&settings).await? {
            Some(creds) => creds,
            None => {
                tracing::debug!("No remote credentials, skipping pull");
                return Ok(self.finish(SyncStatus::NoCredentials));
            }
        };

        self.status = SyncStatus::Syncing;

        match self.remote.fetch_current(&creds).await {
            Ok(FetchOutcome::Absent) => {
                // No backup exists yet; keep local data, show no error.
                Ok(self.finish(SyncStatus::Idle))
            }
            Ok(FetchOutcome::Found { document, .. }) => match backup::decode(&document) {
                Ok((products, entries)) => {
                    store.replace_all(&products, &entries).await?;
                    tracing::debug!(
                        "Restored {} product(s), {} entr(ies) from remote",
                        products.len(),
                        entries.len()
                    );
                    Ok(self.finish(SyncStatus::Success))
                }
                Err(e) => {
                    // A corrupt snapshot must not be applied, not even
                    // partially.
                    tracing::warn!("Remote backup did not decode: {}", e);
                    Ok(self.finish(SyncStatus::MalformedRemoteData))
                }
            },
            Err(e) => {
                tracing::warn!("Pull failed: {}", e);
                Ok(self.finish(SyncStatus::from_remote_error(&e)))
            }
        }
    }

    /// Push after mutation: encode the entire current store contents and
    /// write them conditioned on the current remote version token. Missing
    /// credentials skip the attempt without any network call; the local
    /// mutation has already committed and stays committed regardless of
    /// the outcome here.
    pub async fn push(&mut self, store: &Store) -> Result<SyncStatus, SyncError> {
        let settings = store.settings();
        let creds = match Credentials::from_settings(&settings).await? {
            Some(creds) => creds,
            None => {
                tracing::debug!("No remote credentials, skipping push");
                return Ok(self.finish(SyncStatus::NoCredentials));
            }
        };

        self.status = SyncStatus::Syncing;

        // Current version token; None means first-ever sync and an
        // unconditioned create.
        let expected_version = match self.remote.fetch_current(&creds).await {
            Ok(FetchOutcome::Found { version, .. }) => Some(version),
            Ok(FetchOutcome::Absent) => None,
            Err(e) => {
                tracing::warn!("Push aborted, could not fetch version token: {}", e);
                return Ok(self.finish(SyncStatus::from_remote_error(&e)));
            }
        };

        let products = store.products().list().await?;
        let entries = store.entries().list().await?;
        let document = backup::encode(products, entries)?;

        match self
            .remote
            .write_document(&creds, &document, expected_version.as_deref())
            .await
        {
            Ok(_) => Ok(self.finish(SyncStatus::Success)),
            Err(e) => {
                tracing::warn!("Push failed: {}", e);
                Ok(self.finish(SyncStatus::from_remote_error(&e)))
            }
        }
    }

    fn finish(&mut self, outcome: SyncStatus) -> SyncStatus {
        self.status = outcome.clone();
        outcome
    }
}
