mod error;
mod orchestrator;
mod remote;

pub use error::{RemoteError, SyncError};
pub use orchestrator::{SyncOrchestrator, SyncStatus};
pub use remote::{ContentClient, Credentials, FetchOutcome, RemoteStore};
