mod clear_cmd;
mod entry;
mod product;
mod remote_cmd;
mod report;
mod sync_cmd;

pub use clear_cmd::ClearCommand;
pub use entry::EntryCommand;
pub use product::ProductCommand;
pub use remote_cmd::RemoteCommand;
pub use report::ReportCommand;
pub use sync_cmd::SyncCommand;
