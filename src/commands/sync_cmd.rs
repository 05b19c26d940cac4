use clap::{Args, Subcommand};

use crate::db::{Store, OWNER_KEY, REPO_KEY};
use crate::sync::{RemoteStore, SyncOrchestrator};

/// Push the current state to the remote backup
#[derive(Args)]
pub struct SyncCommand {
    #[command(subcommand)]
    pub command: Option<SyncSubcommand>,
}

#[derive(Subcommand)]
pub enum SyncSubcommand {
    /// Show sync configuration and last status
    Status,

    /// Restore local state from the remote backup
    Pull,
}

impl SyncCommand {
    pub async fn run<R: RemoteStore>(
        &self,
        store: &Store,
        orchestrator: &mut SyncOrchestrator<R>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            None => {
                println!("Pushing backup...");
                let status = orchestrator.push(store).await?;
                println!("{}", status);
                Ok(())
            }

            Some(SyncSubcommand::Pull) => {
                println!("Restoring from remote backup...");
                let status = orchestrator.pull(store).await?;
                println!("{}", status);
                Ok(())
            }

            Some(SyncSubcommand::Status) => {
                let settings = store.settings();
                let owner = settings.get(OWNER_KEY).await?;
                let repo = settings.get(REPO_KEY).await?;

                println!("Sync Configuration");
                println!("==================");
                println!();

                match (owner, repo) {
                    (Some(owner), Some(repo)) => {
                        println!("Remote: {}/{}", owner, repo);
                    }
                    _ => {
                        println!("Status: Not configured");
                        println!();
                        println!("Run `tally remote set` to configure the backup repository.");
                        return Ok(());
                    }
                }

                println!("Last attempt: {}", orchestrator.status());
                Ok(())
            }
        }
    }
}
