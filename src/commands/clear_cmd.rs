use clap::Args;
use std::io::{self, Write};

use crate::db::Store;
use crate::sync::{RemoteStore, SyncOrchestrator};

/// Delete all products and entries. Remote settings are kept.
#[derive(Args)]
pub struct ClearCommand {
    /// Skip confirmation prompt
    #[arg(long, short)]
    pub force: bool,
}

impl ClearCommand {
    pub async fn run<R: RemoteStore>(
        &self,
        store: &Store,
        orchestrator: &mut SyncOrchestrator<R>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if !self.force {
            print!("Delete all products and entries? [y/N] ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Clear cancelled.");
                return Ok(());
            }
        }

        store.entries().clear().await?;
        store.products().clear().await?;
        println!("All data cleared");

        let status = orchestrator.push(store).await?;
        println!("{}", status);
        Ok(())
    }
}
