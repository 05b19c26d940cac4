use chrono::Local;
use clap::{Args, Subcommand};

use super::report::start_of_day;
use crate::db::Store;
use crate::sync::{RemoteStore, SyncOrchestrator};

/// Record and manage sale entries
#[derive(Args)]
pub struct EntryCommand {
    #[command(subcommand)]
    pub command: EntrySubcommand,
}

#[derive(Subcommand)]
pub enum EntrySubcommand {
    /// Record a sale of a catalog product
    Add {
        /// Product id
        product_id: i64,

        /// Quantity sold
        quantity: f64,
    },

    /// List entries
    List {
        /// Only entries from today
        #[arg(long)]
        today: bool,
    },

    /// Delete an entry
    Delete {
        /// Entry id
        id: i64,
    },
}

impl EntryCommand {
    pub async fn run<R: RemoteStore>(
        &self,
        store: &Store,
        orchestrator: &mut SyncOrchestrator<R>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            EntrySubcommand::Add {
                product_id,
                quantity,
            } => {
                if *quantity <= 0.0 {
                    return Err("Quantity must be a positive number".into());
                }

                let product = match store.products().get_by_id(*product_id).await? {
                    Some(p) => p,
                    None => return Err(format!("Product not found: {}", product_id).into()),
                };

                let entry = store.entries().add(&product, *quantity).await?;
                println!("Recorded entry #{}: {}", entry.id, entry);

                let status = orchestrator.push(store).await?;
                println!("{}", status);
                Ok(())
            }

            EntrySubcommand::List { today } => {
                let entries = if *today {
                    store.entries().list_since(start_of_day(Local::now())).await?
                } else {
                    store.entries().list().await?
                };

                if entries.is_empty() {
                    println!("No entries found");
                    return Ok(());
                }

                for entry in &entries {
                    println!("#{:<5} {}", entry.id, entry);
                }
                println!("\nTotal: {} entr(ies)", entries.len());
                Ok(())
            }

            EntrySubcommand::Delete { id } => {
                store.entries().delete(*id).await?;
                println!("Deleted entry: {}", id);

                let status = orchestrator.push(store).await?;
                println!("{}", status);
                Ok(())
            }
        }
    }
}
