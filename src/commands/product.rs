use clap::{Args, Subcommand, ValueEnum};
use std::io::{self, Write};

use crate::db::Store;
use crate::sync::{RemoteStore, SyncOrchestrator};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Manage the product catalog
#[derive(Args)]
pub struct ProductCommand {
    #[command(subcommand)]
    pub command: ProductSubcommand,
}

#[derive(Subcommand)]
pub enum ProductSubcommand {
    /// Add a product to the catalog
    Add {
        /// Product name
        name: String,

        /// Unit price
        price: f64,
    },

    /// List all products
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a product (entries referencing it are kept)
    Delete {
        /// Product id
        id: i64,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl ProductCommand {
    pub async fn run<R: RemoteStore>(
        &self,
        store: &Store,
        orchestrator: &mut SyncOrchestrator<R>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ProductSubcommand::Add { name, price } => {
                if name.trim().is_empty() {
                    return Err("Product name cannot be empty".into());
                }
                if *price < 0.0 {
                    return Err("Price cannot be negative".into());
                }

                let product = store.products().add(name.trim(), *price).await?;
                println!("Added product #{}: {}", product.id, product);

                let status = orchestrator.push(store).await?;
                println!("{}", status);
                Ok(())
            }

            ProductSubcommand::List { format } => {
                let products = store.products().list().await?;

                if products.is_empty() {
                    println!("No products found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&products)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<6}  {:<30}  PRICE", "ID", "NAME");
                        println!("{}", "-".repeat(48));
                        for product in &products {
                            println!("{:<6}  {:<30}  {:.2}", product.id, product.name, product.price);
                        }
                        println!("\nTotal: {} product(s)", products.len());
                    }
                }
                Ok(())
            }

            ProductSubcommand::Delete { id, force } => {
                let product = match store.products().get_by_id(*id).await? {
                    Some(p) => p,
                    None => return Err(format!("Product not found: {}", id).into()),
                };

                if !force {
                    print!("Delete product '{}'? [y/N] ", product.name);
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                store.products().delete(product.id).await?;
                println!("Deleted product: {}", product.name);

                let status = orchestrator.push(store).await?;
                println!("{}", status);
                Ok(())
            }
        }
    }
}
