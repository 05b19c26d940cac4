use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod backup;
mod commands;
mod config;
mod db;
mod models;
mod sync;

use commands::{
    ClearCommand, EntryCommand, ProductCommand, RemoteCommand, ReportCommand, SyncCommand,
};
use config::Config;
use db::{init_db, Store};
use sync::{ContentClient, SyncOrchestrator, SyncStatus};

#[derive(Parser)]
#[command(name = "tally")]
#[command(version)]
#[command(about = "An offline-first sales tracker with remote JSON backup", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Skip the startup pull from the remote backup
    #[arg(long, global = true)]
    no_pull: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the product catalog
    Product(ProductCommand),

    /// Record and manage sale entries
    Entry(EntryCommand),

    /// Daily and monthly totals
    Report(ReportCommand),

    /// Configure the remote backup repository
    Remote(RemoteCommand),

    /// Push to or restore from the remote backup
    Sync(SyncCommand),

    /// Delete all products and entries
    Clear(ClearCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config)?;

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("Use --help to see available commands");
            return Ok(());
        }
    };

    let pool = init_db(config.database_path.clone()).await?;
    let store = Store::new(pool);
    let mut orchestrator = SyncOrchestrator::new(ContentClient::new(config.backup_file.clone()));

    // Replace local state with the remote backup before touching data,
    // unless this invocation only edits configuration. A failed pull is
    // reported but never blocks working with existing local data.
    let pulls_on_startup = !matches!(command, Commands::Remote(_) | Commands::Sync(_));
    if pulls_on_startup && !cli.no_pull {
        let status = orchestrator.pull(&store).await?;
        match status {
            SyncStatus::Idle | SyncStatus::NoCredentials => {}
            status => println!("{}", status),
        }
    }

    match command {
        Commands::Product(cmd) => cmd.run(&store, &mut orchestrator).await?,
        Commands::Entry(cmd) => cmd.run(&store, &mut orchestrator).await?,
        Commands::Report(cmd) => cmd.run(&store).await?,
        Commands::Remote(cmd) => cmd.run(&store).await?,
        Commands::Sync(cmd) => cmd.run(&store, &mut orchestrator).await?,
        Commands::Clear(cmd) => cmd.run(&store, &mut orchestrator).await?,
    }

    Ok(())
}
