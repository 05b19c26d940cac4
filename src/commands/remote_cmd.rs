use clap::{Args, Subcommand};

use crate::db::{Store, OWNER_KEY, REPO_KEY, TOKEN_KEY};

/// Configure the remote backup repository
#[derive(Args)]
pub struct RemoteCommand {
    #[command(subcommand)]
    pub command: RemoteSubcommand,
}

#[derive(Subcommand)]
pub enum RemoteSubcommand {
    /// Save remote repository settings
    Set {
        /// Repository owner
        #[arg(long)]
        owner: String,

        /// Repository name
        #[arg(long)]
        repo: String,

        /// Access token
        #[arg(long)]
        token: String,
    },

    /// Show remote repository settings (token masked)
    Show,
}

/// Leading characters of the token, safe for any char boundary.
fn mask_token(token: &str) -> String {
    token.chars().take(8).collect()
}

impl RemoteCommand {
    pub async fn run(&self, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
        let settings = store.settings();

        match &self.command {
            RemoteSubcommand::Set { owner, repo, token } => {
                if owner.trim().is_empty() || repo.trim().is_empty() || token.trim().is_empty() {
                    return Err("Owner, repo and token must all be non-empty".into());
                }

                settings.set(OWNER_KEY, owner.trim()).await?;
                settings.set(REPO_KEY, repo.trim()).await?;
                settings.set(TOKEN_KEY, token.trim()).await?;

                println!("Remote settings saved");
                Ok(())
            }

            RemoteSubcommand::Show => {
                let owner = settings.get(OWNER_KEY).await?;
                let repo = settings.get(REPO_KEY).await?;
                let token = settings.get(TOKEN_KEY).await?;

                match (owner, repo, token) {
                    (Some(owner), Some(repo), Some(token)) => {
                        println!("Owner: {}", owner);
                        println!("Repo:  {}", repo);
                        println!("Token: {}...", mask_token(&token));
                    }
                    _ => {
                        println!("Remote not configured");
                        println!();
                        println!("To enable backup sync:");
                        println!();
                        println!("  tally remote set --owner <owner> --repo <repo> --token <token>");
                    }
                }
                Ok(())
            }
        }
    }
}
