pub mod commands;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "tenant-stock-api")]
#[command(about = "Multi-tenant inventory and order management API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Apply database migrations and exit")]
    Migrate,

    #[command(about = "Print a development bearer token for a tenant/store pair")]
    Token {
        #[arg(long, env = "TOKEN_TENANT_ID", help = "Tenant UUID placed in the tenant_id claim")]
        tenant_id: Uuid,
        #[arg(long, env = "TOKEN_STORE_ID", help = "Store UUID placed in the store_id claim")]
        store_id: Uuid,
    },
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve::handle(config).await,
        Commands::Migrate => commands::migrate::handle(config).await,
        Commands::Token { tenant_id, store_id } => {
            commands::token::handle(config, tenant_id, store_id)
        }
    }
}
