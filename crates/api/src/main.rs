use anyhow::Context;
use clap::{Parser, Subcommand};

use pricestats_api::app::{build_app, services::build_services};
use pricestats_infra::Settings;

#[derive(Debug, Parser)]
#[command(name = "pricestats-api", version, about = "Product price statistics web app")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Create a login account.
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pricestats_observability::init();

    let cli = Cli::parse();
    let settings = Settings::from_env().context("invalid configuration")?;
    let services = build_services(&settings)
        .await
        .context("failed to initialize stores")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let app = build_app(services);

            let listener = tokio::net::TcpListener::bind(settings.bind_addr)
                .await
                .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

            tracing::info!("listening on {}", listener.local_addr()?);
            axum::serve(listener, app).await.context("server error")?;
        }
        Command::CreateUser { username, password } => {
            if !settings.use_persistent_stores {
                tracing::warn!("in-memory stores: the account disappears when this command exits");
            }
            let account = services
                .register_user(&username, &password)
                .await
                .context("failed to create user")?;
            println!("created user {} (id {})", account.username, account.id);
        }
    }

    Ok(())
}
