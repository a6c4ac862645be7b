// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! MyData Storage Platform server and administrative commands.
//!
//! ```bash
//! mydata-platform                  # serve (default)
//! mydata-platform create-tables    # create the user table if missing
//! mydata-platform delete-tables    # drop all stored users
//! mydata-platform delete-user ID   # remove one user
//! ```

use clap::{Parser, Subcommand};
use mydata_platform::{config::Config, db::UserStore, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "mydata-platform", about = "MyData Storage Platform")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Create all tables (idempotent)
    CreateTables,
    /// Drop all tables and data
    DeleteTables,
    /// Delete a single user by id
    DeleteUser { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    let users = UserStore::connect(&config.database_url).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, users).await,
        Command::CreateTables => {
            users.create_tables().await?;
            Ok(())
        }
        Command::DeleteTables => {
            users.delete_tables().await?;
            Ok(())
        }
        Command::DeleteUser { id } => {
            if users.delete(&id).await? {
                tracing::info!(user_id = %id, "User deleted");
            } else {
                tracing::warn!(user_id = %id, "No such user");
            }
            Ok(())
        }
    }
}

async fn serve(config: Config, users: UserStore) -> anyhow::Result<()> {
    tracing::info!(
        port = config.port,
        app_url = %config.app_url,
        "Starting MyData Storage Platform"
    );

    let port = config.port;
    let state = Arc::new(AppState::new(config, users)?);
    let app = mydata_platform::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mydata_platform=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
