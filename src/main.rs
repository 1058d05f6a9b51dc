use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use uptask_api::config::AppConfig;
use uptask_api::database::{open_store, DocumentStore, MemoryStore};
use uptask_api::{app, AppState};

/// Uptask GraphQL API server
#[derive(Parser, Debug)]
#[command(name = "uptask-api", version, about)]
struct Args {
    /// Interface to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// PostgreSQL connection string (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Keep all data in process memory, ignoring any database URL
    #[arg(long, conflicts_with = "database_url")]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("uptask_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(url) = args.database_url {
        config.database.url = Some(url);
    }
    let config = config.validated()?;
    tracing::info!("Starting Uptask API in {:?} mode", config.environment);

    let store: Arc<dyn DocumentStore> = if args.in_memory {
        tracing::info!("Using in-memory store");
        Arc::new(MemoryStore::new())
    } else {
        open_store(&config.database)
            .await
            .context("failed to open document store")?
    };

    let state = AppState::new(&config, store).context("failed to initialize token service")?;
    let app = app(state, &config);

    let bind_addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Uptask API listening on http://{}", bind_addr);
    if config.api.enable_graphiql {
        tracing::info!("GraphiQL available at http://{}/graphql", bind_addr);
    }

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
