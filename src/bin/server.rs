// Library GraphQL - Main Server
// Run with: cargo run --bin server -- <password>

//! # Library Server Binary
//!
//! Starts the GraphQL server over the configured storage backend.
//!
//! ```text
//! server [PASSWORD] [--storage mongo|memory] [--port N] [--seed] [--config FILE]
//! ```
//!
//! With the MongoDB backend (the default) the database password is required;
//! it is substituted into `mongo.uri_template`. The in-memory backend needs no
//! password and can be pre-loaded with a sample catalogue using `--seed`.
//!
//! ## Rust Learning Notes:
//!
//! ### Exit Codes
//! `main` returns `ExitCode` so that usage errors and startup failures end
//! the process with a non-zero status after logging what went wrong.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use library_graphql::{
    GraphQLServerBuilder, InMemoryStorage, LibraryStorage, MongoStorage, Settings, StorageBackend,
};

/// GraphQL server for a catalogue of authors and books
#[derive(Parser, Debug)]
#[command(name = "server", version)]
struct Cli {
    /// MongoDB password, substituted into the connection string
    #[arg(env = "LIBRARY_MONGO_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Storage backend
    #[arg(long, value_enum)]
    storage: Option<StorageBackend>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Load the sample catalogue (in-memory storage only)
    #[arg(long)]
    seed: bool,

    /// Settings file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional
    dotenv().ok();

    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .unwrap_or_else(|e| {
        eprintln!("Warning: {}; using default settings", e);
        Settings::default()
    });

    if let Some(storage) = cli.storage {
        settings.storage.backend = storage;
    }
    if let Some(port) = cli.port {
        settings.server.port = port;
    }
    if cli.seed {
        settings.storage.seed = true;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚀 Starting Library GraphQL Server...");
    info!("=====================================");

    let storage: Arc<dyn LibraryStorage> = match settings.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryStorage::default()),
        StorageBackend::Mongo => {
            let Some(password) = cli.password.as_deref() else {
                eprintln!("Please provide your password as an argument: server <password>");
                return ExitCode::FAILURE;
            };

            if settings.storage.seed {
                warn!("⚠️ --seed is ignored with MongoDB storage");
                settings.storage.seed = false;
            }

            let config = match settings.mongo.storage_config(password) {
                Ok(config) => config,
                Err(e) => {
                    error!("❌ {}", e);
                    return ExitCode::FAILURE;
                }
            };

            info!("🔌 Connecting to {}", settings.mongo.masked_uri());
            match MongoStorage::connect(config).await {
                Ok(storage) => Arc::new(storage),
                Err(e) => {
                    error!("❌ Error connecting to MongoDB: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    let result = GraphQLServerBuilder::new()
        .with_storage(storage)
        .with_host(settings.server.host.clone())
        .with_port(settings.server.port)
        .with_cors(settings.server.cors_enabled)
        .with_seed(settings.storage.seed)
        .build_and_run()
        .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ Server failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
