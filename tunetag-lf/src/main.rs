//! tunetag-lf (Label Filter) - AND-filtering of songs by label
//!
//! Subcommands:
//! - `serve`: HTTP service over the library database
//! - `filter`: one-shot filter printed as JSON
//! - `load`: import a JSON library fixture

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tunetag_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use tunetag_common::db::init_database;
use tunetag_lf::fixture::LibraryFixture;
use tunetag_lf::{build_router, AppState, FilteringEngine, SqliteLabelStore};

#[derive(Debug, Parser)]
#[command(name = "tunetag-lf", version, about = "Filter library songs by label")]
struct Cli {
    /// Root folder holding tunetag.db (overrides env and config file)
    #[arg(long, global = true)]
    root_folder: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Bind address (default from config file, else 127.0.0.1:5730)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print the songs carrying every given label
    Filter {
        /// Library to search
        #[arg(long)]
        library: String,
        /// Label id; repeat for AND. Omit to list every song
        #[arg(long = "label")]
        labels: Vec<String>,
    },
    /// Import a JSON library fixture
    Load {
        /// Fixture file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TomlConfig::load_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting tunetag Label Filter (tunetag-lf) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let resolver = RootFolderResolver::with_config("label-filter", config.clone());
    let root_folder = resolver.resolve(cli.root_folder.as_deref());

    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };
    let store = Arc::new(SqliteLabelStore::new(pool));

    match cli.command {
        Command::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.bind_address().to_string());
            let app = build_router(AppState::new(store));

            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .with_context(|| format!("Failed to bind {}", bind))?;
            info!("tunetag-lf listening on http://{}", bind);
            info!("Health check: http://{}/health", bind);

            axum::serve(listener, app).await?;
        }
        Command::Filter { library, labels } => {
            let engine = FilteringEngine::new(store);
            let result = engine.filter_songs_by_labels(&library, &labels).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Load { file } => {
            let fixture = LibraryFixture::from_file(&file)
                .with_context(|| format!("Failed to read fixture {}", file.display()))?;
            let summary = fixture.apply(&store).await?;
            println!(
                "Loaded library {}: {} songs, {} labels, {} components, {} tags",
                fixture.library_id, summary.songs, summary.labels, summary.components, summary.tags
            );
        }
    }

    Ok(())
}
