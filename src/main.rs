use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use pocketwriter::api::{self, AppState};
use pocketwriter::config::Config;
use pocketwriter::storage::{Database, DatabaseError};
use pocketwriter::uploads::UploadStore;

#[derive(Parser, Debug)]
#[command(name = "pocketwriter", about = "PocketWriter backend: articles, templates and image uploads")]
struct Args {
    /// Configuration file (TOML). A missing file means defaults.
    #[arg(long, value_name = "FILE", default_value = "pocketwriter.toml")]
    config: PathBuf,

    /// Listen address, overrides `bind` from the config file
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,

    /// SQLite database path, overrides `database_path`
    #[arg(long, value_name = "PATH")]
    database: Option<String>,

    /// Upload directory, overrides `upload_dir`
    #[arg(long, value_name = "DIR")]
    upload_dir: Option<PathBuf>,

    /// Reset database (delete and recreate)
    #[arg(long)]
    reset_db: bool,
}

impl Args {
    fn apply(self, mut config: Config) -> Config {
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(database) = self.database {
            config.database_path = database;
        }
        if let Some(upload_dir) = self.upload_dir {
            config.upload_dir = upload_dir;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let reset_db = args.reset_db;

    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    let config = args.apply(config);

    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    tracing::info!(cwd = %cwd.display(), "Starting pocketwriter");

    let db_path = PathBuf::from(&config.database_path);
    if reset_db && config.database_path != ":memory:" && db_path.exists() {
        std::fs::remove_file(&db_path).context("Failed to delete database")?;
        tracing::info!(path = %db_path.display(), "Database reset");
    }

    let db = match Database::open(&config.database_path).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            anyhow::bail!(
                "Database {} is locked by another process",
                config.database_path
            );
        }
        Err(e) => return Err(anyhow::anyhow!("Failed to open database: {}", e)),
    };

    let state = AppState::new(db, UploadStore::new(&config.upload_dir));
    let app = api::router(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    tracing::info!(
        addr = %listener.local_addr()?,
        uploads = %config.upload_dir.display(),
        "Listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
