use anyhow::Result;
use aquamon_storage::{auth::hash_password, Store};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use aquamon_server::app;
use aquamon_server::config::{ServerConfig, INSECURE_DEV_SECRET};
use aquamon_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("aquamon=info".parse()?))
        .init();

    let config = ServerConfig::from_env();

    tracing::info!(
        http_port = config.http_port,
        db = %config.redacted_url(),
        "aquamon-server starting"
    );

    // SQLite creates the database file on demand, but not its parent directory
    if let Some(path) = config.database_url.strip_prefix("sqlite://") {
        let path = path.split('?').next().unwrap_or(path);
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    let store = Arc::new(Store::new(&config.database_url).await?);

    // JWT secret: configured value, or the insecure development fallback
    let jwt_secret = match &config.auth.jwt_secret {
        Some(secret) => Arc::new(secret.clone()),
        None => {
            tracing::warn!(
                "No JWT_SECRET configured; using the built-in development secret. \
                 Tokens are forgeable — set JWT_SECRET for any real deployment."
            );
            Arc::new(INSECURE_DEV_SECRET.to_string())
        }
    };

    // Bootstrap superadmin: create one when the admins table is empty
    match store.count_admins().await {
        Ok(0) => {
            let password_hash = hash_password(&config.auth.bootstrap_password)?;
            match store
                .create_admin(&config.auth.bootstrap_email, &password_hash, "superadmin")
                .await
            {
                Ok(admin) => {
                    tracing::info!(email = %admin.email, "Created bootstrap superadmin");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create bootstrap superadmin");
                }
            }
        }
        Ok(count) => {
            tracing::info!(count, "Admins table already has accounts, skipping bootstrap");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to check admins table");
        }
    }

    let state = AppState {
        store,
        jwt_secret,
        token_expire_secs: config.auth.token_expire_secs,
        config: Arc::new(config.clone()),
    };

    let http_addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    let app = app::build_http_app(state);
    let listener = tokio::net::TcpListener::bind(http_addr).await?;

    tracing::info!(http = %http_addr, "Server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            signal::ctrl_c().await.ok();
            tracing::info!("Shutting down gracefully");
        })
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}
