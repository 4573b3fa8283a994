//! Pomodoro Auth Server
//! Mission: Serve sign-up, sign-in, sign-out and the whoami gate

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use pomodoro_auth::{
    auth::{password, AuthState, JwtHandler, SqliteUserStore},
    build_router, cors_layer, Config,
};
use std::{path::Path, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Environment first so clap sees .env values
    load_env();
    init_tracing();

    let config = Config::parse();

    info!("🚀 Pomodoro auth server starting");

    if config.secret.as_deref().map_or(true, str::is_empty) {
        warn!("⚠️  SECRET is not set: sign-in will fail and every protected request will be rejected");
    }

    password::warm_up();

    let user_store = Arc::new(SqliteUserStore::new(&config.db_path)?);
    let jwt_handler = Arc::new(JwtHandler::new(config.secret.clone()));
    let auth_state = AuthState::new(user_store, jwt_handler)
        .with_cookie_secure(config.cookie_secure)
        .with_require_user_on_validate(config.require_user_on_validate);

    info!("🔐 Authentication initialized at: {}", config.db_path);

    let app = build_router(auth_state, cors_layer(config.client_origin.as_deref())?);

    // Start server
    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("🎯 API server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pomodoro_auth=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // 2) Also try the crate root when launched from elsewhere
    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}
