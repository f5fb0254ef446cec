mod application;
mod config;
mod domain;
mod infrastructure;
mod presentation;

use crate::application::{
    ports::{
        security::{CsrfProtection, PasswordHasher, SessionManager},
        time::Clock,
    },
    services::ApplicationServices,
};
use crate::config::AppConfig;
use crate::infrastructure::{
    database,
    repositories::{
        SqliteArticleReadRepository, SqliteArticleWriteRepository, SqliteUserRepository,
    },
    security::{
        csrf::HmacCsrfTokens, password::Argon2PasswordHasher, session::HmacSessionManager,
    },
    time::SystemClock,
};
use crate::presentation::http::{
    middleware::{
        correlation::CorrelationHook, lifecycle::HookRegistry, request_log::RequestLogHook,
    },
    routes::build_router,
    state::HttpState,
    templates,
};
use anyhow::Result;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let pool = database::init_pool(config.database_url()).await?;
    database::run_migrations(&pool).await?;
    let pool = Arc::new(pool);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher);
    let session_manager: Arc<dyn SessionManager> = Arc::new(HmacSessionManager::new(
        config.session_secret(),
        config.session_ttl(),
        Arc::clone(&clock),
    )?);
    let csrf: Arc<dyn CsrfProtection> = Arc::new(HmacCsrfTokens::new(config.session_secret())?);

    let services = Arc::new(ApplicationServices::new(
        Arc::new(SqliteUserRepository::new(Arc::clone(&pool))),
        Arc::new(SqliteArticleWriteRepository::new(Arc::clone(&pool))),
        Arc::new(SqliteArticleReadRepository::new(Arc::clone(&pool))),
        password_hasher,
        session_manager,
        csrf,
        clock,
    ));

    services
        .auth
        .seed_default_users(config.admin_password(), config.super_admin_password())
        .await?;

    let mut hooks = HookRegistry::new();
    hooks.register(Box::new(RequestLogHook));
    hooks.register(Box::new(CorrelationHook));

    let state = HttpState {
        services,
        templates: Arc::new(templates::build_environment()?),
        hooks: Arc::new(hooks),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
