//! # Inkpot server
//!
//! Reads configuration, connects the adapters and serves the blog until
//! Ctrl-C or SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{router, AppState};
use auth_adapters::{session_key, Argon2PasswordHasher};
use axum::http::Request;
use configs::{AppConfig, ExposeSecret, LogFormat};
use mail_adapters::{SmtpMailer, SmtpSettings};
use storage_adapters::SqliteStore;
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("invalid configuration")?;
    init_tracing(config.log_format);

    let store = SqliteStore::connect(&config.database_url)
        .await
        .with_context(|| format!("could not open database {}", config.database_url))?;
    tracing::info!(url = %config.database_url, "database ready");

    let session_key = session_key(config.secret_key.expose_secret().as_bytes())
        .context("SECRET_KEY rejected")?;

    let mail = config.mail;
    let mailer = SmtpMailer::new(SmtpSettings {
        host: mail.smtp_host,
        port: mail.smtp_port,
        sender: mail.sender,
        password: mail.sender_password.expose_secret().to_owned(),
        recipient: mail.recipient,
        timeout: mail.timeout,
    })
    .context("invalid mail settings")?;

    let state = AppState::new(
        Arc::new(store),
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(mailer),
        session_key,
    );

    let app = router(state).layer(TraceLayer::new_for_http().make_span_with(
        |request: &Request<_>| {
            tracing::span!(
                Level::INFO,
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
            )
        },
    ));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("could not bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}
