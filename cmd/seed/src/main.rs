//! Creates the admin account in an empty database.
//!
//! The admin is whoever owns user id 1, so this must run before anyone
//! registers through the site. On a database that already has users it
//! changes nothing.

use std::sync::Arc;

use anyhow::Context;
use auth_adapters::Argon2PasswordHasher;
use configs::{ExposeSecret, SeedConfig};
use services::{AuthService, Registration};
use storage_adapters::SqliteStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = SeedConfig::load().context("invalid seed configuration")?;
    let store = Arc::new(
        SqliteStore::connect(&config.database_url)
            .await
            .with_context(|| format!("could not open database {}", config.database_url))?,
    );

    let existing = store.count_users().await?;
    if existing > 0 {
        tracing::info!(users = existing, "database already has users, nothing to seed");
        return Ok(());
    }

    let auth = AuthService::new(store.clone(), Arc::new(Argon2PasswordHasher::new()));
    let admin = auth
        .register(Registration {
            name: config.admin_name,
            email: config.admin_email,
            password: config.admin_password.expose_secret().to_owned(),
        })
        .await
        .context("could not create the admin account")?;

    tracing::info!(user_id = %admin.id, email = %admin.email, "admin account created");
    Ok(())
}
