//! # configs
//!
//! Process configuration, read once at startup from the environment (and an
//! optional `.env` file) and passed explicitly to everything that needs it.
//!
//! | Variable | Required | Default |
//! |---|---|---|
//! | `SENDER` | yes | |
//! | `SENDER_PASS` | yes | |
//! | `RECEIVER` | yes | |
//! | `SECRET_KEY` | yes, ≥ 32 bytes | |
//! | `DATABASE_URL` | no | `sqlite://blog.db` |
//! | `BIND_ADDR` | no | `0.0.0.0:5000` |
//! | `SMTP_HOST` | no | `smtp-mail.outlook.com` |
//! | `SMTP_PORT` | no | `587` |
//! | `SMTP_TIMEOUT_SECS` | no | `10` |
//! | `LOG_FORMAT` | no | `pretty` (`json` also accepted) |

use std::str::FromStr;
use std::time::Duration;

use config::{Config, Environment};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

pub use secrecy::ExposeSecret;

/// Shortest accepted `SECRET_KEY`, in bytes.
pub const MIN_SECRET_KEY_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required setting {0} is missing or blank")]
    Missing(&'static str),

    #[error("SECRET_KEY must be at least {MIN_SECRET_KEY_LEN} bytes, got {0}")]
    WeakSecret(usize),

    #[error("invalid value {value:?} for {key}")]
    BadValue { key: &'static str, value: String },

    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Outbound mail relay settings.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub sender: String,
    pub sender_password: SecretString,
    pub recipient: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: String,
    /// Signs session cookies
    pub secret_key: SecretString,
    pub log_format: LogFormat,
    pub mail: MailConfig,
}

/// Settings for the `seed` binary.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub database_url: String,
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: SecretString,
}

/// Flat view of the environment; keys arrive lower-cased.
#[derive(Debug, Deserialize)]
struct RawSettings {
    sender: Option<String>,
    sender_pass: Option<String>,
    receiver: Option<String>,
    secret_key: Option<String>,
    database_url: String,
    bind_addr: String,
    smtp_host: String,
    smtp_port: String,
    smtp_timeout_secs: String,
    log_format: String,
    seed_admin_name: Option<String>,
    seed_admin_email: Option<String>,
    seed_admin_password: Option<String>,
}

fn read(env: Environment) -> Result<RawSettings, ConfigError> {
    let raw = Config::builder()
        .set_default("database_url", "sqlite://blog.db")?
        .set_default("bind_addr", "0.0.0.0:5000")?
        .set_default("smtp_host", "smtp-mail.outlook.com")?
        .set_default("smtp_port", "587")?
        .set_default("smtp_timeout_secs", "10")?
        .set_default("log_format", "pretty")?
        .add_source(env)
        .build()?
        .try_deserialize()?;
    Ok(raw)
}

fn required(key: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_owned()),
        _ => Err(ConfigError::Missing(key)),
    }
}

/// Values arrive as text; only the numeric settings are parsed.
fn number<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::BadValue { key, value })
}

fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env file");
    }
}

fn explicit_env<I, K, V>(vars: I) -> Environment
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    Environment::default().source(Some(
        vars.into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect(),
    ))
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    /// Fails fast on any missing required value.
    pub fn load() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_environment(Environment::default())
    }

    /// Same as [`AppConfig::load`] but from an explicit set of variables.
    pub fn from_map<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_environment(explicit_env(vars))
    }

    fn from_environment(env: Environment) -> Result<Self, ConfigError> {
        let raw = read(env)?;

        let secret_key = required("SECRET_KEY", raw.secret_key)?;
        if secret_key.len() < MIN_SECRET_KEY_LEN {
            return Err(ConfigError::WeakSecret(secret_key.len()));
        }

        let log_format = match raw.log_format.to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            _ => {
                return Err(ConfigError::BadValue {
                    key: "LOG_FORMAT",
                    value: raw.log_format,
                })
            }
        };

        Ok(Self {
            bind_addr: raw.bind_addr,
            database_url: raw.database_url,
            secret_key: SecretString::from(secret_key),
            log_format,
            mail: MailConfig {
                smtp_host: raw.smtp_host,
                smtp_port: number("SMTP_PORT", raw.smtp_port)?,
                sender: required("SENDER", raw.sender)?,
                sender_password: SecretString::from(required("SENDER_PASS", raw.sender_pass)?),
                recipient: required("RECEIVER", raw.receiver)?,
                timeout: Duration::from_secs(number(
                    "SMTP_TIMEOUT_SECS",
                    raw.smtp_timeout_secs,
                )?),
            },
        })
    }
}

impl SeedConfig {
    pub fn load() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_environment(Environment::default())
    }

    pub fn from_map<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_environment(explicit_env(vars))
    }

    fn from_environment(env: Environment) -> Result<Self, ConfigError> {
        let raw = read(env)?;
        Ok(Self {
            database_url: raw.database_url,
            admin_name: required("SEED_ADMIN_NAME", raw.seed_admin_name)?,
            admin_email: required("SEED_ADMIN_EMAIL", raw.seed_admin_email)?,
            admin_password: SecretString::from(required(
                "SEED_ADMIN_PASSWORD",
                raw.seed_admin_password,
            )?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0123456789abcdef0123456789abcdef";

    fn base() -> Vec<(&'static str, &'static str)> {
        vec![
            ("SENDER", "blog@example.com"),
            ("SENDER_PASS", "hunter2"),
            ("RECEIVER", "owner@example.com"),
            ("SECRET_KEY", KEY),
        ]
    }

    #[test]
    fn applies_defaults() {
        let config = AppConfig::from_map(base()).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:5000");
        assert_eq!(config.database_url, "sqlite://blog.db");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.mail.smtp_host, "smtp-mail.outlook.com");
        assert_eq!(config.mail.smtp_port, 587);
        assert_eq!(config.mail.timeout, Duration::from_secs(10));
        assert_eq!(config.mail.sender_password.expose_secret(), "hunter2");
    }

    #[test]
    fn overrides_are_parsed() {
        let mut vars = base();
        vars.push(("SMTP_PORT", "2525"));
        vars.push(("LOG_FORMAT", "json"));
        let config = AppConfig::from_map(vars).unwrap();
        assert_eq!(config.mail.smtp_port, 2525);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn numeric_looking_secrets_are_kept_verbatim() {
        let digits = "12345678901234567890123456789012345";
        let vars = base().into_iter().map(|(k, v)| match k {
            "SENDER_PASS" => (k, "007007"),
            "SECRET_KEY" => (k, digits),
            _ => (k, v),
        });
        let config = AppConfig::from_map(vars).unwrap();
        assert_eq!(config.mail.sender_password.expose_secret(), "007007");
        assert_eq!(config.secret_key.expose_secret(), digits);
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let mut vars = base();
        vars.push(("SMTP_PORT", "submission"));
        assert!(matches!(
            AppConfig::from_map(vars),
            Err(ConfigError::BadValue { key: "SMTP_PORT", .. })
        ));
    }

    #[test]
    fn missing_mail_credentials_fail_fast() {
        for key in ["SENDER", "SENDER_PASS", "RECEIVER"] {
            let vars = base().into_iter().filter(|(k, _)| *k != key);
            let err = AppConfig::from_map(vars).unwrap_err();
            assert!(
                matches!(err, ConfigError::Missing(missing) if missing == key),
                "{key}: {err}"
            );
        }
    }

    #[test]
    fn short_secret_key_is_rejected() {
        let vars = base()
            .into_iter()
            .map(|(k, v)| if k == "SECRET_KEY" { (k, "short") } else { (k, v) });
        assert!(matches!(
            AppConfig::from_map(vars),
            Err(ConfigError::WeakSecret(5))
        ));
    }

    #[test]
    fn seed_config_needs_admin_credentials() {
        let err = SeedConfig::from_map([("SEED_ADMIN_NAME", "Admin")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SEED_ADMIN_EMAIL")));
    }
}
