//! # mail-adapters
//!
//! SMTP implementation of the `Mailer` port. Every send opens a fresh
//! STARTTLS session against the relay, authenticates, delivers one message
//! and closes the connection; there is no pool, queue or retry.

use std::time::Duration;

use async_trait::async_trait;
use domains::{DomainError, Mailer, OutboundEmail, Result};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

/// Connection and identity settings for the relay.
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Login and `From:` address
    pub sender: String,
    pub password: String,
    /// `To:` address of every message
    pub recipient: String,
    pub timeout: Duration,
}

#[derive(Debug, Error)]
pub enum MailSetupError {
    #[error("invalid {role} address {address:?}: {source}")]
    Address {
        role: &'static str,
        address: String,
        source: lettre::address::AddressError,
    },
}

pub struct SmtpMailer {
    host: String,
    port: u16,
    credentials: Credentials,
    from: Mailbox,
    to: Mailbox,
    timeout: Duration,
}

fn parse_mailbox(role: &'static str, address: &str) -> std::result::Result<Mailbox, MailSetupError> {
    address.parse().map_err(|source| MailSetupError::Address {
        role,
        address: address.to_owned(),
        source,
    })
}

impl SmtpMailer {
    /// Fails if either address does not parse.
    pub fn new(settings: SmtpSettings) -> std::result::Result<Self, MailSetupError> {
        Ok(Self {
            from: parse_mailbox("sender", &settings.sender)?,
            to: parse_mailbox("recipient", &settings.recipient)?,
            credentials: Credentials::new(settings.sender, settings.password),
            host: settings.host,
            port: settings.port,
            timeout: settings.timeout,
        })
    }

    fn compose(&self, email: OutboundEmail) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)
            .map_err(|err| DomainError::Internal(format!("could not build message: {err}")))
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
            .map_err(|err| DomainError::Relay(err.to_string()))?
            .port(self.port)
            .credentials(self.credentials.clone())
            .timeout(Some(self.timeout))
            .build();
        Ok(transport)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutboundEmail) -> Result<()> {
        let message = self.compose(email)?;
        let transport = self.transport()?;

        let response = transport.send(message).await.map_err(|err| {
            tracing::warn!(host = %self.host, port = self.port, error = %err, "smtp relay failed");
            DomainError::Relay(err.to_string())
        })?;

        tracing::info!(host = %self.host, code = %response.code(), "mail relayed");
        Ok(())
    }
}
