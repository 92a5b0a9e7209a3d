//! The public contact form, relayed to the site owner by email.

use std::sync::Arc;

use domains::{Mailer, OutboundEmail, Result};

use crate::required;

pub const CONTACT_SUBJECT: &str = "New message from Blog!";

/// Input of the contact form. Nothing here is persisted.
#[derive(Debug, Clone)]
pub struct ContactEnquiry {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

pub struct ContactService {
    mailer: Arc<dyn Mailer>,
}

impl ContactService {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    /// Sends exactly one email per enquiry. No retry.
    pub async fn send(&self, enquiry: ContactEnquiry) -> Result<()> {
        let email = compose(&enquiry)?;
        if let Err(err) = self.mailer.send(email).await {
            tracing::warn!(error = %err, "contact message was not relayed");
            return Err(err);
        }
        tracing::info!("contact message relayed");
        Ok(())
    }
}

fn compose(enquiry: &ContactEnquiry) -> Result<OutboundEmail> {
    let name = required("name", &enquiry.name)?;
    let email = required("email", &enquiry.email)?;
    let phone = required("phone", &enquiry.phone)?;
    let message = required("message", &enquiry.message)?;

    Ok(OutboundEmail {
        subject: CONTACT_SUBJECT.to_owned(),
        body: format!("name: {name}\nemail: {email}\nphone: {phone}\nmessage: {message}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{DomainError, MockMailer};

    fn enquiry() -> ContactEnquiry {
        ContactEnquiry {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            phone: "555-0100".into(),
            message: "Hello there".into(),
        }
    }

    #[tokio::test]
    async fn sends_one_email_with_every_field() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|email| {
                email.subject == CONTACT_SUBJECT
                    && email.body
                        == "name: Ann\nemail: ann@example.com\nphone: 555-0100\nmessage: Hello there"
            })
            .times(1)
            .returning(|_| Ok(()));

        ContactService::new(Arc::new(mailer))
            .send(enquiry())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn relay_failure_is_returned() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .returning(|_| Err(DomainError::Relay("connection refused".into())));

        let err = ContactService::new(Arc::new(mailer))
            .send(enquiry())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Relay(_)));
    }

    #[tokio::test]
    async fn incomplete_enquiry_sends_nothing() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        let err = ContactService::new(Arc::new(mailer))
            .send(ContactEnquiry {
                phone: String::new(),
                ..enquiry()
            })
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::ValidationError("phone is required".into()));
    }
}
