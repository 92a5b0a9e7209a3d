use std::sync::Arc;
use std::time::Duration;

use domains::{DomainError, MockMailer};
use mail_adapters::{SmtpMailer, SmtpSettings};
use services::{ContactEnquiry, ContactService, CONTACT_SUBJECT};

fn enquiry() -> ContactEnquiry {
    ContactEnquiry {
        name: "Ann".into(),
        email: "ann@example.com".into(),
        phone: "555-0100".into(),
        message: "Loved the last post".into(),
    }
}

#[tokio::test]
async fn one_email_carries_all_four_fields() {
    let mut mailer = MockMailer::new();
    mailer
        .expect_send()
        .withf(|email| {
            email.subject == CONTACT_SUBJECT
                && ["Ann", "ann@example.com", "555-0100", "Loved the last post"]
                    .iter()
                    .all(|value| email.body.contains(value))
        })
        .times(1)
        .returning(|_| Ok(()));

    ContactService::new(Arc::new(mailer))
        .send(enquiry())
        .await
        .unwrap();
}

#[tokio::test]
async fn unreachable_relay_is_a_relay_error() {
    let mailer = SmtpMailer::new(SmtpSettings {
        host: "127.0.0.1".into(),
        port: 1,
        sender: "blog@example.com".into(),
        password: "secret".into(),
        recipient: "owner@example.com".into(),
        timeout: Duration::from_secs(2),
    })
    .unwrap();

    let err = ContactService::new(Arc::new(mailer))
        .send(enquiry())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Relay(_)));
}
