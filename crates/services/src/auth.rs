//! Registration, login and per-request identity resolution.

use std::sync::Arc;

use domains::{DomainError, NewUser, PasswordHasher, Result, User, UserId, UserRepository};

use crate::required;

/// Input of the registration form.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Result of a login attempt. Unknown email and wrong password are reported
/// separately so the form can say which one happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(User),
    UnknownEmail,
    WrongPassword,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Creates an account. Fails with `Conflict` if the email is taken.
    pub async fn register(&self, registration: Registration) -> Result<User> {
        let name = required("name", &registration.name)?;
        let email = required("email", &registration.email)?;
        required("password", &registration.password)?;

        if self.users.find_user_by_email(email).await?.is_some() {
            tracing::info!(email, "registration rejected: email already registered");
            return Err(DomainError::Conflict(format!("{email} is already registered")));
        }

        let password_hash = self.hasher.hash(&registration.password).await?;
        let user = self
            .users
            .create_user(NewUser {
                name: name.to_owned(),
                email: email.to_owned(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "registered new user");
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let email = required("email", email)?;
        required("password", password)?;

        let Some(user) = self.users.find_user_by_email(email).await? else {
            tracing::debug!(email, "login for unknown email");
            return Ok(LoginOutcome::UnknownEmail);
        };

        if self.hasher.verify(password, &user.password_hash).await? {
            tracing::info!(user_id = %user.id, "user logged in");
            Ok(LoginOutcome::Authenticated(user))
        } else {
            tracing::debug!(user_id = %user.id, "login with wrong password");
            Ok(LoginOutcome::WrongPassword)
        }
    }

    /// Resolves the session's user id. Ids that no longer match a row resolve
    /// to anonymous.
    pub async fn current_user(&self, id: Option<UserId>) -> Result<Option<User>> {
        match id {
            Some(id) => self.users.get_user(id).await,
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{MockPasswordHasher, MockUserRepository};
    use mockall::predicate::eq;

    fn alice() -> User {
        User {
            id: UserId(1),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password_hash: "$argon2id$stored".into(),
        }
    }

    fn registration() -> Registration {
        Registration {
            name: "Alice".into(),
            email: " alice@example.com ".into(),
            password: "p1".into(),
        }
    }

    #[tokio::test]
    async fn register_hashes_and_persists() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_user_by_email()
            .with(eq("alice@example.com"))
            .returning(|_| Ok(None));
        users
            .expect_create_user()
            .withf(|u| u.email == "alice@example.com" && u.password_hash == "hashed:p1")
            .times(1)
            .returning(|_| Ok(alice()));

        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|pw| Ok(format!("hashed:{pw}")));

        let service = AuthService::new(Arc::new(users), Arc::new(hasher));
        let user = service.register(registration()).await.unwrap();
        assert_eq!(user.id, UserId(1));
    }

    #[tokio::test]
    async fn register_rejects_existing_email_without_writing() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_user_by_email()
            .returning(|_| Ok(Some(alice())));
        users.expect_create_user().never();

        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().never();

        let service = AuthService::new(Arc::new(users), Arc::new(hasher));
        let err = service.register(registration()).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_requires_every_field() {
        let service = AuthService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockPasswordHasher::new()),
        );
        let err = service
            .register(Registration {
                password: "   ".into(),
                ..registration()
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::ValidationError("password is required".into())
        );
    }

    #[tokio::test]
    async fn login_distinguishes_unknown_email_from_wrong_password() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_user_by_email()
            .returning(|email| Ok((email == "alice@example.com").then(alice)));

        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_verify()
            .returning(|pw, _| Ok(pw == "p1"));

        let service = AuthService::new(Arc::new(users), Arc::new(hasher));

        assert_eq!(
            service.login("bob@example.com", "p1").await.unwrap(),
            LoginOutcome::UnknownEmail
        );
        assert_eq!(
            service.login("alice@example.com", "wrong").await.unwrap(),
            LoginOutcome::WrongPassword
        );
        assert_eq!(
            service.login("alice@example.com", "p1").await.unwrap(),
            LoginOutcome::Authenticated(alice())
        );
    }

    #[tokio::test]
    async fn current_user_is_anonymous_without_session_id() {
        let mut users = MockUserRepository::new();
        users.expect_get_user().never();
        let service = AuthService::new(Arc::new(users), Arc::new(MockPasswordHasher::new()));
        assert_eq!(service.current_user(None).await.unwrap(), None);
    }
}
