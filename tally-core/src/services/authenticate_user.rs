//! Authenticate user service

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::result::{Error, Result};
use crate::domain::{User, UserProfile};
use crate::ports::{PasswordHasher, UsersRepository};

#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticateUserInput {
    pub email: String,
    pub password: String,
}

/// Checks an email/password pair against the stored hash
pub struct AuthenticateUserService {
    users: Arc<dyn UsersRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AuthenticateUserService {
    pub fn new(users: Arc<dyn UsersRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Unknown email and wrong password fail with the same error
    pub async fn execute(&self, input: AuthenticateUserInput) -> Result<UserProfile> {
        let email = User::normalize_email(&input.email);

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("authentication failed");
                return Err(Error::IncorrectEmailOrPassword);
            }
        };

        if !self.hasher.verify(&input.password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "authentication failed");
            return Err(Error::IncorrectEmailOrPassword);
        }

        Ok(user.profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{fixture, seed_user, FakeHasher};

    fn login(email: &str, password: &str) -> AuthenticateUserInput {
        AuthenticateUserInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_valid_credentials_return_profile() {
        let f = fixture();
        let user = seed_user(&f.users, "a@mail.com").await;
        let service = AuthenticateUserService::new(f.users.clone(), Arc::new(FakeHasher));

        let profile = service
            .execute(login("A@Mail.com", "valid_password"))
            .await
            .unwrap();
        assert_eq!(profile, user.profile());
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let f = fixture();
        seed_user(&f.users, "a@mail.com").await;
        let service = AuthenticateUserService::new(f.users.clone(), Arc::new(FakeHasher));

        let wrong_password = service
            .execute(login("a@mail.com", "wrong_password"))
            .await
            .unwrap_err();
        let unknown_email = service
            .execute(login("nobody@mail.com", "valid_password"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, Error::IncorrectEmailOrPassword));
        assert!(matches!(unknown_email, Error::IncorrectEmailOrPassword));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }
}
