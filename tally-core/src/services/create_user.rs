//! Create user service - registration

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::result::{Error, Result};
use crate::domain::{NewUser, User};
use crate::ports::{PasswordHasher, UsersRepository};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Registers users with a unique email and a hashed password
pub struct CreateUserService {
    users: Arc<dyn UsersRepository>,
    hasher: Arc<dyn PasswordHasher>,
    min_password_length: usize,
}

impl CreateUserService {
    pub fn new(
        users: Arc<dyn UsersRepository>,
        hasher: Arc<dyn PasswordHasher>,
        min_password_length: usize,
    ) -> Self {
        Self {
            users,
            hasher,
            min_password_length,
        }
    }

    pub async fn execute(&self, input: CreateUserInput) -> Result<User> {
        if input.password.chars().count() < self.min_password_length {
            return Err(Error::validation(format!(
                "password must be at least {} characters",
                self.min_password_length
            )));
        }

        let mut data = NewUser {
            name: input.name.trim().to_string(),
            email: User::normalize_email(&input.email),
            password_hash: String::new(),
        };
        data.validate().map_err(Error::validation)?;

        if self.users.find_by_email(&data.email).await?.is_some() {
            return Err(Error::UserAlreadyExists(data.email));
        }

        data.password_hash = self.hasher.hash(&input.password)?;
        let user = self.users.create(data).await?;

        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }
}
