//! Fixtures for service tests

use std::sync::Arc;

use crate::adapters::memory::{InMemoryStatementsRepository, InMemoryUsersRepository};
use crate::domain::result::Result;
use crate::domain::{NewUser, User};
use crate::ports::{PasswordHasher, UsersRepository};

pub struct Fixture {
    pub users: Arc<InMemoryUsersRepository>,
    pub statements: Arc<InMemoryStatementsRepository>,
}

pub fn fixture() -> Fixture {
    Fixture {
        users: Arc::new(InMemoryUsersRepository::new()),
        statements: Arc::new(InMemoryStatementsRepository::new()),
    }
}

pub async fn seed_user(users: &InMemoryUsersRepository, email: &str) -> User {
    users
        .create(NewUser {
            name: "valid_name".to_string(),
            email: email.to_string(),
            password_hash: FakeHasher.hash("valid_password").unwrap(),
        })
        .await
        .unwrap()
}

/// Reversible "hash" so tests don't pay for argon2
pub struct FakeHasher;

impl PasswordHasher for FakeHasher {
    fn hash(&self, password: &str) -> Result<String> {
        Ok(format!("hashed:{}", password))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        Ok(hash == format!("hashed:{}", password))
    }
}
