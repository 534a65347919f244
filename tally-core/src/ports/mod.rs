//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod password;
mod repository;

pub use password::PasswordHasher;
pub use repository::{StatementsRepository, UsersRepository};
