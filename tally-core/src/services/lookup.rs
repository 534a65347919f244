//! Lookups shared by the use cases

use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::User;
use crate::ports::UsersRepository;

/// Resolve a raw user id to an existing user
///
/// Ids that are not UUIDs cannot name a stored user, so they fail with
/// `UserNotFound` just like unknown ones.
pub(crate) async fn require_user(users: &dyn UsersRepository, user_id: &str) -> Result<User> {
    let id = Uuid::parse_str(user_id.trim())
        .map_err(|_| Error::UserNotFound(user_id.to_string()))?;

    users
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::UserNotFound(user_id.to_string()))
}
