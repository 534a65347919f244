//! Show user profile service

use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::UserProfile;
use crate::ports::UsersRepository;

use super::lookup::require_user;

pub struct ShowUserProfileService {
    users: Arc<dyn UsersRepository>,
}

impl ShowUserProfileService {
    pub fn new(users: Arc<dyn UsersRepository>) -> Self {
        Self { users }
    }

    pub async fn execute(&self, user_id: &str) -> Result<UserProfile> {
        let user = require_user(self.users.as_ref(), user_id).await?;
        Ok(user.profile())
    }
}
