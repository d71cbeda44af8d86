use std::sync::Arc;

use async_trait::async_trait;

use crate::db::models::User;
use crate::db::{StoreError, UserStore};

/// Maps a user id taken from a verified session token back to a user record.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, user_id: &str) -> Result<Option<User>, StoreError>;
}

pub type DynIdentityResolver = Arc<dyn IdentityResolver>;

#[async_trait]
impl IdentityResolver for UserStore {
    async fn resolve(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        self.find_by_id(user_id)
    }
}
