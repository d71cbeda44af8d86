use crate::db::models::{Role, User};
use crate::error::AppError;

/// Owner-or-admin: may `actor` change or delete something owned by `owner_id`?
pub fn can_mutate(actor: &User, owner_id: &str) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::User => actor.id == owner_id,
    }
}

/// Callers must already have confirmed the resource exists.
pub fn ensure_can_mutate(actor: &User, owner_id: &str) -> Result<(), AppError> {
    if can_mutate(actor, owner_id) {
        Ok(())
    } else {
        tracing::debug!(actor = %actor.id, owner = %owner_id, "mutation denied");
        Err(AppError::Forbidden)
    }
}
