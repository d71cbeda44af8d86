// Credential store: user rows plus the hashing boundary for passwords
use rusqlite::{params, OptionalExtension, Row};

use crate::auth::password;
use crate::db::models::{Role, User};
use crate::db::StoreError;
use crate::state::DbPool;

const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at, updated_at";

pub struct NewUser<'a> {
    pub username: Option<&'a str>,
    pub email: &'a str,
    pub password: &'a str,
    pub role: Role,
}

#[derive(Clone)]
pub struct UserStore {
    pool: DbPool,
    bcrypt_cost: u32,
}

impl UserStore {
    pub fn new(pool: DbPool, bcrypt_cost: u32) -> Self {
        Self { pool, bcrypt_cost }
    }

    /// Insert a user. The clear secret is hashed here and nowhere else.
    pub fn create_user(&self, new: NewUser<'_>) -> Result<User, StoreError> {
        let email = new.email.trim();
        if email.is_empty() {
            return Err(StoreError::Validation("Email is required".into()));
        }
        if new.password.is_empty() {
            return Err(StoreError::Validation("Password is required".into()));
        }

        let conn = self.pool.get()?;
        let taken: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM users WHERE email = ?1 COLLATE NOCASE",
            params![email],
            |row| row.get(0),
        )?;
        if taken {
            return Err(StoreError::Validation("Email is already registered".into()));
        }

        let hash = password::hash_password(new.password, self.bcrypt_cost)?;
        let id = uuid::Uuid::now_v7().to_string();

        conn.execute(
            "INSERT INTO users (id, username, email, password_hash, role) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, new.username, email, hash, new.role],
        )?;

        let user = conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            user_from_row,
        )?;
        Ok(user)
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let conn = self.pool.get()?;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1 COLLATE NOCASE"),
                params![email.trim()],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let conn = self.pool.get()?;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn list(&self) -> Result<Vec<User>, StoreError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC, id ASC"
        ))?;
        let users = stmt
            .query_map([], user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    pub fn count(&self) -> Result<i64, StoreError> {
        let conn = self.pool.get()?;
        let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn store() -> UserStore {
        UserStore::new(db::test_pool(), 4)
    }

    fn alice<'a>() -> NewUser<'a> {
        NewUser {
            username: Some("alice"),
            email: "alice@example.com",
            password: "hunter2",
            role: Role::User,
        }
    }

    #[test]
    fn create_user_stores_a_hash_not_the_secret() {
        let store = store();
        let created = store.create_user(alice()).unwrap();
        assert_eq!(created.role, Role::User);
        assert_ne!(created.password_hash, "hunter2");
        assert!(password::verify_password("hunter2", &created.password_hash));

        let found = store.find_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_ne!(found.password_hash, "hunter2");
        assert_eq!(found.password_hash, created.password_hash);
    }

    #[test]
    fn find_by_id_resolves_created_user() {
        let store = store();
        let created = store.create_user(alice()).unwrap();
        let found = store.find_by_id(&created.id).unwrap().unwrap();
        assert_eq!(found.email, "alice@example.com");
        assert_eq!(found.username.as_deref(), Some("alice"));
        assert!(store.find_by_id("missing").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_a_validation_error() {
        let store = store();
        store.create_user(alice()).unwrap();
        let err = store.create_user(alice()).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn email_is_matched_without_regard_to_case() {
        let store = store();
        let created = store.create_user(alice()).unwrap();

        let err = store
            .create_user(NewUser {
                email: "Alice@Example.COM",
                ..alice()
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.count().unwrap(), 1);

        let found = store.find_by_email("ALICE@example.com").unwrap().unwrap();
        assert_eq!(found.id, created.id);
    }

    #[test]
    fn empty_fields_are_rejected() {
        let store = store();
        let err = store
            .create_user(NewUser {
                username: None,
                email: "  ",
                password: "pw",
                role: Role::User,
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = store
            .create_user(NewUser {
                username: None,
                email: "a@x.com",
                password: "",
                role: Role::User,
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn list_returns_admins_with_their_role() {
        let store = store();
        store.create_user(alice()).unwrap();
        store
            .create_user(NewUser {
                username: Some("root"),
                email: "root@example.com",
                password: "pw",
                role: Role::Admin,
            })
            .unwrap();

        let users = store.list().unwrap();
        assert_eq!(users.len(), 2);
        assert!(users
            .iter()
            .any(|u| u.email == "root@example.com" && u.role == Role::Admin));
    }
}
