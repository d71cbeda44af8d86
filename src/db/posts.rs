// Content store: posts and the comments hanging off them
use std::collections::HashMap;

use rusqlite::{params, OptionalExtension, Row};

use crate::db::models::{Comment, Post, PostWithComments};
use crate::db::StoreError;
use crate::state::DbPool;

const POST_COLUMNS: &str = "id, title, content, user_id, created_at, updated_at";
const COMMENT_COLUMNS: &str = "id, content, user_id, post_id, created_at, updated_at";

#[derive(Clone)]
pub struct PostStore {
    pool: DbPool,
}

impl PostStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn create_post(&self, user_id: &str, title: &str, content: &str) -> Result<Post, StoreError> {
        let conn = self.pool.get()?;
        let id = uuid::Uuid::now_v7().to_string();
        conn.execute(
            "INSERT INTO posts (id, user_id, title, content) VALUES (?1, ?2, ?3, ?4)",
            params![id, user_id, title, content],
        )?;
        let post = conn.query_row(
            &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
            params![id],
            post_from_row,
        )?;
        Ok(post)
    }

    pub fn find_post(&self, id: &str) -> Result<Option<Post>, StoreError> {
        let conn = self.pool.get()?;
        let post = conn
            .query_row(
                &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
                params![id],
                post_from_row,
            )
            .optional()?;
        Ok(post)
    }

    /// Every post, oldest first, each carrying its comments.
    pub fn list_with_comments(&self) -> Result<Vec<PostWithComments>, StoreError> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at ASC, id ASC"
        ))?;
        let posts = stmt
            .query_map([], post_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments ORDER BY created_at ASC, id ASC"
        ))?;
        let mut by_post: HashMap<String, Vec<Comment>> = HashMap::new();
        for comment in stmt.query_map([], comment_from_row)? {
            let comment = comment?;
            by_post
                .entry(comment.post_id.clone())
                .or_default()
                .push(comment);
        }

        Ok(posts
            .into_iter()
            .map(|post| {
                let comments = by_post.remove(&post.id).unwrap_or_default();
                PostWithComments { post, comments }
            })
            .collect())
    }

    /// Removes the post; its comments go with it through the FK cascade.
    pub fn delete_post(&self, id: &str) -> Result<bool, StoreError> {
        let conn = self.pool.get()?;
        let rows = conn.execute("DELETE FROM posts WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    pub fn create_comment(
        &self,
        post_id: &str,
        user_id: &str,
        content: &str,
    ) -> Result<Comment, StoreError> {
        let conn = self.pool.get()?;
        let id = uuid::Uuid::now_v7().to_string();
        conn.execute(
            "INSERT INTO comments (id, post_id, user_id, content) VALUES (?1, ?2, ?3, ?4)",
            params![id, post_id, user_id, content],
        )?;
        let comment = conn.query_row(
            &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1"),
            params![id],
            comment_from_row,
        )?;
        Ok(comment)
    }

    pub fn find_comment(&self, id: &str) -> Result<Option<Comment>, StoreError> {
        let conn = self.pool.get()?;
        let comment = conn
            .query_row(
                &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1"),
                params![id],
                comment_from_row,
            )
            .optional()?;
        Ok(comment)
    }

    pub fn delete_comment(&self, id: &str) -> Result<bool, StoreError> {
        let conn = self.pool.get()?;
        let rows = conn.execute("DELETE FROM comments WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        user_id: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        content: row.get(1)?,
        user_id: row.get(2)?,
        post_id: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Role;
    use crate::db::users::{NewUser, UserStore};
    use crate::db;

    fn setup() -> (PostStore, String) {
        let pool = db::test_pool();
        let users = UserStore::new(pool.clone(), 4);
        let user = users
            .create_user(NewUser {
                username: Some("john"),
                email: "john@example.com",
                password: "pw",
                role: Role::User,
            })
            .unwrap();
        (PostStore::new(pool), user.id)
    }

    #[test]
    fn create_and_find_post() {
        let (store, uid) = setup();
        let post = store.create_post(&uid, "Eggs", "Easy").unwrap();
        assert_eq!(post.user_id, uid);

        let found = store.find_post(&post.id).unwrap().unwrap();
        assert_eq!(found.title, "Eggs");
        assert_eq!(found.content, "Easy");
        assert!(store.find_post("nope").unwrap().is_none());
    }

    #[test]
    fn list_nests_comments_under_their_post() {
        let (store, uid) = setup();
        let first = store.create_post(&uid, "first", "a").unwrap();
        let second = store.create_post(&uid, "second", "b").unwrap();
        store.create_comment(&first.id, &uid, "c1").unwrap();
        store.create_comment(&first.id, &uid, "c2").unwrap();

        let posts = store.list_with_comments().unwrap();
        assert_eq!(posts.len(), 2);

        let listed_first = posts.iter().find(|p| p.post.id == first.id).unwrap();
        let contents: Vec<_> = listed_first.comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["c1", "c2"]);

        let listed_second = posts.iter().find(|p| p.post.id == second.id).unwrap();
        assert!(listed_second.comments.is_empty());
    }

    #[test]
    fn deleting_a_post_removes_its_comments() {
        let (store, uid) = setup();
        let post = store.create_post(&uid, "t", "c").unwrap();
        let comment = store.create_comment(&post.id, &uid, "hello").unwrap();

        assert!(store.delete_post(&post.id).unwrap());
        assert!(store.find_post(&post.id).unwrap().is_none());
        assert!(store.find_comment(&comment.id).unwrap().is_none());
        assert!(!store.delete_post(&post.id).unwrap());
    }

    #[test]
    fn comment_on_missing_post_is_rejected_by_the_schema() {
        let (store, uid) = setup();
        let err = store.create_comment("missing-post", &uid, "hi").unwrap_err();
        assert!(matches!(err, StoreError::Sql(_)));
    }

    #[test]
    fn delete_comment_reports_whether_a_row_went_away() {
        let (store, uid) = setup();
        let post = store.create_post(&uid, "t", "c").unwrap();
        let comment = store.create_comment(&post.id, &uid, "hello").unwrap();
        assert!(store.delete_comment(&comment.id).unwrap());
        assert!(!store.delete_comment(&comment.id).unwrap());
    }
}
