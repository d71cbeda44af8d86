use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::auth::{SessionVerifier, TokenService};
use crate::config::Config;
use crate::db::{PostStore, UserStore};

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: UserStore,
    pub posts: PostStore,
    pub tokens: Arc<TokenService>,
    pub sessions: SessionVerifier,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        let users = UserStore::new(db.clone(), config.auth.bcrypt_cost);
        let posts = PostStore::new(db);
        let tokens = Arc::new(TokenService::new(
            config.signing_secret().as_bytes(),
            chrono::Duration::minutes(config.auth.token_ttl_minutes),
        ));
        let sessions = SessionVerifier::new(
            tokens.clone(),
            Arc::new(users.clone()),
            config.auth.cookie_name.clone(),
        );

        Self {
            config,
            users,
            posts,
            tokens,
            sessions,
        }
    }
}
