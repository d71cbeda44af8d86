//! Forum backend: accounts, posts and comments behind signed cookie sessions.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod seed;
pub mod state;
