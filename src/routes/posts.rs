use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::auth::{ensure_can_mutate, CurrentUser};
use crate::error::{AppError, AppResult};
use crate::extractors::JsonBody;
use crate::state::AppState;

// --- Request bodies ---

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CreateCommentRequest {
    pub content: Option<String>,
}

// --- Router ---

/// Routes that need a session. The caller wraps these in the session layer.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/post", post(create_post))
        .route("/post/{post_id}", delete(delete_post))
        // POST takes a post id, DELETE a comment id
        .route("/comment/{id}", post(create_comment).delete(delete_comment))
}

// --- Handlers ---

async fn list_posts(State(state): State<AppState>) -> AppResult<Response> {
    let posts = state.posts.list_with_comments()?;
    Ok(Json(serde_json::json!({ "posts": posts })).into_response())
}

async fn create_post(
    State(state): State<AppState>,
    current: CurrentUser,
    JsonBody(req): JsonBody<CreatePostRequest>,
) -> AppResult<Response> {
    let (Some(title), Some(content)) = (
        req.title.filter(|s| !s.is_empty()),
        req.content.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::BadRequest("Title and content are required".into()));
    };

    let post = state.posts.create_post(&current.user_id, &title, &content)?;
    tracing::info!(post = %post.id, user = %current.user_id, "post created");

    Ok((StatusCode::CREATED, Json(post)).into_response())
}

async fn create_comment(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(post_id): Path<String>,
    JsonBody(req): JsonBody<CreateCommentRequest>,
) -> AppResult<Response> {
    let Some(content) = req.content.filter(|s| !s.is_empty()) else {
        return Err(AppError::BadRequest("Content is required".into()));
    };

    if state.posts.find_post(&post_id)?.is_none() {
        return Err(AppError::NotFound("Post not found"));
    }

    let comment = state
        .posts
        .create_comment(&post_id, &current.user_id, &content)?;

    Ok((StatusCode::CREATED, Json(comment)).into_response())
}

async fn delete_post(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(post_id): Path<String>,
) -> AppResult<StatusCode> {
    let post = state
        .posts
        .find_post(&post_id)?
        .ok_or(AppError::NotFound("Post not found"))?;

    ensure_can_mutate(&current.user, &post.user_id)?;

    state.posts.delete_post(&post.id)?;
    tracing::info!(post = %post.id, by = %current.user_id, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_comment(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(comment_id): Path<String>,
) -> AppResult<StatusCode> {
    let comment = state
        .posts
        .find_comment(&comment_id)?
        .ok_or(AppError::NotFound("Comment not found"))?;

    ensure_can_mutate(&current.user, &comment.user_id)?;

    state.posts.delete_comment(&comment.id)?;
    tracing::info!(comment = %comment.id, by = %current.user_id, "comment deleted");
    Ok(StatusCode::NO_CONTENT)
}
