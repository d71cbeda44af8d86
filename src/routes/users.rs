use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};

use crate::db::models::User;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/profile/{userid}", get(profile))
        .route("/date", get(date))
}

async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.users.list()?))
}

async fn profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<User>> {
    state
        .users
        .find_by_id(&user_id)?
        .map(Json)
        .ok_or(AppError::NotFound("User not found"))
}

/// Current server time, ISO 8601 with millisecond precision.
async fn date() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
