use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use crate::auth::cookies::{clear_session_cookie, session_cookie};
use crate::auth::password;
use crate::db::models::Role;
use crate::db::users::NewUser;
use crate::error::{AppError, AppResult};
use crate::extractors::JsonBody;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// -- Request types --

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub verified_password: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/register", post(register))
}

/// Present and non-empty.
fn required(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

/// POST /login — check credentials and hand out a session cookie
async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> AppResult<Response> {
    let (Some(email), Some(plaintext)) = (required(req.email), required(req.password)) else {
        return Err(AppError::InvalidCredentials("Missing email or password"));
    };

    let users = state.users.clone();
    let user = tokio::task::spawn_blocking(move || -> AppResult<_> {
        let Some(user) = users.find_by_email(&email)? else {
            tracing::debug!("login for unknown email");
            return Err(AppError::InvalidCredentials(INVALID_CREDENTIALS));
        };
        if !password::verify_password(&plaintext, &user.password_hash) {
            tracing::debug!(user = %user.id, "login with wrong password");
            return Err(AppError::InvalidCredentials(INVALID_CREDENTIALS));
        }
        Ok(user)
    })
    .await
    .map_err(|e| AppError::Internal(format!("login task failed: {e}")))??;

    let token = state.tokens.issue(&user.id)?;
    tracing::info!(user = %user.id, "user logged in");

    Ok((
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            session_cookie(&state.config.auth.cookie_name, &token),
        )],
        Json(serde_json::json!({ "message": "Login successful" })),
    )
        .into_response())
}

/// POST /logout — drop the session cookie. Tokens are stateless so nothing else to do.
async fn logout(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            clear_session_cookie(&state.config.auth.cookie_name),
        )],
        Json(serde_json::json!({ "message": "Logout successful" })),
    )
        .into_response()
}

/// POST /register — create a regular user
async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> AppResult<Response> {
    let (Some(email), Some(plaintext), Some(verified)) = (
        required(req.email),
        required(req.password),
        required(req.verified_password),
    ) else {
        return Err(AppError::BadRequest(
            "Email, password and verifiedPassword are required".into(),
        ));
    };

    if plaintext != verified {
        return Err(AppError::BadRequest("Passwords do not match".into()));
    }

    let users = state.users.clone();
    let username = required(req.username);
    let user = tokio::task::spawn_blocking(move || {
        users.create_user(NewUser {
            username: username.as_deref(),
            email: &email,
            password: &plaintext,
            role: Role::User,
        })
    })
    .await
    .map_err(|e| AppError::Internal(format!("register task failed: {e}")))??;

    tracing::info!(user = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "User registered successfully",
            "userId": user.id,
        })),
    )
        .into_response())
}
