use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::cookies::get_cookie_value;
use crate::auth::resolver::DynIdentityResolver;
use crate::auth::token::{TokenError, TokenService};
use crate::db::models::User;
use crate::db::StoreError;
use crate::error::AppError;

/// The authenticated caller, placed in request extensions by [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: String,
    pub user: User,
}

/// Why a request failed authentication. Only ever logged; clients get a bare 401.
#[derive(Debug, thiserror::Error)]
pub enum AuthRejection {
    #[error("no session cookie")]
    MissingToken,

    #[error("invalid session token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("session user no longer exists")]
    UnknownUser,

    #[error("identity lookup failed: {0}")]
    Store(#[from] StoreError),
}

/// Checks the session cookie on a request and resolves it to a user.
#[derive(Clone)]
pub struct SessionVerifier {
    tokens: Arc<TokenService>,
    resolver: DynIdentityResolver,
    cookie_name: String,
}

impl SessionVerifier {
    pub fn new(
        tokens: Arc<TokenService>,
        resolver: DynIdentityResolver,
        cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            tokens,
            resolver,
            cookie_name: cookie_name.into(),
        }
    }

    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<CurrentUser, AuthRejection> {
        let token =
            get_cookie_value(headers, &self.cookie_name).ok_or(AuthRejection::MissingToken)?;
        let claims = self.tokens.verify(token)?;

        let user = self
            .resolver
            .resolve(&claims.sub)
            .await?
            .ok_or(AuthRejection::UnknownUser)?;

        Ok(CurrentUser {
            user_id: claims.sub,
            user,
        })
    }
}

/// Middleware for protected routes.
pub async fn require_session(
    State(verifier): State<SessionVerifier>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match verifier.authenticate(request.headers()).await {
        Ok(current) => {
            request.extensions_mut().insert(current);
            Ok(next.run(request).await)
        }
        Err(AuthRejection::Store(e)) => Err(e.into()),
        Err(rejection) => {
            tracing::debug!(reason = %rejection, "rejecting unauthenticated request");
            Err(AppError::Unauthorized)
        }
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
