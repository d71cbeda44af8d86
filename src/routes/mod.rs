pub mod auth;
pub mod posts;
pub mod users;

use axum::middleware::from_fn_with_state;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_session;
use crate::state::AppState;

/// The complete HTTP surface. Content routes sit behind the session layer.
pub fn app(state: AppState) -> Router {
    let protected = posts::router().route_layer(from_fn_with_state(
        state.sessions.clone(),
        require_session,
    ));

    Router::new()
        .merge(users::router())
        .merge(auth::router())
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
