use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Health;

use crate::state::ServerState;

pub mod auth;
pub mod moderator;
pub mod posts;
pub mod search;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router: open, token-protected and moderator routes
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let moderator_routes = Router::new()
        .route("/moderator/users", get(moderator::list_users))
        .route("/moderator/posts", get(moderator::list_posts))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            moderator::require_moderator,
        ));

    // Token checks for the remaining routes happen in the `CurrentUser` extractor.
    Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/posts", get(posts::list).post(posts::create))
        .route("/posts/:id", get(posts::get).put(posts::update).delete(posts::delete))
        .route("/posts/:id/upvote", post(posts::upvote))
        .route("/posts/:id/downvote", post(posts::downvote))
        .route("/posts/:id/comments", post(posts::add_comment))
        .route("/search", get(search::search))
        .merge(moderator_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::DEBUG),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
