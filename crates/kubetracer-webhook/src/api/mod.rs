use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub(crate) mod api_error;
pub(crate) mod handlers;
pub(crate) mod state;

use handlers::{mutate_handler, readiness_handler};
use state::ApiServerState;

/// UPDATE reviews carry both `object` and `oldObject`, each one can be
/// as big as the object size limit of the API server (~1.5 MiB).
pub(crate) const MAX_REVIEW_BODY_SIZE: usize = 7 * 1024 * 1024;

pub(crate) fn router(state: Arc<ApiServerState>) -> Router {
    Router::new()
        .route("/mutate", post(mutate_handler))
        .route("/readiness", get(readiness_handler))
        .layer(DefaultBodyLimit::max(MAX_REVIEW_BODY_SIZE))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
