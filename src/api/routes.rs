//! API route configuration.
//!
//! Every route here is admission-controlled per client identity inside its
//! handler.

use crate::api::handlers::{list_links_handler, resolve_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes mounted under `/api/v1`.
///
/// # Endpoints
///
/// - `GET  /`             - List links (`?skip=&limit=`)
/// - `POST /shorten`      - Create a short link
/// - `GET  /{short_url}`  - Resolve a short code to its long URL
///
/// `/shorten` is a static segment, so it is never resolved as a short code.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_links_handler))
        .route("/shorten", post(shorten_handler))
        .route("/{short_url}", get(resolve_handler))
}
