//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{ConnectInfo, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use std::net::SocketAddr;
use validator::Validate;

use crate::api::dto::shorten::{LinkResponse, ShortenRequest};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_identity;

/// Creates a short link for a long URL under a generated code.
///
/// # Endpoint
///
/// `POST /api/v1/shorten`
///
/// # Request Body
///
/// ```json
/// { "longUrl": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "id": 1,
///   "shortUrl": "Xk3_a9Qz",
///   "longUrl": "https://example.com/some/long/path",
///   "createdAt": "2025-01-01T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the body is malformed or the URL is invalid.
/// Returns 409 Conflict if both generated codes collide.
/// Returns 429 Too Many Requests if the client is over its rate.
/// Returns 503 Service Unavailable if the store cannot be reached.
pub async fn shorten_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let identity = client_identity(&headers, addr, state.behind_proxy);
    state.gateway.admit(&identity)?;

    let Json(payload) = payload?;
    payload.validate()?;

    let link = state.gateway.handle_create(&payload.long_url).await?;

    Ok((StatusCode::CREATED, Json(LinkResponse::from(link))))
}
