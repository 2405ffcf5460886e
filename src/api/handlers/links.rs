//! Handler for link listing.

use axum::{
    Json,
    extract::{ConnectInfo, Query, State},
    http::HeaderMap,
};
use std::net::SocketAddr;

use crate::api::dto::pagination::ListParams;
use crate::api::dto::shorten::LinkResponse;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_identity;

/// Lists stored links.
///
/// # Endpoint
///
/// `GET /api/v1?skip=0&limit=10`
///
/// A negative `skip` is treated as 0. A `limit` outside `1..=10`, missing, or
/// unparseable is treated as 10.
///
/// # Errors
///
/// Returns 429 Too Many Requests if the client is over its rate.
/// Returns 503 Service Unavailable if the store cannot be reached.
pub async fn list_links_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let identity = client_identity(&headers, addr, state.behind_proxy);
    state.gateway.admit(&identity)?;

    let (skip, limit) = params.window();
    let links = state.gateway.handle_list(skip, limit).await?;

    Ok(Json(links.into_iter().map(LinkResponse::from).collect()))
}
