//! DTOs for link creation and listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortLink;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten.
    #[serde(rename = "longUrl")]
    #[validate(
        url(message = "Invalid URL format"),
        length(max = 2048, message = "URL is too long")
    )]
    pub long_url: String,
}

/// A stored link as returned by creation and listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: i64,
    pub short_url: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<ShortLink> for LinkResponse {
    fn from(link: ShortLink) -> Self {
        Self {
            id: link.id,
            short_url: link.code,
            long_url: link.long_url,
            created_at: link.created_at,
        }
    }
}
