//! Listing query parameters.

use serde::Deserialize;
use serde_with::{DefaultOnError, DisplayFromStr, serde_as};

use crate::application::services::gateway::MAX_PAGE_SIZE;

/// `?skip=&limit=` query parameters.
///
/// Values that do not parse as integers are treated as absent rather than
/// rejected, so `?limit=abc` behaves like no limit at all.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub skip: Option<i64>,

    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub limit: Option<i64>,
}

impl ListParams {
    /// Raw `(skip, limit)` with defaults applied. Range clamping happens in the gateway.
    pub fn window(&self) -> (i64, i64) {
        (self.skip.unwrap_or(0), self.limit.unwrap_or(MAX_PAGE_SIZE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;

    fn parse(query: &str) -> ListParams {
        let uri: Uri = format!("/api/v1?{query}").parse().unwrap();
        Query::<ListParams>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn test_defaults() {
        assert_eq!(parse("").window(), (0, 10));
    }

    #[test]
    fn test_explicit_values() {
        assert_eq!(parse("skip=20&limit=5").window(), (20, 5));
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        assert_eq!(parse("skip=abc&limit=").window(), (0, 10));
    }

    #[test]
    fn test_negative_values_pass_through() {
        assert_eq!(parse("skip=-3&limit=-1").window(), (-3, -1));
    }
}
