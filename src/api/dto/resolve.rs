use serde::Serialize;

/// Body of a successful resolution.
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    #[serde(rename = "longUrl")]
    pub long_url: String,
}
