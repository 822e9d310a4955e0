//! HTTP client for the Ollama-compatible API
//!
//! Listings come from `/tags`, with `/list` as a fallback for older servers.
//! Individual listing entries that fail to decode are skipped with a warning;
//! one bad row must not take down the whole batch.

use std::time::Duration;

use serde::Deserialize;

use llmtop_core::model::{EntityHints, RawEntity};
use llmtop_core::source::FetchError;

/// Digests are long content hashes; only a short prefix is shown anywhere.
const DIGEST_PREFIX: usize = 12;

pub struct OllamaClient {
    http: reqwest::Client,
    base: String,
}

impl OllamaClient {
    /// Build a client for the given API base URL. This is the one fallible
    /// construction step in the whole pipeline; everything after it degrades
    /// instead of failing.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, String> {
        let base = base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base).map_err(|e| format!("invalid backend URL '{}': {}", base, e))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("failed to build HTTP client: {}", e))?;

        Ok(Self { http, base })
    }

    /// Fetch the model listing. `/tags` is the current endpoint; `/list`
    /// exists on older servers. The first error is the one reported when
    /// both fail.
    pub async fn fetch_models(&self) -> Result<Vec<RawEntity>, FetchError> {
        match self.fetch_listing("tags").await {
            Ok(entities) => Ok(entities),
            Err(primary) => {
                tracing::debug!("tags endpoint failed ({}), falling back to list", primary);
                match self.fetch_listing("list").await {
                    Ok(entities) => Ok(entities),
                    Err(_) => Err(primary),
                }
            }
        }
    }

    async fn fetch_listing(&self, endpoint: &str) -> Result<Vec<RawEntity>, FetchError> {
        let url = format!("{}/{}", self.base, endpoint);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::transient(format!("GET {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(FetchError::transient(format!(
                "GET {} returned HTTP {}",
                url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transient(format!("reading {} body: {}", url, e)))?;
        parse_listing(&body)
    }

    /// Fetch raw log lines for one model. A missing logs endpoint or a
    /// model without logs is an empty result, not an error.
    pub async fn fetch_logs(&self, id: &str) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/show/{}/logs", self.base, id);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::transient(format!("GET {}: {}", url, e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(FetchError::transient(format!(
                "GET {} returned HTTP {}",
                url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transient(format!("reading {} body: {}", url, e)))?;
        parse_logs(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ListingBody {
    #[serde(default)]
    models: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ListingEntry {
    name: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    digest: String,
    #[serde(default)]
    modified_at: String,
    #[serde(default)]
    details: Option<EntryDetails>,
}

#[derive(Debug, Deserialize)]
struct EntryDetails {
    #[serde(default)]
    family: Option<String>,
    #[serde(default)]
    parameter_size: Option<String>,
    #[serde(default)]
    quantization_level: Option<String>,
    #[serde(default)]
    format: Option<String>,
}

/// Decode a listing response body. The envelope must parse; entries decode
/// one by one so a malformed row is dropped while the rest survive. A body
/// without a `models` key is an empty listing.
fn parse_listing(body: &str) -> Result<Vec<RawEntity>, FetchError> {
    let listing: ListingBody = serde_json::from_str(body)
        .map_err(|e| FetchError::malformed(format!("listing response: {}", e)))?;

    let mut entities = Vec::with_capacity(listing.models.len());
    for value in listing.models {
        match serde_json::from_value::<ListingEntry>(value) {
            Ok(entry) => entities.push(entry_to_entity(entry)),
            Err(e) => {
                tracing::warn!("skipping malformed model entry: {}", e);
            }
        }
    }
    Ok(entities)
}

fn entry_to_entity(entry: ListingEntry) -> RawEntity {
    let digest = entry.digest.chars().take(DIGEST_PREFIX).collect();
    let hints = entry.details.map(|d| EntityHints {
        family: d.family,
        parameter_scale: d.parameter_size,
        quantization: d.quantization_level,
        format: d.format,
    });

    RawEntity {
        name: entry.name,
        size_bytes: entry.size,
        digest,
        modified_at: entry.modified_at,
        hints,
    }
}

#[derive(Debug, Deserialize)]
struct LogsBody {
    #[serde(default)]
    logs: Vec<String>,
}

fn parse_logs(body: &str) -> Result<Vec<String>, FetchError> {
    let parsed: LogsBody = serde_json::from_str(body)
        .map_err(|e| FetchError::malformed(format!("logs response: {}", e)))?;
    Ok(parsed.logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing_with_details() {
        let body = r#"{
            "models": [
                {
                    "name": "llama3:8b",
                    "size": 4700000000,
                    "digest": "abc123def456789000aa",
                    "modified_at": "2024-01-15T10:30:00Z",
                    "details": {
                        "family": "llama",
                        "parameter_size": "8.0B",
                        "quantization_level": "Q4_0",
                        "format": "gguf"
                    }
                }
            ]
        }"#;

        let entities = parse_listing(body).unwrap();
        assert_eq!(entities.len(), 1);
        let entity = &entities[0];
        assert_eq!(entity.name, "llama3:8b");
        assert_eq!(entity.size_bytes, 4_700_000_000);
        assert_eq!(entity.digest, "abc123def456");
        let hints = entity.hints.as_ref().unwrap();
        assert_eq!(hints.family.as_deref(), Some("llama"));
        assert_eq!(hints.parameter_scale.as_deref(), Some("8.0B"));
        assert_eq!(hints.quantization.as_deref(), Some("Q4_0"));
    }

    #[test]
    fn test_malformed_entry_is_skipped_not_fatal() {
        let body = r#"{
            "models": [
                {"size": 12, "digest": "nameless"},
                {"name": "phi3:mini", "size": 2300000000}
            ]
        }"#;

        let entities = parse_listing(body).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].name, "phi3:mini");
        assert!(entities[0].hints.is_none());
    }

    #[test]
    fn test_missing_models_key_is_empty_listing() {
        let entities = parse_listing("{}").unwrap();
        assert!(entities.is_empty());
    }

    #[test]
    fn test_unparseable_body_is_malformed() {
        let err = parse_listing("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, FetchError::Malformed { .. }));
    }

    #[test]
    fn test_entry_defaults_for_absent_fields() {
        let body = r#"{"models": [{"name": "custom-net-v2"}]}"#;
        let entities = parse_listing(body).unwrap();
        assert_eq!(entities[0].name, "custom-net-v2");
        assert_eq!(entities[0].size_bytes, 0);
        assert_eq!(entities[0].digest, "");
        assert_eq!(entities[0].modified_at, "");
    }

    #[test]
    fn test_parse_logs_and_missing_field() {
        let lines = parse_logs(r#"{"logs": ["line one", "line two"]}"#).unwrap();
        assert_eq!(lines, vec!["line one", "line two"]);

        let empty = parse_logs("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_client_rejects_garbage_url() {
        assert!(OllamaClient::new("not a url", Duration::from_secs(5)).is_err());
        assert!(OllamaClient::new("http://localhost:11434/api/", Duration::from_secs(5)).is_ok());
    }
}
