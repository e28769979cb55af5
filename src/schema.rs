// ── Schema resolution ─────────────────────────────────────────────────────────
//
// The schema-aware variant needs its validation schema before the engine can
// be constructed: either the inline value from the configuration, or JSON
// fetched from a URL.  The network sits behind the `SchemaFetcher` trait so
// the resolver is testable without touching it; `HttpFetcher` is the shipped
// implementation.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{EditorError, Result};

// ── Fetch boundary ────────────────────────────────────────────────────────────

/// The network collaborator: fetch a URL and parse the body as JSON.
#[async_trait]
pub trait SchemaFetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<Value>;
}

/// `SchemaFetcher` backed by an HTTP client.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SchemaFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let fetch_err = |e: reqwest::Error| EditorError::SchemaFetch {
            url: url.to_owned(),
            message: e.to_string(),
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(fetch_err)?;
        let body = response.text().await.map_err(fetch_err)?;
        serde_json::from_str(&body).map_err(|e| EditorError::SchemaParse {
            url: url.to_owned(),
            source: e,
        })
    }
}

// ── Resolution ────────────────────────────────────────────────────────────────

/// Resolve the validation schema for one widget construction.
///
/// A non-empty `url` wins: the fetched value is used and `inline` is ignored
/// even when supplied — a URL implies the inline value is stale.  A fetch or
/// parse failure is fatal to the construction; there is no silent fallback.
/// With an empty `url`, `inline` is used verbatim, defaulting to the empty
/// object schema.
pub async fn resolve_schema(
    inline: Option<Value>,
    url: &str,
    fetcher: &dyn SchemaFetcher,
) -> Result<Value> {
    if !url.is_empty() {
        let schema = fetcher.fetch_json(url).await?;
        tracing::debug!(url, "schema fetched");
        return Ok(schema);
    }
    Ok(inline.unwrap_or_else(|| Value::Object(serde_json::Map::new())))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Fetcher returning a fixed value, recording the requested URL.
    struct StaticFetcher(Value);

    #[async_trait]
    impl SchemaFetcher for StaticFetcher {
        async fn fetch_json(&self, _url: &str) -> Result<Value> {
            Ok(self.0.clone())
        }
    }

    /// Fetcher that always fails at the transport level.
    struct FailingFetcher;

    #[async_trait]
    impl SchemaFetcher for FailingFetcher {
        async fn fetch_json(&self, url: &str) -> Result<Value> {
            Err(EditorError::SchemaFetch {
                url: url.to_owned(),
                message: "connection refused".to_owned(),
            })
        }
    }

    #[tokio::test]
    async fn url_wins_over_inline() {
        let fetcher = StaticFetcher(json!({"type": "array"}));
        let schema = resolve_schema(
            Some(json!({"type": "object"})),
            "https://x/schema.json",
            &fetcher,
        )
        .await
        .expect("resolves");
        assert_eq!(schema, json!({"type": "array"}));
    }

    #[tokio::test]
    async fn inline_is_used_when_url_is_empty() {
        let fetcher = FailingFetcher; // must never be consulted
        let schema = resolve_schema(Some(json!({"type": "object"})), "", &fetcher)
            .await
            .expect("resolves");
        assert_eq!(schema, json!({"type": "object"}));
    }

    #[tokio::test]
    async fn both_absent_defaults_to_the_empty_object() {
        let schema = resolve_schema(None, "", &FailingFetcher).await.expect("resolves");
        assert_eq!(schema, json!({}));
    }

    /// Once a URL was specified there is no fallback to the inline value.
    #[tokio::test]
    async fn fetch_failure_is_fatal_even_with_an_inline_schema() {
        let err = resolve_schema(
            Some(json!({"type": "object"})),
            "https://x/schema.json",
            &FailingFetcher,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EditorError::SchemaFetch { url, .. } if url == "https://x/schema.json"));
    }
}
