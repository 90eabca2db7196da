//! Sanity content API client.
//!
//! Sends GROQ queries to the dataset's HTTP query endpoint with `reqwest`.
//! Catalog reads are cached using `moka` (5-minute TTL).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use stride_core::ProductDocument;

use super::cache::{CacheKey, CacheValue};
use super::{CatalogError, CatalogSource, queries};
use crate::config::SanityConfig;

/// Envelope of a successful query response.
#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

/// Envelope of a failed query response.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    description: Option<String>,
}

// =============================================================================
// SanityClient
// =============================================================================

/// Client for the Sanity query API.
#[derive(Clone)]
pub struct SanityClient {
    inner: Arc<SanityClientInner>,
}

struct SanityClientInner {
    client: reqwest::Client,
    endpoint: String,
    token: Option<SecretString>,
    cache: Cache<CacheKey, CacheValue>,
}

impl SanityClient {
    /// Create a new query API client.
    #[must_use]
    pub fn new(config: &SanityConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(SanityClientInner {
                client: reqwest::Client::new(),
                endpoint: config.query_endpoint(),
                token: config.token.clone(),
                cache,
            }),
        }
    }

    /// Build the request URL for `query` with `$name` parameters.
    ///
    /// Parameter values are JSON-encoded, as the query API expects.
    fn query_url(&self, query: &str, params: &[(&str, &str)]) -> Result<Url, CatalogError> {
        let mut url = Url::parse(&self.inner.endpoint).map_err(|e| CatalogError::Api {
            status: 0,
            message: format!("invalid endpoint: {e}"),
        })?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query);
            for (name, value) in params {
                pairs.append_pair(&format!("${name}"), &serde_json::to_string(value)?);
            }
        }

        Ok(url)
    }

    /// Execute a GROQ query and return its `result`.
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let url = self.query_url(query, params)?;

        let mut request = self.inner.client.get(url);
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&response_text)
                .ok()
                .and_then(|e| e.error.description)
                .unwrap_or_else(|| response_text.chars().take(200).collect());
            tracing::error!(
                status = %status,
                message = %message,
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        match serde_json::from_str::<QueryResponse<T>>(&response_text) {
            Ok(parsed) => Ok(parsed.result),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse catalog query response"
                );
                Err(CatalogError::Parse(e))
            }
        }
    }
}

#[async_trait]
impl CatalogSource for SanityClient {
    #[instrument(skip(self))]
    async fn products(&self) -> Result<Vec<ProductDocument>, CatalogError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products.as_ref().clone());
        }

        let products: Vec<ProductDocument> = self.execute(&queries::all_products(), &[]).await?;
        debug!(count = products.len(), "Fetched products");

        self.inner
            .cache
            .insert(
                CacheKey::Products,
                CacheValue::Products(Arc::new(products.clone())),
            )
            .await;

        Ok(products)
    }

    #[instrument(skip(self), fields(slug = %slug))]
    async fn product_by_slug(&self, slug: &str) -> Result<Option<ProductDocument>, CatalogError> {
        let cache_key = CacheKey::Product(slug.to_string());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(product.map(|p| *p));
        }

        let product: Option<ProductDocument> = self
            .execute(&queries::product_by_slug(), &[("slug", slug)])
            .await?;

        self.inner
            .cache
            .insert(
                cache_key,
                CacheValue::Product(product.clone().map(Box::new)),
            )
            .await;

        Ok(product)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> SanityClient {
        SanityClient::new(&SanityConfig {
            project_id: "abc123".to_string(),
            dataset: "production".to_string(),
            api_version: "2021-08-31".to_string(),
            use_cdn: false,
            token: None,
        })
    }

    #[test]
    fn test_query_url_encodes_query_and_params() {
        let url = client()
            .query_url(&queries::product_by_slug(), &[("slug", "air-max-90")])
            .unwrap();

        assert_eq!(url.host_str(), Some("abc123.api.sanity.io"));
        assert_eq!(url.path(), "/v2021-08-31/data/query/production");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0].0, "query");
        assert!(pairs[0].1.contains("slug.current == $slug"));
        assert_eq!(pairs[1], ("$slug".to_string(), "\"air-max-90\"".to_string()));
    }

    #[test]
    fn test_query_url_escapes_hostile_slug() {
        let url = client()
            .query_url(&queries::product_by_slug(), &[("slug", "x\"] | *[true")])
            .unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[1].1, r#""x\"] | *[true""#);
    }

    #[test]
    fn test_query_response_envelope() {
        let body = r#"{"ms": 4, "query": "*", "result": [{"_id": "a", "productName": "Tee"}]}"#;
        let parsed: QueryResponse<Vec<ProductDocument>> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.result.len(), 1);
        assert_eq!(parsed.result[0].product_name.as_deref(), Some("Tee"));
    }

    #[test]
    fn test_single_result_may_be_null() {
        let body = r#"{"result": null}"#;
        let parsed: QueryResponse<Option<ProductDocument>> = serde_json::from_str(body).unwrap();
        assert!(parsed.result.is_none());
    }
}
