pub mod football_data_api;
pub mod odds_api;

use crate::error::FetchError;
use crate::utils::cache::{Clock, SystemClock, TtlCache};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a gateway call is fetching. Part of the cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    PlayedMatches,
    ScheduledFixtures,
    Standings,
    Odds,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::PlayedMatches => "played-matches",
            Resource::ScheduledFixtures => "scheduled-fixtures",
            Resource::Standings => "standings",
            Resource::Odds => "odds",
        };
        f.write_str(name)
    }
}

/// A single authenticated GET.
///
/// `query` holds the cacheable parameters; `secret_query` and `headers` carry
/// credentials and never take part in memoization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub secret_query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn secret_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.secret_query.push((key.to_string(), value.into()));
        self
    }

    pub fn header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.push((key.to_string(), value.into()));
        self
    }
}

/// Raw HTTP response: status plus body text
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Performs the network round-trip. Swapped for a stub in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: &ApiRequest) -> Result<TransportResponse, FetchError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: &ApiRequest) -> Result<TransportResponse, FetchError> {
        let mut builder = self
            .client
            .get(&request.url)
            .query(&request.query)
            .query(&request.secret_query);

        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.without_url().to_string()))?;

        Ok(TransportResponse { status, body })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    resource: Resource,
    url: String,
    params: Vec<(String, String)>,
}

/// Issues provider requests and memoizes successful JSON bodies for a fixed TTL.
///
/// Non-200 statuses, transport failures and non-JSON bodies come back as
/// [`FetchError`] and are never cached.
pub struct ApiGateway {
    transport: Arc<dyn Transport>,
    cache: Mutex<TtlCache<CacheKey, Value>>,
}

impl ApiGateway {
    pub fn new(transport: Arc<dyn Transport>, ttl: Duration) -> Self {
        Self::with_clock(transport, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(transport: Arc<dyn Transport>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            transport,
            cache: Mutex::new(TtlCache::new(ttl, clock)),
        }
    }

    pub async fn fetch(&self, resource: Resource, request: ApiRequest) -> Result<Value, FetchError> {
        let key = CacheKey {
            resource,
            url: request.url.clone(),
            params: request.query.clone(),
        };

        let cached = self.cache_lock().get(&key);
        if let Some(value) = cached {
            tracing::debug!(%resource, "cache hit");
            return Ok(value);
        }

        tracing::debug!(%resource, url = %request.url, "cache miss, fetching");

        let response = self.transport.get(&request).await.map_err(|e| {
            tracing::warn!(%resource, error = %e, "provider unreachable");
            e
        })?;

        if response.status != 200 {
            tracing::warn!(%resource, status = response.status, "provider returned non-200");
            return Err(FetchError::Status(response.status));
        }

        let value: Value = serde_json::from_str(&response.body).map_err(|e| {
            tracing::warn!(%resource, error = %e, "provider returned invalid JSON");
            FetchError::from(e)
        })?;

        self.cache_lock().insert(key, value.clone());
        Ok(value)
    }

    fn cache_lock(&self) -> std::sync::MutexGuard<'_, TtlCache<CacheKey, Value>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Builds the production gateway: reqwest transport with the configured timeout and TTL.
pub fn default_gateway(config: &crate::Config) -> Result<Arc<ApiGateway>, FetchError> {
    let transport = ReqwestTransport::new(config.http_timeout)?;
    Ok(Arc::new(ApiGateway::new(Arc::new(transport), config.cache_ttl)))
}
