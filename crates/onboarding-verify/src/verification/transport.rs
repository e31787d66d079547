use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

/// A GET request against one verification source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl SourceRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("unable to build http client: {0}")]
    Client(String),
    #[error("request failed: {0}")]
    Http(String),
    #[error("source responded with status {0}")]
    Status(u16),
    #[error("failed to decode source response: {0}")]
    Decode(String),
    #[error("source did not answer within {0:?}")]
    Timeout(Duration),
    #[error("no credential configured for {0}")]
    MissingCredential(&'static str),
}

/// JSON-over-HTTP boundary shared by the network-backed checks.
#[async_trait]
pub trait SourceTransport: Debug + Send + Sync {
    async fn get_json(&self, request: &SourceRequest) -> Result<Value, TransportError>;
}

/// Production transport. Every request carries the configured `User-Agent`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|err| TransportError::Client(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SourceTransport for HttpTransport {
    async fn get_json(&self, request: &SourceRequest) -> Result<Value, TransportError> {
        let response = self
            .client
            .get(&request.url)
            .query(&request.query)
            .send()
            .await
            .map_err(|err| TransportError::Http(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| TransportError::Decode(err.to_string()))
    }
}

/// Runs `request` with a bounded wait, folding expiry into [`TransportError::Timeout`].
pub(crate) async fn fetch_with_timeout(
    transport: &dyn SourceTransport,
    request: &SourceRequest,
    timeout: Duration,
) -> Result<Value, TransportError> {
    match tokio::time::timeout(timeout, transport.get_json(request)).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout(timeout)),
    }
}
