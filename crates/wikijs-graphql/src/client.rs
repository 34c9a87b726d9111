//! reqwest-backed GraphQL client.

use crate::retry::{RetryDecision, RetryPolicy};
use crate::transport::{GraphqlTransport, RequestOptions, decode_data, is_mutation};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use uuid::Uuid;
use wikijs_core::{
    GraphqlErrorPayload, HttpConfig, WikiError, classify_graphql_error, classify_http_status,
};

/// Header carrying the request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Generate a fresh correlation id.
pub fn new_request_id() -> String {
    format!("req_{}", Uuid::new_v4().simple())
}

/// GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphqlEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlErrorPayload>>,
}

impl GraphqlEnvelope {
    fn into_data(self) -> Result<Value, WikiError> {
        if let Some(first) = self.errors.as_ref().and_then(|errors| errors.first()) {
            return Err(classify_graphql_error(first));
        }
        match self.data {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(WikiError::generic("Wiki.js returned no data.")),
        }
    }
}

/// Client for the Wiki.js GraphQL endpoint.
pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: String,
    api_token: SecretString,
    config: HttpConfig,
    retry: RetryPolicy,
}

impl GraphqlClient {
    /// Create a client for `endpoint`, authenticating with `api_token`.
    pub fn new(
        endpoint: impl Into<String>,
        api_token: SecretString,
        config: HttpConfig,
    ) -> Result<Self, WikiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("wikijs-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WikiError::generic(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_token,
            config,
            retry: RetryPolicy::default(),
        })
    }

    /// Set the backoff policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Execute a document and decode its `data` into `T`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
        options: RequestOptions,
    ) -> Result<T, WikiError> {
        let data = self.send_with_retry(query, variables, options).await?;
        decode_data(data)
    }

    async fn send_with_retry(
        &self,
        query: &str,
        variables: Value,
        options: RequestOptions,
    ) -> Result<Value, WikiError> {
        let request_id = options.request_id.unwrap_or_else(new_request_id);
        let timeout_ms = options.timeout_ms.unwrap_or(self.config.timeout_ms).max(1);
        let mutation = is_mutation(query);
        let max_retries = if options.no_retry || mutation {
            0
        } else {
            self.config.max_retries
        };
        let body = json!({ "query": query, "variables": variables });

        let mut attempt = 0;
        loop {
            let err = match self.send_once(&body, &request_id, timeout_ms).await {
                Ok(data) => return Ok(data),
                Err(err) => err,
            };

            match self.retry.decide(&err, attempt, max_retries) {
                RetryDecision::RetryAfter(delay) => {
                    tracing::debug!(
                        request_id = %request_id,
                        attempt,
                        kind = %err.kind,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying GraphQL request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                RetryDecision::DoNotRetry => {
                    tracing::warn!(
                        request_id = %request_id,
                        attempts = attempt + 1,
                        mutation,
                        kind = %err.kind,
                        status = ?err.status,
                        "GraphQL request failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    async fn send_once(
        &self,
        body: &Value,
        request_id: &str,
        timeout_ms: u64,
    ) -> Result<Value, WikiError> {
        match tokio::time::timeout(Duration::from_millis(timeout_ms), self.post(body, request_id))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(WikiError::timed_out(timeout_ms, request_id)),
        }
    }

    async fn post(&self, body: &Value, request_id: &str) -> Result<Value, WikiError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.api_token.expose_secret())
            .header(REQUEST_ID_HEADER, request_id)
            .json(body)
            .send()
            .await
            .map_err(|e| classify_network_error(&e, request_id))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify_network_error(&e, request_id))?;

        if !status.is_success() {
            return Err(classify_http_status(
                status.as_u16(),
                &String::from_utf8_lossy(&bytes),
            ));
        }

        let envelope: GraphqlEnvelope = serde_json::from_slice(&bytes).map_err(|e| {
            WikiError::generic(format!("Wiki.js returned an invalid JSON response: {}", e))
        })?;
        envelope.into_data()
    }
}

#[async_trait]
impl GraphqlTransport for GraphqlClient {
    async fn execute_raw(
        &self,
        query: &str,
        variables: Value,
        options: RequestOptions,
    ) -> Result<Value, WikiError> {
        self.send_with_retry(query, variables, options).await
    }
}

/// Network-level failures are retryable; anything else is generic.
///
/// A connection the server drops after accepting the request surfaces as a
/// request or body error rather than a connect error.
fn classify_network_error(error: &reqwest::Error, request_id: &str) -> WikiError {
    if error.is_connect() || error.is_timeout() {
        WikiError::transient(
            format!("Could not reach Wiki.js ({}): connection failed", request_id),
            None,
        )
    } else if error.is_request() || error.is_body() {
        WikiError::transient(
            format!(
                "Connection to Wiki.js was interrupted ({}): no complete response received",
                request_id
            ),
            None,
        )
    } else {
        WikiError::generic(format!("Request to Wiki.js failed ({}): {}", request_id, error))
    }
}
