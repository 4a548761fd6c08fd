//! GraphQL transport and query cache.
//!
//! The transport is a trait so tests can substitute a mock; the production
//! implementation POSTs JSON to a single GraphQL endpoint with the session's
//! access token as a bearer credential.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::ClientError;
use crate::session::Session;

/// How a read should balance cached data against the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPolicy {
    /// Always revalidate over the network; serve the cached page only when
    /// the network read fails.
    CacheAndNetwork,
    /// Bypass the cache entirely. Used for post-mutation refetches.
    NetworkOnly,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

/// The standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphqlError>>,
}

impl GraphqlResponse {
    /// First server-reported error message, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.errors
            .as_deref()
            .and_then(|errors| errors.first())
            .map(|e| e.message.as_str())
    }
}

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

/// Executes GraphQL documents against the boards platform.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn execute(
        &self,
        session: &Session,
        query: &'static str,
        variables: Value,
    ) -> Result<GraphqlResponse, ClientError>;
}

/// Production transport over HTTP.
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl GraphqlTransport for HttpTransport {
    async fn execute(
        &self,
        session: &Session,
        query: &'static str,
        variables: Value,
    ) -> Result<GraphqlResponse, ClientError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&session.access_token)
            .json(&GraphqlRequest { query, variables })
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Network(format!(
                "GraphQL endpoint returned {}",
                response.status()
            )));
        }

        response
            .json::<GraphqlResponse>()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))
    }
}

/// Cache of query results keyed by document and serialized variables.
///
/// Mutations never touch the cache directly; they invalidate by issuing a
/// network-only refetch whose result overwrites the cached page.
#[derive(Default)]
pub(crate) struct QueryCache {
    entries: Mutex<HashMap<(&'static str, String), Value>>,
}

impl QueryCache {
    pub(crate) fn get(&self, query: &'static str, variables: &Value) -> Option<Value> {
        let entries = self.entries.lock().ok()?;
        entries.get(&(query, variables.to_string())).cloned()
    }

    pub(crate) fn put(&self, query: &'static str, variables: &Value, data: Value) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert((query, variables.to_string()), data);
        }
    }
}

/// Run a read according to the request policy.
///
/// Network success always refreshes the cache. Under `CacheAndNetwork` a
/// network failure falls back to the cached page when one exists; under
/// `NetworkOnly` failures propagate.
pub(crate) async fn run_query(
    transport: &dyn GraphqlTransport,
    cache: &QueryCache,
    session: &Session,
    query: &'static str,
    variables: Value,
    policy: RequestPolicy,
) -> Result<Value, ClientError> {
    let result = transport.execute(session, query, variables.clone()).await;

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            if policy == RequestPolicy::CacheAndNetwork {
                if let Some(cached) = cache.get(query, &variables) {
                    warn!(error = %err, "Query failed, serving cached result");
                    return Ok(cached);
                }
            }
            return Err(err);
        }
    };

    if let Some(message) = response.error_message() {
        return Err(ClientError::Network(message.to_string()));
    }

    let data = response.data.unwrap_or(Value::Null);
    cache.put(query, &variables, data.clone());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cache_keyed_by_query_and_variables() {
        let cache = QueryCache::default();
        let vars_a = json!({ "limit": 100 });
        let vars_b = json!({ "limit": 10 });

        cache.put("query A", &vars_a, json!({ "tags": [1] }));
        assert_eq!(cache.get("query A", &vars_a), Some(json!({ "tags": [1] })));
        assert_eq!(cache.get("query A", &vars_b), None);
        assert_eq!(cache.get("query B", &vars_a), None);
    }

    #[test]
    fn test_cache_overwrite() {
        let cache = QueryCache::default();
        let vars = json!({});
        cache.put("q", &vars, json!(1));
        cache.put("q", &vars, json!(2));
        assert_eq!(cache.get("q", &vars), Some(json!(2)));
    }

    #[test]
    fn test_response_error_message() {
        let response: GraphqlResponse = serde_json::from_value(json!({
            "data": null,
            "errors": [{ "message": "first" }, { "message": "second" }]
        }))
        .unwrap();
        assert_eq!(response.error_message(), Some("first"));

        let clean: GraphqlResponse = serde_json::from_value(json!({ "data": {} })).unwrap();
        assert_eq!(clean.error_message(), None);
    }
}
