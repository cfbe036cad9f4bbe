//! Elasticsearch (and OpenSearch) backend over the `_search` REST endpoint.

use super::SearchBackend;
use crate::config::{resolve_env_var, SearchConfig};
use crate::error::SearchError;
use crate::types::SearchHit;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Auth {
    Basic {
        username: String,
        password: Option<String>,
    },
    ApiKey(String),
}

/// Search backend talking to an Elasticsearch-compatible cluster.
pub struct ElasticsearchClient {
    endpoint: String,
    timeout: Duration,
    auth: Option<Auth>,
    client: reqwest::Client,
}

impl ElasticsearchClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
            auth: None,
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from the `[search]` config section.
    ///
    /// An API key takes precedence over basic auth when both are set.
    pub fn from_config(config: &SearchConfig) -> Self {
        let auth = if let Some(api_key) = config.api_key.as_deref().and_then(resolve_env_var) {
            Some(Auth::ApiKey(api_key))
        } else {
            config.username.as_ref().map(|username| Auth::Basic {
                username: username.clone(),
                password: config.password.as_deref().and_then(resolve_env_var),
            })
        };

        Self {
            timeout: Duration::from_millis(config.timeout_ms),
            auth,
            ..Self::new(&config.endpoint)
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn search_url(&self, index: &str) -> String {
        format!("{}/{}/_search", self.endpoint, index)
    }
}

#[async_trait]
impl SearchBackend for ElasticsearchClient {
    fn name(&self) -> &str {
        "elasticsearch"
    }

    async fn search(
        &self,
        index: &str,
        body: &serde_json::Value,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let mut request = self
            .client
            .post(self.search_url(index))
            .timeout(self.timeout)
            .json(body);

        request = match &self.auth {
            Some(Auth::ApiKey(key)) => request.header("Authorization", format!("ApiKey {key}")),
            Some(Auth::Basic { username, password }) => request.basic_auth(username, password.as_ref()),
            None => request,
        };

        let resp = request.send().await.map_err(|e| SearchError::Connectivity {
            endpoint: self.endpoint.clone(),
            message: e.to_string(),
        })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(status_error(status, index, text));
        }

        let body: serde_json::Value =
            resp.json()
                .await
                .map_err(|e| SearchError::MalformedResponse {
                    message: format!("response is not JSON: {e}"),
                })?;

        parse_hits(body)
    }
}

/// Map a non-success HTTP status to a search error.
fn status_error(status: StatusCode, index: &str, text: String) -> SearchError {
    match status {
        StatusCode::NOT_FOUND => SearchError::IndexNotFound {
            index: index.to_string(),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SearchError::Auth {
            status_code: status.as_u16(),
            message: text,
        },
        _ => SearchError::Http {
            status_code: status.as_u16(),
            message: text,
        },
    }
}

/// Extract `hits.hits` from a search response body.
pub(crate) fn parse_hits(mut body: serde_json::Value) -> Result<Vec<SearchHit>, SearchError> {
    let hits = body
        .get_mut("hits")
        .and_then(|hits| hits.get_mut("hits"))
        .map(serde_json::Value::take)
        .ok_or_else(|| SearchError::MalformedResponse {
            message: "missing hits.hits".to_string(),
        })?;

    serde_json::from_value(hits).map_err(|e| SearchError::MalformedResponse {
        message: format!("unexpected hit shape: {e}"),
    })
}
