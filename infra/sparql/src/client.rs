use crate::error::{SparqlError, SparqlErrorExt};
use crate::results::SelectResults;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// API gateway header carrying the endpoint subscription key.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

const SPARQL_QUERY: &str = "application/sparql-query";
const LD_JSON: &str = "application/ld+json";
const RESULTS_JSON: &str = "application/sparql-results+json";
const INTERRUPTED_MARKER: &str = "Query interrupted";

#[derive(Debug)]
struct SparqlClientInner {
    http: reqwest::Client,
    endpoint: String,
    subscription_key: String,
}

/// Cheaply cloneable handle to a SPARQL endpoint.
#[derive(Debug, Clone)]
pub struct SparqlClient {
    inner: Arc<SparqlClientInner>,
}

impl SparqlClient {
    pub fn builder() -> SparqlClientBuilder {
        SparqlClientBuilder::default()
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Runs a CONSTRUCT query and returns the raw JSON-LD document.
    ///
    /// # Errors
    /// Transport failures, non-success statuses, interrupted queries and malformed JSON.
    #[instrument(skip_all, fields(endpoint = %self.inner.endpoint))]
    pub async fn construct(&self, query: &str) -> Result<Value, SparqlError> {
        let body = self.post(query, LD_JSON).await?;
        if body.contains(INTERRUPTED_MARKER) {
            return Err(SparqlError::Interrupted {
                message: truncate(&body, 200).to_owned().into(),
                context: Some("CONSTRUCT".into()),
            });
        }
        serde_json::from_str(&body).context("Parsing JSON-LD")
    }

    /// Runs a SELECT query.
    ///
    /// # Errors
    /// Same as [`Self::construct`].
    #[instrument(skip_all, fields(endpoint = %self.inner.endpoint))]
    pub async fn select(&self, query: &str) -> Result<SelectResults, SparqlError> {
        let body = self.post(query, RESULTS_JSON).await?;
        if body.contains(INTERRUPTED_MARKER) {
            return Err(SparqlError::Interrupted {
                message: truncate(&body, 200).to_owned().into(),
                context: Some("SELECT".into()),
            });
        }
        SelectResults::parse(body.as_bytes()).context("Parsing SPARQL results")
    }

    async fn post(&self, query: &str, accept: &'static str) -> Result<String, SparqlError> {
        debug!(accept, "Executing SPARQL query");

        let response = self
            .inner
            .http
            .post(&self.inner.endpoint)
            .header(CONTENT_TYPE, SPARQL_QUERY)
            .header(ACCEPT, accept)
            .header(SUBSCRIPTION_KEY_HEADER, &self.inner.subscription_key)
            .body(query.to_owned())
            .send()
            .await
            .context("Sending query")?;

        let status = response.status();
        let body = response.text().await.context("Reading response body")?;
        if !status.is_success() {
            error!(status = status.as_u16(), body = %truncate(&body, 500), "SPARQL request failed");
            return Err(SparqlError::Status { status: status.as_u16(), context: None });
        }
        debug!(bytes = body.len(), "SPARQL response received");
        Ok(body)
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Fluent configuration for [`SparqlClient`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug)]
pub struct SparqlClientBuilder {
    endpoint: Option<String>,
    subscription_key: String,
    timeout: Duration,
    accept_invalid_certs: bool,
}

impl Default for SparqlClientBuilder {
    fn default() -> Self {
        Self {
            endpoint: None,
            subscription_key: String::new(),
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
        }
    }
}

impl SparqlClientBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn subscription_key(mut self, key: impl Into<String>) -> Self {
        self.subscription_key = key.into();
        self
    }

    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Skips certificate verification. Development only.
    pub const fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// # Errors
    /// Returns [`SparqlError::Configuration`] without an endpoint and
    /// [`SparqlError::Http`] when the HTTP client cannot be built.
    pub fn build(self) -> Result<SparqlClient, SparqlError> {
        let endpoint = self
            .endpoint
            .map(|endpoint| endpoint.trim().to_owned())
            .filter(|endpoint| !endpoint.is_empty())
            .ok_or(SparqlError::Configuration {
                message: "endpoint is required".into(),
                context: None,
            })?;

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .context("Building HTTP client")?;

        Ok(SparqlClient {
            inner: Arc::new(SparqlClientInner {
                http,
                endpoint,
                subscription_key: self.subscription_key,
            }),
        })
    }
}
