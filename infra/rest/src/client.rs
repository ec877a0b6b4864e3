use crate::error::{RestError, RestErrorExt};
use md5::{Digest, Md5};
use moka::future::Cache;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

/// Which TTL bucket a cached response lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTier {
    /// List pages.
    List,
    /// Single items and whole reference arrays.
    Item,
}

#[derive(Debug)]
struct RestClientInner {
    http: reqwest::Client,
    lists: Cache<String, Arc<Value>>,
    items: Cache<String, Arc<Value>>,
}

#[derive(Debug, Clone)]
pub struct RestClient {
    inner: Arc<RestClientInner>,
}

impl RestClient {
    pub fn builder() -> RestClientBuilder {
        RestClientBuilder::default()
    }

    /// Fetches `url`, memoizing successful responses under `key` in the given tier.
    #[instrument(skip(self, url), fields(url = %url))]
    pub async fn get_cached(&self, tier: CacheTier, key: String, url: &Url) -> Option<Arc<Value>> {
        let cache = match tier {
            CacheTier::List => &self.inner.lists,
            CacheTier::Item => &self.inner.items,
        };

        cache
            .optionally_get_with(key, async {
                debug!("REST cache miss");
                match self.get_json(url).await {
                    Ok(value) => Some(Arc::new(value)),
                    Err(err) => {
                        error!(%url, error = %err, "REST request failed");
                        None
                    },
                }
            })
            .await
    }

    /// Uncached `GET` with `Accept: application/json`.
    ///
    /// # Errors
    /// Transport failures, non-success statuses and non-JSON bodies.
    pub async fn get_json(&self, url: &Url) -> Result<Value, RestError> {
        let response = self
            .inner
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .context("Sending request")?;

        let status = response.status();
        if !status.is_success() {
            return Err(RestError::Status { status: status.as_u16(), context: None });
        }
        response.json::<Value>().await.context("Decoding JSON body")
    }

    /// Drops every cached response.
    pub fn invalidate_all(&self) {
        self.inner.lists.invalidate_all();
        self.inner.items.invalidate_all();
    }
}

/// `base + path`, with `params` form-encoded as the query string when present.
///
/// # Errors
/// [`RestError::Url`] when the joined URL does not parse.
pub fn build_url(base: &str, path: &str, params: &[(&str, String)]) -> Result<Url, RestError> {
    let mut url = Url::parse(&format!("{base}{path}")).context("Joining base URL and path")?;
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
    }
    Ok(url)
}

/// `base + path + "/" + id`, with `id` escaped as a single path segment.
///
/// # Errors
/// [`RestError::Url`] for unparsable bases, [`RestError::Configuration`] for
/// bases that cannot carry a path.
pub fn item_url(base: &str, path: &str, id: &str) -> Result<Url, RestError> {
    let mut url = Url::parse(&format!("{base}{path}")).context("Joining base URL and path")?;
    url.path_segments_mut()
        .map_err(|()| RestError::Configuration {
            message: "base URL cannot carry a path".into(),
            context: Some(base.to_owned().into()),
        })?
        .push(id);
    Ok(url)
}

#[must_use]
pub fn list_key(type_key: &str, url: &Url) -> String {
    format!("rest/list/{type_key}/{}", hex::encode(Md5::digest(url.as_str().as_bytes())))
}

#[must_use]
pub fn item_key(type_key: &str, id: &str) -> String {
    format!("rest/item/{type_key}/{id}")
}

#[must_use]
pub fn array_key(type_key: &str) -> String {
    format!("rest/array/{type_key}")
}

#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug)]
pub struct RestClientBuilder {
    connect_timeout: Duration,
    read_timeout: Duration,
    list_ttl: Duration,
    item_ttl: Duration,
    capacity: u64,
}

impl Default for RestClientBuilder {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            list_ttl: Duration::from_secs(300),
            item_ttl: Duration::from_secs(900),
            capacity: 10_000,
        }
    }
}

impl RestClientBuilder {
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub const fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub const fn list_ttl(mut self, ttl: Duration) -> Self {
        self.list_ttl = ttl;
        self
    }

    pub const fn item_ttl(mut self, ttl: Duration) -> Self {
        self.item_ttl = ttl;
        self
    }

    /// Maximum entries per tier.
    pub const fn capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }

    /// # Errors
    /// [`RestError::Configuration`] for a zero capacity, [`RestError::Http`] when the
    /// HTTP client cannot be built.
    pub fn build(self) -> Result<RestClient, RestError> {
        if self.capacity == 0 {
            return Err(RestError::Configuration {
                message: "cache capacity must be greater than zero".into(),
                context: None,
            });
        }

        let http = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.read_timeout)
            .build()
            .context("Building HTTP client")?;

        let lists = Cache::builder().max_capacity(self.capacity).time_to_live(self.list_ttl).build();
        let items = Cache::builder().max_capacity(self.capacity).time_to_live(self.item_ttl).build();

        Ok(RestClient { inner: Arc::new(RestClientInner { http, lists, items }) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://committees-api.parliament.uk";

    #[test]
    fn build_url_form_encodes_params() {
        let url = build_url(BASE, "/api/Committees", &[
            ("SearchTerm", "health & care".to_owned()),
            ("Skip", "0".to_owned()),
        ])
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://committees-api.parliament.uk/api/Committees?SearchTerm=health+%26+care&Skip=0"
        );
    }

    #[test]
    fn build_url_without_params_has_no_query() {
        let url = build_url(BASE, "/api/Countries", &[]).unwrap();
        assert_eq!(url.as_str(), "https://committees-api.parliament.uk/api/Countries");
    }

    #[test]
    fn item_url_escapes_the_id_segment() {
        let url = item_url(BASE, "/api/Committees", "12/../x y").unwrap();
        assert_eq!(url.as_str(), "https://committees-api.parliament.uk/api/Committees/12%2F..%2Fx%20y");
    }

    #[test]
    fn cache_keys_are_namespaced() {
        let url = build_url(BASE, "/api/Events", &[]).unwrap();
        let key = list_key("event", &url);
        assert!(key.starts_with("rest/list/event/"));
        assert_eq!(key.len(), "rest/list/event/".len() + 32);
        assert_eq!(item_key("committee", "7"), "rest/item/committee/7");
        assert_eq!(array_key("country"), "rest/array/country");
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = RestClient::builder().capacity(0).build().unwrap_err();
        assert!(matches!(err, RestError::Configuration { .. }));
    }
}
