//! Per-request URL information used for self and page links.

use crate::pagination::PageWindow;
use crate::params::QueryParams;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::HOST;
use axum::http::request::Parts;
use pdl_derive::api_model;
use pdl_domain::config::ApiConfig;
use std::convert::Infallible;
use url::form_urlencoded;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// `links` block of a paginated v1 response.
#[api_model(skip_none = true)]
#[derive(Clone, PartialEq, Eq)]
pub struct PageLinks {
    #[serde(rename = "self")]
    pub current: String,
    pub first: String,
    pub last: String,
    pub next: Option<String>,
    pub prev: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Scheme and authority, without a trailing slash.
    pub base_url: String,
    pub path: String,
    /// Raw query string, still percent-encoded.
    pub query: String,
    pub params: QueryParams,
}

impl<S> FromRequestParts<S> for RequestContext
where
    ApiConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = ApiConfig::from_ref(state);
        let base_url = match config.server.public_url.as_deref().map(str::trim) {
            Some(public) if !public.is_empty() => public.trim_end_matches('/').to_owned(),
            _ => {
                let scheme = header(parts, FORWARDED_PROTO)
                    .and_then(|proto| proto.split(',').next())
                    .map_or("http", str::trim);
                let host = header(parts, HOST.as_str())
                    .or_else(|| parts.uri.authority().map(|a| a.as_str()))
                    .unwrap_or("localhost");
                format!("{scheme}://{host}")
            },
        };

        let query = parts.uri.query().unwrap_or_default().to_owned();
        Ok(Self {
            base_url,
            path: parts.uri.path().to_owned(),
            params: QueryParams::parse(&query),
            query,
        })
    }
}

impl RequestContext {
    #[must_use]
    pub fn new(base_url: impl Into<String>, path: impl Into<String>, query: &str) -> Self {
        Self {
            base_url: base_url.into(),
            path: path.into(),
            query: query.to_owned(),
            params: QueryParams::parse(query),
        }
    }

    /// Absolute URL without the query string.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }

    /// The URL exactly as requested.
    #[must_use]
    pub fn original_url(&self) -> String {
        if self.query.is_empty() { self.url() } else { format!("{}?{}", self.url(), self.query) }
    }

    /// `base_url` joined with an absolute path.
    #[must_use]
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Current URL with `name` set to `page`, other parameters kept (last value per key),
    /// each pair CGI-escaped and the `k=v` strings sorted.
    #[must_use]
    pub fn page_url_with(&self, name: &str, page: u64) -> String {
        let page = page.to_string();
        let mut pairs: Vec<String> = self
            .params
            .merged()
            .into_iter()
            .filter(|(key, _)| *key != name)
            .chain(std::iter::once((name, page.as_str())))
            .map(|(key, value)| format!("{}={}", cgi_escape(key), cgi_escape(value)))
            .collect();
        pairs.sort_unstable();
        format!("{}?{}", self.url(), pairs.join("&"))
    }

    #[must_use]
    pub fn page_url(&self, page: u64) -> String {
        self.page_url_with("page", page)
    }

    /// `{self, first, last, next?, prev?}` for a v1 list response.
    #[must_use]
    pub fn pagination_links(&self, window: &PageWindow) -> PageLinks {
        PageLinks {
            current: self.original_url(),
            first: self.page_url(1),
            last: self.page_url(window.pages),
            next: window.next.map(|page| self.page_url(page)),
            prev: window.prev.map(|page| self.page_url(page)),
        }
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|value| value.to_str().ok())
}

/// Form encoding that keeps `~` and escapes `*`, as legacy clients expect in page links.
#[must_use]
pub fn cgi_escape(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace("%7E", "~")
        .replace('*', "%2A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn original_url_keeps_the_raw_query() {
        let ctx = RequestContext::new("http://api.test", "/api/v1/committees", "house=Commons&page=2");
        assert_eq!(ctx.original_url(), "http://api.test/api/v1/committees?house=Commons&page=2");

        let ctx = RequestContext::new("http://api.test", "/api/v1/committees", "");
        assert_eq!(ctx.original_url(), "http://api.test/api/v1/committees");
    }

    #[test]
    fn page_urls_are_sorted_and_escaped() {
        let ctx = RequestContext::new(
            "http://api.test",
            "/api/v1/research-briefings",
            "topic=1&page=4&search=a+b*~&topic=2",
        );
        assert_eq!(
            ctx.page_url(5),
            "http://api.test/api/v1/research-briefings?page=5&search=a+b%2A~&topic=2"
        );
    }

    #[test]
    fn links_follow_the_window() {
        let ctx = RequestContext::new("http://api.test", "/api/v1/countries", "page=2");
        let window = PageWindow::new(45, 20, 2).unwrap();
        let links = ctx.pagination_links(&window);
        assert_eq!(links.current, "http://api.test/api/v1/countries?page=2");
        assert_eq!(links.first, "http://api.test/api/v1/countries?page=1");
        assert_eq!(links.last, "http://api.test/api/v1/countries?page=3");
        assert_eq!(links.next.as_deref(), Some("http://api.test/api/v1/countries?page=3"));
        assert_eq!(links.prev.as_deref(), Some("http://api.test/api/v1/countries?page=1"));

        let last = ctx.pagination_links(&PageWindow::new(45, 20, 3).unwrap());
        let json = serde_json::to_value(&last).unwrap();
        assert!(json.get("next").is_none());
        assert_eq!(json["self"], "http://api.test/api/v1/countries?page=2");
    }
}
