//! Wiki search provider abstraction and the Confluence client.
//!
//! The pipeline treats the wiki as an external search provider returning
//! ranked text snippets. `WikiSearch` is the seam: the Confluence client
//! implements it over HTTP, and tests substitute fakes.

use deskbot_core::{AppError, AppResult};
use serde::Deserialize;

/// One raw search hit from the wiki provider, before policy filtering.
#[derive(Debug, Clone)]
pub struct WikiSearchHit {
    /// Page title
    pub title: String,

    /// Excerpt text returned by the search backend
    pub excerpt: String,

    /// Web URL of the page
    pub url: String,
}

/// Trait for wiki search providers.
#[async_trait::async_trait]
pub trait WikiSearch: Send + Sync {
    /// Search the wiki, returning at most `limit` hits in ranking order.
    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<WikiSearchHit>>;
}

/// Confluence search response shape (the fields we read).
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(rename = "_links", default)]
    links: Option<SearchLinks>,
}

#[derive(Debug, Deserialize)]
struct SearchLinks {
    #[serde(default)]
    webui: Option<String>,
}

/// Confluence search client over the REST API.
pub struct ConfluenceClient {
    base_url: String,
    username: Option<String>,
    api_token: Option<String>,
    client: reqwest::Client,
}

impl ConfluenceClient {
    /// Create a client for a Confluence instance.
    ///
    /// Authentication is basic auth with `username` + `api_token`; both
    /// optional so anonymous instances work too.
    pub fn new(
        base_url: impl Into<String>,
        username: Option<String>,
        api_token: Option<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            api_token,
            client: reqwest::Client::new(),
        }
    }

    /// Resolve a possibly-relative `webui` link against the instance URL.
    fn page_url(&self, webui: &str) -> String {
        if webui.starts_with('/') {
            format!("{}{}", self.base_url, webui)
        } else {
            webui.to_string()
        }
    }
}

#[async_trait::async_trait]
impl WikiSearch for ConfluenceClient {
    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<WikiSearchHit>> {
        tracing::debug!(limit, "Searching Confluence");

        // Double quotes would terminate the CQL string literal early.
        let sanitized = query.replace('"', " ");
        let cql = format!("siteSearch ~ \"{}\"", sanitized);
        let url = format!("{}/rest/api/search", self.base_url);
        let limit_param = limit.to_string();

        let mut request = self
            .client
            .get(&url)
            .query(&[("cql", cql.as_str()), ("limit", limit_param.as_str())]);

        if let Some(ref username) = self.username {
            request = request.basic_auth(username, self.api_token.as_deref());
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Wiki(format!("Failed to reach Confluence: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Wiki(format!(
                "Confluence search returned {}",
                status
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Wiki(format!("Failed to parse Confluence response: {}", e)))?;

        let hits = body
            .results
            .into_iter()
            .map(|result| WikiSearchHit {
                title: result.title.unwrap_or_default(),
                excerpt: result.excerpt.unwrap_or_default(),
                url: result
                    .links
                    .and_then(|links| links.webui)
                    .map(|webui| self.page_url(&webui))
                    .unwrap_or_default(),
            })
            .collect();

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_search_maps_results() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/api/search")
                    .query_param("limit", "5");
                then.status(200).json_body(serde_json::json!({
                    "results": [
                        {
                            "title": "VPN Setup",
                            "excerpt": "Install the VPN client from the portal",
                            "_links": { "webui": "/spaces/IT/pages/1" }
                        },
                        {
                            "title": "Untitled",
                            "excerpt": null
                        }
                    ]
                }));
            })
            .await;

        let client = ConfluenceClient::new(server.base_url(), None, None);
        let hits = client.search("vpn setup", 5).await.unwrap();

        mock.assert_async().await;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "VPN Setup");
        assert!(hits[0].url.ends_with("/spaces/IT/pages/1"));
        assert!(hits[0].url.starts_with("http"));
        assert_eq!(hits[1].excerpt, "");
    }

    #[tokio::test]
    async fn test_search_surfaces_http_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/search");
                then.status(401);
            })
            .await;

        let client = ConfluenceClient::new(server.base_url(), Some("bot".into()), None);
        let result = client.search("anything", 5).await;

        assert!(matches!(result, Err(AppError::Wiki(_))));
    }

    #[test]
    fn test_page_url_resolution() {
        let client = ConfluenceClient::new("https://wiki.example.com/", None, None);
        assert_eq!(
            client.page_url("/spaces/IT/pages/1"),
            "https://wiki.example.com/spaces/IT/pages/1"
        );
        assert_eq!(
            client.page_url("https://elsewhere.example.com/p"),
            "https://elsewhere.example.com/p"
        );
    }
}
