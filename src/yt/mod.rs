pub mod types;
pub mod videos;

use async_trait::async_trait;
use tracing::debug;

use crate::settings::Settings;

pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Debug, thiserror::Error)]
pub enum YtError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Api(String),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of video titles for grid cards.
#[async_trait]
pub trait TitleLookup: Send + Sync {
    /// Title for `video_id`, or `None` when it cannot be determined.
    async fn title(&self, video_id: &str) -> Option<String>;
}

/// Data API client bound to one API key.
#[derive(Clone, Debug)]
pub struct MetadataClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl MetadataClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Client for the configured key, `None` when no key is set.
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        settings.api_key().map(Self::new)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Looks the title up, swallowing every failure into `None`.
    pub async fn fetch_title(&self, video_id: &str) -> Option<String> {
        match videos::video_snippet(&self.http, &self.endpoint, &self.api_key, video_id).await {
            Ok(resp) => {
                let title = resp.first_title().map(str::to_owned);
                if title.is_none() {
                    debug!(video_id, "no title in videos.list response");
                }
                title
            }
            Err(err) => {
                debug!(video_id, error = %err, "title lookup failed");
                None
            }
        }
    }
}

#[async_trait]
impl TitleLookup for MetadataClient {
    async fn title(&self, video_id: &str) -> Option<String> {
        self.fetch_title(video_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_title_of_first_item() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("part", "snippet"))
            .and(query_param("id", "dQw4w9WgXcQ"))
            .and(query_param("key", "k3y"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{ "id": "dQw4w9WgXcQ", "snippet": { "title": "Never Gonna" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = MetadataClient::new("k3y").with_endpoint(server.uri());
        assert_eq!(
            client.fetch_title("dQw4w9WgXcQ").await.as_deref(),
            Some("Never Gonna")
        );
    }

    #[tokio::test]
    async fn api_errors_become_no_title() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error": { "code": 403, "message": "quota", "errors": [{ "reason": "quotaExceeded" }] }
            })))
            .mount(&server)
            .await;

        let client = MetadataClient::new("k3y").with_endpoint(server.uri());
        assert_eq!(client.fetch_title("dQw4w9WgXcQ").await, None);
    }

    #[tokio::test]
    async fn malformed_body_becomes_no_title() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let client = MetadataClient::new("k3y").with_endpoint(server.uri());
        assert_eq!(client.title("dQw4w9WgXcQ").await, None);
    }

    #[tokio::test]
    async fn empty_items_become_no_title() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "items": [] })))
            .mount(&server)
            .await;

        let client = MetadataClient::new("k3y").with_endpoint(server.uri());
        assert_eq!(client.fetch_title("dQw4w9WgXcQ").await, None);
    }

    #[tokio::test]
    async fn unreachable_endpoint_becomes_no_title() {
        let client = MetadataClient::new("k3y").with_endpoint("http://127.0.0.1:9");
        assert_eq!(client.fetch_title("dQw4w9WgXcQ").await, None);
    }

    #[test]
    fn no_client_without_key() {
        assert!(MetadataClient::from_settings(&Settings::default()).is_none());
        let mut settings = Settings::default();
        settings.set_api_key("  abc ");
        let client = MetadataClient::from_settings(&settings).unwrap();
        assert_eq!(client.api_key, "abc");
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
    }
}
