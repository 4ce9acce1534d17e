use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

/// Anything that can hand back the raw feed document for a URL.
#[async_trait]
pub trait FeedSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP client for the central bank's daily rates endpoint.
///
/// No timeout and no retries are configured: a run waits for the server
/// and gives up on the first transport failure.
#[derive(Clone)]
pub struct CbrClient {
    client: Client,
}

impl CbrClient {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder().build().map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    #[cfg(test)]
    pub(crate) fn without_proxy() -> Self {
        Self {
            client: Client::builder().no_proxy().build().unwrap(),
        }
    }
}

#[async_trait]
impl FeedSource for CbrClient {
    /// GET `url` and return the body as text, whatever the status code.
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let request_error = |source: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            warn!("Feed endpoint answered {} for {}", status, url);
        }

        let body = response.text().await.map_err(request_error)?;
        info!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
