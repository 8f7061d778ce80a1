use std::sync::LazyLock;

use url::Url;

use crate::error::ApiError;
use crate::retry::{RetryPolicy, with_retry};

pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

static DEFAULT_URL: LazyLock<Url> =
    LazyLock::new(|| Url::parse(DEFAULT_BASE_URL).expect("Invalid default base URL"));

/// Bearer-authenticated client for the Cloudflare API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct CloudflareClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
    retry: RetryPolicy,
}

impl std::fmt::Debug for CloudflareClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareClient")
            .field("base_url", &self.base_url.as_str())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl CloudflareClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_URL.clone(),
            token: token.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Point the client at another API root, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ApiError> {
        let url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!("{base_url}: cannot be a base")));
        }
        self.base_url = url;
        Ok(self)
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Append `segments` to the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.http.request(method, url).bearer_auth(&self.token)
    }

    /// Send a request built fresh for every attempt and return the success body.
    pub(crate) async fn send_with_retry<F>(
        &self,
        operation: &str,
        build: F,
    ) -> Result<String, ApiError>
    where
        F: Fn() -> Result<reqwest::RequestBuilder, ApiError>,
    {
        let build = &build;
        with_retry(&self.retry, operation, || async move {
            let resp = build()?.send().await?;
            read_success_body(resp).await
        })
        .await
    }
}

async fn read_success_body(resp: reqwest::Response) -> Result<String, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        // The body is only context for the error.
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::RemoteCall {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp.text().await?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    #[test]
    fn test_default_base_url() {
        let client = CloudflareClient::new("token");
        assert_eq!(client.base_url().as_str(), "https://api.cloudflare.com/client/v4");
        assert_eq!(client.retry_policy(), &RetryPolicy::default());
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let client = CloudflareClient::new("token");
        let url = client
            .endpoint(&["accounts", "acc", "workers", "scripts", "my-worker"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.cloudflare.com/client/v4/accounts/acc/workers/scripts/my-worker"
        );
    }

    #[test]
    fn test_endpoint_percent_encodes_segments() {
        let client = CloudflareClient::new("token");
        let url = client
            .endpoint(&["accounts", "a/b", "workers", "scripts", "name with space?"])
            .unwrap();
        assert_eq!(
            url.path(),
            "/client/v4/accounts/a%2Fb/workers/scripts/name%20with%20space%3F"
        );
    }

    #[test]
    fn test_base_url_with_trailing_slash() {
        let client = CloudflareClient::new("token")
            .with_base_url("http://127.0.0.1:8080/")
            .unwrap();
        let url = client.endpoint(&["accounts", "acc"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/accounts/acc");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = CloudflareClient::new("token")
            .with_base_url("not a url")
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));

        let err = CloudflareClient::new("token")
            .with_base_url("mailto:ops@example.com")
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    /// Serves a 200 that promises more body than it sends, then hangs up.
    async fn truncating_server() -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepted = Arc::new(AtomicUsize::new(0));
        let counter = accepted.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = vec![0u8; 4096];
                let mut read = 0;
                while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf[read..]).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => read += n,
                    }
                }
                let _ = socket
                    .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\n\r\n{\"result\"")
                    .await;
                let _ = socket.shutdown().await;
            }
        });
        (format!("http://{addr}"), accepted)
    }

    #[tokio::test]
    async fn test_truncated_success_body_is_retried_transport_error() {
        let (uri, accepted) = truncating_server().await;
        let client = CloudflareClient::new("token")
            .with_base_url(&uri)
            .unwrap()
            .with_retry(RetryPolicy::new(1, Duration::ZERO));
        let url = client.endpoint(&["accounts", "acc"]).unwrap();

        let err = client
            .send_with_retry("read", || Ok(client.request(reqwest::Method::GET, url.clone())))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
        assert_eq!(accepted.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_debug_hides_token() {
        let client = CloudflareClient::new("super-secret");
        assert!(!format!("{client:?}").contains("super-secret"));
    }
}
