use super::html::{Fetch, HtmlSession};
use super::resolve_url;
use crate::retry::{retry_operation, RetryConfig};
use crate::{Result, ScrapeError};
use async_trait::async_trait;
use http_client::{HttpClient, Request, Response};
use http_types::{Method, Url};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default site root.
pub const DEFAULT_BASE_URL: &str = "https://audiomack.com";

/// Browser-like user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Fetches pages over HTTP.
///
/// Rate limit responses (`429`) are retried with backoff according to the
/// configured [`RetryConfig`]; redirects are followed manually. Set
/// `AUDIOMACK_DEBUG_SAVE_RESPONSES` to keep every fetched body under
/// `debug_responses/`.
///
/// # Examples
///
/// ```rust,no_run
/// use audiomack_metrics::{HttpFetcher, PageSession};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let fetcher = HttpFetcher::new(Box::new(http_client::native::NativeClient::new()));
/// let mut session = fetcher.into_session();
/// session.navigate("https://audiomack.com/nahj", Duration::from_secs(60)).await?;
/// println!("{}", session.title().await?);
/// # Ok::<(), audiomack_metrics::ScrapeError>(())
/// # });
/// ```
pub struct HttpFetcher {
    client: Box<dyn HttpClient>,
    base_url: String,
    user_agent: String,
    retry: RetryConfig,
    debug_save_responses: bool,
}

impl HttpFetcher {
    /// Create a fetcher for the default Audiomack URL.
    pub fn new(client: Box<dyn HttpClient>) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL.to_string())
    }

    /// Create a fetcher with a custom base URL.
    ///
    /// The base URL resolves relative redirects.
    pub fn with_base_url(client: Box<dyn HttpClient>, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryConfig::default(),
            debug_save_responses: std::env::var("AUDIOMACK_DEBUG_SAVE_RESPONSES").is_ok(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Wrap this fetcher in an [`HtmlSession`].
    pub fn into_session(self) -> HtmlSession<Self> {
        let base_url = self.base_url.clone();
        HtmlSession::new(self, &base_url)
    }

    async fn fetch_once(&self, url: &str, timeout: Duration) -> Result<String> {
        tokio::time::timeout(timeout, self.fetch_body(url))
            .await
            .map_err(|_| ScrapeError::Timeout {
                url: url.to_string(),
                seconds: timeout.as_secs(),
            })?
    }

    async fn fetch_body(&self, url: &str) -> Result<String> {
        let mut response = self.get_with_redirects(url, 0).await?;
        let status = response.status();

        let body = response
            .body_string()
            .await
            .map_err(|e| ScrapeError::Http(e.to_string()))?;

        if self.debug_save_responses {
            self.save_debug_response(url, status.into(), &body);
        }

        if !status.is_success() {
            return Err(ScrapeError::Navigation {
                url: url.to_string(),
                message: format!("HTTP status {status}"),
            });
        }

        Ok(body)
    }

    async fn get_with_redirects(&self, url: &str, redirect_count: u32) -> Result<Response> {
        if redirect_count > 5 {
            return Err(ScrapeError::Http("Too many redirects".to_string()));
        }

        let parsed = url.parse::<Url>().map_err(|e| ScrapeError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let mut request = Request::new(Method::Get, parsed);
        request.insert_header("User-Agent", self.user_agent.as_str());
        request.insert_header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8");
        request.insert_header("Accept-Language", "en-US,en;q=0.9");
        request.insert_header("DNT", "1");
        request.insert_header("Connection", "keep-alive");
        request.insert_header("Upgrade-Insecure-Requests", "1");

        let response = self
            .client
            .send(request)
            .await
            .map_err(|e| ScrapeError::Http(e.to_string()))?;

        if [301, 302, 303, 307, 308].contains(&u16::from(response.status())) {
            if let Some(location) = response.header("location").and_then(|h| h.get(0)) {
                let redirect_url = resolve_url(url, location.as_str())
                    .unwrap_or_else(|| format!("{}{}", self.base_url, location.as_str()));
                log::debug!("Following redirect from {url} to {redirect_url}");
                return Box::pin(self.get_with_redirects(&redirect_url, redirect_count + 1)).await;
            }
        }

        if response.status() == 429 {
            let retry_after = response
                .header("retry-after")
                .and_then(|h| h.get(0))
                .and_then(|v| v.as_str().parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ScrapeError::RateLimit { retry_after });
        }

        Ok(response)
    }

    /// Save response to debug directory (optional debug feature)
    fn save_debug_response(&self, url: &str, status_code: u16, body: &str) {
        if let Err(e) = self.try_save_debug_response(url, status_code, body) {
            log::warn!("Failed to save debug response: {e}");
        }
    }

    fn try_save_debug_response(&self, url: &str, status_code: u16, body: &str) -> Result<()> {
        let debug_dir = Path::new("debug_responses");
        fs::create_dir_all(debug_dir)?;

        let url_path = url.strip_prefix(&self.base_url).unwrap_or(url);
        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S_%3f");
        let safe_path = url_path.replace(['/', '?', '&', '=', '%', '+', ':'], "_");

        let file_path = debug_dir.join(format!("{timestamp}_{safe_path}_status{status_code}.html"));
        fs::write(&file_path, body)?;

        log::debug!("Saved HTTP response to {file_path:?} (status: {status_code}, url: {url_path})");
        Ok(())
    }
}

#[async_trait(?Send)]
impl Fetch for HttpFetcher {
    async fn fetch(&mut self, url: &str, timeout: Duration) -> Result<String> {
        let this = &*self;
        let outcome =
            retry_operation(this.retry.clone(), url, || this.fetch_once(url, timeout)).await?;
        if outcome.attempts_made > 0 {
            log::info!(
                "Loaded {url} after {} retries ({}s waiting)",
                outcome.attempts_made,
                outcome.total_retry_time
            );
        }
        Ok(outcome.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::fmt;
    use std::sync::{Arc, Mutex};

    type Reply = (u16, Option<(&'static str, &'static str)>, &'static str);

    /// Answers requests from a fixed script; the last reply repeats.
    struct ScriptedClient {
        replies: Mutex<VecDeque<Reply>>,
        requested: Arc<Mutex<Vec<String>>>,
    }

    impl fmt::Debug for ScriptedClient {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("ScriptedClient")
        }
    }

    #[async_trait]
    impl HttpClient for ScriptedClient {
        async fn send(&self, req: Request) -> std::result::Result<Response, http_client::Error> {
            self.requested.lock().unwrap().push(req.url().to_string());

            let mut replies = self.replies.lock().unwrap();
            let (status, header, body) = if replies.len() > 1 {
                replies.pop_front().unwrap()
            } else {
                *replies.front().unwrap()
            };

            let mut response = Response::new(status);
            if let Some((name, value)) = header {
                response.insert_header(name, value);
            }
            response.set_body(body);
            Ok(response)
        }
    }

    fn fetcher(replies: Vec<Reply>) -> (HttpFetcher, Arc<Mutex<Vec<String>>>) {
        let requested = Arc::new(Mutex::new(Vec::new()));
        let client = ScriptedClient {
            replies: Mutex::new(replies.into()),
            requested: requested.clone(),
        };
        let mut fetcher = HttpFetcher::new(Box::new(client)).with_retry_config(RetryConfig {
            max_retries: 2,
            base_delay: 0,
            max_delay: 0,
        });
        fetcher.debug_save_responses = false;
        (fetcher, requested)
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let (mut fetcher, requested) = fetcher(vec![
            (429, Some(("retry-after", "0")), ""),
            (200, None, "<h1>Nahj</h1>"),
        ]);

        let body = fetcher
            .fetch("https://audiomack.com/nahj", TIMEOUT)
            .await
            .unwrap();

        assert_eq!(body, "<h1>Nahj</h1>");
        assert_eq!(requested.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_rate_limit_gives_up_after_max_retries() {
        let (mut fetcher, requested) = fetcher(vec![(429, Some(("retry-after", "0")), "")]);

        let result = fetcher.fetch("https://audiomack.com/nahj", TIMEOUT).await;

        assert!(matches!(result, Err(ScrapeError::RateLimit { retry_after: 0 })));
        assert_eq!(requested.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_redirects_are_followed() {
        let (mut fetcher, requested) = fetcher(vec![
            (301, Some(("location", "/nahj")), ""),
            (302, Some(("location", "https://audiomack.com/nahj/songs")), ""),
            (200, None, "songs"),
        ]);

        let body = fetcher
            .fetch("https://audiomack.com/Nahj", TIMEOUT)
            .await
            .unwrap();

        assert_eq!(body, "songs");
        assert_eq!(
            *requested.lock().unwrap(),
            vec![
                "https://audiomack.com/Nahj",
                "https://audiomack.com/nahj",
                "https://audiomack.com/nahj/songs",
            ]
        );
    }

    #[tokio::test]
    async fn test_redirect_loop_is_cut_off() {
        let (mut fetcher, requested) = fetcher(vec![(302, Some(("location", "/loop")), "")]);

        let result = fetcher.fetch("https://audiomack.com/loop", TIMEOUT).await;

        assert!(matches!(result, Err(ScrapeError::Http(message)) if message == "Too many redirects"));
        assert_eq!(requested.lock().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_error_status_is_a_navigation_failure() {
        let (mut fetcher, requested) = fetcher(vec![(404, None, "not found")]);

        let result = fetcher.fetch("https://audiomack.com/gone", TIMEOUT).await;

        match result {
            Err(ScrapeError::Navigation { url, .. }) => {
                assert_eq!(url, "https://audiomack.com/gone");
            }
            other => panic!("Expected navigation error, got: {other:?}"),
        }
        assert_eq!(requested.lock().unwrap().len(), 1);
    }
}
