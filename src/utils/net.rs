use crate::config::HttpConfig;
use crate::errors::Result;
use crate::utils::logger::Logger;
use async_trait::async_trait;
use rand::seq::IndexedRandom;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION};
use reqwest::Client;
use std::time::Duration;

/// Browser identities a session may present; one is picked per session
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
];

/// Status and body of a GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// The HTTP capability the lyrics providers depend on
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// GET `url` and return status plus body
    async fn get(&self, url: &str) -> Result<HttpResponse>;

    /// GET `url` with a bearer credential
    async fn get_authorized(&self, url: &str, token: &str) -> Result<HttpResponse>;

    /// HEAD `url` and return the status code
    async fn head(&self, url: &str) -> Result<u16>;

    /// Wait out the pacing delay that precedes a search-engine request
    async fn pace(&self);
}

/// One reusable connection context per batch run.
///
/// The user agent is drawn once when the session is created so every request
/// of the run presents the same client fingerprint. Keep-alive comes from
/// sharing the single `reqwest::Client`.
pub struct HttpSession {
    client: Client,
    user_agent: &'static str,
    get_timeout: Duration,
    head_timeout: Duration,
    pacing: (Duration, Duration),
}

impl HttpSession {
    /// Create a new session with a randomly chosen identity
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let user_agent = USER_AGENTS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(USER_AGENTS[0]);

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        tracing::debug!("HTTP session created with user agent: {}", user_agent);

        Ok(Self {
            client,
            user_agent,
            get_timeout: config.get_timeout(),
            head_timeout: config.head_timeout(),
            pacing: config.search_delay_window(),
        })
    }

    /// The identity header presented by this session
    pub fn user_agent(&self) -> &str {
        self.user_agent
    }

    async fn read_response(response: reqwest::Response) -> Result<HttpResponse> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpFetch for HttpSession {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        Logger::log_network_operation("GET", url);
        let response = self
            .client
            .get(url)
            .timeout(self.get_timeout)
            .send()
            .await?;
        Self::read_response(response).await
    }

    async fn get_authorized(&self, url: &str, token: &str) -> Result<HttpResponse> {
        Logger::log_network_operation("GET (authorized)", url);
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(ACCEPT, "application/json")
            .timeout(self.get_timeout)
            .send()
            .await?;
        Self::read_response(response).await
    }

    async fn head(&self, url: &str) -> Result<u16> {
        Logger::log_network_operation("HEAD", url);
        let response = self
            .client
            .head(url)
            .timeout(self.head_timeout)
            .send()
            .await?;
        Ok(response.status().as_u16())
    }

    async fn pace(&self) {
        let delay = random_delay(self.pacing);
        if !delay.is_zero() {
            tracing::debug!("Pacing search request by {} ms", delay.as_millis());
            tokio::time::sleep(delay).await;
        }
    }
}

/// Uniformly distributed delay within `[min, max]`
fn random_delay((min, max): (Duration, Duration)) -> Duration {
    let min_ms = min.as_millis() as u64;
    let max_ms = max.as_millis() as u64;
    if max_ms <= min_ms {
        return min;
    }
    Duration::from_millis(rand::rng().random_range(min_ms..=max_ms))
}

/// Extract domain from URL
pub fn extract_domain(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|url| url.host_str().map(|s| s.to_lowercase()))
}
