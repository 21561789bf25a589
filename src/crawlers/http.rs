use crate::config::HttpConfig;
use crate::crawlers::crawler::{FetchError, PageFetcher};
use crate::utils::backoff_delay;
use rand::Rng;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// HTTP client shared by all workers of a run.
///
/// Waits a random courtesy delay before each fetch, then retries 500/502/503/504
/// responses and timeouts with capped exponential backoff.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpConfig,
}

impl HttpClient {
    /// Build the client with its default headers and timeout
    pub fn new(config: HttpConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()?;

        Ok(Self { client, config })
    }

    /// GET `url` and return its body
    pub async fn get(&self, url: &str) -> Result<String, FetchError> {
        self.courtesy_delay().await;

        let mut retries = 0;
        loop {
            let failure = match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .text()
                            .await
                            .map_err(|e| FetchError::new(url, format!("failed to read body: {}", e)));
                    }
                    if !is_retryable(status) {
                        return Err(FetchError::new(url, format!("HTTP {}", status)));
                    }
                    format!("HTTP {}", status)
                }
                Err(e) if e.is_timeout() => format!("timed out: {}", e),
                Err(e) => return Err(FetchError::new(url, e.to_string())),
            };

            if retries >= self.config.max_retries {
                return Err(FetchError::new(
                    url,
                    format!("{} (gave up after {} retries)", failure, retries),
                ));
            }

            retries += 1;
            let delay = backoff_delay(
                retries,
                self.config.backoff_base_ms,
                self.config.backoff_max_ms,
            );
            ::log::warn!(
                "{} for {}, retry {}/{} in {:?}",
                failure,
                url,
                retries,
                self.config.max_retries,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn courtesy_delay(&self) {
        let (low, high) = if self.config.delay_min_ms <= self.config.delay_max_ms {
            (self.config.delay_min_ms, self.config.delay_max_ms)
        } else {
            (self.config.delay_max_ms, self.config.delay_min_ms)
        };
        if high == 0 {
            return;
        }

        let millis = rand::thread_rng().gen_range(low..=high);
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}

fn is_retryable(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.get(url).await
    }
}
