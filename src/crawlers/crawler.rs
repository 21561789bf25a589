use std::future::Future;
use thiserror::Error;

/// A fetch that produced no usable response, whatever the cause
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("fetch failed for {url}: {reason}")]
pub struct FetchError {
    pub url: String,
    pub reason: String,
}

impl FetchError {
    pub fn new(url: &str, reason: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

/// Source of listing page markup, shared by every worker of a run
pub trait PageFetcher: Send + Sync + 'static {
    /// Fetch the body of `url`
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}
