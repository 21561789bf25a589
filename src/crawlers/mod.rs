pub mod crawler;
pub mod http;
pub mod web;

pub use crawler::{FetchError, PageFetcher};
pub use http::HttpClient;
