use crate::results::PageRequest;
use std::time::Duration;
use url::Url;

/// Backoff before retry number `retry` (1-based): base * 2^(retry-1), capped at `max_ms`
pub fn backoff_delay(retry: u32, base_ms: u64, max_ms: u64) -> Duration {
    let factor = 2u64.saturating_pow(retry.saturating_sub(1));
    Duration::from_millis(base_ms.saturating_mul(factor).min(max_ms))
}

/// Builds `{base}?p={page}&platforms={platform}`, keeping any query already on the base
pub fn page_url(base: &Url, request: &PageRequest) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("p", &request.page_number.to_string())
        .append_pair("platforms", &request.platform);
    url
}

/// Appends `.json` to an output filename that does not already end with it
pub fn ensure_json_extension(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        "game_deals.json".to_string()
    } else if name.ends_with(".json") {
        name.to_string()
    } else {
        format!("{}.json", name)
    }
}
