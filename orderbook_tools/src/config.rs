use std::time::Duration;

use log::*;
use lop_common::Secret;

pub const DEFAULT_ORDERBOOK_URL: &str = "https://api.1inch.dev/orderbook/v4.0";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct OrderbookConfig {
    /// Base URL of the orderbook API, without a trailing slash. e.g. "https://api.1inch.dev/orderbook/v4.0"
    pub base_url: String,
    /// Sent verbatim in the `Authorization` header.
    pub api_key: Secret<String>,
    /// Deadline for a single request, including connecting and reading the body.
    pub timeout: Duration,
}

impl Default for OrderbookConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_ORDERBOOK_URL.to_string(), api_key: Secret::default(), timeout: DEFAULT_REQUEST_TIMEOUT }
    }
}

impl OrderbookConfig {
    pub fn new(api_key: &str) -> Self {
        Self { api_key: Secret::new(api_key.to_string()), ..Default::default() }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("LOS_ORDERBOOK_BASE_URL").unwrap_or_else(|_| {
            info!("LOS_ORDERBOOK_BASE_URL not set, using {DEFAULT_ORDERBOOK_URL}");
            DEFAULT_ORDERBOOK_URL.to_string()
        });
        let api_key = std::env::var("LOS_ORDERBOOK_API_KEY").or_else(|_| std::env::var("INCH_API_KEY")).unwrap_or_else(
            |_| {
                warn!("LOS_ORDERBOOK_API_KEY not set. Requests to the orderbook will most likely be rejected (401)");
                String::default()
            },
        );
        let timeout = std::env::var("LOS_ORDERBOOK_TIMEOUT")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("{s} is not a valid value for LOS_ORDERBOOK_TIMEOUT. {e}. Using the default."))
                    .ok()
            })
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        Self::new(&api_key).with_base_url(&base_url).with_timeout(timeout)
    }
}
