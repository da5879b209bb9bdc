use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde_json::Value;
use std::num::NonZeroU32;

use crate::error::EdgarResult;
use crate::models::{Cik, CompanyTicker};

pub mod edgar_client;
pub mod links;
pub use edgar_client::EdgarClient;

/// Process-wide request limiter for SEC endpoints.
///
/// SEC fair-access policy caps automated clients at 10 requests per second,
/// so every request made by any clone of the client waits here first.
pub struct ApiRateLimiter {
    limiter: DefaultDirectRateLimiter,
}

impl ApiRateLimiter {
    pub fn new(requests_per_second: u32) -> Self {
        let per_second = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::direct(Quota::per_second(per_second)),
        }
    }

    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

/// Source of the EDGAR payloads the download pipeline needs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EdgarDataSource: Send + Sync {
    async fn company_tickers(&self) -> EdgarResult<Vec<CompanyTicker>>;
    async fn company_facts(&self, cik: Cik) -> EdgarResult<Value>;
    async fn submissions(&self, cik: Cik) -> EdgarResult<Value>;
    /// Base of the data.sec.gov APIs, for links written into workbooks
    fn data_base_url(&self) -> String;
}
