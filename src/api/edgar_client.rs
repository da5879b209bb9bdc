use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{ApiRateLimiter, EdgarDataSource};
use crate::datasets;
use crate::error::{EdgarError, EdgarResult};
use crate::models::{Cik, CikLookupEntry, CompanyTicker, Config, ExchangeListing, MutualFundTicker};

pub const COMPANY_TICKERS_PATH: &str = "/files/company_tickers.json";
pub const COMPANY_TICKERS_EXCHANGE_PATH: &str = "/files/company_tickers_exchange.json";
pub const MUTUAL_FUND_TICKERS_PATH: &str = "/files/company_tickers_mf.json";
pub const CIK_LOOKUP_PATH: &str = "/Archives/edgar/cik-lookup-data.txt";

/// SEC EDGAR client for the static company directories and the
/// data.sec.gov JSON APIs.
///
/// Clones share the HTTP connection pool and the rate limiter.
#[derive(Clone)]
pub struct EdgarClient {
    http_client: Client,
    rate_limiter: Arc<ApiRateLimiter>,
    www_base_url: String,
    data_base_url: String,
}

impl EdgarClient {
    /// Create a new SEC EDGAR client
    pub fn new(config: &Config) -> Result<Self> {
        if config.user_agent.trim().is_empty() {
            return Err(anyhow!("EDGAR_USER_AGENT must not be empty; the SEC rejects anonymous clients"));
        }

        let http_client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(ApiRateLimiter::new(config.rate_limit_per_second)),
            www_base_url: normalize_base_url(&config.www_base_url)?,
            data_base_url: normalize_base_url(&config.data_base_url)?,
        })
    }

    pub fn company_facts_url(&self, cik: Cik) -> String {
        format!("{}/api/xbrl/companyfacts/CIK{}.json", self.data_base_url, cik.padded())
    }

    pub fn submissions_url(&self, cik: Cik) -> String {
        format!("{}/submissions/CIK{}.json", self.data_base_url, cik.padded())
    }

    fn www_url(&self, path: &str) -> String {
        format!("{}{}", self.www_base_url, path)
    }

    async fn get(&self, url: &str) -> EdgarResult<reqwest::Response> {
        self.rate_limiter.wait().await;
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .header(header::ACCEPT, "application/json, text/plain")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("EDGAR request failed: {} -> {}", url, status);
            return Err(EdgarError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(response)
    }

    async fn get_json(&self, url: &str) -> EdgarResult<Value> {
        let body = self.get(url).await?.text().await?;
        serde_json::from_str(&body).map_err(|source| EdgarError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Download and parse `company_tickers.json`
    pub async fn fetch_company_tickers(&self) -> EdgarResult<Vec<CompanyTicker>> {
        let json = self.get_json(&self.www_url(COMPANY_TICKERS_PATH)).await?;
        datasets::parse_company_tickers(&json)
    }

    /// Download and parse `company_tickers_exchange.json`
    pub async fn fetch_exchange_listings(&self) -> EdgarResult<Vec<ExchangeListing>> {
        let json = self.get_json(&self.www_url(COMPANY_TICKERS_EXCHANGE_PATH)).await?;
        datasets::parse_exchange_listings(&json)
    }

    /// Download and parse `company_tickers_mf.json`
    pub async fn fetch_mutual_funds(&self) -> EdgarResult<Vec<MutualFundTicker>> {
        let json = self.get_json(&self.www_url(MUTUAL_FUND_TICKERS_PATH)).await?;
        datasets::parse_mutual_funds(&json)
    }

    /// Download and parse `cik-lookup-data.txt`
    pub async fn fetch_cik_lookup(&self) -> EdgarResult<Vec<CikLookupEntry>> {
        let text = self.get(&self.www_url(CIK_LOOKUP_PATH)).await?.text().await?;
        Ok(datasets::parse_cik_lookup(&text))
    }

    /// Raw XBRL company facts for a CIK
    pub async fn fetch_company_facts(&self, cik: Cik) -> EdgarResult<Value> {
        self.get_json(&self.company_facts_url(cik)).await
    }

    /// Raw submissions history for a CIK
    pub async fn fetch_submissions(&self, cik: Cik) -> EdgarResult<Value> {
        self.get_json(&self.submissions_url(cik)).await
    }
}

#[async_trait]
impl EdgarDataSource for EdgarClient {
    async fn company_tickers(&self) -> EdgarResult<Vec<CompanyTicker>> {
        self.fetch_company_tickers().await
    }

    async fn company_facts(&self, cik: Cik) -> EdgarResult<Value> {
        self.fetch_company_facts(cik).await
    }

    async fn submissions(&self, cik: Cik) -> EdgarResult<Value> {
        self.fetch_submissions(cik).await
    }

    fn data_base_url(&self) -> String {
        self.data_base_url.clone()
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw).map_err(|e| anyhow!("Invalid base URL {:?}: {}", raw, e))?;
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
