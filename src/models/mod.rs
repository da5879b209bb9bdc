use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::EdgarError;

/// Central Index Key assigned by the SEC to every filing entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cik(pub u64);

impl Cik {
    /// Ten-digit zero-padded form used in data.sec.gov URLs
    pub fn padded(&self) -> String {
        format!("{:010}", self.0)
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Cik {
    type Err = EdgarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.len() > 10 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(EdgarError::InvalidCik(s.to_string()));
        }
        trimmed
            .parse::<u64>()
            .map(Cik)
            .map_err(|_| EdgarError::InvalidCik(s.to_string()))
    }
}

/// One entry of `company_tickers.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyTicker {
    pub cik: Cik,
    pub ticker: String,
    pub title: String,
}

/// One row of `company_tickers_exchange.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeListing {
    pub cik: Cik,
    pub name: String,
    pub ticker: String,
    pub exchange: Option<String>,
}

/// One row of `company_tickers_mf.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutualFundTicker {
    pub cik: Cik,
    pub series_id: String,
    pub class_id: String,
    pub symbol: String,
}

/// One line of `cik-lookup-data.txt`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CikLookupEntry {
    pub name: String,
    pub cik: Cik,
}

/// Company picked by the user for download
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyMatch {
    pub title: String,
    pub ticker: String,
    pub cik: Cik,
}

impl From<&CompanyTicker> for CompanyMatch {
    fn from(t: &CompanyTicker) -> Self {
        Self {
            title: t.title.clone(),
            ticker: t.ticker.clone(),
            cik: t.cik,
        }
    }
}

impl fmt::Display for CompanyMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Ticker: {}, CIK: {})", self.title, self.ticker, self.cik)
    }
}

pub const DEFAULT_USER_AGENT: &str = "edgar-workbook/1.0 (contact@example.com)";
pub const DEFAULT_WWW_BASE_URL: &str = "https://www.sec.gov";
pub const DEFAULT_DATA_BASE_URL: &str = "https://data.sec.gov";

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub user_agent: String,
    pub rate_limit_per_second: u32,
    pub www_base_url: String,
    pub data_base_url: String,
    pub request_timeout_secs: u64,
    pub output_dir: PathBuf,
    pub max_concepts_per_taxonomy: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            rate_limit_per_second: 10,
            www_base_url: DEFAULT_WWW_BASE_URL.to_string(),
            data_base_url: DEFAULT_DATA_BASE_URL.to_string(),
            request_timeout_secs: 30,
            output_dir: PathBuf::from("edgar_output"),
            max_concepts_per_taxonomy: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let defaults = Config::default();

        let rate_limit_per_second = std::env::var("EDGAR_RATE_LIMIT_PER_SECOND")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.rate_limit_per_second);

        let max_concepts_per_taxonomy = match std::env::var("EDGAR_MAX_CONCEPTS_PER_TAXONOMY") {
            Ok(v) if !v.trim().is_empty() => {
                let limit = v.trim().parse::<usize>().ok().filter(|n| *n > 0).ok_or_else(|| {
                    anyhow::anyhow!("EDGAR_MAX_CONCEPTS_PER_TAXONOMY must be a positive integer, got {:?}", v)
                })?;
                Some(limit)
            }
            _ => None,
        };

        Ok(Config {
            user_agent: std::env::var("EDGAR_USER_AGENT").unwrap_or(defaults.user_agent),
            rate_limit_per_second,
            www_base_url: std::env::var("EDGAR_WWW_BASE_URL").unwrap_or(defaults.www_base_url),
            data_base_url: std::env::var("EDGAR_DATA_BASE_URL").unwrap_or(defaults.data_base_url),
            request_timeout_secs: std::env::var("EDGAR_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            output_dir: std::env::var("EDGAR_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            max_concepts_per_taxonomy,
        })
    }
}
