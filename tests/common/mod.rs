//! Common test utilities and helpers

pub mod mock_edgar;

/// Canned EDGAR payloads
pub mod fixtures {
    use edgar_workbook::models::Config;
    use serde_json::{json, Value};
    use std::path::Path;

    pub const TEST_USER_AGENT: &str = "edgar-workbook-tests admin@example.com";

    /// Config pointing both EDGAR hosts at `base_url`
    pub fn test_config(base_url: &str, output_dir: &Path) -> Config {
        Config {
            user_agent: TEST_USER_AGENT.to_string(),
            rate_limit_per_second: 100,
            www_base_url: base_url.to_string(),
            data_base_url: base_url.to_string(),
            request_timeout_secs: 5,
            output_dir: output_dir.to_path_buf(),
            max_concepts_per_taxonomy: None,
        }
    }

    pub fn company_tickers_json() -> Value {
        json!({
            "0": { "cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc." },
            "1": { "cik_str": 789019, "ticker": "MSFT", "title": "MICROSOFT CORP" },
            "2": { "cik_str": 1652044, "ticker": "GOOGL", "title": "Alphabet Inc." },
            "3": { "cik_str": "1652044", "ticker": "GOOG", "title": "Alphabet Inc." }
        })
    }

    pub fn exchange_listings_json() -> Value {
        json!({
            "fields": ["cik", "name", "ticker", "exchange"],
            "data": [
                [320193, "Apple Inc.", "AAPL", "Nasdaq"],
                [789019, "MICROSOFT CORP", "MSFT", "Nasdaq"],
                [1234567, "Unlisted Co", "UNLS", null]
            ]
        })
    }

    pub fn mutual_funds_json() -> Value {
        json!({
            "fields": ["cikNumber", "seriesId", "classId", "symbol"],
            "data": [
                [2110, "S000009184", "C000024954", "LACAX"],
                [2110, "S000009184", "C000024956", "LIACX"]
            ]
        })
    }

    pub fn cik_lookup_text() -> &'static str {
        "!J INC:0001438823:\nAPPLE INC:0000320193:\nA/S ABC: HOLDING:0000123456:\n"
    }

    /// Two taxonomies; `dei` has a frameless annual fact, `us-gaap` a quarterly one
    pub fn company_facts_json() -> Value {
        json!({
            "cik": 320193,
            "entityName": "Apple Inc.",
            "facts": {
                "dei": {
                    "EntityCommonStockSharesOutstanding": {
                        "label": "Entity Common Stock, Shares Outstanding",
                        "description": "Shares outstanding.",
                        "units": { "shares": [
                            { "end": "2023-10-20", "val": 15552752000u64, "accn": "0000320193-23-000106",
                              "fy": 2023, "fp": "FY", "form": "10-K", "filed": "2023-11-03" }
                        ] }
                    }
                },
                "us-gaap": {
                    "Assets": {
                        "label": "Assets",
                        "description": "Total assets.",
                        "units": { "USD": [
                            { "end": "2023-07-01", "val": 335038000000u64, "accn": "0000320193-23-000077",
                              "fy": 2023, "fp": "Q3", "form": "10-Q", "filed": "2023-08-04", "frame": "CY2023Q2I" }
                        ] }
                    },
                    "Revenues": {
                        "label": "Revenues",
                        "description": "Revenue.",
                        "units": { "USD": [
                            { "end": "2023-07-01", "val": 81797000000u64, "accn": "0000320193-23-000077",
                              "fy": 2023, "fp": "Q3", "form": "10-Q", "filed": "2023-08-04" }
                        ] }
                    }
                }
            }
        })
    }

    pub fn submissions_json() -> Value {
        json!({
            "cik": "320193",
            "entityType": "operating",
            "sic": "3571",
            "sicDescription": "Electronic Computers",
            "insiderTransactionForOwnerExists": 0,
            "insiderTransactionForIssuerExists": 1,
            "name": "Apple Inc.",
            "tickers": ["AAPL"],
            "exchanges": ["Nasdaq"],
            "ein": "942404110",
            "fiscalYearEnd": "0930",
            "stateOfIncorporation": "CA",
            "addresses": { "business": {
                "street1": "ONE APPLE PARK WAY", "city": "CUPERTINO",
                "stateOrCountry": "CA", "zipCode": "95014"
            } },
            "phone": "(408) 996-1010",
            "filings": { "recent": {
                "accessionNumber": ["0000320193-23-000106", "0000320193-23-000077", "0000320193-23-000075"],
                "reportDate": ["2023-09-30", "2023-07-01", ""],
                "form": ["10-K", "10-Q", "8-K"],
                "primaryDocument": ["aapl-20230930.htm", "aapl-20230701.htm", "aapl-20230803.htm"]
            } }
        })
    }
}

/// Logging utilities for tests
pub mod logging {
    use std::sync::Once;
    use tracing::{debug, info};

    static INIT: Once = Once::new();

    /// Initialize test logging
    pub fn init_test_logging() {
        INIT.call_once(|| {
            // test_log may already have installed a subscriber
            let _ = tracing::subscriber::set_global_default(
                tracing_subscriber::fmt()
                    .with_env_filter("edgar_workbook=debug,main=debug")
                    .with_test_writer()
                    .finish(),
            );
        });
    }

    /// Log test step
    pub fn log_test_step(step: &str) {
        info!("🧪 Test Step: {}", step);
    }

    /// Log test data
    pub fn log_test_data<T: std::fmt::Debug>(label: &str, data: &T) {
        debug!("📊 {}: {:?}", label, data);
    }
}
