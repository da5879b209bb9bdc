//! Parsers for the static company directories the SEC publishes:
//!
//! - `company_tickers.json`: CIK, ticker and title for every listed company
//! - `company_tickers_exchange.json`: the same, with the listing exchange
//! - `company_tickers_mf.json`: mutual fund series/class identifiers
//! - `cik-lookup-data.txt`: every filer name that has ever held a CIK

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{EdgarError, EdgarResult};
use crate::models::{Cik, CikLookupEntry, CompanyTicker, ExchangeListing, MutualFundTicker};

/// `cik_str` is a number in the current file but has been published as a string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCik {
    Number(u64),
    Text(String),
}

impl RawCik {
    fn into_cik(self) -> EdgarResult<Cik> {
        match self {
            RawCik::Number(n) => Ok(Cik(n)),
            RawCik::Text(s) => s.parse(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCompanyTicker {
    cik_str: RawCik,
    ticker: String,
    title: String,
}

/// Parse `company_tickers.json`, keeping the file's key order
pub fn parse_company_tickers(json: &Value) -> EdgarResult<Vec<CompanyTicker>> {
    let entries = json
        .as_object()
        .ok_or(EdgarError::MissingField("company_tickers"))?;

    let mut companies = Vec::with_capacity(entries.len());
    for (key, entry) in entries {
        let raw: RawCompanyTicker = match serde_json::from_value(entry.clone()) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Skipping company_tickers entry {}: {}", key, e);
                continue;
            }
        };
        let cik = match raw.cik_str.into_cik() {
            Ok(cik) => cik,
            Err(e) => {
                debug!("Skipping company_tickers entry {}: {}", key, e);
                continue;
            }
        };
        companies.push(CompanyTicker {
            cik,
            ticker: raw.ticker,
            title: raw.title,
        });
    }

    Ok(companies)
}

/// Column layout of the `{ fields, data }` tabular files
struct FieldTable<'a> {
    fields: Vec<&'a str>,
    rows: &'a Vec<Value>,
}

impl<'a> FieldTable<'a> {
    fn from_json(json: &'a Value) -> EdgarResult<Self> {
        let fields = json
            .get("fields")
            .and_then(|f| f.as_array())
            .ok_or(EdgarError::MissingField("fields"))?
            .iter()
            .filter_map(|f| f.as_str())
            .collect();
        let rows = json
            .get("data")
            .and_then(|d| d.as_array())
            .ok_or(EdgarError::MissingField("data"))?;
        Ok(Self { fields, rows })
    }

    fn column(&self, names: &[&str], missing: &'static str) -> EdgarResult<usize> {
        self.fields
            .iter()
            .position(|f| names.contains(f))
            .ok_or(EdgarError::MissingField(missing))
    }
}

fn cell_text(row: &[Value], idx: usize) -> Option<String> {
    match row.get(idx)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn cell_cik(row: &[Value], idx: usize) -> Option<Cik> {
    match row.get(idx)? {
        Value::Number(n) => n.as_u64().map(Cik),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Parse `company_tickers_exchange.json`
pub fn parse_exchange_listings(json: &Value) -> EdgarResult<Vec<ExchangeListing>> {
    let table = FieldTable::from_json(json)?;
    let cik_col = table.column(&["cik"], "cik")?;
    let name_col = table.column(&["name"], "name")?;
    let ticker_col = table.column(&["ticker"], "ticker")?;
    let exchange_col = table.column(&["exchange"], "exchange")?;

    let listings = table
        .rows
        .iter()
        .filter_map(|row| row.as_array())
        .filter_map(|row| {
            Some(ExchangeListing {
                cik: cell_cik(row, cik_col)?,
                name: cell_text(row, name_col)?,
                ticker: cell_text(row, ticker_col)?,
                exchange: cell_text(row, exchange_col),
            })
        })
        .collect();

    Ok(listings)
}

/// Parse `company_tickers_mf.json`
pub fn parse_mutual_funds(json: &Value) -> EdgarResult<Vec<MutualFundTicker>> {
    let table = FieldTable::from_json(json)?;
    let cik_col = table.column(&["cik", "cikNumber"], "cik")?;
    let series_col = table.column(&["seriesId"], "seriesId")?;
    let class_col = table.column(&["classId"], "classId")?;
    let symbol_col = table.column(&["symbol"], "symbol")?;

    let funds = table
        .rows
        .iter()
        .filter_map(|row| row.as_array())
        .filter_map(|row| {
            Some(MutualFundTicker {
                cik: cell_cik(row, cik_col)?,
                series_id: cell_text(row, series_col)?,
                class_id: cell_text(row, class_col)?,
                symbol: cell_text(row, symbol_col)?,
            })
        })
        .collect();

    Ok(funds)
}

/// Parse `cik-lookup-data.txt`, one `NAME:CIK:` record per line.
///
/// Filer names may contain colons, so the CIK is taken from the last field.
pub fn parse_cik_lookup(text: &str) -> Vec<CikLookupEntry> {
    let mut entries = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        let body = line.strip_suffix(':').unwrap_or(line);
        let Some((name, cik)) = body.rsplit_once(':') else {
            debug!("Skipping malformed cik-lookup line {}: {:?}", line_no + 1, line);
            continue;
        };

        match cik.parse::<Cik>() {
            Ok(cik) => entries.push(CikLookupEntry {
                name: name.to_string(),
                cik,
            }),
            Err(_) => debug!("Skipping cik-lookup line {} with bad CIK: {:?}", line_no + 1, line),
        }
    }

    entries
}
