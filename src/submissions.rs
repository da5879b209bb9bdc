//! Company submissions history (`/submissions/CIK##########.json`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{EdgarError, EdgarResult};
use crate::models::Cik;

const ARCHIVES_BASE_URL: &str = "https://www.sec.gov/Archives/edgar/data";
const NOT_AVAILABLE: &str = "N/A";

/// Descriptive company information from the submissions payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub cik: Option<String>,
    pub entity_type: Option<String>,
    pub sic: Option<String>,
    pub sic_description: Option<String>,
    pub owner_org: Option<String>,
    pub insider_transaction_for_owner: Option<bool>,
    pub insider_transaction_for_issuer: Option<bool>,
    pub name: Option<String>,
    pub ticker: Option<String>,
    pub exchange: Option<String>,
    pub ein: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub investor_website: Option<String>,
    pub category: Option<String>,
    pub fiscal_year_end: Option<String>,
    pub state_of_incorporation: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl CompanyProfile {
    /// Field names and display values, in sheet column order
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        fn text(v: &Option<String>) -> String {
            v.clone().unwrap_or_default()
        }
        fn flag(v: &Option<bool>) -> String {
            v.map(|b| b.to_string()).unwrap_or_default()
        }

        vec![
            ("cik", text(&self.cik)),
            ("entityType", text(&self.entity_type)),
            ("sic", text(&self.sic)),
            ("sicDescription", text(&self.sic_description)),
            ("ownerOrg", text(&self.owner_org)),
            ("insiderTransactionForOwner", flag(&self.insider_transaction_for_owner)),
            ("insiderTransactionForIssuer", flag(&self.insider_transaction_for_issuer)),
            ("name", text(&self.name)),
            ("ticker", text(&self.ticker)),
            ("exchange", text(&self.exchange)),
            ("ein", text(&self.ein)),
            ("description", text(&self.description)),
            ("website", text(&self.website)),
            ("investorWebsite", text(&self.investor_website)),
            ("category", text(&self.category)),
            ("fiscalYearEnd", text(&self.fiscal_year_end)),
            ("stateOfIncorporation", text(&self.state_of_incorporation)),
            ("address", text(&self.address)),
            ("phone", text(&self.phone)),
        ]
    }
}

/// One recent filing with a link to its primary document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingRecord {
    pub report_date: String,
    pub form: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submissions {
    pub profile: CompanyProfile,
    pub filings: Vec<FilingRecord>,
}

/// Primary document URL: `{archives}/{cik}/{accession without dashes}/{document}`
pub fn filing_document_url(cik: Cik, accession_number: &str, primary_document: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        ARCHIVES_BASE_URL,
        cik,
        accession_number.replace('-', ""),
        primary_document
    )
}

/// Strings are passed through; numbers and booleans are rendered; null and
/// empty values are dropped.
fn scalar(json: &Value, key: &str) -> Option<String> {
    match json.get(key)? {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn flag(json: &Value, key: &str) -> Option<bool> {
    match json.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|v| v != 0),
        _ => None,
    }
}

fn first_of(json: &Value, key: &str) -> Option<String> {
    json.get(key)?
        .as_array()?
        .first()?
        .as_str()
        .map(str::to_string)
}

/// Flatten the business address into one line
fn business_address(json: &Value) -> Option<String> {
    let business = json.get("addresses")?.get("business")?;
    if !business.is_object() {
        return None;
    }

    let part = |key: &str| {
        business
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let line = format!(
        "{}, {}, {} {}",
        part("street1"),
        part("city"),
        part("stateOrCountry"),
        part("zipCode")
    );
    Some(line.trim().to_string())
}

pub fn parse_company_profile(json: &Value) -> CompanyProfile {
    CompanyProfile {
        cik: scalar(json, "cik"),
        entity_type: scalar(json, "entityType"),
        sic: scalar(json, "sic"),
        sic_description: scalar(json, "sicDescription"),
        owner_org: scalar(json, "ownerOrg"),
        insider_transaction_for_owner: flag(json, "insiderTransactionForOwnerExists"),
        insider_transaction_for_issuer: flag(json, "insiderTransactionForIssuerExists"),
        name: scalar(json, "name"),
        ticker: first_of(json, "tickers"),
        exchange: first_of(json, "exchanges"),
        ein: scalar(json, "ein"),
        description: scalar(json, "description"),
        website: scalar(json, "website"),
        investor_website: scalar(json, "investorWebsite"),
        category: scalar(json, "category"),
        fiscal_year_end: scalar(json, "fiscalYearEnd"),
        state_of_incorporation: scalar(json, "stateOfIncorporation"),
        address: business_address(json),
        phone: scalar(json, "phone"),
    }
}

fn column<'a>(recent: &'a Value, key: &str) -> &'a [Value] {
    recent
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn text_at(values: &[Value], i: usize) -> &str {
    values.get(i).and_then(Value::as_str).unwrap_or_default()
}

fn or_not_available(s: &str) -> String {
    if s.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        s.to_string()
    }
}

/// Build filing records from the column arrays in `filings.recent`
pub fn parse_recent_filings(recent: &Value, cik: Cik) -> Vec<FilingRecord> {
    let accessions = column(recent, "accessionNumber");
    let report_dates = column(recent, "reportDate");
    let forms = column(recent, "form");
    let documents = column(recent, "primaryDocument");

    let filings: Vec<FilingRecord> = accessions
        .iter()
        .enumerate()
        .filter_map(|(i, accession)| {
            let accession = accession.as_str()?;
            Some(FilingRecord {
                report_date: or_not_available(text_at(report_dates, i)),
                form: or_not_available(text_at(forms, i)),
                url: filing_document_url(cik, accession, text_at(documents, i)),
            })
        })
        .collect();

    debug!("Parsed {} recent filings for CIK {}", filings.len(), cik);
    filings
}

/// Parse a submissions payload into profile and filings
pub fn parse_submissions(json: &Value, cik: Cik) -> EdgarResult<Submissions> {
    let recent = json
        .get("filings")
        .and_then(|f| f.get("recent"))
        .ok_or(EdgarError::MissingField("filings.recent"))?;

    Ok(Submissions {
        profile: parse_company_profile(json),
        filings: parse_recent_filings(recent, cik),
    })
}

/// Group filings by form type; forms sorted, filings keep their order
pub fn group_by_form(filings: &[FilingRecord]) -> BTreeMap<String, Vec<FilingRecord>> {
    let mut grouped: BTreeMap<String, Vec<FilingRecord>> = BTreeMap::new();
    for filing in filings {
        grouped.entry(filing.form.clone()).or_default().push(filing.clone());
    }
    grouped
}
