//! XBRL company facts (`/api/xbrl/companyfacts/CIK##########.json`).
//!
//! The payload nests `facts -> taxonomy -> concept -> units -> unit -> [fact]`.
//! Each concept is flattened into one [`ConceptSeries`] holding the facts of its
//! first reported unit.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::{EdgarError, EdgarResult};
use crate::models::Cik;

/// Column headers of a concept sheet, in order
pub const FACT_COLUMNS: [&str; 8] = ["end", "val", "accn", "fy", "fp", "form", "filed", "frame"];

/// One reported value of a concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRow {
    pub end: String,
    pub val: f64,
    #[serde(default)]
    pub accn: String,
    #[serde(default)]
    pub fy: Option<i32>,
    #[serde(default)]
    pub fp: Option<String>,
    #[serde(default)]
    pub form: String,
    #[serde(default)]
    pub filed: String,
    #[serde(default)]
    pub frame: Option<String>,
}

/// All facts of one concept in one unit
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptSeries {
    pub concept: String,
    pub label: String,
    pub description: String,
    pub units: String,
    pub source_url: String,
    pub rows: Vec<FactRow>,
}

/// Parsed company facts keyed by taxonomy (`dei`, `us-gaap`, ...)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyFacts {
    pub entity_name: Option<String>,
    pub taxonomies: BTreeMap<String, Vec<ConceptSeries>>,
}

impl CompanyFacts {
    pub fn concept_count(&self) -> usize {
        self.taxonomies.values().map(Vec::len).sum()
    }
}

/// Human-facing URL of the single-concept API for a fact series
pub fn concept_source_url(data_base_url: &str, cik: Cik, taxonomy: &str, concept: &str) -> String {
    format!(
        "{}/api/xbrl/companyConcept/CIK{}/{}/{}.json",
        data_base_url.trim_end_matches('/'),
        cik.padded(),
        taxonomy,
        concept
    )
}

/// Fill in fiscal period and frame where the filer left them out.
///
/// Annual facts carry `fp == "FY"` or nothing, quarterly facts a quarter code;
/// frames follow `CY{year}`, `CY{year}Q{n}` or `CY{year}Q{n}I`.
pub fn normalize_period(row: &mut FactRow) {
    let fy = row.fy.map(|y| y.to_string()).unwrap_or_default();
    let annual_or_missing = matches!(row.fp.as_deref(), None | Some("FY"));

    let frame_len = row.frame.as_ref().map(|f| f.chars().count());

    match (frame_len, annual_or_missing) {
        (None, true) => {
            row.fp = Some("N/a".to_string());
            row.frame = Some(format!("CY{}", fy));
        }
        (None, false) => {
            let fp = row.fp.as_deref().unwrap_or_default();
            row.frame = Some(format!("CY{}{}I", fy, fp));
        }
        (Some(6), true) => row.fp = Some("N/A".to_string()),
        (Some(len), true) if len >= 9 => {
            row.fp = row.frame.as_ref().map(|f| f.chars().skip(6).take(2).collect());
        }
        _ => {}
    }
}

fn parse_concept(
    data_base_url: &str,
    cik: Cik,
    taxonomy: &str,
    concept: &str,
    data: &Value,
) -> Option<ConceptSeries> {
    let label = data.get("label").and_then(Value::as_str).unwrap_or_default();
    let description = data.get("description").and_then(Value::as_str).unwrap_or_default();

    // preserve_order keeps the units in document order; the first is the primary one
    let (units, facts) = match data.get("units").and_then(Value::as_object).and_then(|u| u.iter().next()) {
        Some(first) => first,
        None => {
            warn!("Concept {}/{} has no units, skipping", taxonomy, concept);
            return None;
        }
    };

    let mut rows = Vec::new();
    for fact in facts.as_array().map(Vec::as_slice).unwrap_or_default() {
        match serde_json::from_value::<FactRow>(fact.clone()) {
            Ok(mut row) => {
                normalize_period(&mut row);
                rows.push(row);
            }
            Err(e) => debug!("Skipping malformed fact in {}/{}: {}", taxonomy, concept, e),
        }
    }

    Some(ConceptSeries {
        concept: concept.to_string(),
        label: label.to_string(),
        description: description.to_string(),
        units: units.clone(),
        source_url: concept_source_url(data_base_url, cik, taxonomy, concept),
        rows,
    })
}

/// Parse a company facts payload into sorted taxonomies and concepts
pub fn parse_company_facts(json: &Value, cik: Cik, data_base_url: &str) -> EdgarResult<CompanyFacts> {
    let facts = json
        .get("facts")
        .and_then(Value::as_object)
        .ok_or(EdgarError::MissingField("facts"))?;

    let mut taxonomies = BTreeMap::new();
    for (taxonomy, concepts) in facts {
        let Some(concepts) = concepts.as_object() else {
            continue;
        };

        let mut names: Vec<&String> = concepts.keys().collect();
        names.sort();

        let series: Vec<ConceptSeries> = names
            .into_iter()
            .filter_map(|name| parse_concept(data_base_url, cik, taxonomy, name, &concepts[name.as_str()]))
            .collect();

        debug!("Parsed {} concepts in taxonomy {}", series.len(), taxonomy);
        taxonomies.insert(taxonomy.clone(), series);
    }

    Ok(CompanyFacts {
        entity_name: json.get("entityName").and_then(Value::as_str).map(str::to_string),
        taxonomies,
    })
}
