//! Download pipeline: company facts + submissions -> workbook on disk.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use crate::api::EdgarDataSource;
use crate::facts::parse_company_facts;
use crate::models::{CompanyMatch, Config};
use crate::report::{write_company_facts, write_company_summary, write_filings};
use crate::search::CompanyIndex;
use crate::submissions::parse_submissions;
use crate::workbook::{Workbook, WorkbookFormat};

/// Where and how a download is written
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub output_dir: PathBuf,
    pub max_concepts_per_taxonomy: Option<usize>,
    pub format: WorkbookFormat,
}

impl DownloadOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            max_concepts_per_taxonomy: config.max_concepts_per_taxonomy,
            format: WorkbookFormat::default(),
        }
    }
}

/// Summary of a finished download
#[derive(Debug, Clone)]
pub struct DownloadReport {
    pub company: CompanyMatch,
    pub path: PathBuf,
    pub sheets: usize,
    pub concepts: usize,
    pub filings: usize,
    pub form_types: usize,
    pub finished_at: DateTime<Utc>,
}

/// File stem for a company's workbook, e.g. `AAPL_0000320193`
pub fn output_stem(company: &CompanyMatch) -> String {
    let ticker: String = company
        .ticker
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if ticker.is_empty() {
        company.cik.padded()
    } else {
        format!("{}_{}", ticker, company.cik.padded())
    }
}

/// Fetch the ticker directory and index it
pub async fn load_company_index<S: EdgarDataSource + ?Sized>(source: &S) -> Result<CompanyIndex> {
    let companies = source
        .company_tickers()
        .await
        .context("Failed to download the SEC company ticker list")?;
    info!("Loaded {} companies from the SEC ticker list", companies.len());
    Ok(CompanyIndex::build(&companies))
}

/// Workbook for one company plus what went into it
#[derive(Debug, Clone)]
pub struct CompanyWorkbook {
    pub workbook: Workbook,
    pub concepts: usize,
    pub filings: usize,
    pub form_types: usize,
}

/// Build the in-memory workbook for a company without saving it
pub async fn build_company_workbook<S: EdgarDataSource + ?Sized>(
    source: &S,
    company: &CompanyMatch,
    max_concepts_per_taxonomy: Option<usize>,
) -> Result<CompanyWorkbook> {
    let cik = company.cik;

    let (facts_json, submissions_json) =
        futures::try_join!(source.company_facts(cik), source.submissions(cik))
            .with_context(|| format!("Failed to download EDGAR data for {}", company))?;

    let facts = parse_company_facts(&facts_json, cik, &source.data_base_url())?;
    let submissions = parse_submissions(&submissions_json, cik)?;

    let mut wb = Workbook::new();
    write_company_summary(&mut wb, &submissions.profile)?;
    let form_types = write_filings(&mut wb, &submissions.filings)?;
    let concepts = write_company_facts(&mut wb, &facts, max_concepts_per_taxonomy)?;

    Ok(CompanyWorkbook {
        workbook: wb,
        concepts,
        filings: submissions.filings.len(),
        form_types,
    })
}

/// Download everything for `company` and save the workbook
pub async fn download_company<S: EdgarDataSource + ?Sized>(
    source: &S,
    company: &CompanyMatch,
    options: &DownloadOptions,
) -> Result<DownloadReport> {
    let started = Instant::now();
    info!("Downloading SEC data for {}", company);

    let built = build_company_workbook(source, company, options.max_concepts_per_taxonomy).await?;

    let target = options.output_dir.join(output_stem(company));
    let path = built.workbook.save(&target, options.format)?;

    info!(
        "Wrote {} sheets ({} concepts, {} filings) for {} in {:.1}s",
        built.workbook.sheets().len(),
        built.concepts,
        built.filings,
        company.ticker,
        started.elapsed().as_secs_f64()
    );

    Ok(DownloadReport {
        company: company.clone(),
        path,
        sheets: built.workbook.sheets().len(),
        concepts: built.concepts,
        filings: built.filings,
        form_types: built.form_types,
        finished_at: Utc::now(),
    })
}
