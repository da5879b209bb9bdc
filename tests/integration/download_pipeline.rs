//! Ticker lookup through to a saved workbook, against a mock EDGAR server

use pretty_assertions::assert_eq;
use std::path::Path;

use crate::common::fixtures::test_config;
use crate::common::logging::{init_test_logging, log_test_data, log_test_step};
use crate::common::mock_edgar::{self, mount_status, APPLE_SUBMISSIONS_PATH};
use edgar_workbook::api::EdgarClient;
use edgar_workbook::models::{CompanyMatch, Config};
use edgar_workbook::pipeline::{build_company_workbook, download_company, load_company_index, DownloadOptions};
use edgar_workbook::search::SearchOutcome;
use edgar_workbook::workbook::{CellValue, WorkbookFormat};

fn options(config: &Config, format: WorkbookFormat) -> DownloadOptions {
    DownloadOptions {
        format,
        ..DownloadOptions::from_config(config)
    }
}

async fn find_apple(client: &EdgarClient) -> CompanyMatch {
    let index = load_company_index(client).await.unwrap();
    match index.search("aapl") {
        SearchOutcome::Single(company) => company,
        other => panic!("expected a single match for AAPL, got {:?}", other),
    }
}

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

fn read_manifest(dir: &Path) -> Vec<(String, String)> {
    let mut reader = csv::Reader::from_path(dir.join("workbook.csv")).unwrap();
    reader
        .records()
        .map(|r| {
            let r = r.unwrap();
            (r[1].to_string(), r[2].to_string())
        })
        .collect()
}

#[tokio::test]
async fn test_download_to_csv_directory() {
    init_test_logging();
    log_test_step("Downloading Apple as CSV sheets");

    let server = mock_edgar::edgar_server().await;
    let out = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), out.path());
    let client = EdgarClient::new(&config).unwrap();

    let apple = find_apple(&client).await;
    let report = download_company(&client, &apple, &options(&config, WorkbookFormat::Csv))
        .await
        .unwrap();
    log_test_data("report", &report);

    assert_eq!(report.path, out.path().join("AAPL_0000320193"));
    assert_eq!((report.sheets, report.concepts, report.filings, report.form_types), (6, 3, 3, 3));

    let manifest = read_manifest(&report.path);
    let sheets: Vec<_> = manifest.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        sheets,
        vec![
            "Company Summary",
            "SEC Filing Links",
            "Company SEC Data Summary",
            "deiSheet1",
            "us-gaapSheet1",
            "us-gaapSheet2",
        ]
    );
    for (_, file) in &manifest {
        assert!(report.path.join(file).exists(), "missing {}", file);
    }
    assert_eq!(manifest[3].1, "004_deiSheet1.csv");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(report.path.join("001_Company_Summary.csv"))
        .unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(&rows[0][0], "cik");
    assert_eq!(&rows[1][7], "Apple Inc.");
}

#[tokio::test]
async fn test_download_to_xlsx() {
    init_test_logging();
    let server = mock_edgar::edgar_server().await;
    let out = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), out.path());
    let client = EdgarClient::new(&config).unwrap();

    let apple = find_apple(&client).await;
    let report = download_company(&client, &apple, &options(&config, WorkbookFormat::Xlsx))
        .await
        .unwrap();

    assert_eq!(report.path, out.path().join("AAPL_0000320193.xlsx"));
    let size = std::fs::metadata(&report.path).unwrap().len();
    assert!(size > 0);
}

#[tokio::test]
async fn test_workbook_contents_are_normalized() {
    init_test_logging();
    let server = mock_edgar::edgar_server().await;
    let config = test_config(&server.uri(), Path::new("unused"));
    let client = EdgarClient::new(&config).unwrap();

    let apple = find_apple(&client).await;
    let built = build_company_workbook(&client, &apple, None).await.unwrap();
    let wb = &built.workbook;

    // Annual fact without a frame gets a calendar-year frame
    let dei = wb.sheet("deiSheet1").unwrap();
    assert_eq!(dei.get("E2"), Some(&text("N/a")));
    assert_eq!(dei.get("H2"), Some(&text("CY2023")));

    // Quarterly fact keeps its period; a missing frame is rebuilt as an instant frame
    let assets = wb.sheet("us-gaapSheet1").unwrap();
    assert_eq!(assets.get("E2"), Some(&text("Q3")));
    assert_eq!(assets.get("H2"), Some(&text("CY2023Q2I")));
    let revenues = wb.sheet("us-gaapSheet2").unwrap();
    assert_eq!(revenues.get("H2"), Some(&text("CY2023Q3I")));

    let filings = wb.sheet("SEC Filing Links").unwrap();
    assert_eq!(filings.get("A2"), Some(&text("2023-09-30")));
    assert_eq!(
        filings.get("C2"),
        Some(&text("https://www.sec.gov/Archives/edgar/data/320193/000032019323000106/aapl-20230930.htm"))
    );
    assert_eq!(filings.get("I1"), Some(&text("Report Date:")));
    assert_eq!(filings.get("I2"), Some(&text("N/A")));
    assert_eq!(filings.get("J2"), Some(&text("8-K")));

    let summary = wb.sheet("Company Summary").unwrap();
    assert_eq!(summary.get("F2"), Some(&text("false")));
    assert_eq!(summary.get("G2"), Some(&text("true")));
    assert_eq!(summary.get("J2"), Some(&text("Nasdaq")));
    assert_eq!(summary.get("R2"), Some(&text("ONE APPLE PARK WAY, CUPERTINO, CA 95014")));

    // Concept links point at the configured data host
    let concepts = wb.sheet("Company SEC Data Summary").unwrap();
    let link = format!("{}/api/xbrl/companyConcept/CIK0000320193/dei/", server.uri());
    match concepts.get("E2") {
        Some(CellValue::Text(url)) => assert!(url.starts_with(&link), "{} vs {}", url, link),
        other => panic!("expected a concept URL, got {:?}", other),
    }
}

#[tokio::test]
async fn test_concept_limit_applies_per_taxonomy() {
    init_test_logging();
    let server = mock_edgar::edgar_server().await;
    let config = test_config(&server.uri(), Path::new("unused"));
    let client = EdgarClient::new(&config).unwrap();

    let apple = find_apple(&client).await;
    let built = build_company_workbook(&client, &apple, Some(1)).await.unwrap();

    assert_eq!(built.concepts, 2);
    assert!(built.workbook.has_sheet("us-gaapSheet1"));
    assert!(!built.workbook.has_sheet("us-gaapSheet2"));
}

#[tokio::test]
async fn test_failed_submissions_request_fails_the_download() {
    init_test_logging();
    let server = wiremock::MockServer::start().await;
    mock_edgar::mount_json(
        &server,
        mock_edgar::APPLE_FACTS_PATH,
        crate::common::fixtures::company_facts_json(),
    )
    .await;
    mount_status(&server, APPLE_SUBMISSIONS_PATH, 500).await;

    let out = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), out.path());
    let client = EdgarClient::new(&config).unwrap();
    let apple = CompanyMatch {
        title: "Apple Inc.".to_string(),
        ticker: "AAPL".to_string(),
        cik: edgar_workbook::models::Cik(320193),
    };

    let err = download_company(&client, &apple, &options(&config, WorkbookFormat::Csv))
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("500"));
    assert!(!out.path().join("AAPL_0000320193").exists());
}
