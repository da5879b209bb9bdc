//! Company lookup from a parsed ticker list through the prompts and browser state

use crossterm::event::KeyCode;
use pretty_assertions::assert_eq;
use std::io::Cursor;
use test_log::test;

use crate::common::fixtures;
use crate::common::logging::log_test_step;
use edgar_workbook::datasets::parse_company_tickers;
use edgar_workbook::models::Cik;
use edgar_workbook::search::{CompanyIndex, SearchOutcome};
use edgar_workbook::ui::{prompt_search, BrowserAction, BrowserState};

fn index() -> CompanyIndex {
    let tickers = parse_company_tickers(&fixtures::company_tickers_json()).unwrap();
    CompanyIndex::build(&tickers)
}

#[test]
fn test_search_outcomes_over_fixture_list() {
    log_test_step("Searching the fixture ticker list");
    let index = index();

    assert_eq!(index.len(), 4);
    assert!(matches!(index.search("msft"), SearchOutcome::Single(ref m) if m.cik == Cik(789019)));
    assert!(matches!(index.search("Alphabet Inc."), SearchOutcome::Multiple(ref v) if v.len() == 2));
    assert!(matches!(index.search("0000320193"), SearchOutcome::Single(ref m) if m.ticker == "AAPL"));
    assert_eq!(index.search("Nonexistent Holdings"), SearchOutcome::NotFound);
}

#[test]
fn test_prompt_search_recovers_from_typos() {
    let mut input = Cursor::new(b"micrsoft\nmicrosoft corp\n".to_vec());
    let mut output = Vec::new();

    let picked = prompt_search(&index(), &mut input, &mut output).unwrap();

    assert_eq!(picked.map(|m| m.ticker), Some("MSFT".to_string()));
    let transcript = String::from_utf8(output).unwrap();
    assert!(transcript.contains("No companies found for 'micrsoft'"));
    assert!(transcript.contains("MICROSOFT CORP (MSFT)"));
}

#[test]
fn test_browser_over_sorted_companies() {
    let companies = index().sorted_companies();
    let titles: Vec<_> = companies.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Alphabet Inc.", "Alphabet Inc.", "Apple Inc.", "MICROSOFT CORP"]);

    let mut state = BrowserState::new(companies, 2);
    state.handle_key(KeyCode::Char('M'));
    assert_eq!(state.pager().page, 1);

    state.handle_key(KeyCode::Char('4'));
    match state.handle_key(KeyCode::Enter) {
        BrowserAction::Select(company) => assert_eq!(company.ticker, "MSFT"),
        other => panic!("expected MSFT, got {:?}", other),
    }
}
