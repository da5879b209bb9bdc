//! Company lookup over the SEC ticker directory.
//!
//! Three hash indexes (ticker, title, CIK) give exact lookups; titles can also
//! be scanned for substrings, and a fuzzy ranking is available when nothing
//! matches outright.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::HashMap;
use std::ops::Range;
use tracing::debug;

use crate::models::{Cik, CompanyMatch, CompanyTicker};

/// Result of a free-text company search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    NotFound,
    Single(CompanyMatch),
    Multiple(Vec<CompanyMatch>),
}

impl SearchOutcome {
    fn from_matches(mut matches: Vec<CompanyMatch>) -> Self {
        match matches.len() {
            0 => SearchOutcome::NotFound,
            1 => SearchOutcome::Single(matches.remove(0)),
            _ => SearchOutcome::Multiple(matches),
        }
    }
}

/// How a query was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Cik,
    Ticker,
    Title,
}

/// Classify raw user input: digits are a CIK, a single alphanumeric word is a
/// ticker, anything with spaces or punctuation is a title.
pub fn classify_query(query: &str) -> QueryKind {
    let q = query.trim();
    if !q.is_empty() && q.chars().all(|c| c.is_ascii_digit()) {
        QueryKind::Cik
    } else if !q.is_empty() && q.chars().all(|c| c.is_alphanumeric()) {
        QueryKind::Ticker
    } else {
        QueryKind::Title
    }
}

/// Hash indexes over the company directory
#[derive(Debug, Clone, Default)]
pub struct CompanyIndex {
    companies: Vec<CompanyTicker>,
    by_ticker: HashMap<String, Vec<usize>>,
    by_title: HashMap<String, Vec<usize>>,
    by_cik: HashMap<Cik, Vec<usize>>,
}

impl CompanyIndex {
    pub fn build(companies: &[CompanyTicker]) -> Self {
        let mut index = CompanyIndex {
            companies: companies.to_vec(),
            ..Default::default()
        };

        for (i, company) in index.companies.iter().enumerate() {
            index
                .by_ticker
                .entry(company.ticker.to_lowercase())
                .or_default()
                .push(i);
            index
                .by_title
                .entry(company.title.to_lowercase())
                .or_default()
                .push(i);
            index.by_cik.entry(company.cik).or_default().push(i);
        }

        debug!(
            "Indexed {} companies ({} tickers, {} titles, {} CIKs)",
            index.companies.len(),
            index.by_ticker.len(),
            index.by_title.len(),
            index.by_cik.len()
        );
        index
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    fn collect(&self, ids: &[usize]) -> Vec<CompanyMatch> {
        ids.iter().map(|&i| CompanyMatch::from(&self.companies[i])).collect()
    }

    /// Case-insensitive exact ticker lookup
    pub fn search_by_ticker(&self, ticker: &str) -> Vec<CompanyMatch> {
        self.by_ticker
            .get(&ticker.trim().to_lowercase())
            .map(|ids| self.collect(ids))
            .unwrap_or_default()
    }

    /// CIK lookup; leading zeros are ignored
    pub fn search_by_cik(&self, cik: &str) -> Vec<CompanyMatch> {
        cik.parse::<Cik>()
            .ok()
            .and_then(|cik| self.by_cik.get(&cik))
            .map(|ids| self.collect(ids))
            .unwrap_or_default()
    }

    /// Case-insensitive title lookup, exact or by substring
    pub fn search_by_title(&self, title: &str, partial: bool) -> Vec<CompanyMatch> {
        let target = title.trim().to_lowercase();
        if !partial {
            return self
                .by_title
                .get(&target)
                .map(|ids| self.collect(ids))
                .unwrap_or_default();
        }

        let mut ids: Vec<usize> = self
            .by_title
            .iter()
            .filter(|(t, _)| t.contains(&target))
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect();
        // Directory order
        ids.sort_unstable();
        self.collect(&ids)
    }

    /// Interpret the query and search the matching index
    pub fn search(&self, query: &str) -> SearchOutcome {
        let query = query.trim();
        let matches = match classify_query(query) {
            QueryKind::Cik => {
                debug!("Searching by CIK: {}", query);
                self.search_by_cik(query)
            }
            QueryKind::Ticker => {
                debug!("Searching by ticker: {}", query);
                let found = self.search_by_ticker(query);
                if found.is_empty() {
                    debug!("No ticker {}, falling back to title search", query);
                    self.search_by_title(query, true)
                } else {
                    found
                }
            }
            QueryKind::Title => {
                debug!("Searching by title: {}", query);
                self.search_by_title(query, true)
            }
        };
        SearchOutcome::from_matches(matches)
    }

    /// Rank companies by fuzzy similarity of title or ticker
    pub fn fuzzy_search(&self, query: &str, limit: usize) -> Vec<CompanyMatch> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default().ignore_case();
        let mut scored: Vec<(i64, usize)> = self
            .companies
            .iter()
            .enumerate()
            .filter_map(|(i, c)| {
                let title_score = matcher.fuzzy_match(&c.title, query);
                // Ticker hits score double
                let ticker_score = matcher.fuzzy_match(&c.ticker, query).map(|s| s * 2);
                title_score.max(ticker_score).map(|score| (score, i))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, i)| CompanyMatch::from(&self.companies[i]))
            .collect()
    }

    /// Every company ordered by title, then ticker
    pub fn sorted_companies(&self) -> Vec<CompanyMatch> {
        let mut all: Vec<CompanyMatch> = self.companies.iter().map(CompanyMatch::from).collect();
        all.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.ticker.cmp(&b.ticker))
        });
        all
    }
}

/// Pick a company by its 1-based row number
pub fn select_row(companies: &[CompanyMatch], row: usize) -> Option<&CompanyMatch> {
    row.checked_sub(1).and_then(|i| companies.get(i))
}

/// Page cursor over a sorted company list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub total: usize,
    pub page_size: usize,
    pub page: usize,
}

impl Pager {
    pub fn new(total: usize, page_size: usize) -> Self {
        Self {
            total,
            page_size: page_size.max(1),
            page: 0,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }

    pub fn next(&mut self) -> bool {
        if self.page + 1 < self.total_pages() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn back(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Index range of the rows on the current page
    pub fn range(&self) -> Range<usize> {
        let start = (self.page * self.page_size).min(self.total);
        let end = (start + self.page_size).min(self.total);
        start..end
    }

    /// Change the page size, keeping the first visible row on screen
    pub fn resize(&mut self, page_size: usize) {
        let first = self.range().start;
        self.page_size = page_size.max(1);
        self.page = first / self.page_size;
    }

    /// Move to the page holding the first title that starts with `letter`
    pub fn jump_to_letter(&mut self, letter: char, companies: &[CompanyMatch]) -> bool {
        let letter = letter.to_ascii_lowercase();
        let position = companies.iter().position(|c| {
            c.title
                .chars()
                .next()
                .map(|first| first.to_ascii_lowercase() == letter)
                .unwrap_or(false)
        });

        match position {
            Some(idx) => {
                self.page = idx / self.page_size;
                true
            }
            None => false,
        }
    }
}
