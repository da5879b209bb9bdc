//! Line-based prompts for picking a company.
//!
//! Readers and writers are injected so the flows can be driven from tests.
//! Every function returns `Ok(None)` when input runs out.

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::models::CompanyMatch;
use crate::search::{select_row, CompanyIndex, SearchOutcome};

const SUGGESTION_LIMIT: usize = 5;

/// How the user wants to find a company
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Search,
    Browse,
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask whether to search for one company or browse the whole list
pub fn choose_mode<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Option<SearchMode>> {
    loop {
        write!(
            output,
            "Do you want to:\n\t1. Search for a single company\n\t2. Browse all companies\nEnter 1 or 2: "
        )?;
        output.flush()?;

        match read_line(input)?.as_deref() {
            None => return Ok(None),
            Some("1") => return Ok(Some(SearchMode::Search)),
            Some("2") => return Ok(Some(SearchMode::Browse)),
            Some(_) => writeln!(output, "Invalid choice. Please enter 1 or 2.")?,
        }
    }
}

/// Numbered pick from several matches; a blank line goes back
pub fn choose_from_list<R: BufRead, W: Write>(
    matches: &[CompanyMatch],
    input: &mut R,
    output: &mut W,
) -> Result<Option<CompanyMatch>> {
    writeln!(output, "Multiple companies found. Please choose one by entering the corresponding number:")?;
    for (i, m) in matches.iter().enumerate() {
        writeln!(output, "{}. Title: {}, Ticker: {}, CIK: {}", i + 1, m.title, m.ticker, m.cik)?;
    }

    loop {
        write!(output, "Enter the number of the company you want to select (blank to search again): ")?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        if line.is_empty() {
            return Ok(None);
        }

        match line.parse::<usize>().ok().and_then(|n| select_row(matches, n)) {
            Some(m) => return Ok(Some(m.clone())),
            None => writeln!(output, "Invalid selection. Please enter a number from 1 to {}.", matches.len())?,
        }
    }
}

/// Search loop: query, disambiguate, retry until one company is chosen
pub fn prompt_search<R: BufRead, W: Write>(
    index: &CompanyIndex,
    input: &mut R,
    output: &mut W,
) -> Result<Option<CompanyMatch>> {
    loop {
        write!(output, "Enter a company title, ticker, or CIK: ")?;
        output.flush()?;

        let Some(query) = read_line(input)? else {
            return Ok(None);
        };
        if query.is_empty() {
            continue;
        }

        match index.search(&query) {
            SearchOutcome::Single(m) => return Ok(Some(m)),
            SearchOutcome::Multiple(matches) => {
                if let Some(m) = choose_from_list(&matches, input, output)? {
                    return Ok(Some(m));
                }
            }
            SearchOutcome::NotFound => {
                writeln!(output, "No companies found for '{}'. Please try again.", query)?;
                let suggestions = index.fuzzy_search(&query, SUGGESTION_LIMIT);
                if !suggestions.is_empty() {
                    writeln!(output, "Did you mean:")?;
                    for s in suggestions {
                        writeln!(output, "\t{} ({})", s.title, s.ticker)?;
                    }
                }
            }
        }
    }
}

/// Yes/no confirmation; anything starting with `y` is yes
pub fn confirm<R: BufRead, W: Write>(message: &str, input: &mut R, output: &mut W) -> Result<bool> {
    write!(output, "{}", message)?;
    output.flush()?;
    Ok(read_line(input)?
        .map(|l| l.to_lowercase().starts_with('y'))
        .unwrap_or(false))
}
