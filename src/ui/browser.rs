use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::io::{self, Write};
use tracing::debug;

use crate::models::CompanyMatch;
use crate::search::{select_row, Pager};
use crate::utils::terminal_rows;

/// Rows taken by margin, title bar, status bar, table borders and header
const CHROME_ROWS: u16 = 2 + 3 + 3 + 2 + 1;

/// What the browser wants after a key press
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserAction {
    Continue,
    Select(CompanyMatch),
    Quit,
}

/// Paging, row entry and status text for the company browser
#[derive(Debug, Clone)]
pub struct BrowserState {
    companies: Vec<CompanyMatch>,
    pager: Pager,
    input: String,
    status: String,
}

impl BrowserState {
    pub fn new(companies: Vec<CompanyMatch>, page_size: usize) -> Self {
        let pager = Pager::new(companies.len(), page_size);
        Self {
            companies,
            pager,
            input: String::new(),
            status: "Type a row number and press Enter to select".to_string(),
        }
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn resize(&mut self, page_size: usize) {
        if page_size != self.pager.page_size {
            self.pager.resize(page_size);
        }
    }

    /// Companies on the current page with their 1-based row numbers
    pub fn visible(&self) -> impl Iterator<Item = (usize, &CompanyMatch)> {
        let range = self.pager.range();
        let start = range.start;
        self.companies[range]
            .iter()
            .enumerate()
            .map(move |(i, c)| (start + i + 1, c))
    }

    pub fn handle_key(&mut self, key: KeyCode) -> BrowserAction {
        match key {
            KeyCode::Esc | KeyCode::Char('q') => return BrowserAction::Quit,
            KeyCode::Char(c) if c.is_ascii_digit() => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => return self.select(),
            KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => {
                if !self.pager.next() {
                    self.status = "Already on the last page".to_string();
                }
            }
            KeyCode::Char('b') | KeyCode::Left | KeyCode::PageUp => {
                if !self.pager.back() {
                    self.status = "Already on the first page".to_string();
                }
            }
            KeyCode::Char(c) if c.is_ascii_alphabetic() && self.input.is_empty() => {
                if self.pager.jump_to_letter(c, &self.companies) {
                    self.status = format!("Jumped to '{}'", c.to_ascii_uppercase());
                } else {
                    self.status = format!("No companies start with '{}'", c.to_ascii_uppercase());
                }
            }
            _ => {}
        }
        BrowserAction::Continue
    }

    fn select(&mut self) -> BrowserAction {
        let typed = std::mem::take(&mut self.input);
        if typed.is_empty() {
            self.status = "Type a row number first".to_string();
            return BrowserAction::Continue;
        }

        match typed.parse::<usize>().ok().and_then(|n| select_row(&self.companies, n)) {
            Some(company) => BrowserAction::Select(company.clone()),
            None => {
                self.status = format!(
                    "Row {} is out of range (1-{})",
                    typed,
                    self.companies.len()
                );
                BrowserAction::Continue
            }
        }
    }
}

fn table_rows(height: u16) -> usize {
    height.saturating_sub(CHROME_ROWS).max(1) as usize
}

fn render(f: &mut Frame, state: &BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    let pager = state.pager();
    let title = Paragraph::new(format!(
        "📇 SEC Companies | page {}/{} | {} companies",
        pager.page + 1,
        pager.total_pages().max(1),
        pager.total
    ))
    .block(Block::default().borders(Borders::ALL))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(title, chunks[0]);

    let rows: Vec<Row> = state
        .visible()
        .map(|(n, c)| {
            Row::new(vec![
                n.to_string(),
                c.title.clone(),
                c.ticker.clone(),
                c.cik.to_string(),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Min(20),
            Constraint::Length(10),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(vec!["Row", "Title", "Ticker", "CIK"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(table, chunks[1]);

    let status = vec![
        Line::from(vec![
            Span::styled("n/→", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(" next • ", Style::default().fg(Color::Gray)),
            Span::styled("b/←", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(" back • ", Style::default().fg(Color::Gray)),
            Span::styled("A-Z", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::styled(" jump • ", Style::default().fg(Color::Gray)),
            Span::styled("row + Enter", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::styled(" select • ", Style::default().fg(Color::Gray)),
            Span::styled("Esc/q", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled(" quit", Style::default().fg(Color::Gray)),
        ]),
        Line::from(vec![
            Span::styled(format!("Row: {} ", state.input()), Style::default().fg(Color::White)),
            Span::styled(state.status(), Style::default().fg(Color::Cyan)),
        ]),
    ];
    let status_bar = Paragraph::new(status).block(Block::default().borders(Borders::ALL));
    f.render_widget(status_bar, chunks[2]);
}

fn browse_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
) -> Result<Option<CompanyMatch>> {
    loop {
        terminal.draw(|f| {
            state.resize(table_rows(f.area().height));
            render(f, state);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Ok(None);
            }
            match state.handle_key(key.code) {
                BrowserAction::Select(company) => return Ok(Some(company)),
                BrowserAction::Quit => return Ok(None),
                BrowserAction::Continue => {}
            }
        }
    }
}

/// Full-screen company browser; returns the picked company, if any
pub fn run_browser(companies: Vec<CompanyMatch>) -> Result<Option<CompanyMatch>> {
    debug!("Browsing {} companies", companies.len());
    let mut state = BrowserState::new(companies, terminal_rows());

    let _guard = TerminalGuard::enter(io::stdout())?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    browse_loop(&mut terminal, &mut state)
}

/// Raw mode plus alternate screen, undone on drop whichever way the browser exits
struct TerminalGuard<W: Write> {
    out: W,
}

impl<W: Write> TerminalGuard<W> {
    fn enter(out: W) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut guard = Self { out };
        guard.out.execute(EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            debug!("Failed to disable raw mode: {}", e);
        }
        let _ = self.out.execute(LeaveAlternateScreen);
        let _ = self.out.execute(cursor::Show);
    }
}
