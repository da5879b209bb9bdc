use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{
    layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

use edgar_workbook::api::{links::reference_links, EdgarClient};
use edgar_workbook::models::{Cik, CompanyMatch, Config};
use edgar_workbook::pipeline::{download_company, load_company_index, DownloadOptions, DownloadReport};
use edgar_workbook::search::{CompanyIndex, SearchOutcome};
use edgar_workbook::ui::{choose_from_list, choose_mode, confirm, prompt_search, run_browser, SearchMode};
use edgar_workbook::utils::clear_screen;
use edgar_workbook::workbook::WorkbookFormat;

const DEFAULT_LOG_FILTER: &str = "edgar_workbook=info";

type LogHandle = reload::Handle<EnvFilter, Registry>;

/// SEC EDGAR company data downloader
#[derive(Parser)]
#[command(name = "edgar-workbook")]
#[command(version = "0.1.0")]
#[command(about = "Look up SEC registrants and download their XBRL facts and filings into a linked workbook")]
#[command(long_about = "
Finds a company in the SEC ticker list by title, ticker or CIK, downloads its XBRL company
facts and recent filings from EDGAR, and writes them to a workbook: a company summary, a
sheet of filing links grouped by form, and one sheet per reported concept linked from a
summary sheet.

Set EDGAR_USER_AGENT to a contact string before running; the SEC rejects anonymous clients.

Examples:
  edgar-workbook                                   # interactive search or browse
  edgar-workbook search apple                      # list matching companies
  edgar-workbook download --ticker AAPL            # write AAPL_0000320193.xlsx
  edgar-workbook download --cik 320193 -f csv      # CSV sheets instead of xlsx
  edgar-workbook datasets exchange --limit 10      # peek at a static dataset
")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Directory the workbook is written to (defaults to EDGAR_OUTPUT_DIR)
    #[arg(long, short = 'o', global = true)]
    output: Option<PathBuf>,

    /// Workbook format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = WorkbookFormat::Xlsx)]
    format: WorkbookFormat,

    /// Maximum concept sheets per taxonomy (defaults to EDGAR_MAX_CONCEPTS_PER_TAXONOMY)
    #[arg(long, global = true)]
    max_concepts: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Search the SEC ticker list and print matches
    Search {
        /// Company title, ticker or CIK
        query: String,

        /// Maximum matches to print
        #[arg(long, short = 'l', default_value_t = 25)]
        limit: usize,
    },
    /// Download one company's data without prompting
    Download(DownloadTarget),
    /// Search or browse, then download (default)
    Interactive,
    /// Browse every company in a full-screen table, then download
    Browse,
    /// Print the first rows of an SEC static dataset
    Datasets {
        #[arg(value_enum)]
        dataset: Dataset,

        /// Rows to print
        #[arg(long, short = 'l', default_value_t = 20)]
        limit: usize,
    },
    /// Print EDGAR reference links
    Links,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct DownloadTarget {
    /// Central Index Key, with or without leading zeros
    #[arg(long)]
    cik: Option<Cik>,

    /// Exchange ticker, e.g. AAPL
    #[arg(long, short = 't')]
    ticker: Option<String>,

    /// Title, ticker or CIK; prompts when several companies match
    #[arg(long, short = 'q')]
    query: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Dataset {
    Tickers,
    Exchange,
    MutualFunds,
    CikLookup,
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_logging() -> LogHandle {
    let (filter, handle) = reload::Layer::new(default_filter());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
    handle
}

#[tokio::main]
async fn main() {
    let log_handle = init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli, &log_handle).await {
        error!("{:#}", e);
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, log_handle: &LogHandle) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    let mut options = DownloadOptions::from_config(&config);
    if let Some(output) = cli.output {
        options.output_dir = output;
    }
    if cli.max_concepts.is_some() {
        options.max_concepts_per_taxonomy = cli.max_concepts;
    }
    options.format = cli.format;

    let command = cli.command.unwrap_or(Command::Interactive);
    if let Command::Links = command {
        print_links();
        return Ok(());
    }

    let client = EdgarClient::new(&config)?;
    info!("Using EDGAR at {} with {} req/s", config.www_base_url, config.rate_limit_per_second);

    match command {
        Command::Search { query, limit } => search(&client, &query, limit).await,
        Command::Download(target) => {
            let company = resolve_target(&client, target).await?;
            download(&client, &company, &options).await
        }
        Command::Interactive => interactive(&client, &options, log_handle).await,
        Command::Browse => {
            let index = load_index(&client).await?;
            match browse(&index, log_handle)? {
                Some(company) => download(&client, &company, &options).await,
                None => {
                    println!("👋 No company selected.");
                    Ok(())
                }
            }
        }
        Command::Datasets { dataset, limit } => print_dataset(&client, dataset, limit).await,
        Command::Links => Ok(()),
    }
}

async fn load_index(client: &EdgarClient) -> Result<CompanyIndex> {
    println!("📥 Loading the SEC company list...");
    let index = load_company_index(client).await?;
    println!("✅ {} companies loaded", index.len());
    Ok(index)
}

async fn search(client: &EdgarClient, query: &str, limit: usize) -> Result<()> {
    let index = load_index(client).await?;

    match index.search(query) {
        SearchOutcome::NotFound => {
            println!("❌ No companies found for '{}'", query);
            let suggestions = index.fuzzy_search(query, 5);
            if !suggestions.is_empty() {
                println!("💡 Did you mean:");
                for s in suggestions {
                    println!("   {}", s);
                }
            }
        }
        SearchOutcome::Single(company) => println!("✅ {}", company),
        SearchOutcome::Multiple(matches) => {
            println!("🔎 {} companies match '{}':", matches.len(), query);
            for (i, m) in matches.iter().take(limit).enumerate() {
                println!("{:>4}. {}", i + 1, m);
            }
            if matches.len() > limit {
                println!("   ... {} more", matches.len() - limit);
            }
        }
    }
    Ok(())
}

async fn resolve_target(client: &EdgarClient, target: DownloadTarget) -> Result<CompanyMatch> {
    let index = load_index(client).await?;

    if let Some(cik) = target.cik {
        let found = index.search_by_cik(&cik.to_string()).into_iter().next();
        return Ok(found.unwrap_or_else(|| {
            info!("CIK {} is not in the ticker list; downloading without a ticker", cik);
            CompanyMatch {
                title: format!("CIK {}", cik),
                ticker: String::new(),
                cik,
            }
        }));
    }

    if let Some(ticker) = target.ticker {
        return index
            .search_by_ticker(&ticker)
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No company with ticker '{}'", ticker));
    }

    let query = target.query.unwrap_or_default();
    match index.search(&query) {
        SearchOutcome::Single(company) => Ok(company),
        SearchOutcome::Multiple(matches) => {
            let stdin = io::stdin();
            choose_from_list(&matches, &mut stdin.lock(), &mut io::stdout())?
                .ok_or_else(|| anyhow!("No company selected"))
        }
        SearchOutcome::NotFound => Err(anyhow!("No companies found for '{}'", query)),
    }
}

/// Run the browser with logging limited to errors so the screen stays intact
fn browse(index: &CompanyIndex, log_handle: &LogHandle) -> Result<Option<CompanyMatch>> {
    log_handle.reload(EnvFilter::new("error"))?;
    let selected = run_browser(index.sorted_companies());
    log_handle.reload(default_filter())?;
    selected
}

async fn interactive(client: &EdgarClient, options: &DownloadOptions, log_handle: &LogHandle) -> Result<()> {
    clear_screen()?;
    println!("🏛️  SEC EDGAR Workbook");
    let index = load_index(client).await?;

    let company = {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();

        let selected = match choose_mode(&mut input, &mut output)? {
            Some(SearchMode::Search) => prompt_search(&index, &mut input, &mut output)?,
            Some(SearchMode::Browse) => browse(&index, log_handle)?,
            None => None,
        };

        match selected {
            Some(company) => {
                let question = format!("Download SEC data for {}? [y/N]: ", company);
                if confirm(&question, &mut input, &mut output)? {
                    Some(company)
                } else {
                    None
                }
            }
            None => None,
        }
    };

    match company {
        Some(company) => download(client, &company, options).await,
        None => {
            println!("👋 Nothing downloaded.");
            Ok(())
        }
    }
}

async fn download(client: &EdgarClient, company: &CompanyMatch, options: &DownloadOptions) -> Result<()> {
    println!("🚀 Downloading SEC data for {}", company);
    let report = download_company(client, company, options).await?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &DownloadReport) {
    println!("✅ Saved {} sheets to {}", report.sheets, report.path.display());
    println!(
        "   📈 {} concepts | 📄 {} filings across {} form types",
        report.concepts, report.filings, report.form_types
    );
    println!("   🕒 Finished at {}", report.finished_at.format("%Y-%m-%d %H:%M:%S UTC"));
}

async fn print_dataset(client: &EdgarClient, dataset: Dataset, limit: usize) -> Result<()> {
    let (total, lines): (usize, Vec<String>) = match dataset {
        Dataset::Tickers => {
            let rows = client.fetch_company_tickers().await?;
            let lines = rows
                .iter()
                .take(limit)
                .map(|r| format!("{:>10}  {:<8} {}", r.cik, r.ticker, r.title))
                .collect();
            (rows.len(), lines)
        }
        Dataset::Exchange => {
            let rows = client.fetch_exchange_listings().await?;
            let lines = rows
                .iter()
                .take(limit)
                .map(|r| {
                    format!(
                        "{:>10}  {:<8} {:<8} {}",
                        r.cik,
                        r.ticker,
                        r.exchange.as_deref().unwrap_or("-"),
                        r.name
                    )
                })
                .collect();
            (rows.len(), lines)
        }
        Dataset::MutualFunds => {
            let rows = client.fetch_mutual_funds().await?;
            let lines = rows
                .iter()
                .take(limit)
                .map(|r| format!("{:>10}  {:<8} {} {}", r.cik, r.symbol, r.series_id, r.class_id))
                .collect();
            (rows.len(), lines)
        }
        Dataset::CikLookup => {
            let rows = client.fetch_cik_lookup().await?;
            let lines = rows
                .iter()
                .take(limit)
                .map(|r| format!("{:>10}  {}", r.cik, r.name))
                .collect();
            (rows.len(), lines)
        }
    };

    println!("📊 {} rows, showing {}", total, lines.len());
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

fn print_links() {
    println!("📚 EDGAR reference links:");
    for link in reference_links() {
        println!("🔗 {}: {}", link.title, link.url);
    }
}
