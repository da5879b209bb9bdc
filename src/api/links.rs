/// SEC documentation and dataset locations worth keeping at hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceLink {
    pub title: &'static str,
    pub url: &'static str,
}

const LINKS: &[ReferenceLink] = &[
    ReferenceLink {
        title: "EDGAR application programming interfaces",
        url: "https://www.sec.gov/search-filings/edgar-application-programming-interfaces",
    },
    ReferenceLink {
        title: "Accessing EDGAR data",
        url: "https://www.sec.gov/search-filings/edgar-search-assistance/accessing-edgar-data",
    },
    ReferenceLink {
        title: "Developer resources",
        url: "https://www.sec.gov/developer",
    },
    ReferenceLink {
        title: "Company tickers (CIK, ticker, title)",
        url: "https://www.sec.gov/files/company_tickers.json",
    },
    ReferenceLink {
        title: "Company tickers with exchange",
        url: "https://www.sec.gov/files/company_tickers_exchange.json",
    },
    ReferenceLink {
        title: "CIK lookup data (all filer names)",
        url: "https://www.sec.gov/Archives/edgar/cik-lookup-data.txt",
    },
    ReferenceLink {
        title: "Mutual fund tickers",
        url: "https://www.sec.gov/files/company_tickers_mf.json",
    },
];

pub fn reference_links() -> &'static [ReferenceLink] {
    LINKS
}
