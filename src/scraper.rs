use crate::parser::{ParseError, parse_distribution_table};
use crate::types::CompensationTable;

use reqwest::blocking::Client;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
    #[error("Fetch failed for year {year} ({url}): {source}")]
    FetchFailed {
        year: i32,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
}

pub fn netcomp_url(base_url: &str, year: i32) -> String {
    format!("{}/cgi-bin/netcomp.cgi?year={}", base_url, year)
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    base_url: String,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_base_url(crate::BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, year: i32) -> String {
        netcomp_url(&self.base_url, year)
    }

    pub fn fetch_page(&self, year: i32) -> Result<String, ScraperError> {
        let url = self.url_for(year);
        log::debug!("GET {}", url);

        self.client
            .get(&url)
            .send()
            .and_then(|res| res.error_for_status())
            .and_then(|res| res.text())
            .map_err(|source| ScraperError::FetchFailed { year, url, source })
    }

    pub fn fetch_net_compensation(&self, year: i32) -> Result<CompensationTable, ScraperError> {
        let html = self.fetch_page(year)?;
        let table = parse_distribution_table(&html)?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_netcomp_url() {
        let url = netcomp_url(crate::BASE_URL, 2021);
        assert_eq!(url, "https://www.ssa.gov/cgi-bin/netcomp.cgi?year=2021");
        assert_eq!(url.matches("year=2021").count(), 1);
    }

    #[test]
    fn test_url_for_custom_base() {
        let scraper =
            WebScraper::with_base_url("http://localhost:8080/").expect("Failed to build scraper");
        assert_eq!(
            scraper.url_for(1999),
            "http://localhost:8080/cgi-bin/netcomp.cgi?year=1999"
        );
    }

    #[test]
    fn test_fetch_failure_carries_context() {
        // port 9 (discard) on localhost refuses connections without touching the network
        let scraper =
            WebScraper::with_base_url("http://127.0.0.1:9").expect("Failed to build scraper");

        let err = scraper.fetch_page(2021).unwrap_err();
        match err {
            ScraperError::FetchFailed { year, url, .. } => {
                assert_eq!(year, 2021);
                assert_eq!(url, "http://127.0.0.1:9/cgi-bin/netcomp.cgi?year=2021");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fetch_not_found_status() {
        use std::io::{Read, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind listener");
        let addr = listener.local_addr().unwrap();

        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            stream
                .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .unwrap();
        });

        let base_url = format!("http://{}", addr);
        let scraper = WebScraper::with_base_url(&base_url).expect("Failed to build scraper");

        let err = scraper.fetch_page(2021).unwrap_err();
        server.join().unwrap();

        match err {
            ScraperError::FetchFailed { year, url, source } => {
                assert_eq!(year, 2021);
                assert_eq!(url, format!("{}/cgi-bin/netcomp.cgi?year=2021", base_url));
                assert_eq!(source.status(), Some(reqwest::StatusCode::NOT_FOUND));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
