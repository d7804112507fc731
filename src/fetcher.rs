//! Currency fetcher for the National Bank of Georgia rate table
//!
//! Fetches the official GEL exchange rates page and extracts one
//! [`Currency`] per table row using the CSS selectors in [`SourceConfig`].
//!
//! Structural failures (transport, non-200 status, unreadable body, bad
//! selectors) abort the fetch. Stray invalid bytes in the page do not: they
//! are replaced during decoding. A row whose rate text is not a number only
//! drops that row: the table contains header rows without rates, and the
//! markup is third-party.

use crate::config::SourceConfig;
use crate::currency::{Currencies, Currency};
use crate::error::{CurrencyError, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use scraper::{ElementRef, Html, Selector};
use std::time::{Duration, Instant};

/// Currencies from one fetch, plus how long it took
#[derive(Debug, Clone, PartialEq)]
pub struct FetchReport {
    pub currencies: Currencies,
    pub elapsed: Duration,
}

impl FetchReport {
    /// Wall-clock fetch time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// Compiled row, index and rate selectors
#[derive(Debug, Clone)]
pub struct CurrencySelectors {
    rows: Selector,
    index: Selector,
    rate: Selector,
}

impl CurrencySelectors {
    pub fn compile(source: &SourceConfig) -> Result<Self> {
        Ok(Self {
            rows: compile_selector(&source.rows_selector)?,
            index: compile_selector(&source.index_selector)?,
            rate: compile_selector(&source.rate_selector)?,
        })
    }

    /// Extract currencies from an HTML document, in row order
    pub fn extract(&self, html: &str) -> Currencies {
        let document = Html::parse_document(html);
        document
            .select(&self.rows)
            .filter_map(|row| self.extract_row(row))
            .collect()
    }

    fn extract_row(&self, row: ElementRef<'_>) -> Option<Currency> {
        let rate = selected_text(row, &self.rate)
            .parse::<f64>()
            .ok()
            .filter(|rate| rate.is_finite())?;
        let index = selected_text(row, &self.index);

        Some(Currency::new(index, rate))
    }
}

fn compile_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| CurrencyError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Concatenated, trimmed text of every element under `row` matching `selector`
fn selected_text(row: ElementRef<'_>, selector: &Selector) -> String {
    let text: String = row.select(selector).flat_map(|el| el.text()).collect();
    text.trim().to_string()
}

/// Parse currencies out of an already downloaded page
pub fn parse_currencies(html: &str, source: &SourceConfig) -> Result<Currencies> {
    Ok(CurrencySelectors::compile(source)?.extract(html))
}

/// Blocking fetcher for the rate page
pub struct CurrencyFetcher {
    client: Client,
    source: SourceConfig,
    selectors: CurrencySelectors,
}

impl CurrencyFetcher {
    /// Create a fetcher. Selectors are validated here, before any request is made.
    pub fn new(source: SourceConfig) -> Result<Self> {
        let selectors = CurrencySelectors::compile(&source)?;

        let mut builder = Client::builder();
        if let Some(secs) = source.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            source,
            selectors,
        })
    }

    pub fn url(&self) -> &str {
        &self.source.url
    }

    /// Fetch and parse the rate table
    pub fn fetch(&self) -> Result<FetchReport> {
        let start = Instant::now();
        log::debug!("Fetching currencies from {}", self.source.url);

        let response = self.client.get(&self.source.url).send()?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(CurrencyError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        // Decoded per the response charset; invalid bytes become U+FFFD
        let html = response.text().map_err(|e| {
            CurrencyError::Document(format!("failed to read response body: {}", e))
        })?;
        log::debug!("Received {} bytes, parsing document", html.len());

        let currencies = self.selectors.extract(&html);
        let elapsed = start.elapsed();

        log::info!(
            "Fetched {} currencies in {} ms",
            currencies.len(),
            elapsed.as_millis()
        );

        Ok(FetchReport {
            currencies,
            elapsed,
        })
    }
}

/// Fetch with the built-in NBG source settings
pub fn fetch_currencies() -> Result<FetchReport> {
    CurrencyFetcher::new(SourceConfig::default())?.fetch()
}
