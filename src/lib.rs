//! # nbg-currencies
//!
//! Fetches the official exchange rates of the Georgian Lari published by the
//! National Bank of Georgia and exports them as JSON or CSV.
//!
//! ## Example
//!
//! ```rust,no_run
//! use nbg_currencies::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let fetcher = CurrencyFetcher::new(SourceConfig::default())?;
//!     let report = fetcher.fetch()?;
//!     println!("Fetched in {} ms", report.elapsed_ms());
//!
//!     let csv = report.currencies.encode(OutputFormat::Csv)?;
//!     std::fs::write("rates.csv", csv)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod currency;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod multiselect;
pub mod set;
pub mod writer;

pub mod prelude {
    //! Commonly used types and functions
    pub use crate::config::{Config, OutputConfig, SourceConfig};
    pub use crate::currency::{Currencies, Currency};
    pub use crate::error::{CurrencyError, Result};
    pub use crate::fetcher::{fetch_currencies, CurrencyFetcher, FetchReport};
    pub use crate::format::{is_supported_format, supported_formats, OutputFormat};
    pub use crate::writer::{write_currencies_to_file, OverwritePolicy};
}
