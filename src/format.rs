//! Output format registry

use crate::error::CurrencyError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// `[{"index":"USD","conversionRate":2.7}, ...]`
    JsonArray,
    /// `{"USD":2.7, ...}`
    JsonMap,
    /// `index,conversionRate` header followed by one row per currency
    Csv,
}

impl OutputFormat {
    /// Format tag as accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::JsonArray => "json-array",
            OutputFormat::JsonMap => "json-map",
            OutputFormat::Csv => "csv",
        }
    }

    /// Parse from a format tag. Matching is case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "json-array" => Some(OutputFormat::JsonArray),
            "json-map" => Some(OutputFormat::JsonMap),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }

    /// All formats in declaration order
    pub fn all() -> [OutputFormat; 3] {
        [OutputFormat::JsonArray, OutputFormat::JsonMap, OutputFormat::Csv]
    }

    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::JsonArray | OutputFormat::JsonMap => "json",
            OutputFormat::Csv => "csv",
        }
    }

    /// Suffix placed between the file prefix and the date in default file names.
    /// CSV has only one layout and carries no suffix.
    pub fn file_suffix(&self) -> Option<&'static str> {
        match self {
            OutputFormat::JsonArray => Some("array"),
            OutputFormat::JsonMap => Some("map"),
            OutputFormat::Csv => None,
        }
    }

    /// Default file name for this format, e.g. `nbg-currencies-array-2024-03-01.json`
    pub fn default_file_name(&self, prefix: &str, date: NaiveDate) -> String {
        let date = date.format("%Y-%m-%d");
        match self.file_suffix() {
            Some(suffix) => format!("{}-{}-{}.{}", prefix, suffix, date, self.extension()),
            None => format!("{}-{}.{}", prefix, date, self.extension()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| CurrencyError::InvalidFormat(s.to_string()))
    }
}

/// Whether `tag` names one of the supported formats
pub fn is_supported_format(tag: &str) -> bool {
    OutputFormat::from_tag(tag).is_some()
}

/// Supported format tags in declaration order
pub fn supported_formats() -> Vec<&'static str> {
    OutputFormat::all().iter().map(|f| f.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported_format() {
        assert!(is_supported_format("json-array"));
        assert!(is_supported_format("json-map"));
        assert!(is_supported_format("csv"));
    }

    #[test]
    fn test_unsupported_formats() {
        assert!(!is_supported_format(""));
        assert!(!is_supported_format("CSV"));
        assert!(!is_supported_format("Json-Array"));
        assert!(!is_supported_format("yaml"));
        assert!(!is_supported_format(" csv"));
    }

    #[test]
    fn test_supported_formats_order() {
        assert_eq!(supported_formats(), vec!["json-array", "json-map", "csv"]);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);

        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, CurrencyError::InvalidFormat(ref tag) if tag == "yaml"));
    }

    #[test]
    fn test_display_matches_tag() {
        for format in OutputFormat::all() {
            assert_eq!(format.to_string(), format.as_str());
            assert_eq!(OutputFormat::from_tag(&format.to_string()), Some(format));
        }
    }

    #[test]
    fn test_default_file_names() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        assert_eq!(
            OutputFormat::JsonArray.default_file_name("nbg-currencies", date),
            "nbg-currencies-array-2024-03-01.json"
        );
        assert_eq!(
            OutputFormat::JsonMap.default_file_name("nbg-currencies", date),
            "nbg-currencies-map-2024-03-01.json"
        );
        assert_eq!(
            OutputFormat::Csv.default_file_name("nbg-currencies", date),
            "nbg-currencies-2024-03-01.csv"
        );
    }
}
