//! Currency records and their JSON/CSV encodings

use crate::error::{CurrencyError, Result};
use crate::format::OutputFormat;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

const CSV_HEADER: [&str; 2] = ["index", "conversionRate"];

/// Largest magnitude written as a plain integer in JSON.
/// Beyond this, shortest float notation (with exponent) is used.
const MAX_PLAIN_INTEGER: f64 = 1e21;

/// A single exchange rate relative to the source's base currency (GEL)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    index: String,
    #[serde(rename = "conversionRate", serialize_with = "serialize_rate")]
    conversion_rate: f64,
}

impl Currency {
    /// Create a new currency record
    pub fn new(index: impl Into<String>, conversion_rate: f64) -> Self {
        Self {
            index: index.into(),
            conversion_rate,
        }
    }

    /// Currency code, e.g. `USD`
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Rate relative to the base currency
    pub fn conversion_rate(&self) -> f64 {
        self.conversion_rate
    }
}

/// Ordered collection of currencies, in the order they were read from the source.
///
/// Duplicate indices are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currencies(Vec<Currency>);

impl Currencies {
    /// Create an empty collection
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Currency> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Currency] {
        &self.0
    }

    /// JSON array of `{"index": .., "conversionRate": ..}` objects:
    ///
    /// ```text
    /// [{"index":"USD","conversionRate":2},{"index":"EUR","conversionRate":3}]
    /// ```
    pub fn to_json_array(&self) -> Result<Vec<u8>> {
        self.ensure_finite()?;
        Ok(serde_json::to_vec(self)?)
    }

    /// JSON object keyed by index:
    ///
    /// ```text
    /// {"EUR":3,"USD":2}
    /// ```
    ///
    /// When an index appears more than once, the last occurrence wins.
    pub fn to_json_map(&self) -> Result<Vec<u8>> {
        self.ensure_finite()?;

        let mut map = BTreeMap::new();
        for currency in &self.0 {
            map.insert(currency.index.as_str(), JsonRate(currency.conversion_rate));
        }

        Ok(serde_json::to_vec(&map)?)
    }

    /// CSV with an `index,conversionRate` header and fixed six-digit rates:
    ///
    /// ```text
    /// index,conversionRate
    /// USD,2.000000
    /// EUR,3.000000
    /// ```
    ///
    /// Index values are written unquoted.
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer
            .write_record(CSV_HEADER)
            .map_err(std::io::Error::from)?;

        for currency in &self.0 {
            let rate = format!("{:.6}", currency.conversion_rate);
            writer
                .write_record([currency.index.as_str(), rate.as_str()])
                .map_err(std::io::Error::from)?;
        }

        writer
            .into_inner()
            .map_err(|e| CurrencyError::Io(e.into_error()))
    }

    /// Encode in the given format
    pub fn encode(&self, format: OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::JsonArray => self.to_json_array(),
            OutputFormat::JsonMap => self.to_json_map(),
            OutputFormat::Csv => self.to_csv(),
        }
    }

    /// Encode in the format named by `tag` (`json-array`, `json-map` or `csv`).
    ///
    /// Unknown tags fail with [`CurrencyError::InvalidFormat`].
    pub fn to_bytes(&self, tag: &str) -> Result<Vec<u8>> {
        let format: OutputFormat = tag.parse()?;
        self.encode(format)
    }

    /// Decode the output of [`Currencies::to_json_array`], preserving order
    pub fn from_json_array(json: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(json)?)
    }

    fn ensure_finite(&self) -> Result<()> {
        match self.0.iter().find(|c| !c.conversion_rate.is_finite()) {
            Some(c) => Err(CurrencyError::NonFiniteRate {
                index: c.index.clone(),
                rate: c.conversion_rate,
            }),
            None => Ok(()),
        }
    }
}

impl From<Vec<Currency>> for Currencies {
    fn from(currencies: Vec<Currency>) -> Self {
        Self(currencies)
    }
}

impl FromIterator<Currency> for Currencies {
    fn from_iter<I: IntoIterator<Item = Currency>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Currencies {
    type Item = Currency;
    type IntoIter = std::vec::IntoIter<Currency>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Currencies {
    type Item = &'a Currency;
    type IntoIter = std::slice::Iter<'a, Currency>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

struct JsonRate(f64);

impl Serialize for JsonRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_rate(&self.0, serializer)
    }
}

/// Integral rates are written without a fractional part (`2`, not `2.0`),
/// everything else in shortest round-trip notation.
fn serialize_rate<S: Serializer>(rate: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if !rate.is_finite() {
        return Err(serde::ser::Error::custom(format!(
            "unsupported conversion rate: {}",
            rate
        )));
    }

    let negative_zero = *rate == 0.0 && rate.is_sign_negative();
    if rate.fract() == 0.0 && rate.abs() < MAX_PLAIN_INTEGER && !negative_zero {
        serializer.serialize_i128(*rate as i128)
    } else {
        serializer.serialize_f64(*rate)
    }
}
