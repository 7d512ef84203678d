use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::currency::{CurrencyCode, CurrencyTriple};

/// Built-in pairs, in display order.
const CATALOG: [(&str, &str); 21] = [
    ("EUR", "USD"),
    ("GBP", "USD"),
    ("USD", "JPY"),
    ("XAU", "USD"),
    ("USD", "CHF"),
    ("AUD", "USD"),
    ("USD", "CAD"),
    ("NZD", "USD"),
    ("EUR", "GBP"),
    ("EUR", "JPY"),
    ("GBP", "JPY"),
    ("AUD", "JPY"),
    ("EUR", "CHF"),
    ("GBP", "CHF"),
    ("EUR", "AUD"),
    ("EUR", "CAD"),
    ("AUD", "CAD"),
    ("AUD", "NZD"),
    ("USD", "SGD"),
    ("USD", "HKD"),
    ("USD", "CNH"),
];

/// Currencies an account may be denominated in.
pub const ACCOUNT_CURRENCIES: [&str; 8] = ["USD", "EUR", "GBP", "JPY", "CHF", "AUD", "CAD", "NZD"];

/// A tradeable currency pair, `BASE/QUOTE`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FxPair {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl FxPair {
    pub fn new(base: impl Into<CurrencyCode>, quote: impl Into<CurrencyCode>) -> Self {
        Self { base: base.into(), quote: quote.into() }
    }

    /// `"EUR/USD"` style name
    pub fn symbol(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }

    /// Combine with an account currency.
    pub fn with_home(&self, home: impl Into<CurrencyCode>) -> CurrencyTriple {
        CurrencyTriple::new(self.base.clone(), self.quote.clone(), home)
    }

    /// The built-in instrument list.
    pub fn catalog() -> Vec<FxPair> {
        CATALOG.iter().map(|(b, q)| FxPair::new(*b, *q)).collect()
    }

    /// Look up a catalog pair by symbol, case-insensitively.
    pub fn lookup(symbol: &str) -> Result<FxPair, InstrumentError> {
        let wanted: FxPair = symbol.parse()?;
        Self::catalog()
            .into_iter()
            .find(|p| *p == wanted)
            .ok_or_else(|| InstrumentError::UnknownPair(wanted.symbol()))
    }

    pub fn is_account_currency(code: &str) -> bool {
        ACCOUNT_CURRENCIES.contains(&code)
    }
}

impl fmt::Display for FxPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for FxPair {
    type Err = InstrumentError;

    /// Parses `"eur/usd"`, `"EUR/USD"` or `"EURUSD"`; codes are upper-cased.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_uppercase();
        let (base, quote) = match s.split_once('/') {
            Some((b, q)) => (b.trim().to_string(), q.trim().to_string()),
            None if s.len() == 6 && s.is_ascii() => (s[..3].to_string(), s[3..].to_string()),
            None => return Err(InstrumentError::InvalidSymbol(s)),
        };

        if base.is_empty() || quote.is_empty() || !is_code(&base) || !is_code(&quote) {
            return Err(InstrumentError::InvalidSymbol(s));
        }

        Ok(FxPair { base, quote })
    }
}

fn is_code(code: &str) -> bool {
    code.chars().all(|c| c.is_ascii_alphabetic())
}

#[derive(Debug, Error, PartialEq)]
pub enum InstrumentError {
    #[error("'{0}' is not a BASE/QUOTE pair symbol")]
    InvalidSymbol(String),

    #[error("pair {0} is not in the instrument catalog")]
    UnknownPair(String),
}
