use serde::{Deserialize, Serialize};

/// Currency code alias (e.g. "USD", "JPY", "XAU")
pub type CurrencyCode = String;

/// The three currencies involved in sizing one trade.
///
/// Codes are compared verbatim. Normalization (case, whitespace) is the
/// caller's job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyTriple {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
    pub home: CurrencyCode,
}

impl CurrencyTriple {
    pub fn new(
        base: impl Into<CurrencyCode>,
        quote: impl Into<CurrencyCode>,
        home: impl Into<CurrencyCode>,
    ) -> Self {
        Self { base: base.into(), quote: quote.into(), home: home.into() }
    }

    /// Classify how the pair relates to the account currency.
    pub fn relationship(&self) -> CurrencyRelationship {
        CurrencyRelationship::classify(&self.base, &self.quote, &self.home)
    }
}

/// How an instrument's legs relate to the home (account) currency.
///
/// Selects the margin-requirement formula and the bracket display mode.
/// `BaseIsHome` wins when both legs equal home.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CurrencyRelationship {
    /// Base currency is the account currency (e.g. USD/JPY on a USD account)
    BaseIsHome,
    /// Quote currency is the account currency (e.g. EUR/USD on a USD account)
    QuoteIsHome,
    /// Neither leg is the account currency (e.g. EUR/GBP on a USD account)
    CrossPair,
}

impl CurrencyRelationship {
    pub fn classify(base: &str, quote: &str, home: &str) -> Self {
        if base == home {
            Self::BaseIsHome
        } else if quote == home {
            Self::QuoteIsHome
        } else {
            Self::CrossPair
        }
    }

    /// Whether the caller must supply a base→home conversion rate.
    pub fn needs_home_rate(&self) -> bool {
        !matches!(self, Self::BaseIsHome)
    }

    /// Whether the caller must supply a quote→home conversion rate.
    pub fn needs_home_quote_rate(&self) -> bool {
        !matches!(self, Self::QuoteIsHome)
    }
}
