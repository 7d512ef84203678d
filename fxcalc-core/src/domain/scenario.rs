use serde::{Deserialize, Serialize};

/// One candidate entry price and its stop distance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceScenario {
    /// Instrument price (quote units per one unit of base)
    pub price: f64,
    /// Distance from entry to stop, in pips
    pub stop_loss_pips: f64,
}

impl PriceScenario {
    pub fn new(price: f64, stop_loss_pips: f64) -> Self {
        Self { price, stop_loss_pips }
    }
}

/// Caller-supplied rates converting the instrument's legs into home currency.
///
/// The engine never looks rates up; a leg that already is the home currency
/// uses 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConversionContext {
    /// Base → home rate
    pub home_rate: f64,
    /// Quote → home rate
    pub home_quote_rate: f64,
}

impl ConversionContext {
    pub fn new(home_rate: f64, home_quote_rate: f64) -> Self {
        Self { home_rate, home_quote_rate }
    }

    /// Both legs already in home currency.
    pub fn identity() -> Self {
        Self { home_rate: 1.0, home_quote_rate: 1.0 }
    }
}

impl Default for ConversionContext {
    fn default() -> Self {
        Self::identity()
    }
}
