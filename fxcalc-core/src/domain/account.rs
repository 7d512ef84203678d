use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Account-level inputs to a sizing call.
///
/// All amounts are in the home (account) currency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AccountParameters {
    /// Free margin available for new positions
    pub available_margin: f64,
    /// Leverage ratio (2000.0 means 2000:1)
    pub leverage: f64,
    /// Amount the trader accepts to lose if the stop is hit
    pub risk_amount: f64,
}

impl AccountParameters {
    pub fn new(available_margin: f64, leverage: f64, risk_amount: f64) -> Self {
        Self { available_margin, leverage, risk_amount }
    }

    /// Margin left for the position after reserving the risk budget.
    pub fn remaining_margin(&self) -> f64 {
        self.available_margin - self.risk_amount
    }

    /// Fraction of notional that must be posted as margin.
    pub fn margin_rate(&self) -> f64 {
        1.0 / self.leverage
    }
}

/// Leverage expressed as an `N:1` ratio.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "String", into = "String")]
pub struct Leverage(f64);

/// Leverage presets offered to the trader, lowest first.
pub const LEVERAGE_PRESETS: [&str; 11] = [
    "1:1", "2:1", "5:1", "10:1", "20:1", "50:1", "100:1", "500:1", "1000:1", "2000:1", "3000:1",
];

impl Leverage {
    pub fn new(ratio: f64) -> Result<Self, ParseLeverageError> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(ParseLeverageError::NonPositive(ratio));
        }
        Ok(Self(ratio))
    }

    pub fn ratio(&self) -> f64 {
        self.0
    }

    /// All presets, parsed.
    pub fn presets() -> Vec<Leverage> {
        LEVERAGE_PRESETS.iter().filter_map(|s| s.parse().ok()).collect()
    }
}

impl Default for Leverage {
    fn default() -> Self {
        Self(2000.0)
    }
}

impl FromStr for Leverage {
    type Err = ParseLeverageError;

    /// Accepts `"2000:1"` or a bare `"2000"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (lhs, rhs) = match s.split_once(':') {
            Some((lhs, rhs)) => (lhs.trim(), rhs.trim()),
            None => (s, "1"),
        };

        if rhs != "1" {
            return Err(ParseLeverageError::Format(s.to_string()));
        }

        let ratio: f64 = lhs.parse().map_err(|_| ParseLeverageError::Format(s.to_string()))?;
        Self::new(ratio)
    }
}

impl fmt::Display for Leverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:1", self.0)
    }
}

impl TryFrom<String> for Leverage {
    type Error = ParseLeverageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Leverage> for String {
    fn from(value: Leverage) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseLeverageError {
    #[error("leverage '{0}' is not of the form N:1")]
    Format(String),

    #[error("leverage ratio must be positive, got {0}")]
    NonPositive(f64),
}
