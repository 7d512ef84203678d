//! Pip Value Resolver
//!
//! Maps a quote currency to the price size of one pip.

use serde::{Deserialize, Serialize};

/// Pip size for JPY-quoted pairs
pub const JPY_PIP: f64 = 0.01;

/// Pip size for XAU-quoted instruments
pub const XAU_PIP: f64 = 0.1;

/// Pip size for everything else
pub const DEFAULT_PIP: f64 = 0.0001;

/// How a quote currency is matched against the JPY rule.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PipPolicy {
    /// Only `"JPY"` itself gets the JPY pip
    #[default]
    Exact,
    /// Any code ending in `"JPY"` gets the JPY pip
    Suffix,
}

impl PipPolicy {
    fn is_jpy(&self, quote: &str) -> bool {
        match self {
            Self::Exact => quote == "JPY",
            Self::Suffix => quote.ends_with("JPY"),
        }
    }
}

/// Size of one pip in quote-currency price units.
///
/// Unknown codes fall through to [`DEFAULT_PIP`]; there is no error path.
pub fn pip_size(quote: &str, policy: PipPolicy) -> f64 {
    if policy.is_jpy(quote) {
        JPY_PIP
    } else if quote == "XAU" {
        XAU_PIP
    } else {
        if !is_plain_code(quote) {
            tracing::debug!(quote, pip = DEFAULT_PIP, "unrecognised quote code, using default pip");
        }
        DEFAULT_PIP
    }
}

fn is_plain_code(code: &str) -> bool {
    (3..=4).contains(&code.len()) && code.chars().all(|c| c.is_ascii_uppercase())
}
