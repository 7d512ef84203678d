//! Position Calculator
//!
//! Sizes one trade so that a stop-loss hit costs the requested risk, then
//! checks the result against the margin ceiling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SizingConfig;
use crate::domain::{
    AccountParameters, ConversionContext, CurrencyRelationship, CurrencyTriple, PriceScenario,
};
use crate::sizers::pip::pip_size;

/// Why a calculation produced no position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Error)]
pub enum SizingFailure {
    /// Truncated size under-delivers risk beyond tolerance, or exceeds margin capacity
    #[error("Insufficient margin - reduce margin risk or increase stop loss PIPs")]
    InsufficientMargin,
}

/// Output of one sizing call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PositionResult {
    /// Position size in base-currency units (0 on failure)
    pub units: i64,
    /// Home-currency value of one pip at `units` (0 on failure)
    pub pip_value_home: f64,
    /// Capacity ceiling from remaining margin, present even on failure
    pub max_units: i64,
    pub failure: Option<SizingFailure>,
}

impl PositionResult {
    pub fn success(units: i64, pip_value_home: f64, max_units: i64) -> Self {
        Self { units, pip_value_home, max_units, failure: None }
    }

    /// Zeroed payload that still reports capacity.
    pub fn failed(max_units: i64, failure: SizingFailure) -> Self {
        Self { units: 0, pip_value_home: 0.0, max_units, failure: Some(failure) }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Successful but too small to be practical.
    pub fn is_degenerate(&self, threshold: i64) -> bool {
        self.is_success() && self.units < threshold
    }
}

/// Home-currency capital tied up by one unit of notional at `price`,
/// before leverage.
pub fn margin_requirement(
    relationship: CurrencyRelationship,
    price: f64,
    conversion: &ConversionContext,
) -> f64 {
    match relationship {
        CurrencyRelationship::BaseIsHome => price / conversion.home_quote_rate,
        CurrencyRelationship::QuoteIsHome => price,
        CurrencyRelationship::CrossPair => price * conversion.home_rate,
    }
}

/// Truncate toward zero. Saturates at the i64 bounds; NaN becomes 0.
fn truncate_units(value: f64) -> i64 {
    value as i64
}

/// Risk-based position sizer with a margin-capacity check.
///
/// # Formula
/// ```text
/// stop_distance = stop_loss_pips * pip
/// raw_units     = (risk / home_quote_rate) / stop_distance
/// max_units     = (margin - risk) / (margin_requirement / leverage)
/// units         = trunc(raw_units)
/// actual_risk   = pip * units * home_quote_rate * stop_loss_pips
/// ```
///
/// The result fails with [`SizingFailure::InsufficientMargin`] when `units`
/// truncates to 0, when `actual_risk < risk * risk_tolerance`, or when
/// `units > max_units`.
///
/// # Example
/// - Margin: $1,000, leverage 100:1, risk $50
/// - EUR/USD at 1.1000, stop 20 pips (0.0020)
/// - Raw units: 50 / 0.0020 = 25,000
/// - Max units: 950 / (0.01 * 1.1) = 86,363
/// - Result: 25,000 units, $2.50 per pip
#[derive(Debug, Clone, Default)]
pub struct PositionCalculator {
    config: SizingConfig,
}

impl PositionCalculator {
    pub fn new(config: SizingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SizingConfig {
        &self.config
    }

    /// Size a position, classifying the currency relationship from `currencies`.
    pub fn calculate(
        &self,
        account: &AccountParameters,
        scenario: &PriceScenario,
        conversion: &ConversionContext,
        currencies: &CurrencyTriple,
    ) -> PositionResult {
        self.calculate_with_relationship(
            account,
            scenario,
            conversion,
            currencies.relationship(),
            &currencies.quote,
        )
    }

    /// Size a position with an already-classified relationship.
    pub fn calculate_with_relationship(
        &self,
        account: &AccountParameters,
        scenario: &PriceScenario,
        conversion: &ConversionContext,
        relationship: CurrencyRelationship,
        quote: &str,
    ) -> PositionResult {
        let pip = pip_size(quote, self.config.pip_policy);

        // Risk side
        let stop_loss_distance = scenario.stop_loss_pips * pip;
        let risk_in_quote = account.risk_amount / conversion.home_quote_rate;
        let raw_units = risk_in_quote / stop_loss_distance;

        // Capacity side
        let requirement = margin_requirement(relationship, scenario.price, conversion);
        let max_units_raw = account.remaining_margin() / (account.margin_rate() * requirement);
        let max_units = truncate_units(max_units_raw);

        let units = truncate_units(raw_units);
        let pip_value_home = pip * units as f64 * conversion.home_quote_rate;
        let actual_risk = pip_value_home * scenario.stop_loss_pips;

        tracing::debug!(
            ?relationship,
            pip,
            raw_units,
            units,
            max_units_raw,
            actual_risk,
            "position sizing"
        );

        // A zero-unit position never counts as sized, whatever the tolerance
        if units <= 0 || actual_risk < account.risk_amount * self.config.risk_tolerance {
            return PositionResult::failed(max_units, SizingFailure::InsufficientMargin);
        }

        if units as f64 > max_units_raw {
            return PositionResult::failed(max_units, SizingFailure::InsufficientMargin);
        }

        PositionResult::success(units, pip_value_home, max_units)
    }
}

/// Size a position with the default configuration.
pub fn calculate_position(
    account: &AccountParameters,
    scenario: &PriceScenario,
    conversion: &ConversionContext,
    currencies: &CurrencyTriple,
) -> PositionResult {
    PositionCalculator::default().calculate(account, scenario, conversion, currencies)
}
