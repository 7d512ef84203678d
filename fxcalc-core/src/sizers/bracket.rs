//! Bracket Evaluator
//!
//! Sizes a trade at both ends of the expected entry range and derives an
//! averaged recommendation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::SizingConfig;
use crate::domain::{
    AccountParameters, ConversionContext, CurrencyRelationship, CurrencyTriple, PriceScenario,
};
use crate::sizers::detail::TradeDetail;
use crate::sizers::position::{PositionCalculator, PositionResult, SizingFailure};

/// Which results the presentation layer should show.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DisplayMode {
    /// Only the average; price movement does not change margin economics
    SingleAverage,
    /// High, average and low
    ThreeWay,
}

impl DisplayMode {
    pub fn for_relationship(relationship: CurrencyRelationship) -> Self {
        match relationship {
            CurrencyRelationship::BaseIsHome => Self::SingleAverage,
            CurrencyRelationship::QuoteIsHome | CurrencyRelationship::CrossPair => Self::ThreeWay,
        }
    }
}

/// One of the three bracket results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BracketLeg {
    Low,
    Average,
    High,
}

impl fmt::Display for BracketLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "low",
            Self::Average => "average",
            Self::High => "high",
        };
        f.write_str(name)
    }
}

impl FromStr for BracketLeg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "average" | "avg" => Ok(Self::Average),
            "high" => Ok(Self::High),
            other => Err(format!("unknown bracket leg '{other}' (expected low, average or high)")),
        }
    }
}

/// Rejected input, detected before any sizing call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("Available margin must be positive")]
    NonPositiveMargin { available_margin: f64 },

    #[error("Risk amount must be positive and not exceed available margin")]
    RiskOutOfRange { risk_amount: f64, available_margin: f64 },

    #[error("Leverage must be positive")]
    NonPositiveLeverage { leverage: f64 },

    #[error("Stop loss must be positive")]
    NonPositiveStopLoss { stop_loss_pips: f64 },

    #[error("Prices must be positive")]
    NonPositivePrice { price: f64 },

    #[error("Low price cannot be higher than high price")]
    InvertedBracket { low: f64, high: f64 },

    #[error("{field} conversion rate must be positive")]
    NonPositiveRate { field: &'static str, rate: f64 },
}

/// Non-fatal observations about a successful bracket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Error)]
pub enum SizingWarning {
    #[error("Position size very small ({units} units at {leg} price) - consider increasing risk")]
    SmallPosition { leg: BracketLeg, units: i64 },
}

/// Low, high and averaged sizing for one entry range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BracketResult {
    pub low: PositionResult,
    pub high: PositionResult,
    pub average: PositionResult,
    pub display_mode: DisplayMode,
    pub relationship: CurrencyRelationship,
    pub low_price: f64,
    pub high_price: f64,
    /// First failing leg's reason (high checked before low)
    pub failure: Option<SizingFailure>,
    pub warnings: Vec<SizingWarning>,
}

impl BracketResult {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn result_for(&self, leg: BracketLeg) -> &PositionResult {
        match leg {
            BracketLeg::Low => &self.low,
            BracketLeg::Average => &self.average,
            BracketLeg::High => &self.high,
        }
    }

    /// Representative price of a leg; the average leg uses the range midpoint.
    pub fn price_for(&self, leg: BracketLeg) -> f64 {
        match leg {
            BracketLeg::Low => self.low_price,
            BracketLeg::Average => (self.low_price + self.high_price) / 2.0,
            BracketLeg::High => self.high_price,
        }
    }

    /// Legs to show, top to bottom.
    pub fn visible_legs(&self) -> &'static [BracketLeg] {
        match self.display_mode {
            DisplayMode::SingleAverage => &[BracketLeg::Average],
            DisplayMode::ThreeWay => &[BracketLeg::High, BracketLeg::Average, BracketLeg::Low],
        }
    }

    pub fn trade_detail(&self, leg: BracketLeg, account: &AccountParameters) -> TradeDetail {
        TradeDetail::project(self.result_for(leg), account, self.price_for(leg))
    }

    /// Visible legs that succeeded with fewer than `threshold` units.
    pub fn small_position_warnings(&self, threshold: i64) -> Vec<SizingWarning> {
        self.visible_legs()
            .iter()
            .filter(|leg| self.result_for(**leg).is_degenerate(threshold))
            .map(|&leg| SizingWarning::SmallPosition { leg, units: self.result_for(leg).units })
            .collect()
    }
}

/// Evaluates a low/high entry range with a shared [`PositionCalculator`].
#[derive(Debug, Clone, Default)]
pub struct BracketEvaluator {
    calculator: PositionCalculator,
}

impl BracketEvaluator {
    pub fn new(config: SizingConfig) -> Self {
        Self { calculator: PositionCalculator::new(config) }
    }

    pub fn calculator(&self) -> &PositionCalculator {
        &self.calculator
    }

    /// Validate inputs, size both ends of the range, and combine.
    ///
    /// Input problems return `Err` with no partial result. Sizing failures
    /// are reported inside the `BracketResult` so capacity stays visible.
    pub fn evaluate(
        &self,
        account: &AccountParameters,
        low: &PriceScenario,
        high: &PriceScenario,
        low_conversion: &ConversionContext,
        high_conversion: &ConversionContext,
        currencies: &CurrencyTriple,
    ) -> Result<BracketResult, ValidationError> {
        validate(account, low, high, low_conversion, high_conversion)?;

        let relationship = currencies.relationship();
        let low_result = self.calculator.calculate_with_relationship(
            account,
            low,
            low_conversion,
            relationship,
            &currencies.quote,
        );
        let high_result = self.calculator.calculate_with_relationship(
            account,
            high,
            high_conversion,
            relationship,
            &currencies.quote,
        );

        let failure = high_result.failure.or(low_result.failure);
        let average = average_result(&low_result, &high_result, failure);
        let display_mode = DisplayMode::for_relationship(relationship);

        let mut result = BracketResult {
            low: low_result,
            high: high_result,
            average,
            display_mode,
            relationship,
            low_price: low.price,
            high_price: high.price,
            failure,
            warnings: Vec::new(),
        };

        let threshold = self.calculator.config().degenerate_units;
        result.warnings = result.small_position_warnings(threshold);

        tracing::debug!(
            ?relationship,
            ?display_mode,
            low_units = result.low.units,
            high_units = result.high.units,
            average_units = result.average.units,
            failed = result.failure.is_some(),
            "bracket evaluated"
        );

        Ok(result)
    }
}

/// Combine two legs. Units average on the truncated integer counts.
fn average_result(
    low: &PositionResult,
    high: &PositionResult,
    failure: Option<SizingFailure>,
) -> PositionResult {
    let max_units = ((low.max_units as f64 + high.max_units as f64) / 2.0) as i64;

    match failure {
        Some(reason) => PositionResult::failed(max_units, reason),
        None => {
            let units = ((low.units as i128 + high.units as i128) / 2) as i64;
            let pip_value_home = (low.pip_value_home + high.pip_value_home) / 2.0;
            PositionResult::success(units, pip_value_home, max_units)
        }
    }
}

fn validate(
    account: &AccountParameters,
    low: &PriceScenario,
    high: &PriceScenario,
    low_conversion: &ConversionContext,
    high_conversion: &ConversionContext,
) -> Result<(), ValidationError> {
    let numbers = [
        ("available margin", account.available_margin),
        ("leverage", account.leverage),
        ("risk amount", account.risk_amount),
        ("low price", low.price),
        ("high price", high.price),
        ("low stop loss", low.stop_loss_pips),
        ("high stop loss", high.stop_loss_pips),
        ("low home rate", low_conversion.home_rate),
        ("low home quote rate", low_conversion.home_quote_rate),
        ("high home rate", high_conversion.home_rate),
        ("high home quote rate", high_conversion.home_quote_rate),
    ];
    if let Some(&(field, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
        return Err(ValidationError::NonFinite { field });
    }

    if account.available_margin <= 0.0 {
        return Err(ValidationError::NonPositiveMargin {
            available_margin: account.available_margin,
        });
    }
    if account.risk_amount <= 0.0 || account.risk_amount > account.available_margin {
        return Err(ValidationError::RiskOutOfRange {
            risk_amount: account.risk_amount,
            available_margin: account.available_margin,
        });
    }
    for scenario in [low, high] {
        if scenario.stop_loss_pips <= 0.0 {
            return Err(ValidationError::NonPositiveStopLoss {
                stop_loss_pips: scenario.stop_loss_pips,
            });
        }
    }
    for scenario in [low, high] {
        if scenario.price <= 0.0 {
            return Err(ValidationError::NonPositivePrice { price: scenario.price });
        }
    }
    if low.price > high.price {
        return Err(ValidationError::InvertedBracket { low: low.price, high: high.price });
    }
    if account.leverage <= 0.0 {
        return Err(ValidationError::NonPositiveLeverage { leverage: account.leverage });
    }

    let rates = [
        ("low home", low_conversion.home_rate),
        ("low home quote", low_conversion.home_quote_rate),
        ("high home", high_conversion.home_rate),
        ("high home quote", high_conversion.home_quote_rate),
    ];
    if let Some(&(field, rate)) = rates.iter().find(|(_, r)| *r <= 0.0) {
        return Err(ValidationError::NonPositiveRate { field, rate });
    }

    Ok(())
}

/// Evaluate a bracket with the default configuration.
pub fn evaluate_bracket(
    account: &AccountParameters,
    low: &PriceScenario,
    high: &PriceScenario,
    low_conversion: &ConversionContext,
    high_conversion: &ConversionContext,
    currencies: &CurrencyTriple,
) -> Result<BracketResult, ValidationError> {
    BracketEvaluator::default().evaluate(
        account,
        low,
        high,
        low_conversion,
        high_conversion,
        currencies,
    )
}
