//! fxcalc Core: FX position sizing engine.
//!
//! This crate contains the sizing engine and nothing else:
//! - Domain types (account, price scenario, conversion rates, currency pairs)
//! - Pip resolution by quote currency
//! - Risk-based position calculator with margin-capacity ceiling
//! - High/low bracket evaluation with averaged recommendation
//! - Trade-detail projection (margin used, utilization, WCMA)
//! - TOML configuration
//!
//! Every operation is a pure function of its inputs. Rates are supplied by
//! the caller; nothing here performs I/O apart from [`config::FxcalcConfig::from_file`].

pub mod config;
pub mod domain;
pub mod sizers;

pub use config::{CalcDefaults, ConfigError, FxcalcConfig, SizingConfig};
pub use domain::{
    AccountParameters, ConversionContext, CurrencyRelationship, CurrencyTriple, FxPair, Leverage,
    PriceScenario,
};
pub use sizers::{
    calculate_position, evaluate_bracket, BracketEvaluator, BracketLeg, BracketResult,
    DisplayMode, PositionCalculator, PositionResult, SizingFailure, SizingWarning, TradeDetail,
    ValidationError,
};
