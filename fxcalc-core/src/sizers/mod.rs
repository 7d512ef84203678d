//! Position Sizers: turn a risk budget into a unit count
//!
//! # Responsibilities
//! - Resolve pip size from the quote currency
//! - Size a position so a stop-loss hit costs the risk budget
//! - Bound it by the margin left after reserving that budget
//! - Evaluate a low/high entry range and average it
//!
//! # Non-Responsibilities
//! - Sizers do NOT fetch conversion rates (callers supply them)
//! - Sizers do NOT parse or format text

pub mod bracket;
pub mod detail;
pub mod pip;
pub mod position;

pub use bracket::{
    evaluate_bracket, BracketEvaluator, BracketLeg, BracketResult, DisplayMode, SizingWarning,
    ValidationError,
};
pub use detail::TradeDetail;
pub use pip::{pip_size, PipPolicy, DEFAULT_PIP, JPY_PIP, XAU_PIP};
pub use position::{
    calculate_position, margin_requirement, PositionCalculator, PositionResult, SizingFailure,
};
