//! Trade-detail projection: how much capacity a sized position consumes.

use serde::{Deserialize, Serialize};

use crate::domain::AccountParameters;
use crate::sizers::position::PositionResult;

/// Derived figures for one sized position at a representative price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TradeDetail {
    pub units: i64,
    pub max_units: i64,
    pub pip_value_home: f64,
    /// `units * price / leverage`
    pub margin_used: f64,
    /// `units / max_units * 100`; `None` when there is no capacity
    pub utilization_pct: Option<f64>,
    /// Worst-case margin available: margin left after the position and the risk budget
    pub wcma: f64,
}

impl TradeDetail {
    pub fn project(result: &PositionResult, account: &AccountParameters, price: f64) -> Self {
        let margin_used = result.units as f64 * price / account.leverage;
        let utilization_pct = if result.max_units == 0 {
            None
        } else {
            Some(result.units as f64 / result.max_units as f64 * 100.0)
        };
        let wcma = account.available_margin - margin_used - account.risk_amount;

        Self {
            units: result.units,
            max_units: result.max_units,
            pip_value_home: result.pip_value_home,
            margin_used,
            utilization_pct,
            wcma,
        }
    }
}
