//! Domain types for fxcalc

pub mod account;
pub mod currency;
pub mod instrument;
pub mod scenario;

pub use account::{AccountParameters, Leverage, ParseLeverageError, LEVERAGE_PRESETS};
pub use currency::{CurrencyCode, CurrencyRelationship, CurrencyTriple};
pub use instrument::{FxPair, InstrumentError, ACCOUNT_CURRENCIES};
pub use scenario::{ConversionContext, PriceScenario};
