//! Property tests for sizing invariants.
//!
//! Uses proptest to verify:
//! 1. Unit sanity: units are never negative and failures carry zero units
//! 2. Risk delivery: a successful position loses between 99% and 100% of the budget
//! 3. Capacity monotonicity: more margin or more leverage never lowers max units
//! 4. Bracket averaging: the recommendation sits between the two legs
//! 5. Tiny stops fail cleanly instead of overflowing

use fxcalc_core::domain::{
    AccountParameters, ConversionContext, CurrencyTriple, FxPair, PriceScenario,
    ACCOUNT_CURRENCIES,
};
use fxcalc_core::sizers::{
    calculate_position, evaluate_bracket, pip_size, PipPolicy, SizingFailure,
};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_margin() -> impl Strategy<Value = f64> {
    (100.0..100_000.0_f64).prop_map(|m| (m * 100.0).round() / 100.0)
}

fn arb_leverage() -> impl Strategy<Value = f64> {
    prop::sample::select(vec![1.0, 10.0, 30.0, 50.0, 100.0, 200.0, 500.0, 1000.0, 2000.0])
}

/// Risk as a fraction of margin, so validation always passes.
fn arb_risk_fraction() -> impl Strategy<Value = f64> {
    0.001..0.5_f64
}

fn arb_price() -> impl Strategy<Value = f64> {
    (0.5..2.0_f64).prop_map(|p| (p * 10_000.0).round() / 10_000.0)
}

fn arb_stop_pips() -> impl Strategy<Value = f64> {
    (5.0..300.0_f64).prop_map(|s| s.round())
}

fn arb_rate() -> impl Strategy<Value = f64> {
    0.5..2.0_f64
}

fn arb_currencies() -> impl Strategy<Value = CurrencyTriple> {
    (
        prop::sample::select(FxPair::catalog()),
        prop::sample::select(ACCOUNT_CURRENCIES.to_vec()),
    )
        .prop_map(|(pair, home)| pair.with_home(home))
}

fn arb_account() -> impl Strategy<Value = AccountParameters> {
    (arb_margin(), arb_leverage(), arb_risk_fraction())
        .prop_map(|(margin, leverage, frac)| {
            AccountParameters::new(margin, leverage, margin * frac)
        })
}

// ── 1. Unit Sanity ───────────────────────────────────────────────────

proptest! {
    /// Units are non-negative, bounded by capacity on success, and zero on failure.
    #[test]
    fn units_are_sane(
        account in arb_account(),
        price in arb_price(),
        stop in arb_stop_pips(),
        home_rate in arb_rate(),
        home_quote_rate in arb_rate(),
        currencies in arb_currencies(),
    ) {
        let scenario = PriceScenario::new(price, stop);
        let conv = ConversionContext::new(home_rate, home_quote_rate);

        let result = calculate_position(&account, &scenario, &conv, &currencies);

        prop_assert!(result.units >= 0);
        prop_assert!(result.max_units >= 0);
        match result.failure {
            Some(_) => {
                prop_assert_eq!(result.units, 0);
                prop_assert_eq!(result.pip_value_home, 0.0);
            }
            None => {
                prop_assert!(result.units > 0);
                prop_assert!(result.units <= result.max_units);
            }
        }
    }

    /// Same inputs, same output.
    #[test]
    fn sizing_is_deterministic(
        account in arb_account(),
        price in arb_price(),
        stop in arb_stop_pips(),
        home_rate in arb_rate(),
        currencies in arb_currencies(),
    ) {
        let scenario = PriceScenario::new(price, stop);
        let conv = ConversionContext::new(home_rate, 1.0);

        let first = calculate_position(&account, &scenario, &conv, &currencies);
        let second = calculate_position(&account, &scenario, &conv, &currencies);
        prop_assert_eq!(first, second);
    }
}

// ── 2. Risk Delivery ─────────────────────────────────────────────────

proptest! {
    /// A successful position's stop-out loss is within tolerance of the budget
    /// and never meaningfully above it.
    #[test]
    fn success_delivers_budgeted_risk(
        account in arb_account(),
        price in arb_price(),
        stop in arb_stop_pips(),
        home_quote_rate in arb_rate(),
        currencies in arb_currencies(),
    ) {
        let scenario = PriceScenario::new(price, stop);
        let conv = ConversionContext::new(1.0, home_quote_rate);

        let result = calculate_position(&account, &scenario, &conv, &currencies);

        if result.is_success() {
            let actual_risk = result.pip_value_home * stop;
            prop_assert!(actual_risk >= account.risk_amount * 0.99);
            prop_assert!(actual_risk <= account.risk_amount * (1.0 + 1e-9));
        }
    }

    /// Pip size is one of the three known values for any input.
    #[test]
    fn pip_size_is_known_value(quote in "[A-Za-z]{0,6}") {
        for policy in [PipPolicy::Exact, PipPolicy::Suffix] {
            let pip = pip_size(&quote, policy);
            prop_assert!(pip == 0.01 || pip == 0.1 || pip == 0.0001);
        }
    }
}

// ── 3. Capacity Monotonicity ─────────────────────────────────────────

proptest! {
    /// Adding margin (risk fixed) never lowers max units.
    #[test]
    fn max_units_monotone_in_margin(
        account in arb_account(),
        extra in 0.0..50_000.0_f64,
        price in arb_price(),
        stop in arb_stop_pips(),
        home_rate in arb_rate(),
        currencies in arb_currencies(),
    ) {
        let scenario = PriceScenario::new(price, stop);
        let conv = ConversionContext::new(home_rate, 1.0);
        let richer = AccountParameters::new(
            account.available_margin + extra,
            account.leverage,
            account.risk_amount,
        );

        let base = calculate_position(&account, &scenario, &conv, &currencies);
        let more = calculate_position(&richer, &scenario, &conv, &currencies);
        prop_assert!(more.max_units >= base.max_units);
    }

    /// Raising leverage never lowers max units.
    #[test]
    fn max_units_monotone_in_leverage(
        account in arb_account(),
        factor in 1.0..20.0_f64,
        price in arb_price(),
        stop in arb_stop_pips(),
        home_rate in arb_rate(),
        currencies in arb_currencies(),
    ) {
        let scenario = PriceScenario::new(price, stop);
        let conv = ConversionContext::new(home_rate, 1.0);
        let levered = AccountParameters::new(
            account.available_margin,
            account.leverage * factor,
            account.risk_amount,
        );

        let base = calculate_position(&account, &scenario, &conv, &currencies);
        let more = calculate_position(&levered, &scenario, &conv, &currencies);
        prop_assert!(more.max_units >= base.max_units);
    }
}

// ── 4. Bracket Averaging ─────────────────────────────────────────────

proptest! {
    /// On success the averaged units are the integer mean of the legs, and
    /// averaged capacity lies between the legs' capacities.
    #[test]
    fn bracket_average_sits_between_legs(
        account in arb_account(),
        low_price in arb_price(),
        spread in 0.0..0.1_f64,
        stop in arb_stop_pips(),
        low_rate in arb_rate(),
        high_rate in arb_rate(),
        currencies in arb_currencies(),
    ) {
        let low = PriceScenario::new(low_price, stop);
        let high = PriceScenario::new(low_price + spread, stop);
        let low_conv = ConversionContext::new(low_rate, low_rate);
        let high_conv = ConversionContext::new(high_rate, high_rate);

        let bracket = evaluate_bracket(&account, &low, &high, &low_conv, &high_conv, &currencies)
            .expect("generated inputs are valid");

        let lo_max = bracket.low.max_units.min(bracket.high.max_units);
        let hi_max = bracket.low.max_units.max(bracket.high.max_units);
        prop_assert!(bracket.average.max_units >= lo_max);
        prop_assert!(bracket.average.max_units <= hi_max);

        if bracket.is_success() {
            prop_assert_eq!(
                bracket.average.units,
                (bracket.low.units + bracket.high.units) / 2
            );
        } else {
            prop_assert_eq!(bracket.average.units, 0);
            prop_assert!(bracket.low.failure.is_some() || bracket.high.failure.is_some());
        }
    }
}

// ── 5. Tiny Stops ────────────────────────────────────────────────────

proptest! {
    /// A near-zero stop wants an enormous position; it must fail on capacity
    /// rather than panic or wrap.
    #[test]
    fn tiny_stop_fails_on_capacity(
        margin in 1_000.0..10_000.0_f64,
        leverage in 1.0..500.0_f64,
        stop in 1e-9..1e-3_f64,
        price in arb_price(),
    ) {
        let account = AccountParameters::new(margin, leverage, 10.0);
        let scenario = PriceScenario::new(price, stop);
        let currencies = CurrencyTriple::new("EUR", "USD", "USD");

        let result =
            calculate_position(&account, &scenario, &ConversionContext::identity(), &currencies);

        prop_assert_eq!(result.failure, Some(SizingFailure::InsufficientMargin));
        prop_assert_eq!(result.units, 0);
    }
}
