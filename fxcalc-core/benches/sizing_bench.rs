//! Criterion benchmarks for the sizing path.
//!
//! Benchmarks:
//! 1. Single position calculation per currency relationship
//! 2. Full bracket evaluation (validation, two legs, averaging)
//! 3. Catalog sweep: every built-in pair against every account currency

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use fxcalc_core::domain::{
    AccountParameters, ConversionContext, CurrencyTriple, FxPair, PriceScenario,
    ACCOUNT_CURRENCIES,
};
use fxcalc_core::sizers::{BracketEvaluator, PositionCalculator};

// ── Helpers ──────────────────────────────────────────────────────────

fn account() -> AccountParameters {
    AccountParameters::new(10_000.0, 500.0, 100.0)
}

// ── 1. Position Calculator ───────────────────────────────────────────

fn bench_position(c: &mut Criterion) {
    let mut group = c.benchmark_group("position");
    let calculator = PositionCalculator::default();
    let account = account();
    let scenario = PriceScenario::new(1.1, 25.0);

    let cases = [
        ("base_is_home", CurrencyTriple::new("USD", "JPY", "USD")),
        ("quote_is_home", CurrencyTriple::new("EUR", "USD", "USD")),
        ("cross_pair", CurrencyTriple::new("EUR", "GBP", "USD")),
    ];

    for (name, currencies) in &cases {
        let conv = ConversionContext::new(1.08, 1.27);
        group.bench_with_input(BenchmarkId::new("calculate", name), currencies, |b, cur| {
            b.iter(|| {
                black_box(calculator.calculate(
                    black_box(&account),
                    black_box(&scenario),
                    &conv,
                    cur,
                ))
            });
        });
    }

    group.finish();
}

// ── 2. Bracket Evaluation ────────────────────────────────────────────

fn bench_bracket(c: &mut Criterion) {
    let mut group = c.benchmark_group("bracket");
    let evaluator = BracketEvaluator::default();
    let account = account();
    let low = PriceScenario::new(0.84, 30.0);
    let high = PriceScenario::new(0.86, 30.0);
    let low_conv = ConversionContext::new(1.08, 1.26);
    let high_conv = ConversionContext::new(1.10, 1.28);
    let currencies = CurrencyTriple::new("EUR", "GBP", "USD");

    group.bench_function("cross_pair_three_way", |b| {
        b.iter(|| {
            black_box(evaluator.evaluate(
                black_box(&account),
                &low,
                &high,
                &low_conv,
                &high_conv,
                &currencies,
            ))
        });
    });

    group.finish();
}

// ── 3. Catalog Sweep ─────────────────────────────────────────────────

fn bench_catalog_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog");
    let evaluator = BracketEvaluator::default();
    let account = account();
    let low = PriceScenario::new(1.0, 20.0);
    let high = PriceScenario::new(1.02, 20.0);
    let conv = ConversionContext::identity();

    let triples: Vec<CurrencyTriple> = FxPair::catalog()
        .iter()
        .flat_map(|pair| ACCOUNT_CURRENCIES.iter().map(move |home| pair.with_home(*home)))
        .collect();

    group.bench_function("all_pairs_all_homes", |b| {
        b.iter(|| {
            for currencies in &triples {
                let result = evaluator.evaluate(&account, &low, &high, &conv, &conv, currencies);
                let _ = black_box(result);
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_position, bench_bracket, bench_catalog_sweep);
criterion_main!(benches);
