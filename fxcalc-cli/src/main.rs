//! fxcalc CLI: forex position sizing from the terminal.
//!
//! Commands:
//! - `calc`: size a trade across a low/high entry range
//! - `pairs`: list the built-in instrument catalog
//! - `options`: list account currencies and leverage presets

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use fxcalc_core::config::FxcalcConfig;
use fxcalc_core::domain::{
    AccountParameters, ConversionContext, CurrencyRelationship, CurrencyTriple, FxPair, Leverage,
    PriceScenario, ACCOUNT_CURRENCIES,
};
use fxcalc_core::sizers::{BracketEvaluator, BracketLeg, BracketResult, PositionResult};

#[derive(Parser)]
#[command(name = "fxcalc", about = "Risk-based forex position sizing")]
struct Cli {
    /// Log filter (error, warn, info, debug, trace). RUST_LOG overrides it.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Size a position at both ends of an entry range.
    Calc(CalcArgs),
    /// List the built-in currency pairs.
    Pairs,
    /// List account currencies and leverage presets.
    Options,
}

#[derive(Args)]
struct CalcArgs {
    /// Pair symbol (EUR/USD or EURUSD).
    #[arg(long, conflicts_with_all = ["base", "quote"])]
    pair: Option<String>,

    /// Base currency, for pairs outside the catalog.
    #[arg(long, requires = "quote")]
    base: Option<String>,

    /// Quote currency, for pairs outside the catalog.
    #[arg(long, requires = "base")]
    quote: Option<String>,

    /// Account (home) currency. Defaults to the config value.
    #[arg(long)]
    account: Option<String>,

    /// Leverage as N:1. Defaults to the config value.
    #[arg(long)]
    leverage: Option<Leverage>,

    /// Available margin, in the account currency.
    #[arg(long)]
    margin: f64,

    /// Amount to lose if the stop is hit, in the account currency.
    #[arg(long)]
    risk: f64,

    /// Stop-loss distance in pips.
    #[arg(long)]
    stop_pips: f64,

    /// Low end of the expected entry range.
    #[arg(long)]
    low: f64,

    /// High end of the expected entry range.
    #[arg(long)]
    high: f64,

    /// Home-currency value of one unit of base at the low end.
    /// Required unless the base is the account currency.
    #[arg(long)]
    base_home_low: Option<f64>,

    /// Home-currency value of one unit of base at the high end.
    /// Required unless the base is the account currency.
    #[arg(long)]
    base_home_high: Option<f64>,

    /// Quote-to-home conversion rate at the low end.
    /// Required unless the quote is the account currency.
    #[arg(long)]
    quote_home_low: Option<f64>,

    /// Quote-to-home conversion rate at the high end.
    /// Required unless the quote is the account currency.
    #[arg(long)]
    quote_home_high: Option<f64>,

    /// Also print margin used, utilization and WCMA for one leg (low, average, high).
    #[arg(long)]
    detail: Option<BracketLeg>,

    /// Print the result as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Commands::Calc(args) => run_calc(args),
        Commands::Pairs => {
            run_pairs();
            Ok(())
        }
        Commands::Options => {
            run_options();
            Ok(())
        }
    }
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level '{level}'"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn run_calc(args: CalcArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => FxcalcConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FxcalcConfig::default(),
    };

    let pair = resolve_pair(&args)?;
    let home = args
        .account
        .as_deref()
        .map(|code| code.trim().to_ascii_uppercase())
        .unwrap_or_else(|| config.defaults.account_currency.clone());
    if !FxPair::is_account_currency(&home) {
        tracing::warn!(account = %home, "account currency is not in the standard list");
    }
    let leverage = args.leverage.unwrap_or(config.defaults.leverage);

    let currencies = pair.with_home(home);
    let relationship = currencies.relationship();
    let account = AccountParameters::new(args.margin, leverage.ratio(), args.risk);
    let low = PriceScenario::new(args.low, args.stop_pips);
    let high = PriceScenario::new(args.high, args.stop_pips);
    let low_conversion =
        conversion_for(relationship, args.base_home_low, args.quote_home_low, "low")?;
    let high_conversion =
        conversion_for(relationship, args.base_home_high, args.quote_home_high, "high")?;

    tracing::info!(
        pair = %pair,
        home = %currencies.home,
        ?relationship,
        leverage = %leverage,
        "sizing bracket"
    );

    let evaluator = BracketEvaluator::new(config.sizing);
    let bracket = evaluator
        .evaluate(&account, &low, &high, &low_conversion, &high_conversion, &currencies)
        .context("invalid input")?;

    if args.json {
        let report = json_report(&pair, &currencies, leverage, &account, &bracket, args.detail);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_bracket(&pair, &currencies, leverage, &bracket);
        if let Some(leg) = args.detail {
            print_detail(leg, &account, &bracket);
        }
        if let Some(failure) = bracket.failure {
            eprintln!("Error: {failure}");
        }
    }

    let code = exit_code(&bracket);
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}

/// Process exit status for a sized bracket: 1 when sizing failed.
fn exit_code(bracket: &BracketResult) -> i32 {
    match bracket.failure {
        Some(_) => 1,
        None => 0,
    }
}

fn resolve_pair(args: &CalcArgs) -> Result<FxPair> {
    if let Some(symbol) = &args.pair {
        let pair: FxPair = symbol.parse()?;
        if FxPair::lookup(symbol).is_err() {
            tracing::warn!(pair = %pair, "pair is not in the built-in catalog");
        }
        return Ok(pair);
    }

    match (&args.base, &args.quote) {
        (Some(base), Some(quote)) => {
            let symbol = format!("{base}/{quote}");
            symbol
                .parse::<FxPair>()
                .with_context(|| format!("invalid currencies {base} and {quote}"))
        }
        _ => bail!("one of --pair or --base/--quote is required"),
    }
}

/// Build a leg's conversion rates from the prices the relationship needs.
///
/// The leg whose currency is the account currency always converts at 1.0.
/// Any other rate must be given on the command line.
fn conversion_for(
    relationship: CurrencyRelationship,
    base_home: Option<f64>,
    quote_home: Option<f64>,
    leg: &str,
) -> Result<ConversionContext> {
    let home_rate = if relationship.needs_home_rate() {
        required_rate(base_home, "base-home", leg)?
    } else {
        1.0
    };
    let home_quote_rate = if relationship.needs_home_quote_rate() {
        required_rate(quote_home, "quote-home", leg)?
    } else {
        1.0
    };
    Ok(ConversionContext::new(home_rate, home_quote_rate))
}

fn required_rate(rate: Option<f64>, name: &str, leg: &str) -> Result<f64> {
    match rate {
        Some(rate) => Ok(rate),
        None => bail!("--{name}-{leg} is required for this pair and account currency"),
    }
}

fn run_pairs() {
    println!("{:<10} {:<6} {:<6}", "Pair", "Base", "Quote");
    println!("{}", "-".repeat(24));
    for pair in FxPair::catalog() {
        println!("{:<10} {:<6} {:<6}", pair.symbol(), pair.base, pair.quote);
    }
}

fn run_options() {
    let defaults = FxcalcConfig::default().defaults;
    println!("Account currencies: {}", ACCOUNT_CURRENCIES.join(", "));
    let presets: Vec<String> = Leverage::presets().iter().map(|l| l.to_string()).collect();
    println!("Leverage presets:   {}", presets.join(", "));
    println!(
        "Defaults:           {} account, {} leverage",
        defaults.account_currency, defaults.leverage
    );
}

fn print_bracket(
    pair: &FxPair,
    currencies: &CurrencyTriple,
    leverage: Leverage,
    bracket: &BracketResult,
) {
    println!();
    println!("=== Position Size ===");
    println!("Pair:           {pair}");
    println!("Account:        {}", currencies.home);
    println!("Leverage:       {leverage}");
    println!("Range:          {} - {}", bracket.low_price, bracket.high_price);
    println!();

    println!("{:<10} {:>12} {:>14} {:>12}", "Leg", "Units", "Pip Value", "Max Units");
    println!("{}", "-".repeat(51));
    for &leg in bracket.visible_legs() {
        let result = bracket.result_for(leg);
        println!(
            "{:<10} {:>12} {:>14} {:>12}",
            leg,
            format_units(result),
            format!("{:.2} {}", result.pip_value_home, currencies.home),
            result.max_units
        );
    }

    for warning in &bracket.warnings {
        println!();
        println!("WARNING: {warning}");
    }
    println!();
}

fn format_units(result: &PositionResult) -> String {
    match result.failure {
        Some(_) => "-".to_string(),
        None => result.units.to_string(),
    }
}

fn print_detail(leg: BracketLeg, account: &AccountParameters, bracket: &BracketResult) {
    let detail = bracket.trade_detail(leg, account);
    println!("--- Detail ({leg} @ {}) ---", bracket.price_for(leg));
    println!("Units:          {}", detail.units);
    println!("Margin Used:    {:.2}", detail.margin_used);
    match detail.utilization_pct {
        Some(pct) => println!("Utilization:    {pct:.1}%"),
        None => println!("Utilization:    n/a (no capacity)"),
    }
    println!("WCMA:           {:.2}", detail.wcma);
    println!();
}

fn json_report(
    pair: &FxPair,
    currencies: &CurrencyTriple,
    leverage: Leverage,
    account: &AccountParameters,
    bracket: &BracketResult,
    detail: Option<BracketLeg>,
) -> serde_json::Value {
    let detail = detail.map(|leg| {
        serde_json::json!({
            "leg": leg,
            "price": bracket.price_for(leg),
            "detail": bracket.trade_detail(leg, account),
        })
    });
    serde_json::json!({
        "pair": pair.symbol(),
        "account_currency": currencies.home,
        "leverage": leverage,
        "bracket": bracket,
        "error": bracket.failure.map(|f| f.to_string()),
        "detail": detail,
    })
}
