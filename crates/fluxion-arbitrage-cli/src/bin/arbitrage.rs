// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! CLI entry point for FluxION Arbitrage

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use fluxion_arbitrage::{
    Aggregation, ArbitrageParams, PriceSeries, aggregate_prices, average_day_profile,
    calculate_arbitrage_benefits, compare_strategies, daily_spreads, summarize_market,
};
use fluxion_arbitrage_cli::{
    cli::{
        ArbitrageConfig, BatteryArgs, Cli, Commands, CompareArgs, CsvFormatter, CsvLoader,
        Currency, DataLoader, JsonFormatter, MarketArgs, MarketOverview, OutputArgs,
        OutputConfig, RunArgs, ScenarioLoader, SourceArgs, SqliteLoader, TableFormatter,
        WideCsvLoader,
    },
    price_scenarios::PriceScenario,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run(args) => run_command(&args),
        Commands::Compare(args) => compare_command(&args),
        Commands::Market(args) => market_command(&args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["fluxion_arbitrage", "fluxion_arbitrage_cli"] {
        if let Ok(directive) = format!("{target}={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }

    // Logs go to stderr so tables on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Where results go
enum OutputMode {
    Table,
    Csv(String),
    Json(String),
    /// Table on stdout plus CSV file
    Both(String),
}

impl OutputMode {
    fn shows_table(&self) -> bool {
        matches!(self, Self::Table | Self::Both(_))
    }
}

fn output_mode(args: &OutputArgs, config: &OutputConfig) -> Result<OutputMode> {
    let format = args.output.as_deref().unwrap_or(&config.format);
    let path = || {
        args.out_path
            .clone()
            .with_context(|| format!("--out-path is required when --output is '{format}'"))
    };

    Ok(match format {
        "table" => OutputMode::Table,
        "csv" => OutputMode::Csv(path()?),
        "json" => OutputMode::Json(path()?),
        "both" => OutputMode::Both(path()?),
        other => bail!("Unknown output format '{other}'. Expected table, csv, json or both"),
    })
}

fn parse_date(raw: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| {
        format!(
            "Invalid {flag} date: '{raw}'\n\n\
            Expected format: YYYY-MM-DD (e.g., 2024-01-15)"
        )
    })
}

fn create_loader(source: &SourceArgs) -> Result<Box<dyn DataLoader>> {
    let file_sources = [&source.from_csv, &source.from_wide_csv, &source.from_db]
        .iter()
        .filter(|s| s.is_some())
        .count();
    if file_sources > 1 {
        bail!("Choose only one of --from-csv, --from-wide-csv or --from-db");
    }

    let loader: Box<dyn DataLoader> = if let Some(db_path) = &source.from_db {
        Box::new(SqliteLoader::new(
            db_path.clone(),
            Currency::parse(&source.currency)?,
        ))
    } else if let Some(csv_path) = &source.from_csv {
        Box::new(CsvLoader::new(csv_path.clone()))
    } else if let Some(csv_path) = &source.from_wide_csv {
        Box::new(WideCsvLoader::new(csv_path.clone()))
    } else {
        let start_date = source
            .start_date
            .as_deref()
            .map(|d| parse_date(d, "--start-date"))
            .transpose()?
            .unwrap_or_else(|| Utc::now().date_naive());

        Box::new(ScenarioLoader {
            scenario: source.scenario.parse::<PriceScenario>()?,
            start_date,
            days: source.days,
        })
    };

    Ok(loader)
}

/// Load prices and restrict them to the requested date range
fn load_series(source: &SourceArgs) -> Result<(PriceSeries, String)> {
    let loader = create_loader(source)?;
    let series = loader.load().context("No data available")?;

    let start = source
        .start
        .as_deref()
        .map(|d| parse_date(d, "--start"))
        .transpose()?;
    let end = source
        .end
        .as_deref()
        .map(|d| parse_date(d, "--end"))
        .transpose()?;

    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        bail!("--start ({start}) is after --end ({end})");
    }

    let series = if start.is_some() || end.is_some() {
        series.filter_dates(start, end)
    } else {
        series
    };

    match series.date_range() {
        Some((first, last)) => info!("Analyzing {} prices from {first} to {last}", series.len()),
        None => warn!("No prices in the selected date range"),
    }

    Ok((series, loader.describe()))
}

/// Merge the config file with command-line overrides
fn resolve_settings(
    battery: &BatteryArgs,
    analysis: Option<&str>,
) -> Result<(ArbitrageParams, OutputConfig)> {
    let config = match &battery.config {
        Some(path) => ArbitrageConfig::from_file(path)?,
        None => ArbitrageConfig::default(),
    };

    let mut battery_config = config.battery;
    if let Some(analysis) = analysis {
        analysis.clone_into(&mut battery_config.analysis_type);
    }
    if let Some(capacity) = battery.capacity_mwh {
        battery_config.capacity_mwh = capacity;
    }
    if let Some(efficiency) = battery.efficiency {
        battery_config.efficiency = efficiency;
    }
    if let Some(cost) = battery.cost_per_mwh {
        battery_config.cost_per_mwh = cost;
    }
    if let Some(degradation) = battery.degradation {
        battery_config.degradation_per_cycle = degradation;
    }

    Ok((battery_config.to_params()?, config.output))
}

fn run_command(args: &RunArgs) -> Result<()> {
    let (params, output_config) = resolve_settings(&args.battery, args.analysis.as_deref())?;
    let mode = output_mode(&args.output, &output_config)?;
    let (series, source) = load_series(&args.source)?;

    let report = calculate_arbitrage_benefits(&series, &params);
    let symbol = &output_config.currency_symbol;

    if mode.shows_table() {
        if args.daily {
            println!("{}", TableFormatter::format_daily(&report, symbol));
        }
        println!("{}", TableFormatter::format_report(&report, &source, symbol));
    }

    match &mode {
        OutputMode::Csv(path) | OutputMode::Both(path) => {
            CsvFormatter::write_daily(std::slice::from_ref(&report), path)?;
            info!("Daily results written to {path}");
        }
        OutputMode::Json(path) => {
            JsonFormatter::write(&report, path)?;
            info!("Report written to {path}");
        }
        OutputMode::Table => {}
    }

    Ok(())
}

fn compare_command(args: &CompareArgs) -> Result<()> {
    let (params, output_config) = resolve_settings(&args.battery, None)?;
    let mode = output_mode(&args.output, &output_config)?;
    let (series, source) = load_series(&args.source)?;

    let reports = compare_strategies(&series, &params);
    let symbol = &output_config.currency_symbol;

    if mode.shows_table() {
        println!("{}", TableFormatter::format_comparison(&reports, symbol));
        println!("{source}");
    }

    match &mode {
        OutputMode::Csv(path) | OutputMode::Both(path) => {
            CsvFormatter::write_daily(&reports, path)?;
            info!("Daily results written to {path}");
        }
        OutputMode::Json(path) => {
            JsonFormatter::write(&reports, path)?;
            info!("Reports written to {path}");
        }
        OutputMode::Table => {}
    }

    Ok(())
}

fn market_command(args: &MarketArgs) -> Result<()> {
    let output_config = OutputConfig::default();
    let mode = output_mode(&args.output, &output_config)?;
    let (series, source) = load_series(&args.source)?;

    let aggregation = match args.aggregation.as_str() {
        "daily" => Aggregation::Daily,
        "yearly" => Aggregation::Yearly,
        _ => Aggregation::Monthly,
    };

    let overview = MarketOverview {
        summary: summarize_market(&series),
        daily_spreads: daily_spreads(&series),
        hourly_profile: average_day_profile(&series),
        aggregation,
        periods: aggregate_prices(&series, aggregation),
    };

    if mode.shows_table() {
        println!("{source}");
        println!(
            "{}",
            TableFormatter::format_market(&overview, &output_config.currency_symbol)
        );
    }

    match &mode {
        OutputMode::Csv(path) | OutputMode::Both(path) => {
            CsvFormatter::write_periods(&overview.periods, path)?;
            info!("Period averages written to {path}");
        }
        OutputMode::Json(path) => {
            JsonFormatter::write(&overview, path)?;
            info!("Market overview written to {path}");
        }
        OutputMode::Table => {}
    }

    Ok(())
}
