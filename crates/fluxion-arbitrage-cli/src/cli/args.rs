// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! CLI argument definitions using clap.

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "fluxion-arbitrage")]
#[command(author, version, about = "FluxION BESS Arbitrage Analyzer")]
#[command(
    long_about = "Estimate day-ahead arbitrage revenue, degradation and ROI for a standalone battery.\n\
    \nSupports built-in price scenarios, local CSV files and the OTE price database.\n\
    \nExamples:\n  \
    fluxion-arbitrage run                                   # Usual day scenario, 30 days\n  \
    fluxion-arbitrage run --from-csv prices.csv --analysis \"2 Cycles\"\n  \
    fluxion-arbitrage compare --from-db solax_data.db --start 2024-01-01\n  \
    fluxion-arbitrage market --from-wide-csv omie.csv --aggregation monthly"
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run one arbitrage analysis
    #[command(
        long_about = "Score every day with the selected strategy and report ROI.\n\
        \nExamples:\n  \
        fluxion-arbitrage run --scenario solar_dip --days 90\n  \
        fluxion-arbitrage run --from-csv prices.csv --config battery.toml --output both --out-path daily.csv"
    )]
    Run(RunArgs),

    /// Compare the 1-cycle and 2-cycle strategies on the same prices
    Compare(CompareArgs),

    /// Summarize the market: spreads, average day and period averages
    Market(MarketArgs),
}

/// Where prices come from. File sources take precedence over --scenario.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Synthetic price scenario (usual_day, solar_dip, flat, volatile, negative)
    #[arg(
        long,
        default_value = "usual_day",
        help = "Synthetic price scenario to analyze",
        long_help = "Available scenarios:\n  \
          - usual_day: Cheap night, morning shoulder, noon dip, evening peak\n  \
          - solar_dip: Deep midday solar trough, strong evening peak\n  \
          - flat: Constant price\n  \
          - volatile: Random swings, reproducible per date\n  \
          - negative: Negative midday prices\n\
          \nIgnored when a file or database source is given"
    )]
    pub scenario: String,

    /// Number of scenario days
    #[arg(long, default_value_t = 30, help = "Days to generate for --scenario")]
    pub days: u32,

    /// First scenario day (defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub start_date: Option<String>,

    /// Load prices from a CSV file with datetime,price columns
    #[arg(long, value_name = "PATH")]
    pub from_csv: Option<String>,

    /// Load prices from a wide CSV file with date,H1..H24 columns
    #[arg(long, value_name = "PATH")]
    pub from_wide_csv: Option<String>,

    /// Load prices from the ote_prices table of a SQLite database
    #[arg(long, value_name = "PATH")]
    pub from_db: Option<String>,

    /// Price column to read with --from-db
    #[arg(long, default_value = "eur", value_parser = ["eur", "czk"])]
    pub currency: String,

    /// First day to analyze (inclusive)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub start: Option<String>,

    /// Last day to analyze (inclusive)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub end: Option<String>,
}

/// Battery parameters. Flags override values from --config.
#[derive(Debug, Clone, Args)]
pub struct BatteryArgs {
    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Battery capacity in MWh
    #[arg(long, help = "Battery capacity in megawatt-hours (must be > 0)")]
    pub capacity_mwh: Option<f64>,

    /// Round-trip efficiency
    #[arg(long, help = "Round-trip efficiency (0-1], e.g. 0.85")]
    pub efficiency: Option<f64>,

    /// Investment cost per MWh of capacity
    #[arg(long)]
    pub cost_per_mwh: Option<f64>,

    /// Capacity loss per cycle
    #[arg(long, help = "Fractional capacity loss per cycle, e.g. 0.0002")]
    pub degradation: Option<f64>,
}

#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format: table, csv, json, or both (table + csv)
    #[arg(long, value_parser = ["table", "csv", "json", "both"],
          help = "How to output results (defaults to config, then table)")]
    pub output: Option<String>,

    /// File path for csv/json output
    #[arg(
        long,
        value_name = "PATH",
        help = "Where to save CSV or JSON results",
        long_help = "Path for CSV or JSON export.\n\
          Required when --output is 'csv', 'json' or 'both'.\n\
          \nExample: --out-path daily.csv"
    )]
    pub out_path: Option<String>,
}

#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Strategy: "1 Cycle" or "2 Cycles"
    #[arg(long, help = "Analysis type (\"1 Cycle\", \"2 Cycles\", 1, 2)")]
    pub analysis: Option<String>,

    /// Show one row per day
    #[arg(long, default_value_t = false)]
    pub daily: bool,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub battery: BatteryArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Parser)]
pub struct CompareArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub battery: BatteryArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Parser)]
pub struct MarketArgs {
    /// Period for price averages
    #[arg(long, default_value = "monthly", value_parser = ["daily", "monthly", "yearly"])]
    pub aggregation: String,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}
