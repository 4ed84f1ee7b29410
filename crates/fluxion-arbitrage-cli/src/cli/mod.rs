// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! CLI module for the arbitrage command-line interface.

pub mod args;
pub mod config;
pub mod data_loaders;
pub mod formatters;

pub use args::{BatteryArgs, Cli, Commands, CompareArgs, MarketArgs, OutputArgs, RunArgs, SourceArgs};
pub use config::{ArbitrageConfig, BatteryConfig, OutputConfig};
pub use data_loaders::{
    CsvLoader, Currency, DataLoader, ScenarioLoader, SqliteLoader, WideCsvLoader, parse_datetime,
};
pub use formatters::{CsvFormatter, JsonFormatter, MarketOverview, TableFormatter};
