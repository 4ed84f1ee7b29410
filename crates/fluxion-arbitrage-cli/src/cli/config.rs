// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! TOML configuration file for arbitrage runs.

use anyhow::{Context, Result};
use fluxion_arbitrage::{AnalysisType, ArbitrageParams};
use serde::{Deserialize, Serialize};
use std::fs;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArbitrageConfig {
    /// Battery and strategy parameters
    #[serde(default)]
    pub battery: BatteryConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Battery parameters, defaulting to a 1 MWh reference unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatteryConfig {
    /// "1 Cycle" or "2 Cycles"
    #[serde(default = "default_analysis_type")]
    pub analysis_type: String,

    #[serde(default = "default_capacity")]
    pub capacity_mwh: f64,

    /// Round-trip efficiency (0-1]
    #[serde(default = "default_efficiency")]
    pub efficiency: f64,

    /// Investment per MWh of capacity
    #[serde(default = "default_cost_per_mwh")]
    pub cost_per_mwh: f64,

    /// Capacity loss per cycle (0.0002 = 0.02 %)
    #[serde(default = "default_degradation")]
    pub degradation_per_cycle: f64,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format (table, csv, json, both)
    #[serde(default = "default_output_format")]
    pub format: String,

    /// Symbol printed next to money amounts
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

// Default value functions
fn default_analysis_type() -> String {
    AnalysisType::default().label().to_owned()
}

fn default_capacity() -> f64 {
    ArbitrageParams::default().battery_capacity_mwh
}

fn default_efficiency() -> f64 {
    ArbitrageParams::default().efficiency
}

fn default_cost_per_mwh() -> f64 {
    ArbitrageParams::default().battery_cost_per_mwh
}

fn default_degradation() -> f64 {
    ArbitrageParams::default().degradation_per_cycle
}

fn default_output_format() -> String {
    "table".to_owned()
}

fn default_currency_symbol() -> String {
    "€".to_owned()
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            analysis_type: default_analysis_type(),
            capacity_mwh: default_capacity(),
            efficiency: default_efficiency(),
            cost_per_mwh: default_cost_per_mwh(),
            degradation_per_cycle: default_degradation(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl BatteryConfig {
    /// Engine parameters, validated
    pub fn to_params(&self) -> Result<ArbitrageParams> {
        let analysis_type: AnalysisType = self
            .analysis_type
            .parse()
            .context("Invalid battery.analysis_type")?;

        let params = ArbitrageParams {
            analysis_type,
            battery_capacity_mwh: self.capacity_mwh,
            efficiency: self.efficiency,
            battery_cost_per_mwh: self.cost_per_mwh,
            degradation_per_cycle: self.degradation_per_cycle,
        };
        params.validate().context("Invalid battery parameters")?;

        Ok(params)
    }
}

impl ArbitrageConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;

        let config: ArbitrageConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {path}"))?;

        Ok(config)
    }

    /// Example configuration as TOML string
    #[must_use]
    pub fn example_toml() -> String {
        r#"# FluxION Arbitrage - Configuration Example

[battery]
analysis_type = "2 Cycles"    # "1 Cycle" or "2 Cycles"
capacity_mwh = 1.0
efficiency = 0.85
cost_per_mwh = 300000.0
degradation_per_cycle = 0.0002

[output]
format = "table"              # table, csv, json, or both
currency_symbol = "€"
"#
        .to_owned()
    }
}
