// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{ArbitrageError, Result};

/// A single hourly day-ahead price observation (local market time)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    /// Price per MWh, in the same currency as `battery_cost_per_mwh`
    pub price: f64,
}

impl PricePoint {
    #[must_use]
    pub fn new(timestamp: NaiveDateTime, price: f64) -> Self {
        Self { timestamp, price }
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Hour of day (0-23)
    #[must_use]
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }
}

/// Daily cycling strategy used for the whole calculation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisType {
    /// One charge/discharge pair per day
    #[default]
    #[serde(rename = "1 Cycle")]
    OneCycle,
    /// Two charge/discharge pairs per day in fixed time windows
    #[serde(rename = "2 Cycles")]
    TwoCycles,
}

impl AnalysisType {
    pub const ALL: [Self; 2] = [Self::OneCycle, Self::TwoCycles];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::OneCycle => "1 Cycle",
            Self::TwoCycles => "2 Cycles",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AnalysisType {
    type Err = ArbitrageError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "1 cycle" | "1" | "one" | "one cycle" | "1 cycles" => Ok(Self::OneCycle),
            "2 cycles" | "2" | "two" | "two cycles" | "2 cycle" => Ok(Self::TwoCycles),
            _ => Err(ArbitrageError::UnknownAnalysisType(s.to_owned())),
        }
    }
}

/// Battery and strategy parameters for one calculation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageParams {
    pub analysis_type: AnalysisType,
    /// Usable storage capacity (MWh)
    pub battery_capacity_mwh: f64,
    /// Round-trip efficiency, in (0, 1]
    pub efficiency: f64,
    /// Investment cost per MWh of capacity
    pub battery_cost_per_mwh: f64,
    /// Fractional capacity loss per cycle, in [0, 1)
    pub degradation_per_cycle: f64,
}

impl Default for ArbitrageParams {
    fn default() -> Self {
        Self {
            analysis_type: AnalysisType::OneCycle,
            battery_capacity_mwh: 1.0,
            efficiency: 0.85,
            battery_cost_per_mwh: 300_000.0,
            degradation_per_cycle: 0.0002,
        }
    }
}

impl ArbitrageParams {
    /// Same parameters with a different analysis type
    #[must_use]
    pub fn with_analysis_type(self, analysis_type: AnalysisType) -> Self {
        Self {
            analysis_type,
            ..self
        }
    }

    /// Check the parameter ranges accepted by the engine
    pub fn validate(&self) -> Result<()> {
        check_finite("battery_capacity_mwh", self.battery_capacity_mwh)?;
        check_finite("efficiency", self.efficiency)?;
        check_finite("battery_cost_per_mwh", self.battery_cost_per_mwh)?;
        check_finite("degradation_per_cycle", self.degradation_per_cycle)?;

        if self.battery_capacity_mwh <= 0.0 {
            return Err(invalid(
                "battery_capacity_mwh",
                format!("must be positive, got {}", self.battery_capacity_mwh),
            ));
        }
        if self.efficiency <= 0.0 || self.efficiency > 1.0 {
            return Err(invalid(
                "efficiency",
                format!("must be in (0, 1], got {}", self.efficiency),
            ));
        }
        if self.battery_cost_per_mwh < 0.0 {
            return Err(invalid(
                "battery_cost_per_mwh",
                format!("must not be negative, got {}", self.battery_cost_per_mwh),
            ));
        }
        if !(0.0..1.0).contains(&self.degradation_per_cycle) {
            return Err(invalid(
                "degradation_per_cycle",
                format!("must be in [0, 1), got {}", self.degradation_per_cycle),
            ));
        }

        Ok(())
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(name, format!("must be finite, got {value}")))
    }
}

fn invalid(name: &'static str, reason: String) -> ArbitrageError {
    ArbitrageError::InvalidParameter { name, reason }
}

/// Result of scoring one calendar day, before degradation is applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayScore {
    pub date: NaiveDate,
    /// Charge price (absent on days that ran two cycles)
    pub min_price: Option<f64>,
    /// Discharge price (absent on days that ran two cycles)
    pub max_price: Option<f64>,
    pub min_time: Option<NaiveDateTime>,
    pub max_time: Option<NaiveDateTime>,
    pub arbitrage_possible: bool,
    /// Spread captured per MWh of capacity, net of efficiency losses
    pub daily_benefit: f64,
    /// 0, 1 or 2
    pub cycles_used: u32,
}

/// One day of the final result table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyOutcome {
    pub date: NaiveDate,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_time: Option<NaiveDateTime>,
    pub max_time: Option<NaiveDateTime>,
    pub arbitrage_possible: bool,
    pub daily_benefit: f64,
    pub cycles_used: u32,
    /// Running cycle count up to and including this day
    pub cumulative_cycles: u32,
    /// Capacity left after `cumulative_cycles` (MWh)
    pub remaining_capacity: f64,
    /// `daily_benefit * remaining_capacity`
    pub degraded_benefit: f64,
}

impl DailyOutcome {
    /// Attach degradation results to a day score
    #[must_use]
    pub fn from_score(score: DayScore, cumulative_cycles: u32, remaining_capacity: f64) -> Self {
        let DayScore {
            date,
            min_price,
            max_price,
            min_time,
            max_time,
            arbitrage_possible,
            daily_benefit,
            cycles_used,
        } = score;

        Self {
            date,
            min_price,
            max_price,
            min_time,
            max_time,
            arbitrage_possible,
            daily_benefit,
            cycles_used,
            cumulative_cycles,
            remaining_capacity,
            degraded_benefit: daily_benefit * remaining_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_type_parsing() {
        assert_eq!("1 Cycle".parse::<AnalysisType>().unwrap(), AnalysisType::OneCycle);
        assert_eq!("2 Cycles".parse::<AnalysisType>().unwrap(), AnalysisType::TwoCycles);
        assert_eq!("two".parse::<AnalysisType>().unwrap(), AnalysisType::TwoCycles);
        assert_eq!("2-cycles".parse::<AnalysisType>().unwrap(), AnalysisType::TwoCycles);
        assert_eq!(" 1 ".parse::<AnalysisType>().unwrap(), AnalysisType::OneCycle);
        assert!("3 Cycles".parse::<AnalysisType>().is_err());
    }

    #[test]
    fn test_analysis_type_serde_uses_labels() {
        let json = serde_json::to_string(&AnalysisType::TwoCycles).unwrap();
        assert_eq!(json, "\"2 Cycles\"");
        let parsed: AnalysisType = serde_json::from_str("\"1 Cycle\"").unwrap();
        assert_eq!(parsed, AnalysisType::OneCycle);
    }

    #[test]
    fn test_default_params_are_valid() {
        assert!(ArbitrageParams::default().validate().is_ok());
    }

    #[test]
    fn test_params_validation_rejects_out_of_range() {
        let base = ArbitrageParams::default();

        let zero_capacity = ArbitrageParams {
            battery_capacity_mwh: 0.0,
            ..base
        };
        assert!(zero_capacity.validate().is_err());

        let over_efficient = ArbitrageParams {
            efficiency: 1.2,
            ..base
        };
        assert!(over_efficient.validate().is_err());

        let full_degradation = ArbitrageParams {
            degradation_per_cycle: 1.0,
            ..base
        };
        assert!(full_degradation.validate().is_err());

        let negative_cost = ArbitrageParams {
            battery_cost_per_mwh: -1.0,
            ..base
        };
        assert!(negative_cost.validate().is_err());

        let nan_efficiency = ArbitrageParams {
            efficiency: f64::NAN,
            ..base
        };
        assert!(nan_efficiency.validate().is_err());
    }

    #[test]
    fn test_free_battery_is_valid() {
        let params = ArbitrageParams {
            battery_cost_per_mwh: 0.0,
            efficiency: 1.0,
            degradation_per_cycle: 0.0,
            ..ArbitrageParams::default()
        };
        assert!(params.validate().is_ok());
    }
}
