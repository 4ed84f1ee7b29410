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

//! FluxION Arbitrage Engine
//!
//! Estimates what a standalone battery (BESS) would have earned by trading
//! on a day-ahead market, and projects that into yearly benefit, ROI and
//! payback time.
//!
//! ## Features
//!
//! - **Daily scoring**: one daily cycle, or two constrained daily cycles
//!   with a single-cycle fallback
//! - **Degradation**: compounding per-cycle capacity fade
//! - **ROI projection**: yearly benefit, ROI percentage and payback years
//! - **Statistics**: cycle usage, best/worst days, benefit distribution
//! - **Market summary**: spreads, average day profile, period averages
//! - **Comparison**: both strategies over the same data in parallel

pub mod degradation;
pub mod engine;
pub mod error;
pub mod market;
pub mod roi;
pub mod scoring;
pub mod series;
pub mod statistics;
pub mod types;

pub use degradation::{DegradationModel, cumulative_cycles};
pub use engine::{ArbitrageReport, calculate_arbitrage_benefits, compare_strategies};
pub use error::{ArbitrageError, Result};
pub use market::{
    Aggregation, DailySpread, HourlyAverage, MarketSummary, PeriodAverage, aggregate_prices,
    average_day_profile, daily_spreads, summarize_market,
};
pub use roi::{RoiMetrics, calculate_roi_metrics, project_yearly_benefit};
pub use scoring::{ArbitrageStrategy, OneCycleStrategy, TwoCycleStrategy};
pub use series::{DayPrices, PriceSeries};
pub use statistics::{
    BenefitSummary, BestWorstDays, CycleStatistics, DayHighlight, calculate_benefit_summary,
    calculate_cycle_statistics, find_best_worst_days, find_best_worst_feasible_days,
};
pub use types::*;
