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

//! Full calculation pipeline: score days, apply degradation, aggregate.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::degradation::DegradationModel;
use crate::roi::{RoiMetrics, calculate_roi_metrics};
use crate::scoring::is_fallback_day;
use crate::series::PriceSeries;
use crate::statistics::{
    BenefitSummary, BestWorstDays, CycleStatistics, calculate_benefit_summary,
    calculate_cycle_statistics, find_best_worst_days, find_best_worst_feasible_days,
};
use crate::types::{AnalysisType, ArbitrageParams, DailyOutcome};

/// Result of one calculation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageReport {
    pub params: ArbitrageParams,
    /// One entry per calendar day, ascending by date
    pub daily: Vec<DailyOutcome>,
    pub roi: RoiMetrics,
    pub cycle_stats: CycleStatistics,
    /// `None` when there are no days
    pub best_worst: Option<BestWorstDays>,
    /// `None` when no day allowed arbitrage
    pub best_worst_feasible: Option<BestWorstDays>,
    pub benefit_summary: Option<BenefitSummary>,
}

impl ArbitrageReport {
    #[must_use]
    pub fn analysis_type(&self) -> AnalysisType {
        self.params.analysis_type
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.daily.is_empty()
    }
}

/// Run the selected strategy over every day of the series.
///
/// Never fails for a constructed [`PriceSeries`]; an empty series yields a
/// report with no days, zero yearly benefit and infinite payback.
#[must_use]
pub fn calculate_arbitrage_benefits(
    series: &PriceSeries,
    params: &ArbitrageParams,
) -> ArbitrageReport {
    let analysis_type = params.analysis_type;
    let strategy = analysis_type.strategy(params.efficiency);

    let scores: Vec<_> = series
        .days()
        .iter()
        .map(|day| {
            let score = strategy.score_day(day);
            trace!(
                "{} {}: benefit {:.2}, cycles {}",
                strategy.name(),
                score.date,
                score.daily_benefit,
                score.cycles_used
            );
            score
        })
        .collect();

    if analysis_type == AnalysisType::TwoCycles {
        let fallback_days = scores.iter().filter(|s| is_fallback_day(s)).count();
        debug!(
            "{}: {} of {} days fell back to a single cycle",
            strategy.name(),
            fallback_days,
            scores.len()
        );
    }

    let model = DegradationModel::new(params.battery_capacity_mwh, params.degradation_per_cycle);
    let daily = model.apply(scores, analysis_type);

    let roi = calculate_roi_metrics(&daily, params);
    let cycle_stats = calculate_cycle_statistics(&daily, analysis_type);

    info!(
        "{} analysis over {} days: total {:.2}, yearly {:.2}, ROI {:.2}%",
        analysis_type,
        roi.total_days,
        roi.total_benefit,
        roi.yearly_benefit,
        roi.roi_percentage
    );

    ArbitrageReport {
        params: *params,
        best_worst: find_best_worst_days(&daily),
        best_worst_feasible: find_best_worst_feasible_days(&daily),
        benefit_summary: calculate_benefit_summary(&daily),
        daily,
        roi,
        cycle_stats,
    }
}

/// Run both analysis types over the same series, in [`AnalysisType::ALL`] order
#[must_use]
pub fn compare_strategies(series: &PriceSeries, params: &ArbitrageParams) -> Vec<ArbitrageReport> {
    AnalysisType::ALL
        .par_iter()
        .map(|&analysis_type| {
            calculate_arbitrage_benefits(series, &params.with_analysis_type(analysis_type))
        })
        .collect()
}
