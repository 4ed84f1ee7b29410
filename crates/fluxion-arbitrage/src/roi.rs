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

//! Return-on-investment projection.
//!
//! The observed period is extrapolated to one year of operation, with the
//! capacity fade simulated cycle by cycle over that year.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::degradation::DegradationModel;
use crate::types::{AnalysisType, ArbitrageParams, DailyOutcome};

/// Days in a projected operating year
pub const DAYS_PER_YEAR: u32 = 365;

/// Investment metrics derived from the daily outcomes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiMetrics {
    /// Sum of degraded daily benefits over the analysed period
    pub total_benefit: f64,
    /// Mean degraded benefit per day (NaN when there are no days)
    pub avg_daily_benefit: f64,
    /// Projected benefit over one year of operation
    pub yearly_benefit: f64,
    pub total_investment: f64,
    /// Yearly benefit as a percentage of the investment
    pub roi_percentage: f64,
    /// Years to recoup the investment (infinite when nothing is earned)
    pub payback_years: f64,
    pub total_days: usize,
}

impl RoiMetrics {
    /// Whether the investment is ever paid back
    #[must_use]
    pub fn has_payback(&self) -> bool {
        self.payback_years.is_finite()
    }
}

/// Compute ROI metrics for a set of daily outcomes
#[must_use]
pub fn calculate_roi_metrics(outcomes: &[DailyOutcome], params: &ArbitrageParams) -> RoiMetrics {
    let model = DegradationModel::new(params.battery_capacity_mwh, params.degradation_per_cycle);

    let total_benefit: f64 = outcomes.iter().map(|o| o.degraded_benefit).sum();
    let avg_daily_benefit = outcomes.iter().map(|o| o.degraded_benefit).mean();
    let yearly_benefit = project_yearly_benefit(outcomes, &model, params.analysis_type);

    let total_investment = params.battery_capacity_mwh * params.battery_cost_per_mwh;
    let roi_percentage = if total_investment > 0.0 {
        yearly_benefit / total_investment * 100.0
    } else {
        0.0
    };
    let payback_years = if yearly_benefit > 0.0 && yearly_benefit.is_finite() {
        total_investment / yearly_benefit
    } else {
        f64::INFINITY
    };

    RoiMetrics {
        total_benefit,
        avg_daily_benefit,
        yearly_benefit,
        total_investment,
        roi_percentage,
        payback_years,
        total_days: outcomes.len(),
    }
}

/// Extrapolate one year of benefit from the observed period.
///
/// Uses the mean pre-degradation benefit and re-applies degradation over
/// the number of cycles a year would take: 365 for 1 Cycle, and
/// `365 * mean cycles per day` (truncated) for 2 Cycles.
#[must_use]
pub fn project_yearly_benefit(
    outcomes: &[DailyOutcome],
    model: &DegradationModel,
    analysis_type: AnalysisType,
) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }

    let avg_raw_benefit = outcomes.iter().map(|o| o.daily_benefit).mean();

    match analysis_type {
        AnalysisType::OneCycle => (1..=DAYS_PER_YEAR)
            .map(|cycle| model.remaining_capacity(cycle) * avg_raw_benefit)
            .sum(),
        AnalysisType::TwoCycles => {
            let avg_cycles_per_day = outcomes.iter().map(|o| f64::from(o.cycles_used)).mean();
            #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let yearly_cycles = (f64::from(DAYS_PER_YEAR) * avg_cycles_per_day) as u32;
            let benefit_per_cycle = avg_raw_benefit / avg_cycles_per_day.max(1.0);

            (1..=yearly_cycles)
                .map(|cycle| model.remaining_capacity(cycle) * benefit_per_cycle)
                .sum()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn outcome(day: u32, daily_benefit: f64, cycles_used: u32) -> DailyOutcome {
        DailyOutcome {
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            min_price: None,
            max_price: None,
            min_time: None,
            max_time: None,
            arbitrage_possible: cycles_used > 0,
            daily_benefit,
            cycles_used,
            cumulative_cycles: day,
            remaining_capacity: 1.0,
            degraded_benefit: daily_benefit,
        }
    }

    fn params(analysis_type: AnalysisType) -> ArbitrageParams {
        ArbitrageParams {
            analysis_type,
            battery_capacity_mwh: 1.0,
            efficiency: 1.0,
            battery_cost_per_mwh: 36_500.0,
            degradation_per_cycle: 0.0,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_one_cycle_projection_without_degradation() {
        let outcomes = vec![outcome(1, 10.0, 1), outcome(2, 30.0, 1)];
        let roi = calculate_roi_metrics(&outcomes, &params(AnalysisType::OneCycle));

        assert!(approx(roi.total_benefit, 40.0));
        assert!(approx(roi.avg_daily_benefit, 20.0));
        assert!(approx(roi.yearly_benefit, 20.0 * 365.0));
        assert!(approx(roi.total_investment, 36_500.0));
        assert!(approx(roi.roi_percentage, 20.0));
        assert!(approx(roi.payback_years, 5.0));
        assert_eq!(roi.total_days, 2);
        assert!(roi.has_payback());
    }

    #[test]
    fn test_two_cycle_projection_scales_by_cycles() {
        // 1.5 cycles per day on average -> 547 yearly cycles
        let outcomes = vec![outcome(1, 30.0, 2), outcome(2, 15.0, 1)];
        let model = DegradationModel::new(1.0, 0.0);

        let yearly = project_yearly_benefit(&outcomes, &model, AnalysisType::TwoCycles);

        // 547 cycles at 22.5 / 1.5 = 15 per cycle
        assert!(approx(yearly, 547.0 * 15.0));
    }

    #[test]
    fn test_two_cycle_projection_with_few_cycles_does_not_inflate() {
        // 0.5 cycles per day: per-cycle benefit is divided by max(0.5, 1) = 1
        let outcomes = vec![outcome(1, 10.0, 1), outcome(2, 0.0, 0)];
        let model = DegradationModel::new(1.0, 0.0);

        let yearly = project_yearly_benefit(&outcomes, &model, AnalysisType::TwoCycles);

        assert!(approx(yearly, 182.0 * 5.0));
    }

    #[test]
    fn test_projection_applies_degradation() {
        let outcomes = vec![outcome(1, 10.0, 1)];
        let model = DegradationModel::new(1.0, 0.01);

        let yearly = project_yearly_benefit(&outcomes, &model, AnalysisType::OneCycle);
        let expected: f64 = (0..365).map(|k| 10.0 * 0.99_f64.powi(k)).sum();

        assert!(approx(yearly, expected));
        assert!(yearly < 3650.0);
    }

    #[test]
    fn test_zero_investment_gives_zero_roi() {
        let outcomes = vec![outcome(1, 10.0, 1)];
        let free = ArbitrageParams {
            battery_cost_per_mwh: 0.0,
            ..params(AnalysisType::OneCycle)
        };

        let roi = calculate_roi_metrics(&outcomes, &free);

        assert!(approx(roi.roi_percentage, 0.0));
        assert!(approx(roi.payback_years, 0.0));
    }

    #[test]
    fn test_zero_yearly_benefit_never_pays_back() {
        let outcomes = vec![outcome(1, 0.0, 0), outcome(2, 0.0, 0)];
        let roi = calculate_roi_metrics(&outcomes, &params(AnalysisType::OneCycle));

        assert!(approx(roi.yearly_benefit, 0.0));
        assert!(roi.payback_years.is_infinite());
        assert!(!roi.has_payback());
    }

    #[test]
    fn test_empty_period() {
        let roi = calculate_roi_metrics(&[], &params(AnalysisType::TwoCycles));

        assert_eq!(roi.total_days, 0);
        assert!(approx(roi.total_benefit, 0.0));
        assert!(roi.avg_daily_benefit.is_nan());
        assert!(approx(roi.yearly_benefit, 0.0));
        assert!(approx(roi.roi_percentage, 0.0));
        assert!(roi.payback_years.is_infinite());
    }
}
