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

//! Cycle-driven capacity degradation.
//!
//! Capacity decays geometrically with the number of cycles the battery has
//! been through: `capacity * (1 - d)^(cycles - 1)`. The first cycle runs at
//! full capacity.

use serde::{Deserialize, Serialize};

use crate::types::{AnalysisType, DailyOutcome, DayScore};

/// Geometric per-cycle capacity fade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DegradationModel {
    pub capacity_mwh: f64,
    pub degradation_per_cycle: f64,
}

impl DegradationModel {
    #[must_use]
    pub fn new(capacity_mwh: f64, degradation_per_cycle: f64) -> Self {
        Self {
            capacity_mwh,
            degradation_per_cycle,
        }
    }

    /// Capacity available on the `cumulative_cycles`-th cycle.
    ///
    /// A count of zero (no cycle run yet) is treated like the first cycle.
    #[must_use]
    pub fn remaining_capacity(&self, cumulative_cycles: u32) -> f64 {
        let exponent = f64::from(cumulative_cycles.saturating_sub(1));
        self.capacity_mwh * (1.0 - self.degradation_per_cycle).powf(exponent)
    }

    /// Turn ordered day scores into final daily outcomes
    #[must_use]
    pub fn apply(&self, scores: Vec<DayScore>, analysis_type: AnalysisType) -> Vec<DailyOutcome> {
        let cycles: Vec<u32> = scores.iter().map(|s| s.cycles_used).collect();
        let cumulative = cumulative_cycles(&cycles, analysis_type);

        scores
            .into_iter()
            .zip(cumulative)
            .map(|(score, total)| {
                DailyOutcome::from_score(score, total, self.remaining_capacity(total))
            })
            .collect()
    }
}

/// Running cycle count per day.
///
/// Under 2 Cycles this is the sum of cycles actually used. Under 1 Cycle
/// every day consumes one nominal cycle slot, including days where no
/// arbitrage was possible.
#[must_use]
pub fn cumulative_cycles(cycles_used: &[u32], analysis_type: AnalysisType) -> Vec<u32> {
    match analysis_type {
        AnalysisType::TwoCycles => cycles_used
            .iter()
            .scan(0_u32, |total, &cycles| {
                *total = total.saturating_add(cycles);
                Some(*total)
            })
            .collect(),
        AnalysisType::OneCycle => (1..).take(cycles_used.len()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn score(day: u32, benefit: f64, cycles_used: u32) -> DayScore {
        DayScore {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            min_price: None,
            max_price: None,
            min_time: None,
            max_time: None,
            arbitrage_possible: cycles_used > 0,
            daily_benefit: benefit,
            cycles_used,
        }
    }

    #[test]
    fn test_two_cycle_cumulative_sum() {
        assert_eq!(
            cumulative_cycles(&[2, 1, 0], AnalysisType::TwoCycles),
            vec![2, 3, 3]
        );
    }

    #[test]
    fn test_one_cycle_counts_every_day() {
        assert_eq!(
            cumulative_cycles(&[1, 0, 1, 0], AnalysisType::OneCycle),
            vec![1, 2, 3, 4]
        );
        assert!(cumulative_cycles(&[], AnalysisType::OneCycle).is_empty());
    }

    #[test]
    fn test_remaining_capacity_after_three_cycles() {
        let model = DegradationModel::new(1.0, 0.02);
        assert!(approx(model.remaining_capacity(3), 0.9604));
        assert!(approx(model.remaining_capacity(1), 1.0));
    }

    #[test]
    fn test_zero_cycles_keeps_full_capacity() {
        let model = DegradationModel::new(2.5, 0.1);
        assert!(approx(model.remaining_capacity(0), 2.5));
    }

    #[test]
    fn test_no_degradation_keeps_capacity_constant() {
        let model = DegradationModel::new(4.0, 0.0);
        assert!(approx(model.remaining_capacity(10_000), 4.0));
    }

    #[test]
    fn test_capacity_is_monotonic_and_positive() {
        let model = DegradationModel::new(1.0, 0.3);
        let capacities: Vec<f64> = (1..200).map(|c| model.remaining_capacity(c)).collect();

        assert!(capacities.windows(2).all(|w| w[0] > w[1]));
        assert!(capacities.iter().all(|&c| c > 0.0));
    }

    #[test]
    fn test_apply_degrades_benefit() {
        let model = DegradationModel::new(2.0, 0.5);
        let outcomes = model.apply(
            vec![score(1, 10.0, 2), score(2, 10.0, 1), score(3, 0.0, 0)],
            AnalysisType::TwoCycles,
        );

        let cumulative: Vec<u32> = outcomes.iter().map(|o| o.cumulative_cycles).collect();
        assert_eq!(cumulative, vec![2, 3, 3]);

        assert!(approx(outcomes[0].remaining_capacity, 1.0));
        assert!(approx(outcomes[0].degraded_benefit, 10.0));
        assert!(approx(outcomes[1].remaining_capacity, 0.5));
        assert!(approx(outcomes[1].degraded_benefit, 5.0));
        assert!(approx(outcomes[2].remaining_capacity, 0.5));
        assert!(approx(outcomes[2].degraded_benefit, 0.0));
    }

    #[test]
    fn test_apply_one_cycle_ignores_feasibility() {
        let model = DegradationModel::new(1.0, 0.5);
        let outcomes = model.apply(
            vec![score(1, 0.0, 0), score(2, 8.0, 1)],
            AnalysisType::OneCycle,
        );

        assert_eq!(outcomes[1].cumulative_cycles, 2);
        assert!(approx(outcomes[1].degraded_benefit, 4.0));
    }
}
