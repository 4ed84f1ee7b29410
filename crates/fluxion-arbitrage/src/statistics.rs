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

//! Period-level statistics over the daily outcomes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median, Statistics};

use crate::types::{AnalysisType, DailyOutcome};

/// Distribution of cycles used across the analysed days
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "analysis_type")]
pub enum CycleStatistics {
    #[serde(rename = "1 Cycle")]
    OneCycle {
        feasible_days: usize,
        infeasible_days: usize,
        /// Share of days where arbitrage was possible (0 for no days)
        feasibility_percentage: f64,
    },
    #[serde(rename = "2 Cycles")]
    TwoCycles {
        days_with_two_cycles: usize,
        days_with_one_cycle: usize,
        days_with_no_cycles: usize,
        total_cycles_used: u32,
        /// NaN for no days
        avg_cycles_per_day: f64,
    },
}

impl CycleStatistics {
    /// Not applicable under 1 Cycle, reported as zero
    #[must_use]
    pub fn days_with_two_cycles(&self) -> usize {
        match self {
            Self::OneCycle { .. } => 0,
            Self::TwoCycles {
                days_with_two_cycles,
                ..
            } => *days_with_two_cycles,
        }
    }

    #[must_use]
    pub fn days_with_one_cycle(&self) -> usize {
        match self {
            Self::OneCycle { feasible_days, .. } => *feasible_days,
            Self::TwoCycles {
                days_with_one_cycle,
                ..
            } => *days_with_one_cycle,
        }
    }

    #[must_use]
    pub fn days_with_no_cycles(&self) -> usize {
        match self {
            Self::OneCycle {
                infeasible_days, ..
            } => *infeasible_days,
            Self::TwoCycles {
                days_with_no_cycles,
                ..
            } => *days_with_no_cycles,
        }
    }
}

/// Count cycle usage per day for the given analysis type
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub fn calculate_cycle_statistics(
    outcomes: &[DailyOutcome],
    analysis_type: AnalysisType,
) -> CycleStatistics {
    let days_with = |cycles: u32| outcomes.iter().filter(|o| o.cycles_used == cycles).count();

    match analysis_type {
        AnalysisType::TwoCycles => CycleStatistics::TwoCycles {
            days_with_two_cycles: days_with(2),
            days_with_one_cycle: days_with(1),
            days_with_no_cycles: days_with(0),
            total_cycles_used: outcomes.iter().map(|o| o.cycles_used).sum(),
            avg_cycles_per_day: outcomes.iter().map(|o| f64::from(o.cycles_used)).mean(),
        },
        AnalysisType::OneCycle => {
            let feasible_days = outcomes.iter().filter(|o| o.arbitrage_possible).count();
            let feasibility_percentage = if outcomes.is_empty() {
                0.0
            } else {
                feasible_days as f64 / outcomes.len() as f64 * 100.0
            };

            CycleStatistics::OneCycle {
                feasible_days,
                infeasible_days: outcomes.len() - feasible_days,
                feasibility_percentage,
            }
        }
    }
}

/// A notable day and its benefit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayHighlight {
    pub date: NaiveDate,
    pub benefit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestWorstDays {
    pub best: DayHighlight,
    pub worst: DayHighlight,
}

/// Best and worst day by degraded benefit (first occurrence wins ties)
#[must_use]
pub fn find_best_worst_days(outcomes: &[DailyOutcome]) -> Option<BestWorstDays> {
    best_worst_by(outcomes.iter(), |o| o.degraded_benefit)
}

/// Best and worst day by raw benefit, among days where arbitrage was possible
#[must_use]
pub fn find_best_worst_feasible_days(outcomes: &[DailyOutcome]) -> Option<BestWorstDays> {
    best_worst_by(
        outcomes.iter().filter(|o| o.arbitrage_possible),
        |o| o.daily_benefit,
    )
}

fn best_worst_by<'a>(
    outcomes: impl Iterator<Item = &'a DailyOutcome>,
    benefit: impl Fn(&DailyOutcome) -> f64,
) -> Option<BestWorstDays> {
    outcomes.fold(None, |acc: Option<BestWorstDays>, outcome| {
        let here = DayHighlight {
            date: outcome.date,
            benefit: benefit(outcome),
        };
        Some(match acc {
            None => BestWorstDays {
                best: here,
                worst: here,
            },
            Some(mut found) => {
                if here.benefit > found.best.benefit {
                    found.best = here;
                }
                if here.benefit < found.worst.benefit {
                    found.worst = here;
                }
                found
            }
        })
    })
}

/// Distribution of raw (pre-degradation) daily benefits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenefitSummary {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (NaN for a single day)
    pub std_dev: f64,
    pub max: f64,
    pub min: f64,
}

#[must_use]
pub fn calculate_benefit_summary(outcomes: &[DailyOutcome]) -> Option<BenefitSummary> {
    if outcomes.is_empty() {
        return None;
    }

    let benefits: Vec<f64> = outcomes.iter().map(|o| o.daily_benefit).collect();

    Some(BenefitSummary {
        mean: benefits.iter().mean(),
        median: Data::new(benefits.clone()).median(),
        std_dev: benefits.iter().std_dev(),
        max: benefits.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        min: benefits.iter().copied().fold(f64::INFINITY, f64::min),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(day: u32, daily_benefit: f64, degraded_benefit: f64, cycles_used: u32) -> DailyOutcome {
        DailyOutcome {
            date: NaiveDate::from_ymd_opt(2024, 7, day).unwrap(),
            min_price: None,
            max_price: None,
            min_time: None,
            max_time: None,
            arbitrage_possible: cycles_used > 0,
            daily_benefit,
            cycles_used,
            cumulative_cycles: day,
            remaining_capacity: 1.0,
            degraded_benefit,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    #[test]
    fn test_two_cycle_statistics() {
        let outcomes = vec![
            outcome(1, 10.0, 10.0, 2),
            outcome(2, 5.0, 5.0, 1),
            outcome(3, 0.0, 0.0, 0),
            outcome(4, 12.0, 12.0, 2),
        ];

        let stats = calculate_cycle_statistics(&outcomes, AnalysisType::TwoCycles);

        assert_eq!(stats.days_with_two_cycles(), 2);
        assert_eq!(stats.days_with_one_cycle(), 1);
        assert_eq!(stats.days_with_no_cycles(), 1);
        match stats {
            CycleStatistics::TwoCycles {
                total_cycles_used,
                avg_cycles_per_day,
                ..
            } => {
                assert_eq!(total_cycles_used, 5);
                assert!(approx(avg_cycles_per_day, 1.25));
            }
            CycleStatistics::OneCycle { .. } => panic!("expected 2-cycle statistics"),
        }
    }

    #[test]
    fn test_one_cycle_statistics() {
        let outcomes = vec![
            outcome(1, 10.0, 10.0, 1),
            outcome(2, 0.0, 0.0, 0),
            outcome(3, 4.0, 4.0, 1),
            outcome(4, 7.0, 7.0, 1),
        ];

        let stats = calculate_cycle_statistics(&outcomes, AnalysisType::OneCycle);

        assert_eq!(stats.days_with_two_cycles(), 0);
        assert_eq!(stats.days_with_one_cycle(), 3);
        assert_eq!(stats.days_with_no_cycles(), 1);
        match stats {
            CycleStatistics::OneCycle {
                feasibility_percentage,
                ..
            } => assert!(approx(feasibility_percentage, 75.0)),
            CycleStatistics::TwoCycles { .. } => panic!("expected 1-cycle statistics"),
        }
    }

    #[test]
    fn test_one_cycle_statistics_for_no_days() {
        let stats = calculate_cycle_statistics(&[], AnalysisType::OneCycle);
        assert_eq!(
            stats,
            CycleStatistics::OneCycle {
                feasible_days: 0,
                infeasible_days: 0,
                feasibility_percentage: 0.0,
            }
        );
    }

    #[test]
    fn test_best_worst_first_occurrence_wins() {
        let outcomes = vec![
            outcome(1, 5.0, 5.0, 1),
            outcome(2, 9.0, 9.0, 1),
            outcome(3, 9.0, 9.0, 1),
            outcome(4, 1.0, 1.0, 1),
            outcome(5, 1.0, 1.0, 1),
        ];

        let found = find_best_worst_days(&outcomes).unwrap();

        assert_eq!(found.best.date, day(2));
        assert_eq!(found.worst.date, day(4));
    }

    #[test]
    fn test_best_worst_uses_degraded_benefit() {
        let outcomes = vec![outcome(1, 10.0, 6.0, 1), outcome(2, 8.0, 7.0, 1)];
        let found = find_best_worst_days(&outcomes).unwrap();
        assert_eq!(found.best.date, day(2));
        assert!(approx(found.best.benefit, 7.0));
    }

    #[test]
    fn test_best_worst_feasible_skips_failed_days() {
        let outcomes = vec![
            outcome(1, 0.0, 0.0, 0),
            outcome(2, 3.0, 3.0, 1),
            outcome(3, 6.0, 6.0, 1),
        ];

        let found = find_best_worst_feasible_days(&outcomes).unwrap();

        assert_eq!(found.worst.date, day(2));
        assert_eq!(found.best.date, day(3));
        assert!(find_best_worst_days(&[]).is_none());
        assert!(find_best_worst_feasible_days(&outcomes[..1]).is_none());
    }

    #[test]
    fn test_benefit_summary() {
        let outcomes = vec![
            outcome(1, 2.0, 2.0, 1),
            outcome(2, 4.0, 4.0, 1),
            outcome(3, 9.0, 9.0, 1),
            outcome(4, 1.0, 1.0, 1),
        ];

        let summary = calculate_benefit_summary(&outcomes).unwrap();

        assert!(approx(summary.mean, 4.0));
        assert!(approx(summary.median, 3.0));
        assert!(approx(summary.max, 9.0));
        assert!(approx(summary.min, 1.0));
        // Sample variance: (4 + 0 + 25 + 9) / 3
        assert!(approx(summary.std_dev, (38.0_f64 / 3.0).sqrt()));
        assert!(calculate_benefit_summary(&[]).is_none());
    }
}
