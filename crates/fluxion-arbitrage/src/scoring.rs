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

//! Daily window scoring.
//!
//! Each strategy looks at one calendar day of hourly prices and finds the
//! best charge/discharge timing it is allowed to use:
//!
//! - **1 Cycle**: charge at the cheapest hour before 20:00, discharge at the
//!   most expensive hour after that.
//! - **2 Cycles**: fixed windows for an overnight trough, a morning peak, a
//!   midday trough and an evening peak. Falls back to 1 Cycle when a window
//!   is empty or either cycle would not make money.
//!
//! Extrema are found by scanning in timestamp order and keeping the first
//! strictly better value, so ties always go to the earliest hour.

use std::ops::Range;

use chrono::NaiveDateTime;

use crate::series::DayPrices;
use crate::types::{AnalysisType, DayScore, PricePoint};

/// Charging must start before this hour in the 1-cycle strategy
pub const LAST_CHARGE_HOUR: u32 = 20;

/// First cycle charge window (overnight trough)
pub const CHARGE_1_HOURS: Range<u32> = 0..6;
/// First cycle discharge window (morning peak)
pub const DISCHARGE_1_HOURS: Range<u32> = 6..10;
/// Second cycle charge window (midday trough)
pub const CHARGE_2_HOURS: Range<u32> = 10..18;
/// Second cycle discharge window (evening peak)
pub const DISCHARGE_2_HOURS: Range<u32> = 18..24;

/// A price extremum and the hour it was observed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremum {
    pub price: f64,
    pub timestamp: NaiveDateTime,
}

impl From<&PricePoint> for Extremum {
    fn from(point: &PricePoint) -> Self {
        Self {
            price: point.price,
            timestamp: point.timestamp,
        }
    }
}

/// Earliest point holding the minimum price
pub fn first_min<'a>(points: impl IntoIterator<Item = &'a PricePoint>) -> Option<Extremum> {
    points
        .into_iter()
        .fold(None, |best: Option<&PricePoint>, p| match best {
            Some(b) if p.price >= b.price => Some(b),
            _ => Some(p),
        })
        .map(Extremum::from)
}

/// Earliest point holding the maximum price
pub fn first_max<'a>(points: impl IntoIterator<Item = &'a PricePoint>) -> Option<Extremum> {
    points
        .into_iter()
        .fold(None, |best: Option<&PricePoint>, p| match best {
            Some(b) if p.price <= b.price => Some(b),
            _ => Some(p),
        })
        .map(Extremum::from)
}

/// Strategy that scores a single day of prices
pub trait ArbitrageStrategy: Send + Sync {
    /// Display name of the strategy
    fn name(&self) -> &str;

    /// Analysis type this strategy implements
    fn analysis_type(&self) -> AnalysisType;

    /// Score one calendar day
    fn score_day(&self, day: &DayPrices<'_>) -> DayScore;
}

impl AnalysisType {
    /// Strategy implementing this analysis type
    #[must_use]
    pub fn strategy(self, efficiency: f64) -> Box<dyn ArbitrageStrategy> {
        match self {
            Self::OneCycle => Box::new(OneCycleStrategy::new(efficiency)),
            Self::TwoCycles => Box::new(TwoCycleStrategy::new(efficiency)),
        }
    }
}

/// Single daily cycle: cheapest hour before 20:00, then the best later hour
#[derive(Debug, Clone, Copy)]
pub struct OneCycleStrategy {
    efficiency: f64,
}

impl OneCycleStrategy {
    #[must_use]
    pub fn new(efficiency: f64) -> Self {
        Self { efficiency }
    }
}

impl ArbitrageStrategy for OneCycleStrategy {
    fn name(&self) -> &str {
        "1-Cycle-Arbitrage"
    }

    fn analysis_type(&self) -> AnalysisType {
        AnalysisType::OneCycle
    }

    fn score_day(&self, day: &DayPrices<'_>) -> DayScore {
        let Some(charge) = first_min(day.in_hours(0..LAST_CHARGE_HOUR)) else {
            // Only late-evening hours: nothing can be discharged after a valid charge
            let low = first_min(day.points);
            return not_possible(day, low);
        };

        match first_max(day.after(charge.timestamp)) {
            Some(discharge) => DayScore {
                date: day.date,
                min_price: Some(charge.price),
                max_price: Some(discharge.price),
                min_time: Some(charge.timestamp),
                max_time: Some(discharge.timestamp),
                arbitrage_possible: true,
                daily_benefit: spread_benefit(charge.price, discharge.price, self.efficiency)
                    .max(0.0),
                cycles_used: 1,
            },
            None => not_possible(day, Some(charge)),
        }
    }
}

/// Two daily cycles in fixed windows, with 1-cycle fallback
#[derive(Debug, Clone, Copy)]
pub struct TwoCycleStrategy {
    efficiency: f64,
    fallback: OneCycleStrategy,
}

impl TwoCycleStrategy {
    #[must_use]
    pub fn new(efficiency: f64) -> Self {
        Self {
            efficiency,
            fallback: OneCycleStrategy::new(efficiency),
        }
    }

    /// Benefits of both cycles, or `None` if any window has no prices
    #[must_use]
    pub fn cycle_benefits(&self, day: &DayPrices<'_>) -> Option<(f64, f64)> {
        let charge_1 = first_min(day.in_hours(CHARGE_1_HOURS))?;
        let discharge_1 = first_max(day.in_hours(DISCHARGE_1_HOURS))?;
        let charge_2 = first_min(day.in_hours(CHARGE_2_HOURS))?;
        let discharge_2 = first_max(day.in_hours(DISCHARGE_2_HOURS))?;

        Some((
            spread_benefit(charge_1.price, discharge_1.price, self.efficiency),
            spread_benefit(charge_2.price, discharge_2.price, self.efficiency),
        ))
    }
}

impl ArbitrageStrategy for TwoCycleStrategy {
    fn name(&self) -> &str {
        "2-Cycle-Arbitrage"
    }

    fn analysis_type(&self) -> AnalysisType {
        AnalysisType::TwoCycles
    }

    fn score_day(&self, day: &DayPrices<'_>) -> DayScore {
        match self.cycle_benefits(day) {
            Some((first, second)) if first > 0.0 && second > 0.0 => DayScore {
                date: day.date,
                min_price: None,
                max_price: None,
                min_time: None,
                max_time: None,
                arbitrage_possible: true,
                daily_benefit: first + second,
                cycles_used: 2,
            },
            _ => self.fallback.score_day(day),
        }
    }
}

/// Whether a 2-cycle score came from the 1-cycle fallback
#[must_use]
pub fn is_fallback_day(score: &DayScore) -> bool {
    score.cycles_used < 2
}

fn spread_benefit(charge_price: f64, discharge_price: f64, efficiency: f64) -> f64 {
    (discharge_price - charge_price) * efficiency
}

fn not_possible(day: &DayPrices<'_>, low: Option<Extremum>) -> DayScore {
    DayScore {
        date: day.date,
        min_price: low.map(|l| l.price),
        max_price: low.map(|l| l.price),
        min_time: low.map(|l| l.timestamp),
        max_time: low.map(|l| l.timestamp),
        arbitrage_possible: false,
        daily_benefit: 0.0,
        cycles_used: 0,
    }
}
