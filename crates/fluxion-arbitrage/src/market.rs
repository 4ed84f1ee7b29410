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

//! Descriptive market statistics over a price series.
//!
//! These are independent of any battery and are used to put the arbitrage
//! results into context: how wide the daily spreads were, what an average
//! day looked like and how price levels moved across months or years.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::series::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub average_price: f64,
    pub max_price: f64,
    pub min_price: f64,
    /// Mean of the per-day (max - min) spreads
    pub average_daily_spread: f64,
    /// Sample standard deviation of all prices
    pub price_volatility: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySpread {
    pub date: NaiveDate,
    pub min_price: f64,
    pub max_price: f64,
    pub spread: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyAverage {
    pub hour: u32,
    pub average_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodAverage {
    pub period: String,
    pub average_price: f64,
}

/// Period granularity for [`aggregate_prices`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Daily,
    Monthly,
    Yearly,
}

impl Aggregation {
    fn label(self, date: NaiveDate) -> String {
        match self {
            Self::Daily => date.format("%Y-%m-%d").to_string(),
            Self::Monthly => format!("{:04}-{:02}", date.year(), date.month()),
            Self::Yearly => format!("{:04}", date.year()),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        };
        f.write_str(name)
    }
}

/// `None` for an empty series
#[must_use]
pub fn summarize_market(series: &PriceSeries) -> Option<MarketSummary> {
    if series.is_empty() {
        return None;
    }

    let prices: Vec<f64> = series.points().iter().map(|p| p.price).collect();
    let spreads = daily_spreads(series);

    Some(MarketSummary {
        average_price: prices.iter().mean(),
        max_price: prices.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        min_price: prices.iter().copied().fold(f64::INFINITY, f64::min),
        average_daily_spread: spreads.iter().map(|s| s.spread).mean(),
        price_volatility: prices.iter().std_dev(),
    })
}

#[must_use]
pub fn daily_spreads(series: &PriceSeries) -> Vec<DailySpread> {
    series
        .days()
        .into_iter()
        .map(|day| {
            let (min_price, max_price) = day
                .points
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                    (lo.min(p.price), hi.max(p.price))
                });
            DailySpread {
                date: day.date,
                min_price,
                max_price,
                spread: max_price - min_price,
            }
        })
        .collect()
}

/// Mean price per hour of day, ascending by hour
#[must_use]
pub fn average_day_profile(series: &PriceSeries) -> Vec<HourlyAverage> {
    let mut by_hour: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for point in series.points() {
        by_hour.entry(point.hour()).or_default().push(point.price);
    }

    by_hour
        .into_iter()
        .map(|(hour, prices)| HourlyAverage {
            hour,
            average_price: prices.mean(),
        })
        .collect()
}

/// Mean price per period, in chronological order
#[must_use]
pub fn aggregate_prices(series: &PriceSeries, aggregation: Aggregation) -> Vec<PeriodAverage> {
    // Labels are zero-padded, so lexical order is chronological
    let mut by_period: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for point in series.points() {
        by_period
            .entry(aggregation.label(point.date()))
            .or_default()
            .push(point.price);
    }

    by_period
        .into_iter()
        .map(|(period, prices)| PeriodAverage {
            period,
            average_price: prices.mean(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PricePoint;

    fn point(y: i32, m: u32, d: u32, hour: u32, price: f64) -> PricePoint {
        PricePoint::new(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            price,
        )
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn two_day_series() -> PriceSeries {
        PriceSeries::new(vec![
            point(2024, 1, 1, 0, 10.0),
            point(2024, 1, 1, 12, 30.0),
            point(2024, 1, 2, 0, 20.0),
            point(2024, 1, 2, 12, 60.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_summarize_market() {
        let summary = summarize_market(&two_day_series()).unwrap();

        assert!(approx(summary.average_price, 30.0));
        assert!(approx(summary.max_price, 60.0));
        assert!(approx(summary.min_price, 10.0));
        // Spreads are 20 and 40
        assert!(approx(summary.average_daily_spread, 30.0));
        // Deviations -20, 0, -10, 30 -> 1400 / 3
        assert!(approx(summary.price_volatility, (1400.0_f64 / 3.0).sqrt()));
    }

    #[test]
    fn test_summarize_empty_market() {
        assert!(summarize_market(&PriceSeries::empty()).is_none());
        assert!(daily_spreads(&PriceSeries::empty()).is_empty());
    }

    #[test]
    fn test_daily_spreads() {
        let spreads = daily_spreads(&two_day_series());

        assert_eq!(spreads.len(), 2);
        assert_eq!(spreads[1].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!(approx(spreads[1].min_price, 20.0));
        assert!(approx(spreads[1].max_price, 60.0));
        assert!(approx(spreads[1].spread, 40.0));
    }

    #[test]
    fn test_average_day_profile_only_present_hours() {
        let profile = average_day_profile(&two_day_series());

        assert_eq!(profile.len(), 2);
        assert_eq!(profile[0].hour, 0);
        assert!(approx(profile[0].average_price, 15.0));
        assert_eq!(profile[1].hour, 12);
        assert!(approx(profile[1].average_price, 45.0));
    }

    #[test]
    fn test_aggregate_prices_labels() {
        let series = PriceSeries::new(vec![
            point(2023, 12, 31, 10, 100.0),
            point(2024, 1, 5, 10, 10.0),
            point(2024, 1, 20, 10, 30.0),
            point(2024, 2, 1, 10, 50.0),
        ])
        .unwrap();

        let monthly = aggregate_prices(&series, Aggregation::Monthly);
        let labels: Vec<&str> = monthly.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(labels, ["2023-12", "2024-01", "2024-02"]);
        assert!(approx(monthly[1].average_price, 20.0));

        let yearly = aggregate_prices(&series, Aggregation::Yearly);
        assert_eq!(yearly.len(), 2);
        assert_eq!(yearly[1].period, "2024");
        assert!(approx(yearly[1].average_price, 30.0));

        let daily = aggregate_prices(&series, Aggregation::Daily);
        assert_eq!(daily[0].period, "2023-12-31");
        assert_eq!(daily.len(), 4);
    }
}
