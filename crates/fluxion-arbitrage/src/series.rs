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

//! Hourly price series and per-day grouping.
//!
//! `PriceSeries` is the input-contract boundary of the engine. Points are
//! sorted once on construction and malformed shapes (two prices in the same
//! hour, NaN prices) are rejected here, so the scoring code can assume a
//! clean, ordered series.

use std::ops::Range;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ArbitrageError, Result};
use crate::types::PricePoint;

/// Validated, timestamp-ordered hourly price series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from unordered points
    pub fn new(mut points: Vec<PricePoint>) -> Result<Self> {
        if let Some(bad) = points.iter().find(|p| !p.price.is_finite()) {
            return Err(ArbitrageError::NonFinitePrice {
                timestamp: bad.timestamp,
                price: bad.price,
            });
        }

        points.sort_by_key(|p| p.timestamp);

        if let Some(pair) = points
            .windows(2)
            .find(|pair| pair[0].date() == pair[1].date() && pair[0].hour() == pair[1].hour())
        {
            return Err(ArbitrageError::DuplicateHour {
                timestamp: pair[1].timestamp,
            });
        }

        Ok(Self { points })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last calendar date covered
    #[must_use]
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.points.first()?.date(), self.points.last()?.date()))
    }

    /// Restrict to an inclusive date range
    #[must_use]
    pub fn filter_dates(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        let points = self
            .points
            .iter()
            .filter(|p| start.is_none_or(|s| p.date() >= s))
            .filter(|p| end.is_none_or(|e| p.date() <= e))
            .copied()
            .collect();
        Self { points }
    }

    /// One group per distinct calendar date, in ascending date order
    #[must_use]
    pub fn days(&self) -> Vec<DayPrices<'_>> {
        self.points
            .chunk_by(|a, b| a.date() == b.date())
            .map(|points| DayPrices {
                date: points[0].date(),
                points,
            })
            .collect()
    }
}

/// Prices of a single calendar day, ordered by timestamp
#[derive(Debug, Clone, Copy)]
pub struct DayPrices<'a> {
    pub date: NaiveDate,
    pub points: &'a [PricePoint],
}

impl<'a> DayPrices<'a> {
    #[must_use]
    pub fn new(date: NaiveDate, points: &'a [PricePoint]) -> Self {
        Self { date, points }
    }

    /// Points whose hour of day falls in `hours` (end exclusive)
    pub fn in_hours(&self, hours: Range<u32>) -> impl Iterator<Item = &'a PricePoint> + use<'a> {
        self.points.iter().filter(move |p| hours.contains(&p.hour()))
    }

    /// Points strictly later than `instant`
    pub fn after(&self, instant: NaiveDateTime) -> impl Iterator<Item = &'a PricePoint> + use<'a> {
        self.points.iter().filter(move |p| p.timestamp > instant)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_series_is_sorted_on_construction() {
        let series = PriceSeries::new(vec![
            PricePoint::new(at(2, 5), 30.0),
            PricePoint::new(at(1, 23), 20.0),
            PricePoint::new(at(1, 0), 10.0),
        ])
        .unwrap();

        let stamps: Vec<_> = series.points().iter().map(|p| p.timestamp).collect();
        assert_eq!(stamps, vec![at(1, 0), at(1, 23), at(2, 5)]);
    }

    #[test]
    fn test_duplicate_hour_is_rejected() {
        let half_past = at(1, 10) + chrono::Duration::minutes(30);
        let err = PriceSeries::new(vec![
            PricePoint::new(at(1, 10), 30.0),
            PricePoint::new(half_past, 31.0),
        ])
        .unwrap_err();

        assert!(matches!(err, ArbitrageError::DuplicateHour { .. }));
    }

    #[test]
    fn test_nan_price_is_rejected() {
        let err = PriceSeries::new(vec![PricePoint::new(at(1, 1), f64::NAN)]).unwrap_err();
        assert!(matches!(err, ArbitrageError::NonFinitePrice { .. }));
    }

    #[test]
    fn test_days_groups_by_calendar_date() {
        let series = PriceSeries::new(vec![
            PricePoint::new(at(3, 1), 1.0),
            PricePoint::new(at(1, 0), 1.0),
            PricePoint::new(at(1, 1), 1.0),
            PricePoint::new(at(3, 0), 1.0),
        ])
        .unwrap();

        let days = series.days();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(days[0].len(), 2);
        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
        assert_eq!(days[1].len(), 2);
    }

    #[test]
    fn test_empty_series_has_no_days() {
        let series = PriceSeries::new(Vec::new()).unwrap();
        assert!(series.days().is_empty());
        assert!(series.date_range().is_none());
    }

    #[test]
    fn test_filter_dates_is_inclusive() {
        let series = PriceSeries::new((1..=5).map(|d| PricePoint::new(at(d, 12), 1.0)).collect())
            .unwrap();

        let filtered = series.filter_dates(
            NaiveDate::from_ymd_opt(2024, 3, 2),
            NaiveDate::from_ymd_opt(2024, 3, 4),
        );
        assert_eq!(filtered.len(), 3);
        assert_eq!(
            filtered.date_range(),
            Some((
                NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
            ))
        );
    }

    #[test]
    fn test_hour_window_and_after_filters() {
        let points: Vec<_> = (0..24).map(|h| PricePoint::new(at(1, h), f64::from(h))).collect();
        let day = DayPrices::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), &points);

        assert_eq!(day.in_hours(6..10).count(), 4);
        assert_eq!(day.in_hours(18..24).count(), 6);
        assert_eq!(day.after(at(1, 20)).count(), 3);
        assert_eq!(day.after(at(1, 23)).count(), 0);
    }
}
