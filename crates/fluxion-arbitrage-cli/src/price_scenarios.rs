// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! Built-in hourly price scenarios for arbitrage analysis.
//!
//! Each scenario describes one typical day-ahead price shape (EUR/MWh):
//!
//! - **Usual Day**: Cheap night, morning shoulder, midday dip, evening peak
//! - **Solar Dip**: Deep midday trough from solar surplus, strong evening peak
//! - **Flat**: Constant price, no spread to capture
//! - **Volatile**: Random swings around a double-peak shape (seeded per date)
//! - **Negative Prices**: Negative midday hours from renewable surplus

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use chrono::{Datelike, Days, NaiveDate, Timelike};
use fluxion_arbitrage::{PricePoint, PriceSeries};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Price scenario types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceScenario {
    UsualDay,
    SolarDip,
    Flat,
    Volatile,
    #[serde(rename = "negative")]
    NegativePrices,
}

impl PriceScenario {
    /// Human-readable name of this scenario
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::UsualDay => "Usual Day",
            Self::SolarDip => "Solar Dip",
            Self::Flat => "Flat",
            Self::Volatile => "Volatile Prices",
            Self::NegativePrices => "Negative Prices",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::UsualDay => {
                "Cheap overnight (0-6), morning shoulder (6-12), noon dip (12-14), evening peak (17-20)"
            }
            Self::SolarDip => "Deep solar trough (10-17) between a morning and a strong evening peak",
            Self::Flat => "Constant price all day",
            Self::Volatile => "Large hourly swings around two daily peaks, reproducible per date",
            Self::NegativePrices => "Negative prices during midday (11-14) from renewable surplus",
        }
    }

    /// 24 hourly prices for one day
    #[must_use]
    pub fn generate_prices(self, date: NaiveDate) -> Vec<PricePoint> {
        match self {
            Self::UsualDay => from_profile(date, usual_day_price),
            Self::SolarDip => from_profile(date, solar_dip_price),
            Self::Flat => from_profile(date, |_| 75.0),
            Self::Volatile => generate_volatile_prices(date),
            Self::NegativePrices => from_profile(date, negative_price),
        }
    }

    /// Consecutive days of this scenario starting at `start`
    pub fn generate_series(self, start: NaiveDate, days: u32) -> Result<PriceSeries> {
        let points = (0..days)
            .map(|offset| start + Days::new(offset.into()))
            .flat_map(|date| self.generate_prices(date))
            .collect();
        Ok(PriceSeries::new(points)?)
    }
}

impl fmt::Display for PriceScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PriceScenario {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "usual_day" | "usual" => Ok(Self::UsualDay),
            "solar_dip" | "solar" => Ok(Self::SolarDip),
            "flat" => Ok(Self::Flat),
            "volatile" => Ok(Self::Volatile),
            "negative" | "negative_prices" => Ok(Self::NegativePrices),
            _ => bail!(
                "Unknown scenario '{s}'. Available: {}",
                PRICE_PRESETS
                    .iter()
                    .map(|p| p.id)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

/// Price scenario preset with metadata
#[derive(Debug, Clone, Copy)]
pub struct PriceScenarioPreset {
    pub id: &'static str,
    pub scenario: PriceScenario,
}

/// Available price scenario presets
pub const PRICE_PRESETS: &[PriceScenarioPreset] = &[
    PriceScenarioPreset {
        id: "usual_day",
        scenario: PriceScenario::UsualDay,
    },
    PriceScenarioPreset {
        id: "solar_dip",
        scenario: PriceScenario::SolarDip,
    },
    PriceScenarioPreset {
        id: "flat",
        scenario: PriceScenario::Flat,
    },
    PriceScenarioPreset {
        id: "volatile",
        scenario: PriceScenario::Volatile,
    },
    PriceScenarioPreset {
        id: "negative",
        scenario: PriceScenario::NegativePrices,
    },
];

fn from_profile(date: NaiveDate, mut price_at: impl FnMut(u32) -> f64) -> Vec<PricePoint> {
    (0..24)
        .filter_map(|hour| date.and_hms_opt(hour, 0, 0))
        .map(|timestamp| PricePoint::new(timestamp, price_at(timestamp.hour())))
        .collect()
}

/// Usual day pattern:
/// - 00:00-06:00: 60 (cheap overnight)
/// - 06:00-12:00: 110 (morning shoulder)
/// - 12:00-14:00: 85 (noon dip)
/// - 14:00-17:00: 95 (afternoon)
/// - 17:00-20:00: 140 (evening peak)
/// - 20:00-24:00: 80 (late evening decline)
fn usual_day_price(hour: u32) -> f64 {
    match hour {
        0..=5 => 60.0,
        6..=11 => 110.0,
        12..=13 => 85.0,
        14..=16 => 95.0,
        17..=19 => 140.0,
        _ => 80.0,
    }
}

fn solar_dip_price(hour: u32) -> f64 {
    match hour {
        0..=5 => 90.0,
        6..=9 => 130.0,
        10..=16 => 20.0,
        17..=21 => 160.0,
        _ => 100.0,
    }
}

fn negative_price(hour: u32) -> f64 {
    match hour {
        0..=5 => 50.0,
        6..=10 => 90.0,
        11..=13 => -15.0,
        14..=16 => 60.0,
        17..=20 => 130.0,
        _ => 70.0,
    }
}

/// Hourly (low, high) ranges around a double-peak day
const VOLATILE_PATTERN: [(f64, f64); 24] = [
    (40.0, 60.0),
    (35.0, 55.0),
    (20.0, 35.0),
    (30.0, 50.0),
    (70.0, 90.0),
    (50.0, 70.0),
    (110.0, 140.0),
    (70.0, 90.0),
    (150.0, 190.0),
    (90.0, 110.0),
    (50.0, 70.0),
    (30.0, 50.0),
    (10.0, 30.0),
    (-10.0, 20.0),
    (40.0, 60.0),
    (80.0, 100.0),
    (120.0, 150.0),
    (160.0, 190.0),
    (180.0, 220.0),
    (140.0, 170.0),
    (90.0, 110.0),
    (60.0, 80.0),
    (40.0, 60.0),
    (30.0, 45.0),
];

fn generate_volatile_prices(date: NaiveDate) -> Vec<PricePoint> {
    let seed = u64::try_from(date.num_days_from_ce()).unwrap_or_default();
    let mut rng = StdRng::seed_from_u64(seed);

    from_profile(date, |hour| {
        let (low, high) = VOLATILE_PATTERN[hour as usize];
        low + (high - low) * rng.gen_range(0.0..1.0)
    })
}
