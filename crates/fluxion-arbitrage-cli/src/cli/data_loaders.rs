// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! Data loaders turning local price sources into a [`PriceSeries`].

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use fluxion_arbitrage::{PricePoint, PriceSeries};
use rusqlite::Connection;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::price_scenarios::PriceScenario;

/// Trait for loading an hourly price series from a source
pub trait DataLoader {
    /// Load every price point the source holds
    fn load(&self) -> Result<PriceSeries>;

    /// Short description for report headers
    fn describe(&self) -> String;
}

/// Loader for synthetic data using built-in scenarios
#[derive(Debug)]
pub struct ScenarioLoader {
    pub scenario: PriceScenario,
    pub start_date: NaiveDate,
    pub days: u32,
}

impl DataLoader for ScenarioLoader {
    fn load(&self) -> Result<PriceSeries> {
        self.scenario.generate_series(self.start_date, self.days)
    }

    fn describe(&self) -> String {
        format!("Scenario: {} ({} days)", self.scenario.name(), self.days)
    }
}

/// Loader for long-format CSV files with `datetime,price` columns
#[derive(Debug)]
pub struct CsvLoader {
    csv_path: String,
}

#[derive(Debug, Deserialize)]
struct CsvPriceRow {
    datetime: String,
    price: f64,
}

impl CsvLoader {
    #[must_use]
    pub fn new(csv_path: String) -> Self {
        Self { csv_path }
    }
}

impl DataLoader for CsvLoader {
    fn load(&self) -> Result<PriceSeries> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.csv_path)
            .with_context(|| format!("Failed to open CSV file: {}", self.csv_path))?;

        let mut points = Vec::new();
        for (line, row) in reader.deserialize::<CsvPriceRow>().enumerate() {
            let row = row.with_context(|| {
                format!("Failed to parse row {} of {}", line + 2, self.csv_path)
            })?;
            points.push(PricePoint::new(parse_datetime(&row.datetime)?, row.price));
        }

        if points.is_empty() {
            bail!("No price rows found in {}", self.csv_path);
        }

        info!("Loaded {} price points from {}", points.len(), self.csv_path);
        PriceSeries::new(points).with_context(|| format!("Invalid price data in {}", self.csv_path))
    }

    fn describe(&self) -> String {
        format!("CSV: {}", self.csv_path)
    }
}

/// Loader for wide CSV files with one row per day (`date,H1..H24`)
///
/// Column `Hn` holds the price for hour `n - 1`. Missing or blank cells are
/// skipped, so short days (DST) load as days with fewer hours.
#[derive(Debug)]
pub struct WideCsvLoader {
    csv_path: String,
}

impl WideCsvLoader {
    #[must_use]
    pub fn new(csv_path: String) -> Self {
        Self { csv_path }
    }
}

impl DataLoader for WideCsvLoader {
    fn load(&self) -> Result<PriceSeries> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(&self.csv_path)
            .with_context(|| format!("Failed to open CSV file: {}", self.csv_path))?;

        // Column index for each hour present in the header
        let hour_columns: Vec<(u32, usize)> = reader
            .headers()
            .with_context(|| format!("Failed to read header of {}", self.csv_path))?
            .iter()
            .enumerate()
            .filter_map(|(index, name)| {
                let n: u32 = name.strip_prefix(['H', 'h'])?.parse().ok()?;
                (1..=24).contains(&n).then_some((n - 1, index))
            })
            .collect();

        if hour_columns.is_empty() {
            bail!("No H1..H24 columns in header of {}", self.csv_path);
        }

        let mut points = Vec::new();
        for record in reader.records() {
            let record = record.with_context(|| format!("Failed to read {}", self.csv_path))?;
            let Some(raw_date) = record.get(0).filter(|d| !d.is_empty()) else {
                continue;
            };
            let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{raw_date}' in {}", self.csv_path))?;

            for &(hour, index) in &hour_columns {
                let Some(cell) = record.get(index).filter(|c| !c.is_empty()) else {
                    continue;
                };
                let price: f64 = cell.parse().with_context(|| {
                    format!("Invalid price '{cell}' for {date} H{}", hour + 1)
                })?;
                if let Some(timestamp) = date.and_hms_opt(hour, 0, 0) {
                    points.push(PricePoint::new(timestamp, price));
                }
            }
        }

        if points.is_empty() {
            bail!("No price rows found in {}", self.csv_path);
        }

        info!("Loaded {} price points from {}", points.len(), self.csv_path);
        PriceSeries::new(points).with_context(|| format!("Invalid price data in {}", self.csv_path))
    }

    fn describe(&self) -> String {
        format!("Wide CSV: {}", self.csv_path)
    }
}

/// Price column of the `ote_prices` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Eur,
    Czk,
}

impl Currency {
    /// Parse a currency name (eur, czk)
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "eur" => Ok(Self::Eur),
            "czk" => Ok(Self::Czk),
            _ => bail!("Unknown currency '{value}'. Expected eur or czk"),
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::Eur => "price_eur",
            Self::Czk => "price_czk",
        }
    }
}

/// Loader for the `ote_prices` table written by the OTE price importer
///
/// Timestamps are RFC 3339 and converted to local market time. Sub-hourly
/// rows (15-minute market data) are averaged into one hourly price.
#[derive(Debug)]
pub struct SqliteLoader {
    db_path: String,
    currency: Currency,
}

impl SqliteLoader {
    #[must_use]
    pub fn new(db_path: String, currency: Currency) -> Self {
        Self { db_path, currency }
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .with_context(|| format!("Failed to open database at {}", self.db_path))
    }
}

impl DataLoader for SqliteLoader {
    fn load(&self) -> Result<PriceSeries> {
        let conn = self.connect()?;

        let query = format!(
            "SELECT datetime, {} FROM ote_prices ORDER BY datetime ASC",
            self.currency.column()
        );
        let mut stmt = conn
            .prepare(&query)
            .with_context(|| format!("Failed to query ote_prices in {}", self.db_path))?;

        let rows: Vec<(String, f64)> = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)))?
            .collect::<rusqlite::Result<_>>()?;

        if rows.is_empty() {
            bail!("No price rows found in {}", self.db_path);
        }

        let mut samples = Vec::with_capacity(rows.len());
        for (raw, price) in &rows {
            samples.push((parse_datetime(raw)?, *price));
        }

        let points = average_hourly(samples);
        debug!("Averaged {} rows into {} hourly prices", rows.len(), points.len());
        info!("Loaded {} price points from {}", points.len(), self.db_path);

        PriceSeries::new(points).with_context(|| format!("Invalid price data in {}", self.db_path))
    }

    fn describe(&self) -> String {
        format!("Database: {} ({:?})", self.db_path, self.currency)
    }
}

/// Parse `YYYY-MM-DD HH:MM[:SS]`, the same with a `T` separator, or RFC 3339
pub fn parse_datetime(raw: &str) -> Result<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];

    let raw = raw.trim();
    if let Some(parsed) = FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Ok(parsed);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .with_context(|| format!("Invalid datetime '{raw}'"))
}

fn average_hourly(samples: Vec<(NaiveDateTime, f64)>) -> Vec<PricePoint> {
    let mut by_hour: BTreeMap<NaiveDateTime, (f64, u32)> = BTreeMap::new();
    for (timestamp, price) in samples {
        let Some(hour_start) = timestamp.date().and_hms_opt(timestamp.hour(), 0, 0) else {
            continue;
        };
        let entry = by_hour.entry(hour_start).or_insert((0.0, 0));
        entry.0 += price;
        entry.1 += 1;
    }

    by_hour
        .into_iter()
        .map(|(timestamp, (sum, count))| PricePoint::new(timestamp, sum / f64::from(count)))
        .collect()
}
