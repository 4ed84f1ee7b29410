// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! FluxION Arbitrage CLI
//!
//! Command-line front end for the `fluxion-arbitrage` engine: price loaders
//! for local files and the OTE price database, built-in price scenarios,
//! TOML configuration and table/CSV/JSON output.

pub mod cli;
pub mod price_scenarios;

pub use price_scenarios::{PRICE_PRESETS, PriceScenario};
