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

//! Error types for the arbitrage engine

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArbitrageError {
    #[error("duplicate price for hour starting {timestamp}")]
    DuplicateHour { timestamp: NaiveDateTime },

    #[error("non-finite price {price} at {timestamp}")]
    NonFinitePrice {
        timestamp: NaiveDateTime,
        price: f64,
    },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("unknown analysis type '{0}' (expected \"1 Cycle\" or \"2 Cycles\")")]
    UnknownAnalysisType(String),
}

pub type Result<T> = std::result::Result<T, ArbitrageError>;
