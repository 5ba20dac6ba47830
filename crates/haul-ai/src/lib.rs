//! Load search and per-mile profitability engine for owner-operator drivers.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
