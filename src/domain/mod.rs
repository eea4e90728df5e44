//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - observations and series (`Observation`, `Series`, `Indicator`)
//! - chart payloads (`ChartPoint`, `ChartSeries`, `ChartPayload`)
//! - run configuration and data-quality diagnostics

pub mod types;

pub use types::*;
