//! `econ-trends` library crate.
//!
//! The binary (`trends`) is a thin wrapper around this library so that:
//!
//! - the dashboard pipeline is testable without spawning processes
//! - other front-ends can reuse the same core shapes (grid, indicators, charts)

pub mod app;
pub mod category;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod metrics;
pub mod plot;
pub mod rank;
pub mod report;
