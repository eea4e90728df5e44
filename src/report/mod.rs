//! Reporting utilities: formatted terminal output for dashboards and diagnostics.

pub mod format;

pub use format::*;
