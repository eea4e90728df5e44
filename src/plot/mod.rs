//! Terminal plotting.
//!
//! Only a plain-text renderer lives here; anything richer is a separate front-end.

pub mod ascii;

pub use ascii::*;
