//! Reporting utilities: run summary and per-series diagnostics.

pub mod format;

pub use format::*;
