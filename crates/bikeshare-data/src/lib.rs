//! Data layer for the bikeshare explorer.
//!
//! Loads city trip CSVs into datasets, narrows them by month and weekday,
//! computes the four statistic reports and pages through raw rows.

pub mod filter;
pub mod pager;
pub mod reader;
pub mod stats;

pub use bikeshare_core as core;
