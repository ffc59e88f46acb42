//! Runtime orchestration layer for the bikeshare explorer.
//!
//! Coordinates the data layer with whatever front end supplies filters and
//! displays results.

pub mod session;

pub use bikeshare_core as core;
pub use bikeshare_data as data;
