//! Shared types for the bikeshare explorer: trip records, datasets, filter
//! criteria, errors, CLI settings and display helpers.

pub mod config;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
