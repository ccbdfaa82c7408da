//! Command-line front end: scenario files, logging setup and report output.

pub mod app;
pub mod config;
pub mod logging;
pub mod report;
