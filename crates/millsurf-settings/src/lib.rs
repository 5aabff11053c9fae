//! MillSurf Settings Crate
//!
//! Loads and saves the configuration file shared by the command line tool.

pub mod config;
pub mod error;

pub use config::{Config, OutputSettings};
pub use error::{Result, SettingsError};
