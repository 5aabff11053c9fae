//! Error types for MillSurf
//!
//! Two kinds of failure are fatal for a simulation run:
//! - [`ParseError`]: a G, X, Y or Z value could not be read
//! - [`ConfigurationError`]: a simulation parameter is out of range
//!
//! Everything else (zero-length moves, footprint cells outside the grid,
//! unsupported command lines) is tolerated and skipped.

use thiserror::Error;

/// G-code parse error
///
/// Every variant carries the 1-based line number of the offending line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A word letter was not followed by a value
    #[error("Missing value for '{letter}' at line {line_number}")]
    MissingValue {
        /// The line number where the word was found.
        line_number: usize,
        /// The word letter.
        letter: char,
    },

    /// A word value is not a valid number
    #[error("Invalid number '{value}' for '{letter}' at line {line_number}")]
    InvalidNumber {
        /// The line number where the word was found.
        line_number: usize,
        /// The word letter.
        letter: char,
        /// The raw value text.
        value: String,
    },
}

impl ParseError {
    /// Line number (1-based) the error refers to
    pub fn line_number(&self) -> usize {
        match self {
            Self::MissingValue { line_number, .. } | Self::InvalidNumber { line_number, .. } => {
                *line_number
            }
        }
    }
}

/// Simulation configuration error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A parameter that must be strictly positive is zero or negative
    #[error("Parameter '{name}' must be positive, got {value}")]
    NonPositive {
        /// The parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A parameter is NaN or infinite
    #[error("Parameter '{name}' must be finite, got {value}")]
    NotFinite {
        /// The parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}
