//! Word tokenizer for G-code lines
//!
//! A line is reduced to a list of letter/value words after removing comments
//! and whitespace, so `G1X10Y-5` and `g1 x10 y-5` tokenize identically.

use std::sync::OnceLock;

use millsurf_core::ParseError;
use regex::Regex;
use tracing::trace;

/// A single letter/value pair, e.g. `X-12.5`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// Upper-case word letter
    pub letter: char,
    /// Value text exactly as written (whitespace removed)
    pub text: String,
}

impl Word {
    /// Parse the value as a real number
    ///
    /// Only words that matter for geometry are parsed; everything else is
    /// carried as text and never interpreted.
    pub fn number(&self, line_number: usize) -> Result<f64, ParseError> {
        if self.text.is_empty() {
            return Err(ParseError::MissingValue {
                line_number,
                letter: self.letter,
            });
        }
        match self.text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ParseError::InvalidNumber {
                line_number,
                letter: self.letter,
                value: self.text.clone(),
            }),
        }
    }
}

fn comment_regex() -> &'static Regex {
    static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    // Parenthesised comments (unclosed runs to end of line), `;` comments, `*` checksums
    COMMENT_REGEX
        .get_or_init(|| Regex::new(r"\([^)]*\)?|;.*|\*.*").expect("invalid regex pattern"))
}

fn word_regex() -> &'static Regex {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    WORD_REGEX.get_or_init(|| Regex::new(r"([A-Z])([^A-Z]*)").expect("invalid regex pattern"))
}

/// Remove comments and checksums from a raw line
pub fn strip_comments(line: &str) -> String {
    comment_regex().replace_all(line, "").into_owned()
}

/// Split a raw line into words
///
/// Blank and comment-only lines yield an empty list. A leading block-delete
/// `/` or program delimiter `%` is skipped. Lines starting with anything else
/// (`$H`, `#100=5`, ...) are controller commands with no motion and also yield
/// an empty list.
pub fn tokenize(line_number: usize, line: &str) -> Result<Vec<Word>, ParseError> {
    let compact: String = strip_comments(line)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();

    let first_letter = word_regex()
        .find(&compact)
        .map_or(compact.len(), |m| m.start());
    if compact[..first_letter]
        .chars()
        .any(|c| !matches!(c, '/' | '%'))
    {
        trace!("Line {}: ignoring non-motion command '{}'", line_number, compact);
        return Ok(Vec::new());
    }

    let words = word_regex()
        .captures_iter(&compact)
        .filter_map(|caps| {
            let letter = caps.get(1)?.as_str().chars().next()?;
            let text = caps.get(2).map_or("", |m| m.as_str()).to_string();
            Some(Word { letter, text })
        })
        .collect();

    Ok(words)
}
