//! Parsing utilities for query strings
//!
//! Pure parsing functions for the textual query forms accepted by
//! collaborators (command lines, config files). No I/O.

use core::str::FromStr;

use crate::error::RangexError;

/// Separators accepted between the two bounds of an interval, in order
const SEPARATORS: [&str; 3] = ["..", ":", ","];

/// Parse an interval string in the format "from:to", "from..to" or "from,to"
///
/// Surrounding whitespace is ignored. `from > to` is accepted: an inverted
/// interval is a legal (if usually empty) query.
pub fn parse_interval<T: FromStr>(text: &str) -> Result<(T, T), RangexError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(RangexError::InvalidQuery);
    }

    for separator in SEPARATORS {
        if let Some((from, to)) = text.split_once(separator) {
            return Ok((parse_point(from)?, parse_point(to)?));
        }
    }

    // No separator found
    Err(RangexError::InvalidQuery)
}

/// Parse a single bound, ignoring surrounding whitespace
pub fn parse_point<T: FromStr>(text: &str) -> Result<T, RangexError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(RangexError::InvalidQuery);
    }
    text.parse().map_err(|_| RangexError::InvalidQuery)
}
