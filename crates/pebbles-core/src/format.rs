//! Priority grammar shared by event construction and front ends.

use crate::error::{Error, Result};

/// Fallback priority when an event omits or mangles the field.
pub const DEFAULT_PRIORITY: u8 = 2;

/// Parse a priority written as `P0`..`P4` or `0`..`4` (case-insensitive).
///
/// Blank input means "unspecified" and maps to [`DEFAULT_PRIORITY`].
///
/// # Errors
///
/// Returns [`Error::InvalidPriority`] for anything outside the grammar.
pub fn parse_priority(input: &str) -> Result<u8> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_PRIORITY);
    }
    let digits = trimmed
        .strip_prefix('P')
        .or_else(|| trimmed.strip_prefix('p'))
        .unwrap_or(trimmed);
    let value: u8 = digits.parse().map_err(|_| Error::InvalidPriority {
        input: input.to_string(),
    })?;
    if value > 4 {
        return Err(Error::InvalidPriority {
            input: input.to_string(),
        });
    }
    Ok(value)
}

/// Lenient twin of [`parse_priority`] used when replaying the log: malformed
/// values in historical events degrade to the default instead of failing.
#[must_use]
pub fn parse_priority_or_default(input: &str) -> u8 {
    parse_priority(input).unwrap_or(DEFAULT_PRIORITY)
}

/// Format a priority as its `P0`..`P4` label.
///
/// Out-of-range values display as the default priority.
#[must_use]
pub fn priority_label(priority: u8) -> String {
    let priority = if priority > 4 {
        DEFAULT_PRIORITY
    } else {
        priority
    };
    format!("P{priority}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_spellings() {
        assert_eq!(parse_priority("P0").unwrap(), 0);
        assert_eq!(parse_priority("p4").unwrap(), 4);
        assert_eq!(parse_priority("0").unwrap(), 0);
        assert_eq!(parse_priority("4").unwrap(), 4);
        assert_eq!(parse_priority(" 3 ").unwrap(), 3);
    }

    #[test]
    fn blank_means_default() {
        assert_eq!(parse_priority("").unwrap(), DEFAULT_PRIORITY);
        assert_eq!(parse_priority("  ").unwrap(), DEFAULT_PRIORITY);
    }

    #[test]
    fn rejects_out_of_range_and_junk() {
        for input in ["5", "P5", "-1", "P-1", "x", "P", "4.0"] {
            assert!(
                matches!(parse_priority(input), Err(Error::InvalidPriority { .. })),
                "expected rejection for {input:?}"
            );
        }
    }

    #[test]
    fn lenient_parse_never_fails() {
        assert_eq!(parse_priority_or_default("1"), 1);
        assert_eq!(parse_priority_or_default("garbage"), DEFAULT_PRIORITY);
        assert_eq!(parse_priority_or_default(""), DEFAULT_PRIORITY);
    }

    #[test]
    fn labels_clamp_to_default() {
        assert_eq!(priority_label(0), "P0");
        assert_eq!(priority_label(4), "P4");
        assert_eq!(priority_label(9), "P2");
    }
}
