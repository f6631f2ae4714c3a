//! Document number formatting and advancement.
//!
//! Templates use `{PREFIX}`, `{SUFFIX}` and `{VALUE}` or `{VALUE:0N}` for a
//! zero-padded counter, e.g. `{PREFIX}{VALUE:06}` renders `INV-000042`.

use serde::{Deserialize, Serialize};
use sgbooks_shared::AppError;
use thiserror::Error;

/// Default template when a sequence row leaves it empty.
pub const DEFAULT_TEMPLATE: &str = "{PREFIX}{VALUE:06}{SUFFIX}";

/// Errors raised while advancing a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// The counter passed `max_value` on a non-cycling sequence.
    #[error("Sequence {0} is exhausted")]
    Exhausted(String),

    /// The template contains an unknown placeholder.
    #[error("Invalid sequence template: {0}")]
    InvalidTemplate(String),
}

impl From<SequenceError> for AppError {
    fn from(err: SequenceError) -> Self {
        match err {
            SequenceError::Exhausted(_) => Self::BusinessRule(err.to_string()),
            SequenceError::InvalidTemplate(_) => Self::Config(err.to_string()),
        }
    }
}

/// The state of one sequence row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceState {
    /// Sequence name (e.g. `sales_invoice`).
    pub name: String,
    /// Text before the counter.
    pub prefix: String,
    /// Text after the counter.
    pub suffix: String,
    /// Value handed out next.
    pub next_value: i64,
    /// Step between values.
    pub increment_by: i64,
    /// Value restarted from when cycling.
    pub min_value: i64,
    /// Largest value that may be handed out.
    pub max_value: i64,
    /// Whether to restart at `min_value` after `max_value`.
    pub cycle: bool,
    /// Rendering template.
    pub format_template: String,
}

impl SequenceState {
    /// Takes the current value and returns `(formatted, next_value)`.
    ///
    /// # Errors
    ///
    /// Returns `Exhausted` if the current value exceeds `max_value` and the
    /// sequence does not cycle, or `InvalidTemplate` for a bad template.
    pub fn advance(&self) -> Result<(String, i64), SequenceError> {
        let value = if self.next_value > self.max_value {
            if !self.cycle {
                return Err(SequenceError::Exhausted(self.name.clone()));
            }
            self.min_value
        } else {
            self.next_value
        };

        let formatted = format_number(self.template(), &self.prefix, &self.suffix, value)?;
        Ok((formatted, value + self.increment_by))
    }

    fn template(&self) -> &str {
        if self.format_template.trim().is_empty() {
            DEFAULT_TEMPLATE
        } else {
            &self.format_template
        }
    }
}

/// Renders a document number.
///
/// # Errors
///
/// Returns `InvalidTemplate` for unknown or unterminated placeholders.
pub fn format_number(
    template: &str,
    prefix: &str,
    suffix: &str,
    value: i64,
) -> Result<String, SequenceError> {
    let mut out = String::with_capacity(template.len() + 8);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| SequenceError::InvalidTemplate(template.to_string()))?;
        let placeholder = &after[..close];

        match placeholder {
            "PREFIX" => out.push_str(prefix),
            "SUFFIX" => out.push_str(suffix),
            "VALUE" => out.push_str(&value.to_string()),
            other => {
                let width = other
                    .strip_prefix("VALUE:")
                    .and_then(|w| w.parse::<usize>().ok())
                    .ok_or_else(|| SequenceError::InvalidTemplate(template.to_string()))?;
                out.push_str(&format!("{value:0width$}"));
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn state(next: i64, max: i64, cycle: bool) -> SequenceState {
        SequenceState {
            name: "sales_invoice".into(),
            prefix: "INV-".into(),
            suffix: String::new(),
            next_value: next,
            increment_by: 1,
            min_value: 1,
            max_value: max,
            cycle,
            format_template: String::new(),
        }
    }

    #[rstest]
    #[case("{PREFIX}{VALUE:06}{SUFFIX}", 42, "INV-000042/SG")]
    #[case("{PREFIX}{VALUE}", 42, "INV-42")]
    #[case("JE{VALUE:04}", 7, "JE0007")]
    #[case("{VALUE:02}", 12345, "12345")]
    fn test_format_number(#[case] template: &str, #[case] value: i64, #[case] expected: &str) {
        assert_eq!(format_number(template, "INV-", "/SG", value).unwrap(), expected);
    }

    #[rstest]
    #[case("{PREFIX")]
    #[case("{COUNTER}")]
    #[case("{VALUE:x}")]
    fn test_invalid_template(#[case] template: &str) {
        assert!(matches!(
            format_number(template, "", "", 1),
            Err(SequenceError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn test_advance_uses_default_template() {
        let (number, next) = state(1, 999_999, false).advance().unwrap();
        assert_eq!(number, "INV-000001");
        assert_eq!(next, 2);
    }

    #[test]
    fn test_exhausted_without_cycle() {
        assert_eq!(
            state(10, 9, false).advance(),
            Err(SequenceError::Exhausted("sales_invoice".into()))
        );
    }

    #[test]
    fn test_cycle_restarts_at_min() {
        let (number, next) = state(10, 9, true).advance().unwrap();
        assert_eq!(number, "INV-000001");
        assert_eq!(next, 2);
    }
}
