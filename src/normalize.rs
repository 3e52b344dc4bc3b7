use crate::error::{Result, TallyError};
use crate::models::Cell;

/// What to do when a text cell has nothing numeric left after stripping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlankPolicy {
    /// Count it as 0 (payroll sheets).
    Zero,
    /// Reject it, so the row is skipped (job-order sheets).
    Skip,
}

/// Keep only ASCII digits, `.` and `-`: `"$1,234.56"` becomes `"1234.56"`.
fn strip_formatting(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

fn parse_stripped(stripped: &str) -> Option<f64> {
    stripped.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce a cell into an amount. `Empty` never reaches this in practice;
/// it is rejected like any other non-numeric value.
pub fn normalize(cell: &Cell, policy: BlankPolicy) -> Result<f64> {
    let invalid = |raw: &str| TallyError::Value { raw: raw.to_string() };
    match cell {
        Cell::Number(n) if n.is_finite() => Ok(*n),
        Cell::Number(n) => Err(invalid(&n.to_string())),
        Cell::Text(raw) => {
            let stripped = strip_formatting(raw);
            if stripped.is_empty() {
                return match policy {
                    BlankPolicy::Zero => Ok(0.0),
                    BlankPolicy::Skip => Err(invalid(raw)),
                };
            }
            parse_stripped(&stripped).ok_or_else(|| invalid(raw))
        }
        Cell::Empty => Err(invalid("")),
    }
}

/// True for numbers, and for text that still parses after stripping and has
/// something left to parse. Used to score candidate amount columns.
pub fn looks_numeric(cell: &Cell) -> bool {
    match cell {
        Cell::Number(_) => true,
        Cell::Text(raw) => {
            let stripped = strip_formatting(raw);
            !stripped.is_empty() && parse_stripped(&stripped).is_some()
        }
        Cell::Empty => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_currency_strings() {
        assert_eq!(normalize(&text("$1,234.56"), BlankPolicy::Zero).unwrap(), 1234.56);
        assert_eq!(normalize(&text("PHP 2,500"), BlankPolicy::Skip).unwrap(), 2500.0);
        assert_eq!(normalize(&text(" -42.50 "), BlankPolicy::Skip).unwrap(), -42.5);
    }

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(normalize(&Cell::Number(500.0), BlankPolicy::Skip).unwrap(), 500.0);
        assert!(normalize(&Cell::Number(f64::NAN), BlankPolicy::Zero).is_err());
    }

    #[test]
    fn test_blank_policies_differ() {
        assert_eq!(normalize(&text("n/a"), BlankPolicy::Zero).unwrap(), 0.0);
        assert!(matches!(
            normalize(&text("n/a"), BlankPolicy::Skip),
            Err(TallyError::Value { .. })
        ));
    }

    #[test]
    fn test_malformed_remainder_is_rejected_under_both_policies() {
        for policy in [BlankPolicy::Zero, BlankPolicy::Skip] {
            assert!(normalize(&text("1.2.3"), policy).is_err());
            assert!(normalize(&text("12-5"), policy).is_err());
            assert!(normalize(&text("-"), policy).is_err());
        }
    }

    #[test]
    fn test_looks_numeric() {
        assert!(looks_numeric(&Cell::Number(0.0)));
        assert!(looks_numeric(&text("$1,000")));
        assert!(!looks_numeric(&text("Jane Doe")));
        assert!(!looks_numeric(&text("1.2.3")));
        assert!(!looks_numeric(&Cell::Empty));
    }
}
