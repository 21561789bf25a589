use crate::results::NO_DISCOUNT;
use regex::Regex;
use std::sync::LazyLock;

static NON_PRICE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.]").expect("static price pattern"));

static NON_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9]").expect("static digit pattern"));

/// Parses a price label such as `"$19.99"` or `"£1,299.00"`.
///
/// Everything except ASCII digits and `.` is dropped before parsing, so
/// `"1.234,56"` reads as `1.23456`. Returns `None` when nothing numeric is left.
pub fn clean_price(raw: &str) -> Option<f64> {
    let stripped = NON_PRICE_CHARS.replace_all(raw, "");
    if stripped.is_empty() {
        return None;
    }

    match stripped.parse::<f64>() {
        Ok(price) => Some(price),
        Err(e) => {
            ::log::debug!("Unparsable price {:?}: {}", raw, e);
            None
        }
    }
}

/// Discount magnitude of a label such as `"-50%"` or `"50% Off"`; 0 when absent or unparsable.
///
/// Only digits are kept, so a fractional label like `"12.5%"` reads as 125.
pub fn clean_discount(raw: Option<&str>) -> f64 {
    let raw = match raw {
        Some(raw) if raw != NO_DISCOUNT => raw,
        _ => return 0.0,
    };

    NON_DIGITS
        .replace_all(raw, "")
        .parse::<f64>()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_price() {
        assert_eq!(clean_price("$19.99"), Some(19.99));
        assert_eq!(clean_price("  €4.50 "), Some(4.5));
        assert_eq!(clean_price("£1,299.00"), Some(1299.0));
        assert_eq!(clean_price("0.00"), Some(0.0));
    }

    #[test]
    fn test_clean_price_without_digits() {
        assert_eq!(clean_price(""), None);
        assert_eq!(clean_price("Free"), None);
        assert_eq!(clean_price("."), None);
        assert_eq!(clean_price("1.2.3"), None);
    }

    #[test]
    fn test_clean_discount() {
        assert_eq!(clean_discount(Some("50% Off")), 50.0);
        assert_eq!(clean_discount(Some("-75%")), 75.0);
        assert_eq!(clean_discount(Some("No Discount")), 0.0);
        assert_eq!(clean_discount(Some("")), 0.0);
        assert_eq!(clean_discount(Some("Sale!")), 0.0);
        assert_eq!(clean_discount(None), 0.0);
    }
}
