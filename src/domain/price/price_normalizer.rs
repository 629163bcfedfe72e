//! Price text normalization

use crate::shared::types::Price;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Currency markers removed before parsing. Longer markers first so `MX$`
/// is removed whole.
const CURRENCY_MARKERS: &[&str] = &["MX$", "US$", "MXN", "USD", "EUR", "$", "€", "£"];

/// Turn scraped price text into a number.
///
/// Strips currency symbols and codes, thousands separators and
/// (non-breaking) whitespace. Anything that still fails to parse yields
/// `None`; this never errors.
pub fn normalize_price(raw: &str) -> Option<Price> {
    let mut cleaned = raw.to_string();
    for marker in CURRENCY_MARKERS {
        cleaned = cleaned.replace(marker, "");
    }
    let cleaned: String = cleaned
        .chars()
        .filter(|c| *c != ',' && *c != '\u{a0}' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_strips_symbol_code_and_separators() {
        assert_eq!(normalize_price("$1,999.50 MXN"), Some(dec("1999.50")));
        assert_eq!(normalize_price("MX$12,345.00"), Some(dec("12345.00")));
        assert_eq!(normalize_price("$\u{a0}1,234.56"), Some(dec("1234.56")));
        assert_eq!(normalize_price("  899 "), Some(dec("899")));
    }

    #[test]
    fn test_machine_readable_value() {
        assert_eq!(normalize_price("1899.99"), Some(dec("1899.99")));
    }

    #[test]
    fn test_garbage_is_absent() {
        assert_eq!(normalize_price(""), None);
        assert_eq!(normalize_price("$"), None);
        assert_eq!(normalize_price("Ver opciones"), None);
        assert_eq!(normalize_price("1.999.50"), None);
    }
}
