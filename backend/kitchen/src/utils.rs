use std::{str::FromStr, sync::LazyLock};

use regex::Regex;
use rust_decimal::{Decimal, prelude::ToPrimitive};

/// Leading number as `parseFloat` reads it: sign, digits, fraction, exponent.
static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?)(?:(\d+)(?:\.(\d*))?|\.(\d+))(?:[eE]([+-]?\d+))?").unwrap()
});

/// Reads the longest leading number of a cell the way a browser `parseFloat` would,
/// falling back to zero. `" 12.50 lb"` is `12.50`, `"1e2"` is `100`, `"$3"` is `0`.
pub fn parse_number(input: &str) -> Decimal {
    let Some(caps) = LEADING_NUMBER.captures(input.trim_start()) else {
        return Decimal::ZERO;
    };

    let sign = caps.get(1).map_or("", |m| m.as_str());
    let whole = caps.get(2).map_or("0", |m| m.as_str());
    let fraction = caps
        .get(3)
        .or_else(|| caps.get(4))
        .map_or("", |m| m.as_str());

    let mantissa = if fraction.is_empty() {
        format!("{sign}{whole}")
    } else {
        format!("{sign}{whole}.{fraction}")
    };

    let parsed = match caps.get(5) {
        Some(exponent) => Decimal::from_scientific(&format!("{mantissa}e{}", exponent.as_str())),
        None => Decimal::from_str(&mantissa),
    };

    parsed.unwrap_or(Decimal::ZERO)
}

/// Percent cells look like `"10%"`.
pub fn parse_percent(input: &str) -> Decimal {
    parse_number(&input.replace('%', ""))
}

pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Pounds are whole numbers. Non-numeric or negative input is 0, anything too
/// large for a `u32` is capped at `u32::MAX`.
pub fn coerce_pounds(input: &str) -> u32 {
    let pounds = parse_number(input).floor();

    if pounds <= Decimal::ZERO {
        return 0;
    }

    pounds.to_u32().unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("12.50"), dec("12.50"));
        assert_eq!(parse_number("  7 lb"), dec("7"));
        assert_eq!(parse_number(".5"), dec("0.5"));
        assert_eq!(parse_number("5."), dec("5"));
        assert_eq!(parse_number("-3.2x"), dec("-3.2"));
    }

    #[test]
    fn test_parse_number_exponent() {
        assert_eq!(parse_number("1e2"), dec("100"));
        assert_eq!(parse_number("2.5E1 lb"), dec("25"));
        assert_eq!(parse_number("5e-1"), dec("0.5"));
        assert_eq!(parse_number("3e"), dec("3"));
        assert_eq!(parse_number("3e+x"), dec("3"));
    }

    #[test]
    fn test_parse_number_garbage() {
        assert_eq!(parse_number(""), Decimal::ZERO);
        assert_eq!(parse_number("$3"), Decimal::ZERO);
        assert_eq!(parse_number("."), Decimal::ZERO);
        assert_eq!(parse_number("abc"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("10%"), dec("10"));
        assert_eq!(parse_percent("0%"), Decimal::ZERO);
        assert_eq!(parse_percent("12.5"), dec("12.5"));
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("a1b2c3"), "123");
        assert_eq!(digits_only("(555) 123-4567"), "5551234567");
        assert_eq!(digits_only("phone"), "");
    }

    #[test]
    fn test_coerce_pounds() {
        assert_eq!(coerce_pounds("3"), 3);
        assert_eq!(coerce_pounds("3.9"), 3);
        assert_eq!(coerce_pounds("ten"), 0);
        assert_eq!(coerce_pounds("-4"), 0);
        assert_eq!(coerce_pounds(""), 0);
    }

    #[test]
    fn test_coerce_pounds_caps_large_values() {
        assert_eq!(coerce_pounds("5000000000"), u32::MAX);
        assert_eq!(coerce_pounds("4294967295"), u32::MAX);
        assert_eq!(coerce_pounds("4294967294.9"), 4_294_967_294);
    }
}
