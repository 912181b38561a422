//! pt-BR number parsing and BRL currency formatting.
//!
//! Two fallback conventions coexist on purpose:
//! - generic parsing ([`parse_locale_number`], [`parse_percentage`],
//!   [`parse_decimal`]) returns `None` when the input is not a finite number,
//! - currency contexts ([`parse_currency`], [`format_currency_brl`]) use zero.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Rewrite a pt-BR (or plain) number into Rust's `1234.56` syntax.
///
/// Rules:
/// - surrounding whitespace, a leading sign and an `R$` prefix are accepted,
/// - with a comma present, dots are thousands separators and the comma is
///   the decimal separator (`1.234,56`),
/// - without a comma, several dots are thousands separators (`1.234.567`),
///   and so is a single dot between a one to three digit group with no
///   leading zero and exactly three digits (`1.234`),
/// - any other single dot is a decimal point (`12.5`, `0.500`).
fn normalize(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };
    let body: String = unsigned
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if body.is_empty() {
        return None;
    }

    let canonical = if body.contains(',') {
        body.replace('.', "").replacen(',', ".", 1)
    } else {
        let dots = body.matches('.').count();
        let thousands = dots > 1
            || (dots == 1 && body.split_once('.').is_some_and(is_thousands_group));
        if thousands {
            body.replace('.', "")
        } else {
            body
        }
    };

    // Leave only sign/digit/point strings for the numeric parsers; this keeps
    // `inf`, `NaN` and exponent forms out.
    if !canonical
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == '-')
    {
        return None;
    }

    Some(if negative {
        format!("-{canonical}")
    } else {
        canonical
    })
}

fn is_thousands_group((int, frac): (&str, &str)) -> bool {
    (1..=3).contains(&int.len()) && !int.starts_with('0') && frac.len() == 3
}

/// Parse a pt-BR formatted number.
///
/// Returns `None` for empty, malformed or non-finite input.
///
/// ```
/// use vitrine_core::format::parse_locale_number;
///
/// assert_eq!(parse_locale_number("1.234,56"), Some(1234.56));
/// assert_eq!(parse_locale_number("R$ 10,00"), Some(10.0));
/// assert_eq!(parse_locale_number("abc"), None);
/// ```
#[must_use]
pub fn parse_locale_number(input: &str) -> Option<f64> {
    normalize(input)?
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Parse a currency amount, treating invalid input as zero.
#[must_use]
pub fn parse_currency(input: &str) -> f64 {
    parse_locale_number(input).unwrap_or(0.0)
}

/// Parse a percentage such as `"12,5%"` into `12.5`.
#[must_use]
pub fn parse_percentage(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    let without_sign = trimmed.strip_suffix('%').unwrap_or(trimmed);
    parse_locale_number(without_sign)
}

/// Parse a pt-BR formatted number into an exact [`Decimal`].
#[must_use]
pub fn parse_decimal(input: &str) -> Option<Decimal> {
    Decimal::from_str(&normalize(input)?).ok()
}

/// Group an unsigned integer digit string with `.` every three digits.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Render `{:.2}` output (`"-1234.50"`) as BRL.
fn brl_from_fixed(fixed: &str) -> String {
    let (negative, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, fixed),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));
    let is_zero = int_part.chars().chain(frac_part.chars()).all(|c| c == '0');
    let sign = if negative && !is_zero { "-" } else { "" };
    format!("{sign}R$ {},{frac_part}", group_thousands(int_part))
}

/// Format a value as Brazilian reais: `R$ 1.234,56`.
///
/// Always two decimal digits, halves rounded away from zero. Non-finite
/// input, or input beyond the range of [`Decimal`], is treated as zero.
///
/// ```
/// use vitrine_core::format::format_currency_brl;
///
/// assert_eq!(format_currency_brl(1234.5), "R$ 1.234,50");
/// assert_eq!(format_currency_brl(0.125), "R$ 0,13");
/// assert_eq!(format_currency_brl(f64::NAN), "R$ 0,00");
/// ```
#[must_use]
pub fn format_currency_brl(value: f64) -> String {
    format_decimal_brl(Decimal::from_f64_retain(value).unwrap_or_default())
}

/// Format an exact decimal amount as Brazilian reais, rounding halves away
/// from zero.
#[must_use]
pub fn format_decimal_brl(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    brl_from_fixed(&format!("{rounded:.2}"))
}

/// Format a plain number with a decimal comma and at most two decimals,
/// dropping trailing zeros: `24,5`, `60`.
#[must_use]
pub fn format_number_br(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    let trimmed = if trimmed == "-0" { "0" } else { trimmed };
    trimmed.replace('.', ",")
}

/// Format a percentage with a decimal comma and at most two decimals:
/// `12,5%`, `10%`.
#[must_use]
pub fn format_percentage(value: f64) -> String {
    format!("{}%", format_number_br(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn approx(actual: Option<f64>, expected: f64) {
        let actual = actual.unwrap();
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_parse_locale_number_pt_br() {
        approx(parse_locale_number("1.234,56"), 1234.56);
        approx(parse_locale_number("1.234.567,8"), 1_234_567.8);
        approx(parse_locale_number("0,5"), 0.5);
        approx(parse_locale_number("  -3,25 "), -3.25);
        approx(parse_locale_number("R$ 1.000,00"), 1000.0);
        approx(parse_locale_number("-R$ 5,00"), -5.0);
    }

    #[test]
    fn test_parse_locale_number_dots() {
        approx(parse_locale_number("1234.56"), 1234.56);
        approx(parse_locale_number("12.5"), 12.5);
        approx(parse_locale_number("1.234"), 1234.0);
        approx(parse_locale_number("1.234.567"), 1_234_567.0);
        approx(parse_locale_number("42"), 42.0);
        approx(parse_locale_number("0.500"), 0.5);
        approx(parse_locale_number("-0.250"), -0.25);
        approx(parse_locale_number("1234.567"), 1234.567);
    }

    #[test]
    fn test_parse_locale_number_invalid() {
        assert_eq!(parse_locale_number(""), None);
        assert_eq!(parse_locale_number("   "), None);
        assert_eq!(parse_locale_number("R$"), None);
        assert_eq!(parse_locale_number("abc"), None);
        assert_eq!(parse_locale_number("inf"), None);
        assert_eq!(parse_locale_number("NaN"), None);
        assert_eq!(parse_locale_number("1e400"), None);
        assert_eq!(parse_locale_number("1,2,3"), None);
        assert_eq!(parse_locale_number("--"), None);
    }

    #[test]
    fn test_parse_currency_defaults_to_zero() {
        assert!((parse_currency("19,90") - 19.9).abs() < 1e-9);
        assert!(parse_currency("grátis").abs() < f64::EPSILON);
        assert!(parse_currency("").abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_percentage() {
        approx(parse_percentage("12,5%"), 12.5);
        approx(parse_percentage(" 10 % "), 10.0);
        approx(parse_percentage("7"), 7.0);
        assert_eq!(parse_percentage("%"), None);
    }

    #[test]
    fn test_parse_decimal_exact() {
        assert_eq!(parse_decimal("1.234,56"), Some(Decimal::new(123_456, 2)));
        assert_eq!(parse_decimal("R$ 0,10"), Some(Decimal::new(10, 2)));
        assert_eq!(parse_decimal("x"), None);
    }

    #[test]
    fn test_format_currency_brl() {
        assert_eq!(format_currency_brl(0.0), "R$ 0,00");
        assert_eq!(format_currency_brl(5.0), "R$ 5,00");
        assert_eq!(format_currency_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_currency_brl(1_234_567.891), "R$ 1.234.567,89");
        assert_eq!(format_currency_brl(999.999), "R$ 1.000,00");
        assert_eq!(format_currency_brl(-1.0), "-R$ 1,00");
        assert_eq!(format_currency_brl(-0.001), "R$ 0,00");
    }

    #[test]
    fn test_format_currency_brl_rounds_halves_up() {
        assert_eq!(format_currency_brl(0.125), "R$ 0,13");
        assert_eq!(format_currency_brl(2.5), "R$ 2,50");
        assert_eq!(format_currency_brl(-0.125), "-R$ 0,13");
        assert_eq!(format_decimal_brl(Decimal::new(125, 3)), "R$ 0,13");
        assert_eq!(format_decimal_brl(Decimal::new(1005, 3)), "R$ 1,01");
    }

    #[test]
    fn test_format_currency_brl_non_finite() {
        assert_eq!(format_currency_brl(f64::INFINITY), "R$ 0,00");
        assert_eq!(format_currency_brl(f64::NEG_INFINITY), "R$ 0,00");
        assert_eq!(format_currency_brl(f64::NAN), "R$ 0,00");
    }

    #[test]
    fn test_format_decimal_brl() {
        assert_eq!(format_decimal_brl(Decimal::new(123_456, 2)), "R$ 1.234,56");
        assert_eq!(format_decimal_brl(Decimal::new(5, 0)), "R$ 5,00");
        assert_eq!(format_decimal_brl(Decimal::new(-1999, 3)), "-R$ 2,00");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(12.5), "12,5%");
        assert_eq!(format_percentage(10.0), "10%");
        assert_eq!(format_percentage(0.126), "0,13%");
        assert_eq!(format_percentage(f64::NAN), "0%");
        assert_eq!(format_percentage(-0.001), "0%");
    }

    #[test]
    fn test_format_number_br() {
        assert_eq!(format_number_br(24.5), "24,5");
        assert_eq!(format_number_br(60.0), "60");
        assert_eq!(format_number_br(-3.75), "-3,75");
        assert_eq!(format_number_br(f64::INFINITY), "0");
    }
}
