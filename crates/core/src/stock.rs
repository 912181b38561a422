//! Stock quantity resolution over loosely typed backend fields.
//!
//! Stock arrives from several backend fields in several shapes: plain JSON
//! numbers, pt-BR strings (`"10,5"`), currency-prefixed strings and
//! placeholders such as `"--"` or `null`. The first candidate that yields a
//! finite number wins.

use serde_json::Value;

/// Keep digits, comma and minus, then turn the comma into a decimal point.
///
/// Dots are dropped, so `"1.234,5"` reads as `1234.5`.
fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '-')
        .map(|c| if c == ',' { '.' } else { c })
        .collect()
}

/// Interpret a single candidate, or `None` if it does not hold a finite number.
#[must_use]
pub fn stock_value(candidate: &Value) -> Option<f64> {
    match candidate {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let cleaned = sanitize(s);
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Return the first candidate that parses to a finite number.
///
/// ```
/// use serde_json::json;
/// use vitrine_core::resolve_stock_value;
///
/// let candidates = [json!(null), json!("--"), json!("10,5"), json!(99)];
/// assert_eq!(resolve_stock_value(&candidates), Some(10.5));
/// ```
pub fn resolve_stock_value<'a, I>(candidates: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a Value>,
{
    candidates.into_iter().find_map(stock_value)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_first_parseable_wins() {
        let candidates = [json!(null), json!("--"), json!("10,5"), json!(99)];
        assert_eq!(resolve_stock_value(&candidates), Some(10.5));
    }

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(resolve_stock_value(&[json!(3)]), Some(3.0));
        assert_eq!(resolve_stock_value(&[json!(-2.5)]), Some(-2.5));
    }

    #[test]
    fn test_string_shapes() {
        assert_eq!(stock_value(&json!("R$ 12,00")), Some(12.0));
        assert_eq!(stock_value(&json!("1.234,5")), Some(1234.5));
        assert_eq!(stock_value(&json!(" 7 un ")), Some(7.0));
        assert_eq!(stock_value(&json!("-3")), Some(-3.0));
        assert_eq!(stock_value(&json!("10.5")), Some(105.0));
    }

    #[test]
    fn test_unparseable_candidates_skipped() {
        assert_eq!(stock_value(&json!("")), None);
        assert_eq!(stock_value(&json!("--")), None);
        assert_eq!(stock_value(&json!("n/d")), None);
        assert_eq!(stock_value(&json!("1,2,3")), None);
        assert_eq!(stock_value(&json!(true)), None);
        assert_eq!(stock_value(&json!([1])), None);
        assert_eq!(stock_value(&json!({"qty": 1})), None);
    }

    #[test]
    fn test_none_when_nothing_parses() {
        assert_eq!(resolve_stock_value(&[json!(null), json!("--")]), None);
        assert_eq!(resolve_stock_value(std::iter::empty::<&Value>()), None);
    }
}
