//! Turn raw operator answers into typed values.
//!
//! Every answer arrives as a line of text. [`coerce`] converts it to the
//! declared [`ValueType`] or reports why it can't; the elicitation engine
//! shows that reason and asks again.

use serde_yaml::Value;

use crate::types::ValueType;

/// Coerce a raw answer to `value_type`.
///
/// The `Err` string is user-facing ("expected an integer, got 'abc'").
pub fn coerce(raw: &str, value_type: &ValueType) -> Result<Value, String> {
    let trimmed = raw.trim();
    let mismatch = || format!("expected {}, got '{trimmed}'", value_type.with_article());

    match value_type {
        ValueType::Integer => trimmed
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| mismatch()),
        ValueType::Float => trimmed
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::from)
            .ok_or_else(mismatch),
        ValueType::Text => Ok(Value::String(raw.to_string())),
        ValueType::Boolean => parse_bool(trimmed).map(Value::Bool).ok_or_else(mismatch),
        ValueType::Sequence => parse_sequence(trimmed).ok_or_else(mismatch),
        ValueType::Opaque(_) => {
            if trimmed.is_empty() {
                Err(mismatch())
            } else {
                Ok(infer(trimmed))
            }
        }
    }
}

/// Parse a yes/no style answer.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "on" => Some(true),
        "n" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// Coerce a candidate to an integer for range membership.
///
/// Floats truncate toward zero; numeric strings parse. Anything else has no
/// integer reading.
pub fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    }
}

/// Guess a typed value from free text.
/// Tries: bool → integer → float → string.
pub fn infer(s: &str) -> Value {
    if s.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::from(i);
    }
    // Only use float if the string actually contains a dot,
    // to avoid "NaN" / "inf" being parsed as float.
    if s.contains('.')
        && let Ok(f) = s.parse::<f64>()
    {
        return Value::from(f);
    }
    Value::String(s.to_string())
}

/// Accept either a flow sequence (`[a, b]`) or a bare comma-separated list.
fn parse_sequence(s: &str) -> Option<Value> {
    if s.starts_with('[') {
        return match serde_yaml::from_str::<Value>(s) {
            Ok(v @ Value::Sequence(_)) => Some(v),
            _ => None,
        };
    }
    if s.is_empty() {
        return Some(Value::Sequence(Vec::new()));
    }
    Some(Value::Sequence(
        s.split(',').map(|item| infer(item.trim())).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_answers() {
        assert_eq!(coerce("8080", &ValueType::Integer), Ok(Value::from(8080)));
        assert_eq!(coerce(" 42 \n", &ValueType::Integer), Ok(Value::from(42)));
        let err = coerce("eighty", &ValueType::Integer).unwrap_err();
        assert!(err.contains("an integer"));
        assert!(err.contains("eighty"));
    }

    #[test]
    fn float_answers() {
        assert_eq!(coerce("0.25", &ValueType::Float), Ok(Value::from(0.25)));
        assert!(coerce("NaN", &ValueType::Float).is_err());
    }

    #[test]
    fn text_is_kept_verbatim() {
        assert_eq!(
            coerce("  padded ", &ValueType::Text),
            Ok(Value::from("  padded "))
        );
        assert_eq!(coerce("", &ValueType::Text), Ok(Value::from("")));
    }

    #[test]
    fn boolean_answers() {
        assert_eq!(coerce("Yes", &ValueType::Boolean), Ok(Value::Bool(true)));
        assert_eq!(coerce("n", &ValueType::Boolean), Ok(Value::Bool(false)));
        assert!(coerce("maybe", &ValueType::Boolean).is_err());
    }

    #[test]
    fn sequence_answers() {
        let flow = coerce("[1, two]", &ValueType::Sequence).unwrap();
        assert_eq!(
            flow,
            Value::Sequence(vec![Value::from(1), Value::from("two")])
        );
        let bare = coerce("a, b ,3", &ValueType::Sequence).unwrap();
        assert_eq!(
            bare,
            Value::Sequence(vec![Value::from("a"), Value::from("b"), Value::from(3)])
        );
    }

    #[test]
    fn opaque_infers() {
        let t = ValueType::Opaque("hostname".into());
        assert_eq!(coerce("db1", &t), Ok(Value::from("db1")));
        assert_eq!(coerce("7", &t), Ok(Value::from(7)));
        assert!(coerce("  ", &t).is_err());
    }

    #[test]
    fn integer_readings() {
        assert_eq!(to_integer(&Value::from(5)), Some(5));
        assert_eq!(to_integer(&Value::from(5.9)), Some(5));
        assert_eq!(to_integer(&Value::from("70000")), Some(70000));
        assert_eq!(to_integer(&Value::from("abc")), None);
        assert_eq!(to_integer(&Value::Bool(true)), None);
    }

    #[test]
    fn infer_order() {
        assert_eq!(infer("TRUE"), Value::Bool(true));
        assert_eq!(infer("12"), Value::from(12));
        assert_eq!(infer("1.5"), Value::from(1.5));
        assert_eq!(infer("inf"), Value::from("inf"));
    }
}
