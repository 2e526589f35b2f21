//! Forgiving field readers for hand-edited scene documents.
//!
//! A wrong-typed field reads as absent (strings), zero (integers) or empty
//! (arrays) instead of failing the whole document. Fields whose mere
//! presence matters read as an empty string instead, see [`present_string`].

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::{Number, Value};

pub(crate) fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Like [`string`], but a present key of any type is kept: wrong types read
/// as `""`, which decodes as black.
pub(crate) fn present_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => Some(String::new()),
    })
}

pub(crate) fn int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => number_to_i32(&n),
        _ => 0,
    })
}

pub(crate) fn vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

// Floats truncate toward zero; anything outside i32 clamps.
#[allow(clippy::cast_possible_truncation)]
fn number_to_i32(n: &Number) -> i32 {
    if let Some(i) = n.as_i64() {
        return i32::try_from(i).unwrap_or(if i < 0 { i32::MIN } else { i32::MAX });
    }
    if n.as_u64().is_some() {
        return i32::MAX;
    }
    n.as_f64().map_or(0, |f| f as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_conversion() {
        assert_eq!(number_to_i32(&Number::from(42)), 42);
        assert_eq!(number_to_i32(&Number::from(-7)), -7);
        assert_eq!(number_to_i32(&Number::from(i64::MAX)), i32::MAX);
        assert_eq!(number_to_i32(&Number::from(i64::MIN)), i32::MIN);
        assert_eq!(number_to_i32(&Number::from(u64::MAX)), i32::MAX);
        let float = Number::from_f64(12.9).expect("finite");
        assert_eq!(number_to_i32(&float), 12);
        let negative = Number::from_f64(-3.7).expect("finite");
        assert_eq!(number_to_i32(&negative), -3);
    }
}
