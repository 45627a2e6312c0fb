//! Serde field helpers for host-supplied option bags.
//!
//! Workflow hosts send unset collection fields as `""` or `0` rather than
//! omitting them. These helpers fold those placeholders into `None` so that
//! "absent" has a single representation.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize an optional field, treating `null`, blank strings and numeric
/// zero as absent.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(ref s)) if s.trim().is_empty() => Ok(None),
        Some(Value::Number(ref n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(D::Error::custom),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    Text(String),
    List(Vec<String>),
}

/// Deserialize either a comma separated string or a list of strings.
/// Entries are trimmed and empty entries dropped.
pub fn comma_separated_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<StringOrList>::deserialize(deserializer)?;

    let entries = match raw {
        None => Vec::new(),
        Some(StringOrList::Text(text)) => text.split(',').map(str::to_string).collect(),
        Some(StringOrList::List(list)) => list,
    };

    Ok(entries
        .into_iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "empty_as_none")]
        name: Option<String>,
        #[serde(default, deserialize_with = "empty_as_none")]
        rate: Option<u32>,
        #[serde(default, deserialize_with = "comma_separated_or_list")]
        words: Vec<String>,
    }

    #[test]
    fn test_placeholders_are_absent() {
        let params: Params =
            serde_json::from_str(r#"{"name": "  ", "rate": 0, "words": ""}"#).unwrap();
        assert!(params.name.is_none());
        assert!(params.rate.is_none());
        assert!(params.words.is_empty());

        let params: Params = serde_json::from_str("{}").unwrap();
        assert!(params.name.is_none());
        assert!(params.rate.is_none());
    }

    #[test]
    fn test_present_values_kept() {
        let params: Params =
            serde_json::from_str(r#"{"name": "en", "rate": 24000, "words": "waav:2, deepgram"}"#)
                .unwrap();
        assert_eq!(params.name.as_deref(), Some("en"));
        assert_eq!(params.rate, Some(24000));
        assert_eq!(params.words, vec!["waav:2", "deepgram"]);

        let params: Params = serde_json::from_str(r#"{"words": ["a", " ", "b"]}"#).unwrap();
        assert_eq!(params.words, vec!["a", "b"]);
    }

    #[test]
    fn test_type_mismatch_is_error() {
        assert!(serde_json::from_str::<Params>(r#"{"rate": "fast"}"#).is_err());
    }
}
