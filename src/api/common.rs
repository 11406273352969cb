//! Common API utilities and shared types

use serde::{de::Error as _, Deserialize, Deserializer};

/// Parse a loosely written boolean flag.
///
/// Accepts `1/0`, `true/false`, `on/off` and `yes/no`, ignoring case.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Serde adapter for query flags such as `?short=1`
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| D::Error::custom(format!("invalid boolean value: {}", raw)))
}

/// Drop empty strings, which clients send for blank inputs
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Flags {
        #[serde(default, deserialize_with = "deserialize_flag")]
        short: bool,
    }

    #[test]
    fn test_parse_flag_truthy() {
        for raw in ["1", "true", "TRUE", "on", "Yes"] {
            assert_eq!(parse_flag(raw), Some(true), "{}", raw);
        }
    }

    #[test]
    fn test_parse_flag_falsy() {
        for raw in ["0", "false", "Off", "no"] {
            assert_eq!(parse_flag(raw), Some(false), "{}", raw);
        }
    }

    #[test]
    fn test_parse_flag_invalid() {
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn test_deserialize_flag_from_query_string() {
        let flags: Flags = decode_query("short=1");
        assert!(flags.short);

        let flags: Flags = decode_query("");
        assert!(!flags.short);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
        assert_eq!(non_empty(None), None);
    }

    /// Decode through axum's query extractor so the test uses the real wire format
    fn decode_query(query: &str) -> Flags {
        let uri: axum::http::Uri = format!("/?{}", query).parse().unwrap();
        axum::extract::Query::<Flags>::try_from_uri(&uri).unwrap().0
    }
}
