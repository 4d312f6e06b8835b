//! Flat payload reader for inline `{"key":"value"}` command arguments.
//!
//! Deliberately minimal, and the contract baseline for the wire shape:
//! one level deep, string and plain-integer leaves only, no escape
//! handling. The verbatim slice between the quotes is the value.

/// Extracts the string value for `key`.
///
/// Returns `None` when the key is absent or its value is unterminated.
pub fn extract_string<'a>(payload: &'a str, key: &str) -> Option<&'a str> {
    let marker = format!("\"{key}\":\"");
    let start = payload.find(&marker)? + marker.len();
    let end = payload[start..].find('"')? + start;
    Some(&payload[start..end])
}

/// Extracts the integer value for `key`: everything between `"key":` and
/// the next `,` or `}`. Returns `None` when absent or unparseable.
pub fn extract_int(payload: &str, key: &str) -> Option<i64> {
    let marker = format!("\"{key}\":");
    let start = payload.find(&marker)? + marker.len();
    let end = payload[start..].find(|c| c == ',' || c == '}')? + start;
    payload[start..end].trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::{extract_int, extract_string};

    const PAYLOAD: &str = "{\"name\":\"Alice\",\"email\":\"alice@example.com\"}";

    #[test]
    fn extracts_string_values() {
        assert_eq!(extract_string(PAYLOAD, "name"), Some("Alice"));
        assert_eq!(extract_string(PAYLOAD, "email"), Some("alice@example.com"));
    }

    #[test]
    fn missing_key_yields_none() {
        assert_eq!(extract_string(PAYLOAD, "id"), None);
        assert_eq!(extract_int(PAYLOAD, "id"), None);
    }

    #[test]
    fn unterminated_value_yields_none() {
        assert_eq!(extract_string("{\"name\":\"Alice", "name"), None);
    }

    #[test]
    fn values_are_taken_verbatim_without_unescaping() {
        // Backslashes pass through untouched; the first quote ends the value.
        assert_eq!(
            extract_string("{\"name\":\"A\\\"B\"}", "name"),
            Some("A\\")
        );
    }

    #[test]
    fn extracts_integer_values() {
        assert_eq!(extract_int("{\"id\":42}", "id"), Some(42));
        assert_eq!(extract_int("{\"id\": 42 ,\"name\":\"A\"}", "id"), Some(42));
        assert_eq!(extract_int("{\"id\":-3}", "id"), Some(-3));
    }

    #[test]
    fn non_integer_values_yield_none() {
        assert_eq!(extract_int("{\"id\":abc}", "id"), None);
        assert_eq!(extract_int("{\"id\":", "id"), None);
    }
}
