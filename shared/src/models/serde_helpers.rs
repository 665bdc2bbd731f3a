//! Serde helpers for the loosely typed backend payloads
//!
//! `#[serde(default)]` only covers a missing key. The backend also sends
//! explicit `null` for unset numbers and strings; one such field must not
//! fail the decode of a whole list.

use serde::{Deserialize, Deserializer};

/// Deserialize a value that may be `null`, treating null as `T::default()`
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "super::null_default")]
        points: i64,
        #[serde(default, deserialize_with = "super::null_default")]
        name: String,
    }

    #[test]
    fn test_null_and_missing_become_default() {
        let row: Row = serde_json::from_str(r#"{"points": null, "name": null}"#).unwrap();
        assert_eq!(row.points, 0);
        assert_eq!(row.name, "");

        let row: Row = serde_json::from_str("{}").unwrap();
        assert_eq!(row.points, 0);

        let row: Row = serde_json::from_str(r#"{"points": 42, "name": "An"}"#).unwrap();
        assert_eq!(row.points, 42);
        assert_eq!(row.name, "An");
    }

    #[test]
    fn test_wrong_type_still_fails() {
        assert!(serde_json::from_str::<Row>(r#"{"points": "nhiều"}"#).is_err());
    }
}
