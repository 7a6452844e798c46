use serde::{Deserialize, Deserializer};

/// Reads `null` the same as a missing key: the type's default.
///
/// `#[serde(default)]` alone only covers absent keys; an explicit `null` on a
/// `Vec` or `String` field is a type error without this.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Labelled {
        #[serde(deserialize_with = "null_as_default")]
        name: String,
        #[serde(deserialize_with = "null_as_default")]
        labels: Vec<String>,
    }

    #[test]
    fn null_missing_and_present_values() {
        let nulls: Labelled = serde_json::from_str(r#"{"name": null, "labels": null}"#).unwrap();
        assert_eq!(nulls.name, "");
        assert!(nulls.labels.is_empty());

        let missing: Labelled = serde_json::from_str("{}").unwrap();
        assert!(missing.labels.is_empty());

        let present: Labelled =
            serde_json::from_str(r#"{"name": "x", "labels": ["AI"]}"#).unwrap();
        assert_eq!((present.name.as_str(), present.labels), ("x", vec!["AI".to_string()]));
    }

    #[test]
    fn wrong_types_are_still_rejected() {
        assert!(serde_json::from_str::<Labelled>(r#"{"labels": "AI"}"#).is_err());
    }
}
