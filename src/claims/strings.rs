use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A claim holding one or more strings, such as `aud`
///
/// RFC 7519 allows the audience to be a single string or an array of
/// strings. Both forms (and `null`) are accepted when deserializing; the
/// value is always written as an array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ClaimStrings(Vec<String>);

impl ClaimStrings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn push(&mut self, value: impl Into<String>) {
        self.0.push(value.into());
    }
}

impl From<&str> for ClaimStrings {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl From<String> for ClaimStrings {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<String>> for ClaimStrings {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl<S: Into<String>> FromIterator<S> for ClaimStrings {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl Serialize for ClaimStrings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

struct ClaimStringsVisitor;

impl<'de> Visitor<'de> for ClaimStringsVisitor {
    type Value = ClaimStrings;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string or an array of strings")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<ClaimStrings, E> {
        Ok(ClaimStrings::from(value))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<ClaimStrings, E> {
        Ok(ClaimStrings::from(value))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ClaimStrings, A::Error> {
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(value) = seq.next_element::<String>()? {
            values.push(value);
        }
        Ok(ClaimStrings(values))
    }

    fn visit_unit<E: de::Error>(self) -> Result<ClaimStrings, E> {
        Ok(ClaimStrings::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<ClaimStrings, E> {
        Ok(ClaimStrings::default())
    }
}

impl<'de> Deserialize<'de> for ClaimStrings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ClaimStringsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_single_string() {
        let aud: ClaimStrings = serde_json::from_str(r#""api""#).unwrap();
        assert_eq!(aud.iter().collect::<Vec<_>>(), vec!["api"]);
    }

    #[test]
    fn test_deserialize_array() {
        let aud: ClaimStrings = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(aud.len(), 2);
        assert_eq!(aud.as_slice(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_deserialize_null() {
        let aud: ClaimStrings = serde_json::from_str("null").unwrap();
        assert!(aud.is_empty());
    }

    #[test]
    fn test_deserialize_rejects_other_types() {
        assert!(serde_json::from_str::<ClaimStrings>("42").is_err());
        assert!(serde_json::from_str::<ClaimStrings>(r#"["a", 1]"#).is_err());
    }

    #[test]
    fn test_serialize_as_array() {
        let aud = ClaimStrings::from("api");
        assert_eq!(serde_json::to_string(&aud).unwrap(), r#"["api"]"#);
    }
}
