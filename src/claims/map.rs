use crate::claims::Claims;
use crate::error::{Error, Result};
use crate::numeric_date::NumericDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::{Deref, DerefMut};

/// Free-form claims backed by an ordered JSON object
///
/// Registered claims are interpreted when read:
///
/// - `exp`, `nbf`, `iat` must be JSON numbers; `0` counts as absent.
/// - `iss`, `sub` must be strings.
/// - `aud` may be a string, an array of strings, or `null`.
///
/// Any other stored type yields [`Error::InvalidType`] naming the claim.
///
/// # Examples
///
/// ```
/// use jwtcheck::{Claims, MapClaims};
/// use serde_json::json;
///
/// let claims: MapClaims = serde_json::from_value(json!({
///     "iss": "https://auth.example.com",
///     "aud": "api",
///     "exp": 1516239022,
/// }))
/// .unwrap();
///
/// assert_eq!(claims.issuer().unwrap(), Some("https://auth.example.com"));
/// assert_eq!(claims.audience().unwrap(), vec!["api"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapClaims(Map<String, Value>);

impl MapClaims {
    /// An empty claim set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a claim, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// The underlying JSON object
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    fn numeric_date(&self, key: &'static str) -> Result<Option<NumericDate>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(Value::Number(number)) => {
                let seconds = number.as_f64().ok_or(Error::InvalidType(key))?;
                if seconds == 0.0 {
                    return Ok(None);
                }
                NumericDate::from_seconds_f64(seconds)
                    .map(Some)
                    .ok_or(Error::InvalidType(key))
            }
            Some(_) => Err(Error::InvalidType(key)),
        }
    }

    fn string(&self, key: &'static str) -> Result<Option<&str>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.as_str())),
            Some(_) => Err(Error::InvalidType(key)),
        }
    }

    fn strings(&self, key: &'static str) -> Result<Vec<&str>> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::String(value)) => Ok(vec![value.as_str()]),
            Some(Value::Array(values)) => values
                .iter()
                .map(|value| value.as_str().ok_or(Error::InvalidType(key)))
                .collect(),
            Some(_) => Err(Error::InvalidType(key)),
        }
    }
}

impl Claims for MapClaims {
    fn expiration_time(&self) -> Result<Option<NumericDate>> {
        self.numeric_date("exp")
    }

    fn issued_at(&self) -> Result<Option<NumericDate>> {
        self.numeric_date("iat")
    }

    fn not_before(&self) -> Result<Option<NumericDate>> {
        self.numeric_date("nbf")
    }

    fn issuer(&self) -> Result<Option<&str>> {
        self.string("iss")
    }

    fn subject(&self) -> Result<Option<&str>> {
        self.string("sub")
    }

    fn audience(&self) -> Result<Vec<&str>> {
        self.strings("aud")
    }
}

impl Deref for MapClaims {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MapClaims {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Map<String, Value>> for MapClaims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapClaims {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
