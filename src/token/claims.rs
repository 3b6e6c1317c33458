//! Claim sets carried by tokens

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Issued-at timestamp (Unix seconds)
pub const ISSUED_AT: &str = "iat";
/// Expiry timestamp (Unix seconds)
pub const EXPIRES_AT: &str = "exp";
/// Not-before timestamp (Unix seconds)
pub const NOT_BEFORE: &str = "nbf";
/// Token identifier
pub const TOKEN_ID: &str = "jti";

/// Claims added by the signing process rather than by the caller
pub const RESERVED_CLAIMS: [&str; 4] = [ISSUED_AT, EXPIRES_AT, NOT_BEFORE, TOKEN_ID];

/// An open mapping from claim name to JSON value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(Map<String, Value>);

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Claim names, in key order
    pub fn names(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn issued_at(&self) -> Option<u64> {
        self.get(ISSUED_AT).and_then(Value::as_u64)
    }

    pub fn expires_at(&self) -> Option<u64> {
        self.get(EXPIRES_AT).and_then(Value::as_u64)
    }

    /// A copy with the four reserved claims stripped
    ///
    /// Renewal signs this copy so the new token carries fresh timing data
    /// instead of the old token's.
    pub fn without_reserved(&self) -> ClaimSet {
        let mut claims = self.clone();
        for name in RESERVED_CLAIMS {
            claims.remove(name);
        }
        claims
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ClaimSet {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for ClaimSet {
    type Error = Value;

    /// Only JSON objects are claim sets; anything else is handed back
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ClaimSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_without_reserved_strips_timing_claims() {
        let claims = ClaimSet::new()
            .with("sub", "alice")
            .with("role", "admin")
            .with(ISSUED_AT, 100)
            .with(EXPIRES_AT, 200)
            .with(NOT_BEFORE, 100)
            .with(TOKEN_ID, "abc");

        let stripped = claims.without_reserved();
        assert_eq!(stripped.names(), vec!["role", "sub"]);
        // the original is untouched
        assert_eq!(claims.len(), 6);
    }

    #[test]
    fn test_timing_accessors() {
        let claims = ClaimSet::new().with(ISSUED_AT, 10).with(EXPIRES_AT, 20);
        assert_eq!(claims.issued_at(), Some(10));
        assert_eq!(claims.expires_at(), Some(20));
        assert_eq!(ClaimSet::new().issued_at(), None);
    }

    #[test]
    fn test_try_from_value() {
        let claims = ClaimSet::try_from(json!({"sub": "bob"})).unwrap();
        assert_eq!(claims.get("sub"), Some(&json!("bob")));

        assert!(ClaimSet::try_from(json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let claims: ClaimSet = serde_json::from_str(r#"{"sub":"carol","n":1}"#).unwrap();
        assert_eq!(claims.len(), 2);
        assert_eq!(
            serde_json::to_value(&claims).unwrap(),
            json!({"sub": "carol", "n": 1})
        );
    }

    #[test]
    fn test_from_iterator() {
        let claims: ClaimSet = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(claims.names(), vec!["a", "b"]);
    }
}
