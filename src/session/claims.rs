use std::collections::HashMap;

use serde_json::Value;

/// Issuer claim name
const ISSUER: &str = "iss";
/// Subject claim name
const SUBJECT: &str = "sub";

/// Claim extraction error type
#[derive(thiserror::Error, Debug)]
pub enum ClaimsError {
    #[error("Verified claims are not a JSON object")]
    NotAMap,
    #[error("Claim `{name}` has an unsupported value")]
    UnsupportedValue {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Single claim value
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    String(String),
    Number(serde_json::Number),
    Bool(bool),
    List(Vec<ClaimValue>),
}

impl ClaimValue {
    /// Get the value as a string, if it is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Typed view over the claims of a verified session token
#[derive(Debug, Clone, Default)]
pub struct ClaimSet(HashMap<String, ClaimValue>);

impl ClaimSet {
    /// Extract a claim set from verified claims.
    ///
    /// `null` claims are treated as absent. Nested objects are not supported
    /// and make the whole extraction fail.
    pub fn from_claims(claims: Value) -> Result<Self, ClaimsError> {
        let Value::Object(map) = claims else {
            return Err(ClaimsError::NotAMap);
        };

        map.into_iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(name, value)| match serde_json::from_value(value) {
                Ok(value) => Ok((name, value)),
                Err(source) => Err(ClaimsError::UnsupportedValue { name, source }),
            })
            .collect::<Result<_, _>>()
            .map(Self)
    }

    /// Get a claim by name
    pub fn get(&self, name: &str) -> Option<&ClaimValue> {
        self.0.get(name)
    }

    /// Get the `iss` claim, if present and a string
    pub fn issuer(&self) -> Option<&str> {
        self.get(ISSUER).and_then(ClaimValue::as_str)
    }

    /// Get the `sub` claim, if present and a string
    pub fn subject(&self) -> Option<&str> {
        self.get(SUBJECT).and_then(ClaimValue::as_str)
    }
}
