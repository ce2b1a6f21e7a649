use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

/// Token verification error type
#[derive(thiserror::Error, Debug)]
pub enum VerifyError {
    #[error("Session token is expired")]
    Expired,
    #[error("Session token is invalid")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for VerifyError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Invalid(e),
        }
    }
}

/// Verify session tokens and return their raw claims
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Value, VerifyError>;
}

/// Session token verifier for JWTs
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Create a verifier for arbitrary keys and validation rules
    pub const fn new(decoding_key: DecodingKey, validation: Validation) -> Self {
        Self {
            decoding_key,
            validation,
        }
    }

    /// Create a verifier for HS256 tokens signed with the given secret
    pub fn hs256(signing_key: &SecretString) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens forwarded from identity providers carry audiences we don't know about
        validation.validate_aud = false;
        Self::new(
            DecodingKey::from_secret(signing_key.expose_secret().as_bytes()),
            validation,
        )
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Value, VerifyError> {
        let token_data = decode::<Value>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}
