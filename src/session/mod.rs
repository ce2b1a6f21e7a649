mod chunks;
mod claims;
mod verifier;

pub use chunks::{join_cookies, parse_cookie_header, split_cookie, ChunkError};
pub use claims::{ClaimSet, ClaimValue, ClaimsError};
pub use verifier::{JwtVerifier, TokenVerifier, VerifyError};

/// Name (and chunk prefix) of the session cookie
pub const SESSION_COOKIE_NAME: &str = "signoff.token";

/// Issuer stamped into sessions issued by this application itself
pub const LOCAL_ISSUER: &str = "signoff";
