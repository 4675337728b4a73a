use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use hmac::{Hmac, Mac};
use log::warn;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("signing key is empty or unavailable")]
    MissingKey,
    #[error("failed to initialize HMAC-SHA256: {0}")]
    Crypto(String),
}

/// Derive the bearer token for an identity: base64 of
/// HMAC-SHA256(identity) keyed with the shared secret. Deterministic in
/// (identity, secret); tokens carry no expiry of their own.
pub fn issue(identity: &str, secret: &str) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingKey);
    }
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|err| TokenError::Crypto(err.to_string()))?;
    mac.update(identity.as_bytes());
    Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
}

/// Check a candidate token against the recomputed digest. The comparison
/// goes through `Mac::verify_slice`, which is constant-time. Any internal
/// failure is reported as a mismatch, never an error.
pub fn verify(identity: &str, secret: &str, candidate: &str) -> bool {
    let digest = match BASE64_STANDARD.decode(candidate) {
        Ok(digest) => digest,
        Err(err) => {
            warn!("candidate token is not valid base64: {err}");
            return false;
        }
    };
    if secret.is_empty() {
        warn!("token verification attempted with an empty signing key");
        return false;
    }
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(err) => {
            warn!("failed to initialize HMAC-SHA256 for verification: {err}");
            return false;
        }
    };
    mac.update(identity.as_bytes());
    mac.verify_slice(&digest).is_ok()
}
