//! HMAC-SHA256 signed tokens
//!
//! Format: `base64url(claims-json).base64url(hmac-sha256(first part))`.

use std::collections::BTreeSet;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::core::models::{Officer, Role};

type HmacSha256 = Hmac<Sha256>;

/// Why a token was refused
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Not two dot-separated base64url parts
    #[error("malformed token")]
    Malformed,
    /// Signature does not match the claims
    #[error("invalid token signature")]
    BadSignature,
    /// Past its expiry
    #[error("token expired")]
    Expired,
    /// Signing secret unusable
    #[error("token secret is empty")]
    EmptySecret,
}

/// Signed token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Officer username
    pub sub: String,
    /// Officer display name
    pub name: String,
    /// Roles at issue time
    pub roles: BTreeSet<Role>,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

impl Claims {
    /// Whether the token has expired at `now`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Issues and verifies tokens with one shared secret
#[derive(Clone)]
pub struct TokenSigner {
    mac: HmacSha256,
    ttl: Duration,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("mac", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenSigner {
    /// Signer for `secret`; tokens live for `ttl`
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Result<Self, TokenError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }
        let mac = HmacSha256::new_from_slice(&secret).map_err(|_| TokenError::EmptySecret)?;
        Ok(Self { mac, ttl })
    }

    /// Token lifetime
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Token for `officer`, expiring `ttl` after `now`
    #[must_use]
    pub fn issue(&self, officer: &Officer, now: DateTime<Utc>) -> String {
        let claims = Claims {
            sub: officer.username.clone(),
            name: officer.name.clone(),
            roles: officer.roles.clone(),
            exp: (now + self.ttl).timestamp(),
        };
        self.sign(&claims)
    }

    /// Encode and sign arbitrary claims
    #[must_use]
    pub fn sign(&self, claims: &Claims) -> String {
        // Claims hold only strings, enums and integers.
        let payload = serde_json::to_vec(claims).unwrap_or_default();
        let payload_part = URL_SAFE_NO_PAD.encode(payload);
        let mut mac = self.mac.clone();
        mac.update(payload_part.as_bytes());
        let sig_part = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        format!("{payload_part}.{sig_part}")
    }

    /// Check signature and expiry, returning the claims
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let (payload_part, sig_part) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let signature = URL_SAFE_NO_PAD
            .decode(sig_part)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = self.mac.clone();
        mac.update(payload_part.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_part)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        if claims.is_expired(now) {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value
#[must_use]
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}
