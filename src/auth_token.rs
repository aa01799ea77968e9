use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const MIN_SECRET_LEN: usize = 32;

/// Default session lifetime: 7 days.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, thiserror::Error)]
pub enum AuthTokenError {
    #[error("auth token secret is too short (min {MIN_SECRET_LEN} bytes)")]
    SecretTooShort,

    #[error("invalid auth token format")]
    InvalidFormat,

    #[error("auth token signature is invalid")]
    InvalidSignature,

    #[error("auth token is expired")]
    Expired,

    #[error("failed to decode auth token payload")]
    PayloadDecode,

    #[error("failed to parse auth token payload")]
    PayloadParse,
}

/// Claims carried inside a session token. The token is self-contained: there
/// is no server-side session record backing it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: String,
    pub issued_at_ms: u64,
    pub expires_at_ms: u64,
}

impl SessionClaims {
    pub fn new(user_id: String, issued_at_ms: u64, expires_at_ms: u64) -> Self {
        Self {
            user_id,
            issued_at_ms,
            expires_at_ms,
        }
    }

    pub fn is_expired(&self, reference_ms: u64) -> bool {
        reference_ms >= self.expires_at_ms
    }
}

/// Issues and verifies HMAC-SHA256 signed session tokens of the form
/// `base64url(claims).base64url(signature)`.
#[derive(Clone)]
pub struct AuthTokenService {
    secret: Arc<[u8]>,
    ttl: Duration,
}

impl AuthTokenService {
    pub fn new(secret: Vec<u8>, ttl: Duration) -> Result<Self, AuthTokenError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthTokenError::SecretTooShort);
        }

        Ok(Self {
            secret: Arc::<[u8]>::from(secret),
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue_session_token(
        &self,
        user_id: &str,
        issued_at_ms: u64,
    ) -> Result<String, AuthTokenError> {
        let expires_at_ms = issued_at_ms.saturating_add(self.ttl.as_millis() as u64);
        let claims = SessionClaims::new(user_id.to_string(), issued_at_ms, expires_at_ms);
        self.issue(&claims)
    }

    pub fn issue(&self, claims: &SessionClaims) -> Result<String, AuthTokenError> {
        let payload = serde_json::to_vec(claims).map_err(|_| AuthTokenError::PayloadParse)?;
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload);
        let signature = self.sign(payload_b64.as_bytes())?;
        let signature_b64 = URL_SAFE_NO_PAD.encode(signature);
        Ok(format!("{payload_b64}.{signature_b64}"))
    }

    /// All failure modes (bad signature, malformed payload, expiry) surface as
    /// an error here; callers collapse them into "no identity" so a probing
    /// client cannot tell why a token was rejected.
    pub fn verify(
        &self,
        token: &str,
        reference_ms: u64,
    ) -> Result<SessionClaims, AuthTokenError> {
        let (payload_b64, signature_b64) = token
            .split_once('.')
            .ok_or(AuthTokenError::InvalidFormat)?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AuthTokenError::InvalidFormat)?;

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| AuthTokenError::InvalidSignature)?;
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthTokenError::InvalidSignature)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AuthTokenError::PayloadDecode)?;

        let claims: SessionClaims =
            serde_json::from_slice(&payload).map_err(|_| AuthTokenError::PayloadParse)?;

        if claims.user_id.is_empty() || claims.is_expired(reference_ms) {
            return Err(AuthTokenError::Expired);
        }

        Ok(claims)
    }

    fn sign(&self, bytes: &[u8]) -> Result<Vec<u8>, AuthTokenError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| AuthTokenError::InvalidSignature)?;
        mac.update(bytes);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
