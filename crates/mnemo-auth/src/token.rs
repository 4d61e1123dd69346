//! Signed session tokens.
//!
//! Tokens are stateless HS256 JWTs carrying `{sub, iat, exp}`. Validity
//! is signature integrity plus expiry — there is no server-side
//! revocation list; rotating the signing secret invalidates every
//! outstanding token.

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mnemo_core::{Error, Result};

/// Fixed token lifetime from issuance: one week.
pub const TOKEN_LIFETIME_SECS: i64 = 7 * 24 * 60 * 60;

/// JWT claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id this session runs as.
    pub sub: Uuid,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

/// Issues and validates session tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service from the process-wide signing secret.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Exact expiry, no clock leeway
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for a subject, expiring one week from now.
    pub fn issue(&self, subject_id: Uuid) -> Result<String> {
        self.issue_with_lifetime(subject_id, TOKEN_LIFETIME_SECS)
    }

    /// Issue a token with an explicit lifetime in seconds.
    pub fn issue_with_lifetime(&self, subject_id: Uuid, lifetime_secs: i64) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject_id,
            iat: now,
            exp: now + lifetime_secs,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| Error::Internal(format!("token signing failed: {e}")))
    }

    /// Validate a token, returning the subject id it resolves to.
    ///
    /// Fails with `TokenExpired` on a lapsed expiry and `InvalidToken`
    /// on anything else (malformed, tampered, wrong algorithm).
    pub fn validate(&self, token: &str) -> Result<Uuid> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims.sub),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(Error::TokenExpired),
                _ => Err(Error::InvalidToken),
            },
        }
    }
}
