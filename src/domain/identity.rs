use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schema version accepted by [`ClaimsVerifier::verify`].
pub const SESSION_SCHEMA_VERSION: u8 = 1;

/// Session claims carried by a signed bearer token.
///
/// One versioned schema, one place the payer id lives. Tokens with any other
/// version are rejected outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub v: u8,
    pub payer_id: u64,
    pub exp: Option<DateTime<Utc>>,
}

impl SessionClaims {
    pub fn new(payer_id: u64, exp: Option<DateTime<Utc>>) -> Self {
        Self {
            v: SESSION_SCHEMA_VERSION,
            payer_id,
            exp,
        }
    }
}

/// Stateless verification capability for session bearer tokens.
///
/// Holds the single signing key, derived from configured secret material; the
/// key is a deployment input, never baked into the binary. Token format is
/// `hex(claims_json).hex(mac)` with a keyed blake3 MAC over the claims bytes.
#[derive(Clone)]
pub struct ClaimsVerifier {
    key: [u8; 32],
}

impl ClaimsVerifier {
    const KEY_CONTEXT: &'static str = "payrail 2025 session signing v1";

    pub fn from_secret(secret: &str) -> Self {
        Self {
            key: blake3::derive_key(Self::KEY_CONTEXT, secret.as_bytes()),
        }
    }

    /// Signs claims into a bearer token. The issuing side lives elsewhere;
    /// this exists for tooling and tests that need to mint valid tokens.
    pub fn sign(&self, claims: &SessionClaims) -> String {
        let payload = serde_json::to_vec(claims).unwrap_or_default();
        let mac = blake3::keyed_hash(&self.key, &payload);
        format!("{}.{}", hex::encode(&payload), mac.to_hex())
    }

    /// Verifies a bearer token and returns its claims if the MAC checks out,
    /// the schema version matches, and the token has not expired.
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        let (payload_hex, mac_hex) = token.split_once('.')?;
        let payload = hex::decode(payload_hex).ok()?;
        let presented = blake3::Hash::from_hex(mac_hex).ok()?;
        // Hash equality is constant-time.
        if presented != blake3::keyed_hash(&self.key, &payload) {
            return None;
        }
        let claims: SessionClaims = serde_json::from_slice(&payload).ok()?;
        if claims.v != SESSION_SCHEMA_VERSION {
            return None;
        }
        if claims.exp.is_some_and(|exp| exp <= Utc::now()) {
            return None;
        }
        Some(claims)
    }
}
