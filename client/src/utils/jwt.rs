//! Access-token claim decoding.
//!
//! The payload is read without verifying the signature: the client only uses
//! it to learn who it logged in as. The server stays the authority on
//! validity.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Deserializer};

/// Identity claims carried by the auth service's access tokens
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    /// Username
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub user_id: Option<i64>,
    /// Expiration time (Unix timestamp)
    #[serde(default)]
    pub exp: Option<i64>,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: Option<i64>,
}

impl AccessClaims {
    pub fn is_expired_at(&self, unix_now: i64) -> bool {
        self.exp.is_some_and(|exp| exp <= unix_now)
    }
}

// Some issuers put numeric ids in string claims
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Num(i64),
        Text(String),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Num(n)) => Some(n),
        Some(Id::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// Decode the claims segment of a compact JWT.
pub fn decode_claims(token: &str) -> Result<AccessClaims, String> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| "Malformed token: missing payload segment".to_string())?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| format!("Malformed token payload: {}", e))?;

    serde_json::from_slice(&bytes).map_err(|e| format!("Invalid token claims: {}", e))
}

/// Build an unsigned token around `claims_json`; tests only need the payload.
#[cfg(test)]
pub(crate) fn unsigned_token(claims_json: &str) -> String {
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#),
        URL_SAFE_NO_PAD.encode(claims_json)
    )
}
