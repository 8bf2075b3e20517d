/// Shared session-token module for Postdeck services
///
/// Sessions are HS256 JWTs signed with a single process-wide secret. All
/// services MUST verify tokens through this module so that claim handling
/// stays consistent across the platform.
///
/// ## Security Design
///
/// - **HS256 only**: the algorithm is pinned; tokens claiming any other
///   algorithm are rejected as malformed
/// - **No hardcoded secrets**: the secret comes from configuration; an empty
///   secret is a configuration fault, not an authentication failure
/// - **Zero leeway**: expiry is compared against the current time exactly
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as base64url, Engine as _};
use chrono::{Duration, Utc};
use jsonwebtoken::{crypto, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header};
use serde::{Deserialize, Serialize};

/// Canonical principal representation.
///
/// User ids are numeric everywhere in Postdeck (Telegram ids included).
/// Tokens may carry the id as a JSON string or number; verification
/// normalizes to `i64` at this boundary.
pub type Principal = i64;

const SESSION_TTL_DAYS: i64 = 7;

/// JWT algorithm - MUST be HS256 for all Postdeck services
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Session token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id, accepted as JSON string or number)
    pub sub: serde_json::Value,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Verification failure taxonomy
///
/// `MissingSecret` is a configuration fault and must surface as a server
/// error, never as an authentication failure. The remaining variants are
/// collapsed to a uniform "unauthenticated" verdict at the resolver
/// boundary; they exist so the reason can be logged internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("session secret is not configured")]
    MissingSecret,
    #[error("malformed token")]
    Malformed,
    #[error("token signature mismatch")]
    SignatureInvalid,
    #[error("token expired")]
    Expired,
    #[error("user id claim has an invalid type")]
    InvalidClaimType,
}

/// Verifies session tokens against the process-wide secret.
///
/// Stateless after construction; safe to share across requests behind an
/// `Arc` without synchronization.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
}

impl TokenVerifier {
    /// Build a verifier from the configured secret.
    ///
    /// An empty secret is rejected here so the fault is caught at startup
    /// rather than mis-reported per request.
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }
        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Verify a token and extract its principal.
    ///
    /// Checks run in order: structure, signature, expiry, claim type. The
    /// `exp` claim of a token signed with the wrong secret is untrustworthy,
    /// so such tokens fail with `SignatureInvalid` even when their expiry is
    /// in the past. Claims are parsed from the payload segment directly; the
    /// `sub` claim may be any JSON value and is normalized (or rejected as
    /// `InvalidClaimType`) after the cryptographic checks pass.
    pub fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let (message, signature) = token.rsplit_once('.').ok_or(TokenError::Malformed)?;
        let (_, payload_b64) = message.split_once('.').ok_or(TokenError::Malformed)?;
        if payload_b64.contains('.') {
            return Err(TokenError::Malformed);
        }

        let header = decode_header(token).map_err(|_| TokenError::Malformed)?;
        if header.alg != JWT_ALGORITHM {
            return Err(TokenError::Malformed);
        }
        let signature_ok =
            crypto::verify(signature, message.as_bytes(), &self.decoding_key, JWT_ALGORITHM)
                .map_err(|_| TokenError::Malformed)?;
        if !signature_ok {
            return Err(TokenError::SignatureInvalid);
        }

        let payload = base64url
            .decode(payload_b64)
            .map_err(|_| TokenError::Malformed)?;
        let claims: serde_json::Value =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        let exp = claims
            .get("exp")
            .and_then(|v| v.as_i64())
            .ok_or(TokenError::Malformed)?;
        if Utc::now().timestamp() > exp {
            return Err(TokenError::Expired);
        }

        let sub = claims.get("sub").ok_or(TokenError::Malformed)?;
        principal_from_claim(sub)
    }
}

/// Issues session tokens. Only the gateway needs this; verification-only
/// consumers should construct just a [`TokenVerifier`].
pub struct TokenSigner {
    encoding_key: EncodingKey,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Issue a session token with the standard 7-day lifetime.
    pub fn issue(&self, user_id: Principal) -> Result<String, TokenError> {
        let now = Utc::now();
        let expiry = now + Duration::days(SESSION_TTL_DAYS);
        self.issue_expiring_at(user_id, now.timestamp(), expiry.timestamp())
    }

    /// Issue a token with explicit `iat`/`exp` timestamps.
    pub fn issue_expiring_at(
        &self,
        user_id: Principal,
        iat: i64,
        exp: i64,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: serde_json::Value::from(user_id),
            iat,
            exp,
        };
        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|_| TokenError::Malformed)
    }
}

/// Normalize the `sub` claim to the canonical `i64` principal.
///
/// A JSON number or a string holding an integer is accepted; every other
/// shape (objects, arrays, null, booleans, non-numeric strings) is an
/// `InvalidClaimType`.
fn principal_from_claim(sub: &serde_json::Value) -> Result<Principal, TokenError> {
    match sub {
        serde_json::Value::Number(n) => n.as_i64().ok_or(TokenError::InvalidClaimType),
        serde_json::Value::String(s) => s.parse().map_err(|_| TokenError::InvalidClaimType),
        _ => Err(TokenError::InvalidClaimType),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEST_SECRET: &str = "test-session-secret-do-not-use-in-production";

    fn signer() -> TokenSigner {
        TokenSigner::new(TEST_SECRET).expect("signer")
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(TEST_SECRET).expect("verifier")
    }

    fn sign_raw_claims(sub: serde_json::Value) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub,
            iat: now,
            exp: now + 3600,
        };
        encode(
            &Header::new(JWT_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("encode")
    }

    #[test]
    fn round_trip_yields_embedded_user_id() {
        let token = signer().issue(42).expect("issue");
        assert_eq!(token.matches('.').count(), 2);
        assert_eq!(verifier().verify(&token), Ok(42));
    }

    #[test]
    fn string_user_id_claim_is_normalized() {
        let token = sign_raw_claims(json!("1337"));
        assert_eq!(verifier().verify(&token), Ok(1337));
    }

    #[test]
    fn non_numeric_string_claim_is_rejected() {
        let token = sign_raw_claims(json!("alice"));
        assert_eq!(verifier().verify(&token), Err(TokenError::InvalidClaimType));
    }

    #[test]
    fn structured_claim_types_are_rejected() {
        for sub in [json!({"id": 1}), json!([1]), json!(null), json!(true)] {
            let token = sign_raw_claims(sub);
            assert_eq!(verifier().verify(&token), Err(TokenError::InvalidClaimType));
        }
    }

    #[test]
    fn expired_token_fails_with_expired() {
        let now = Utc::now().timestamp();
        let token = signer()
            .issue_expiring_at(42, now - 7200, now - 3600)
            .expect("issue");
        assert_eq!(verifier().verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn wrong_secret_fails_with_signature_invalid() {
        let other = TokenSigner::new("another-secret").expect("signer");
        let token = other.issue(42).expect("issue");
        assert_eq!(verifier().verify(&token), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn signature_check_precedes_expiry_and_claim_checks() {
        let other = TokenSigner::new("another-secret").expect("signer");
        let now = Utc::now().timestamp();
        let expired_forgery = other
            .issue_expiring_at(42, now - 7200, now - 3600)
            .expect("issue");
        assert_eq!(
            verifier().verify(&expired_forgery),
            Err(TokenError::SignatureInvalid)
        );
    }

    #[test]
    fn garbage_fails_with_malformed() {
        assert_eq!(
            verifier().verify("not.a.token"),
            Err(TokenError::Malformed)
        );
        assert_eq!(verifier().verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn tampered_payload_fails() {
        let token = signer().issue(42).expect("issue");
        // Flip the first character of the signature segment
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let flipped = if parts[2].starts_with('A') { "B" } else { "A" };
        parts[2].replace_range(0..1, flipped);
        let tampered = parts.join(".");
        assert!(verifier().verify(&tampered).is_err());
    }

    #[test]
    fn empty_secret_is_a_configuration_fault() {
        assert!(matches!(
            TokenVerifier::new(""),
            Err(TokenError::MissingSecret)
        ));
        assert!(matches!(
            TokenSigner::new(""),
            Err(TokenError::MissingSecret)
        ));
    }
}
