//! # Telegram Login Widget Verification
//!
//! Validates the signed identity assertion the Telegram login widget posts
//! back to the site. The widget signs the payload with
//! `HMAC-SHA256(check_string, SHA256(bot_token))`; the check string is the
//! payload fields minus `hash`, byte-order sorted, joined as `key=value`
//! lines.
//!
//! A payload is accepted only when both the signature check and the
//! freshness check pass; an old-but-correctly-signed payload is rejected.

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age of a widget payload, inclusive.
pub const MAX_AUTH_AGE_SECS: i64 = 3600;

/// The identity assertion posted by the login widget.
///
/// `id`, `auth_date` and `hash` are mandatory; deserialization rejects a
/// payload missing them before any cryptography runs. The name fields are
/// optional and only participate in the check string when present.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginPayload {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub photo_url: Option<String>,
    pub auth_date: i64,
    pub hash: String,
}

impl LoginPayload {
    /// Fields minus `hash`, byte-order sorted, joined as `key=value` lines.
    fn check_string(&self) -> String {
        let mut fields: BTreeMap<&str, String> = BTreeMap::new();
        fields.insert("id", self.id.to_string());
        fields.insert("auth_date", self.auth_date.to_string());
        if let Some(v) = &self.first_name {
            fields.insert("first_name", v.clone());
        }
        if let Some(v) = &self.last_name {
            fields.insert("last_name", v.clone());
        }
        if let Some(v) = &self.username {
            fields.insert("username", v.clone());
        }
        if let Some(v) = &self.photo_url {
            fields.insert("photo_url", v.clone());
        }
        fields
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Verify the payload signature against the bot token.
///
/// The supplied `hash` is hex-decoded and compared in constant time via
/// `Mac::verify_slice`; a hash that is not valid hex fails outright.
pub fn verify(payload: &LoginPayload, bot_token: &str) -> bool {
    let supplied = match hex::decode(&payload.hash) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let secret_key = Sha256::digest(bot_token.as_bytes());
    let mut mac =
        HmacSha256::new_from_slice(&secret_key).expect("HMAC accepts keys of any length");
    mac.update(payload.check_string().as_bytes());
    mac.verify_slice(&supplied).is_ok()
}

/// Freshness check against the current clock, boundary inclusive.
pub fn is_fresh(auth_date: i64, max_age_secs: i64) -> bool {
    is_fresh_at(auth_date, Utc::now().timestamp(), max_age_secs)
}

fn is_fresh_at(auth_date: i64, now: i64, max_age_secs: i64) -> bool {
    now - auth_date <= max_age_secs
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT_TOKEN: &str = "123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11";

    /// Sign a payload the way the widget does, for test fixtures.
    fn signed(mut payload: LoginPayload) -> LoginPayload {
        let secret_key = Sha256::digest(BOT_TOKEN.as_bytes());
        let mut mac =
            HmacSha256::new_from_slice(&secret_key).expect("HMAC accepts keys of any length");
        mac.update(payload.check_string().as_bytes());
        payload.hash = hex::encode(mac.finalize().into_bytes());
        payload
    }

    fn sample() -> LoginPayload {
        signed(LoginPayload {
            id: 987654321,
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            username: Some("ada".into()),
            photo_url: None,
            auth_date: 1700000000,
            hash: String::new(),
        })
    }

    #[test]
    fn valid_signature_verifies() {
        assert!(verify(&sample(), BOT_TOKEN));
    }

    #[test]
    fn any_field_change_invalidates() {
        let mut p = sample();
        p.first_name = Some("Adb".into());
        assert!(!verify(&p, BOT_TOKEN));

        let mut p = sample();
        p.id += 1;
        assert!(!verify(&p, BOT_TOKEN));

        let mut p = sample();
        p.auth_date += 1;
        assert!(!verify(&p, BOT_TOKEN));
    }

    #[test]
    fn wrong_bot_token_invalidates() {
        assert!(!verify(&sample(), "999999:not-the-token"));
    }

    #[test]
    fn absent_optional_fields_stay_out_of_the_check_string() {
        let p = signed(LoginPayload {
            id: 42,
            first_name: None,
            last_name: None,
            username: None,
            photo_url: None,
            auth_date: 1700000000,
            hash: String::new(),
        });
        assert_eq!(p.check_string(), "auth_date=1700000000\nid=42");
        assert!(verify(&p, BOT_TOKEN));
    }

    #[test]
    fn non_hex_hash_fails_before_comparison() {
        let mut p = sample();
        p.hash = "zz-not-hex".into();
        assert!(!verify(&p, BOT_TOKEN));
        p.hash = String::new();
        assert!(!verify(&p, BOT_TOKEN));
    }

    #[test]
    fn freshness_boundary_is_inclusive() {
        let now = 1_700_000_000;
        assert!(is_fresh_at(now - 3600, now, MAX_AUTH_AGE_SECS));
        assert!(!is_fresh_at(now - 3601, now, MAX_AUTH_AGE_SECS));
        assert!(is_fresh_at(now, now, MAX_AUTH_AGE_SECS));
    }

    #[test]
    fn check_string_is_byte_order_sorted() {
        let p = sample();
        let check = p.check_string();
        let lines: Vec<&str> = check.split('\n').collect();
        let mut sorted = lines.clone();
        sorted.sort();
        assert_eq!(lines, sorted);
        assert!(lines[0].starts_with("auth_date="));
    }
}
