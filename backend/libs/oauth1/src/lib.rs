//! # OAuth 1.0a Request Signing
//!
//! HMAC-SHA1 request signing for third-party APIs that still speak
//! OAuth 1.0a (the Twitter v1.1 endpoints). Produces the `Authorization`
//! header value for an outbound request.
//!
//! Every call draws a fresh nonce and timestamp, so two signatures over
//! identical inputs differ by design; the receiving service uses the pair
//! for replay rejection.

use base64::{engine::general_purpose::STANDARD as base64_engine, Engine as _};
use hmac::{Hmac, Mac};
use rand::{distributions::Alphanumeric, Rng};
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";
const NONCE_LEN: usize = 32;

/// Static consumer credentials, read-only for the process lifetime.
#[derive(Debug, Clone)]
pub struct Consumer {
    pub key: String,
    pub secret: String,
}

/// Per-user access token credentials.
#[derive(Debug, Clone)]
pub struct Token {
    pub key: String,
    pub secret: String,
}

/// Signs outbound requests on behalf of one registered consumer.
pub struct Signer {
    consumer: Consumer,
}

impl Signer {
    pub fn new(consumer: Consumer) -> Self {
        Self { consumer }
    }

    /// Compute the `Authorization` header value for one outbound request.
    ///
    /// `params` must contain every request parameter that will travel in the
    /// query string or a form-encoded body; the signature covers them all.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        token: Option<&Token>,
    ) -> String {
        let nonce = generate_nonce();
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.header_with(method, url, params, token, &nonce, timestamp)
    }

    /// Deterministic core: caller supplies nonce and timestamp.
    fn header_with(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        token: Option<&Token>,
        nonce: &str,
        timestamp: u64,
    ) -> String {
        let timestamp = timestamp.to_string();
        let mut oauth_params: Vec<(String, String)> = vec![
            ("oauth_consumer_key".into(), self.consumer.key.clone()),
            ("oauth_nonce".into(), nonce.to_string()),
            ("oauth_signature_method".into(), SIGNATURE_METHOD.into()),
            ("oauth_timestamp".into(), timestamp),
            ("oauth_version".into(), OAUTH_VERSION.into()),
        ];
        if let Some(token) = token {
            oauth_params.push(("oauth_token".into(), token.key.clone()));
        }

        let base = signature_base_string(method, url, params, &oauth_params);
        let signing_key = format!(
            "{}&{}",
            percent_encode(&self.consumer.secret),
            token.map(|t| percent_encode(&t.secret)).unwrap_or_default()
        );
        let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(base.as_bytes());
        let signature = base64_engine.encode(mac.finalize().into_bytes());

        oauth_params.push(("oauth_signature".into(), signature));
        oauth_params.sort();

        let fields: Vec<String> = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect();
        format!("OAuth {}", fields.join(", "))
    }
}

/// Build the OAuth signature base string:
/// `METHOD&enc(url)&enc(parameter-string)`.
fn signature_base_string(
    method: &str,
    url: &str,
    params: &[(&str, &str)],
    oauth_params: &[(String, String)],
) -> String {
    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(url),
        percent_encode(&parameter_string(params, oauth_params))
    )
}

/// Percent-encode every key and value, sort by encoded key then encoded
/// value, join as `k=v` pairs with `&`.
fn parameter_string(params: &[(&str, &str)], oauth_params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .chain(
            oauth_params
                .iter()
                .map(|(k, v)| (percent_encode(k), percent_encode(v))),
        )
        .collect();
    encoded.sort();
    let pairs: Vec<String> = encoded
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    pairs.join("&")
}

/// RFC 3986 percent-encoding; only unreserved characters pass through.
fn percent_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}
