//! Cookie-based identity resolution
//!
//! The `auth_token` cookie is the single credential carrier for the whole
//! gateway. Every entry point that needs an identity goes through
//! [`IdentityResolver::resolve`]; nothing else reads the cookie or decodes
//! tokens on its own.

use actix_web::{HttpMessage, HttpRequest};
use auth_core::TokenVerifier;
use futures::future::{ready, Ready};
use std::sync::Arc;

/// Name of the session cookie. Issuance sets it, logout clears it by
/// writing an already-expired value.
pub const AUTH_COOKIE: &str = "auth_token";

/// Principal resolved for the current request, injected into request
/// extensions by the access gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i64);

/// Resolves the request's principal from the session cookie.
#[derive(Clone)]
pub struct IdentityResolver {
    verifier: Arc<TokenVerifier>,
}

impl IdentityResolver {
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self { verifier }
    }

    /// Resolve the caller's identity, or `None`.
    ///
    /// A missing cookie and an invalid token produce the same verdict; the
    /// failure reason is logged at debug level and never surfaced, so a
    /// caller cannot probe why authentication failed.
    pub fn resolve(&self, req: &HttpRequest) -> Option<UserId> {
        let cookie = req.cookie(AUTH_COOKIE)?;
        match self.verifier.verify(cookie.value()) {
            Ok(user_id) => Some(UserId(user_id)),
            Err(reason) => {
                tracing::debug!(%reason, "session token rejected");
                None
            }
        }
    }
}

/// Extractor reading the principal the gate injected.
///
/// Handlers behind the gate read identity only from this slot; they never
/// re-verify the cookie themselves.
impl actix_web::FromRequest for UserId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<UserId>() {
            Some(user_id) => ready(Ok(*user_id)),
            None => ready(Err(actix_web::error::ErrorUnauthorized(
                "User not authenticated",
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;
    use auth_core::TokenSigner;

    const SECRET: &str = "resolver-test-secret";

    fn resolver() -> IdentityResolver {
        IdentityResolver::new(Arc::new(TokenVerifier::new(SECRET).expect("verifier")))
    }

    #[test]
    fn resolves_valid_cookie() {
        let token = TokenSigner::new(SECRET).unwrap().issue(7).unwrap();
        let req = TestRequest::default()
            .cookie(Cookie::new(AUTH_COOKIE, token))
            .to_http_request();
        assert_eq!(resolver().resolve(&req), Some(UserId(7)));
    }

    #[test]
    fn missing_and_invalid_cookies_are_indistinguishable() {
        let absent = TestRequest::default().to_http_request();
        let garbage = TestRequest::default()
            .cookie(Cookie::new(AUTH_COOKIE, "not-a-token"))
            .to_http_request();
        let expired = {
            let token = TokenSigner::new(SECRET)
                .unwrap()
                .issue_expiring_at(7, 0, 1)
                .unwrap();
            TestRequest::default()
                .cookie(Cookie::new(AUTH_COOKIE, token))
                .to_http_request()
        };
        assert_eq!(resolver().resolve(&absent), None);
        assert_eq!(resolver().resolve(&garbage), None);
        assert_eq!(resolver().resolve(&expired), None);
    }

    #[test]
    fn foreign_cookie_names_are_ignored() {
        let token = TokenSigner::new(SECRET).unwrap().issue(7).unwrap();
        let req = TestRequest::default()
            .cookie(Cookie::new("session", token))
            .to_http_request();
        assert_eq!(resolver().resolve(&req), None);
    }
}
