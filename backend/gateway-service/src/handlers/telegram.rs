use actix_middleware::AUTH_COOKIE;
use actix_web::{cookie::Cookie, http::header, web, HttpResponse};
use auth_core::TokenSigner;
use telegram_login::{LoginPayload, MAX_AUTH_AGE_SECS};

use crate::error::{GatewayError, Result};

/// Telegram login configuration shared with the callback handler.
pub struct TelegramLogin {
    pub bot_token: Option<String>,
}

/// Callback target of the Telegram login widget.
///
/// The widget redirects here with the signed payload in the query string.
/// Deserialization rejects payloads missing `id`, `auth_date` or `hash`
/// before any cryptography runs. Signature and freshness must both pass;
/// a stale payload is rejected even when correctly signed. Rejections are
/// uniform so a caller cannot tell which check failed.
pub async fn callback(
    query: web::Query<LoginPayload>,
    telegram: web::Data<TelegramLogin>,
    signer: web::Data<TokenSigner>,
) -> Result<HttpResponse> {
    let bot_token = telegram.bot_token.as_deref().ok_or_else(|| {
        GatewayError::Configuration("TELEGRAM_BOT_TOKEN is not set".to_string())
    })?;

    let payload = query.into_inner();
    if payload.hash.is_empty() {
        return Err(GatewayError::InvalidPayload("empty hash".to_string()));
    }

    if !telegram_login::verify(&payload, bot_token)
        || !telegram_login::is_fresh(payload.auth_date, MAX_AUTH_AGE_SECS)
    {
        tracing::warn!(user_id = payload.id, "telegram login rejected");
        return Err(GatewayError::LoginRejected);
    }

    let token = signer.issue(payload.id)?;
    let cookie = Cookie::build(AUTH_COOKIE, token)
        .path("/")
        .http_only(true)
        .finish();

    tracing::info!(user_id = payload.id, "telegram login accepted");
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .cookie(cookie)
        .finish())
}
