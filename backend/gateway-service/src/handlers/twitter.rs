use actix_middleware::UserId;
use actix_web::{web, HttpResponse};
use oauth1::{Consumer, Token};
use serde::Deserialize;

use crate::error::{GatewayError, Result};
use crate::services::twitter::TwitterClient;

/// Consumer credentials from configuration, or `None` when the deployment
/// has no Twitter integration.
pub struct TwitterConfig {
    pub consumer: Option<Consumer>,
}

/// Access token pair for the connected account. Token storage belongs to
/// the app behind the gateway; it passes the pair in per call.
#[derive(Debug, Deserialize)]
pub struct TokenPair {
    pub token: String,
    pub token_secret: String,
}

/// Check a connected account's token pair against the Twitter API.
///
/// Protected route: the gate has already resolved the caller. Absent
/// consumer credentials are a configuration fault and answer 500, never an
/// authentication failure.
pub async fn verify_credentials(
    user: UserId,
    body: web::Json<TokenPair>,
    config: web::Data<TwitterConfig>,
) -> Result<HttpResponse> {
    let consumer = config.consumer.clone().ok_or_else(|| {
        GatewayError::Configuration(
            "TWITTER_CONSUMER_KEY/TWITTER_CONSUMER_SECRET are not set".to_string(),
        )
    })?;

    let pair = body.into_inner();
    let token = Token {
        key: pair.token,
        secret: pair.token_secret,
    };
    let account = TwitterClient::new(consumer).verify_credentials(&token).await?;

    tracing::info!(user_id = user.0, "twitter credentials verified");
    Ok(HttpResponse::Ok().json(account))
}
