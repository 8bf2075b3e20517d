//! Outbound Twitter v1.1 client
//!
//! Every request is signed with OAuth 1.0a; the client carries only the
//! consumer credentials, the per-user token pair is supplied per call.
//! Response handling stays minimal: the gateway relays JSON verbatim.

use oauth1::{Consumer, Signer, Token};
use serde_json::Value;

use crate::error::{GatewayError, Result};

const API_BASE: &str = "https://api.twitter.com/1.1";

pub struct TwitterClient {
    signer: Signer,
    http: reqwest::Client,
}

impl TwitterClient {
    pub fn new(consumer: Consumer) -> Self {
        Self {
            signer: Signer::new(consumer),
            http: reqwest::Client::new(),
        }
    }

    /// Confirm the stored token pair still works and fetch the account.
    pub async fn verify_credentials(&self, token: &Token) -> Result<Value> {
        let url = format!("{API_BASE}/account/verify_credentials.json");
        self.get(&url, &[], token).await
    }

    /// Fetch the user's recent tweets.
    pub async fn user_timeline(&self, token: &Token, count: u32) -> Result<Value> {
        let count = count.to_string();
        let url = format!("{API_BASE}/statuses/user_timeline.json");
        self.get(&url, &[("count", count.as_str())], token).await
    }

    async fn get(&self, url: &str, params: &[(&str, &str)], token: &Token) -> Result<Value> {
        let authorization = self.signer.authorization_header("GET", url, params, Some(token));
        let response = self
            .http
            .get(url)
            .query(params)
            .header("Authorization", authorization)
            .send()
            .await
            .map_err(|e| GatewayError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Upstream(format!(
                "twitter returned {status}"
            )));
        }
        response
            .json()
            .await
            .map_err(|e| GatewayError::Upstream(e.to_string()))
    }
}
