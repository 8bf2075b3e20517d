/// Configuration management
///
/// `SESSION_SECRET` is mandatory: without it the process refuses to start,
/// so a missing secret can never be misreported as an authentication
/// failure at request time. Provider credentials are optional; endpoints
/// that need an absent one answer with a configuration error (500).
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_server_host")]
    pub server_host: String,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    pub session_secret: String,
    pub telegram_bot_token: Option<String>,
    pub twitter_consumer_key: Option<String>,
    pub twitter_consumer_secret: Option<String>,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: String,
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_cors_allowed_origins() -> String {
    "*".to_string()
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }
}
