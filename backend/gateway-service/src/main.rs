/// Postdeck Gateway entry point
///
/// Starts the actix-web server with:
/// - access gate middleware in front of every route
/// - cookie-based identity resolution shared by gate and handlers
/// - Telegram login callback for session issuance
use actix_cors::Cors;
use actix_middleware::{AccessGate, IdentityResolver};
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use auth_core::{TokenSigner, TokenVerifier};
use gateway_service::config::Config;
use gateway_service::handlers::telegram::TelegramLogin;
use gateway_service::handlers::twitter::TwitterConfig;
use gateway_service::routes;
use oauth1::Consumer;
use std::sync::Arc;
use tracing::info;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "gateway_service=info,info".into()),
        )
        .with_target(false)
        .json()
        .init();

    info!("Starting Postdeck Gateway");

    let config = Config::from_env().context("Failed to load configuration")?;

    // A missing or empty session secret aborts startup here; it must never
    // surface as a per-request authentication failure.
    let verifier = Arc::new(
        TokenVerifier::new(&config.session_secret)
            .context("SESSION_SECRET is not usable")?,
    );
    let signer = web::Data::new(
        TokenSigner::new(&config.session_secret).context("SESSION_SECRET is not usable")?,
    );
    let resolver = IdentityResolver::new(verifier);
    let resolver_data = web::Data::new(resolver.clone());
    let telegram = web::Data::new(TelegramLogin {
        bot_token: config.telegram_bot_token.clone(),
    });
    let twitter = web::Data::new(TwitterConfig {
        consumer: match (
            config.twitter_consumer_key.clone(),
            config.twitter_consumer_secret.clone(),
        ) {
            (Some(key), Some(secret)) => Some(Consumer { key, secret }),
            _ => None,
        },
    });

    let login_path = config.login_path.clone();
    let cors_allowed_origins = config.cors_allowed_origins.clone();
    let bind_addr = format!("{}:{}", config.server_host, config.server_port);
    info!(%bind_addr, "HTTP server listening");

    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in cors_allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .wrap(AccessGate::new(
                routes::route_table(),
                resolver.clone(),
                login_path.clone(),
            ))
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .app_data(resolver_data.clone())
            .app_data(signer.clone())
            .app_data(telegram.clone())
            .app_data(twitter.clone())
            .configure(routes::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
