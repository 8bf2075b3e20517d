/// Route registration and the gateway's path classification data.
///
/// The two prefix lists below are the whole public surface of the gateway;
/// everything unlisted is protected by the access gate.
use actix_middleware::RouteTable;
use actix_web::web;

use crate::handlers;

/// Login-flow endpoints; always allowed through so the login mechanism
/// cannot lock itself out.
pub const BYPASS_PREFIXES: &[&str] = &["/auth", "/login"];

/// Reachable without identity. `/` matches the root path only; the other
/// prefixes match on path-segment boundaries.
pub const PUBLIC_PREFIXES: &[&str] = &["/", "/about", "/privacy", "/api/health-check"];

pub fn route_table() -> RouteTable {
    RouteTable::new(
        BYPASS_PREFIXES.iter().copied(),
        PUBLIC_PREFIXES.iter().copied(),
    )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/api/health-check",
        web::get().to(handlers::health::health_check),
    )
    .route("/api/me", web::get().to(handlers::session::me))
    .route(
        "/api/twitter/verify-credentials",
        web::post().to(handlers::twitter::verify_credentials),
    )
    .route(
        "/auth/telegram/callback",
        web::get().to(handlers::telegram::callback),
    )
    .route("/auth/logout", web::post().to(handlers::session::logout))
    .route("/login", web::get().to(handlers::session::login_page));
}
