use actix_middleware::IdentityResolver;
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

/// Health check with optional identity.
///
/// The route is public, so the gate skips identity resolution for it; the
/// handler asks the shared resolver itself. A missing or invalid cookie
/// simply reports `loggedIn: false`.
pub async fn health_check(
    req: HttpRequest,
    resolver: web::Data<IdentityResolver>,
) -> HttpResponse {
    let identity = resolver.resolve(&req);
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "loggedIn": identity.is_some(),
        "userId": identity.map(|u| u.0),
    }))
}
