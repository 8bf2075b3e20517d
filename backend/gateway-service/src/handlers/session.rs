use actix_middleware::{UserId, AUTH_COOKIE};
use actix_web::{cookie::Cookie, HttpResponse};
use serde_json::json;

/// Identity of the caller, read from the slot the access gate filled.
pub async fn me(user: UserId) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "userId": user.0 }))
}

/// Log out by clearing the session cookie (an already-expired value).
pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::new(AUTH_COOKIE, "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.make_removal();
    HttpResponse::Ok().cookie(cookie).json(json!({ "loggedOut": true }))
}

/// Minimal login surface; unauthenticated page requests land here.
pub async fn login_page() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(
            "<!doctype html><html><head><title>Sign in to Postdeck</title></head>\
             <body><h1>Sign in to Postdeck</h1>\
             <p>Use the Telegram login button to continue.</p></body></html>",
        )
}
