//! Postdeck gateway: the edge service in front of the publishing app.
//!
//! Owns request authentication end to end: the access gate classifies every
//! inbound path, the identity resolver turns the session cookie into a
//! principal, the Telegram callback issues sessions, and the Twitter client
//! signs outbound v1.1 calls with OAuth 1.0a.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
