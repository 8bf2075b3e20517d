//! # Actix Middleware Library
//!
//! Edge middleware for the Postdeck gateway
//!
//! ## Modules
//! - `access_gate`: per-request authorization chokepoint
//! - `identity`: cookie-based identity resolution
//! - `routes`: path classification table

pub mod access_gate;
pub mod identity;
pub mod routes;

pub use access_gate::AccessGate;
pub use identity::{IdentityResolver, UserId, AUTH_COOKIE};
pub use routes::{RouteClass, RouteTable};
