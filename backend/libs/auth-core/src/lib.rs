//! # Auth Core Library
//!
//! Session-token primitives shared by Postdeck services.
//!
//! ## Modules
//! - `jwt`: HS256 session token issuance and verification

pub mod jwt;

pub use jwt::{Claims, Principal, TokenError, TokenSigner, TokenVerifier};
